//! Run scheduler (C6)
//!
//! Owns the lifecycle of a single run: resolving the assistant and thread,
//! applying multitask policy against any run already active on the thread,
//! persisting the new row, and handing off to the graph for execution.
//! Graph execution itself (wait vs stream) is driven by the caller through
//! [`CompiledGraph`] — this module only decides *whether* a run may start
//! and keeps thread/run bookkeeping consistent around it.

use crate::db::connection::DatabasePool;
use crate::db::error::DatabaseError;
use crate::db::models::{Assistant, MultitaskStrategy, Run, RunStatus, Thread, ThreadStatus};
use crate::db::repositories::{AssistantRepository, RunRepository, ThreadRepository};
use crate::registry::{GraphRegistry, RegistryError};
use langgraph_checkpoint::CheckpointSaver;
use langgraph_core::compiled::CompiledGraph;
use langgraph_core::store::Store;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("assistant '{0}' not found")]
    AssistantNotFound(String),

    #[error("another run is already active on this thread")]
    ThreadBusy,

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Outcome of submitting a run, reflecting the multitask strategy applied
/// against any run already active on the thread.
pub enum StartOutcome {
    /// No conflicting run was active; this run was created and may proceed.
    Created(Run),
    /// `Enqueue` strategy: the run was created but must wait for the active
    /// run to finish before a worker picks it up.
    Enqueued(Run),
    /// `Interrupt`/`Rollback` strategy: the previously active run was
    /// stopped and this run was created in its place.
    Superseded { new_run: Run, superseded: Run },
}

impl StartOutcome {
    pub fn run(&self) -> &Run {
        match self {
            StartOutcome::Created(r) | StartOutcome::Enqueued(r) => r,
            StartOutcome::Superseded { new_run, .. } => new_run,
        }
    }
}

pub struct RunScheduler {
    pool: Arc<DatabasePool>,
    registry: GraphRegistry,
}

impl RunScheduler {
    pub fn new(pool: Arc<DatabasePool>, registry: GraphRegistry) -> Self {
        Self { pool, registry }
    }

    /// Resolve (or create) the thread for a run, then apply multitask
    /// policy and persist the new run row.
    pub async fn start_run(
        &self,
        thread_id: Option<&str>,
        assistant_id_or_graph_id: &str,
        kwargs: Value,
        multitask_strategy: Option<MultitaskStrategy>,
        owner: &str,
    ) -> Result<(Thread, StartOutcome), SchedulerError> {
        let assistant = AssistantRepository::get(&self.pool, assistant_id_or_graph_id, owner)
            .await?
            .ok_or_else(|| SchedulerError::AssistantNotFound(assistant_id_or_graph_id.to_string()))?;

        let thread = match thread_id {
            Some(id) => match ThreadRepository::get(&self.pool, id, owner).await? {
                Some(t) => t,
                None => ThreadRepository::create(&self.pool, id, owner).await?,
            },
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                ThreadRepository::create(&self.pool, &id, owner).await?
            }
        };

        let strategy = multitask_strategy.unwrap_or_default();
        let active = RunRepository::get_active_run(&self.pool, &thread.thread_id).await?;

        let outcome = match active {
            None => {
                let run = RunRepository::create(
                    &self.pool,
                    &thread.thread_id,
                    &assistant.assistant_id,
                    kwargs,
                    strategy,
                    owner,
                )
                .await?;
                ThreadRepository::set_status(&self.pool, &thread.thread_id, ThreadStatus::Busy).await?;
                StartOutcome::Created(run)
            }
            Some(active_run) => match strategy {
                MultitaskStrategy::Reject => return Err(SchedulerError::ThreadBusy),
                MultitaskStrategy::Enqueue => {
                    let run = RunRepository::create(
                        &self.pool,
                        &thread.thread_id,
                        &assistant.assistant_id,
                        kwargs,
                        strategy,
                        owner,
                    )
                    .await?;
                    StartOutcome::Enqueued(run)
                }
                MultitaskStrategy::Interrupt => {
                    let superseded =
                        RunRepository::set_status(&self.pool, &active_run.run_id, RunStatus::Interrupted).await?;
                    let run = RunRepository::create(
                        &self.pool,
                        &thread.thread_id,
                        &assistant.assistant_id,
                        kwargs,
                        strategy,
                        owner,
                    )
                    .await?;
                    ThreadRepository::set_status(&self.pool, &thread.thread_id, ThreadStatus::Busy).await?;
                    StartOutcome::Superseded { new_run: run, superseded }
                }
                MultitaskStrategy::Rollback => {
                    let superseded =
                        RunRepository::set_status(&self.pool, &active_run.run_id, RunStatus::Error).await?;
                    let run = RunRepository::create(
                        &self.pool,
                        &thread.thread_id,
                        &assistant.assistant_id,
                        kwargs,
                        strategy,
                        owner,
                    )
                    .await?;
                    ThreadRepository::set_status(&self.pool, &thread.thread_id, ThreadStatus::Busy).await?;
                    StartOutcome::Superseded { new_run: run, superseded }
                }
            },
        };

        Ok((thread, outcome))
    }

    /// Compile the graph backing `assistant`, wiring in the caller's
    /// checkpointer/store handles.
    pub fn compile_for(
        &self,
        assistant: &Assistant,
        checkpointer: Option<Arc<dyn CheckpointSaver>>,
        store: Option<Arc<dyn Store>>,
    ) -> Result<CompiledGraph, SchedulerError> {
        self.registry
            .resolve(&assistant.graph_id, &assistant.config.0, checkpointer, store)
            .map_err(SchedulerError::from)
    }

    /// Mark a run finished and release the thread back to `idle`, unless
    /// another run is already waiting (enqueue strategy).
    pub async fn complete_run(&self, thread_id: &str, run_id: &str, status: RunStatus) -> Result<Run, SchedulerError> {
        let run = RunRepository::set_status(&self.pool, run_id, status).await?;

        let still_active = RunRepository::get_active_run(&self.pool, thread_id).await?;
        let next_status = if still_active.is_some() { ThreadStatus::Busy } else { ThreadStatus::Idle };
        ThreadRepository::set_status(&self.pool, thread_id, next_status).await?;

        Ok(run)
    }

    /// Cancel an in-flight run. `wait` callers should await the run's
    /// terminal state; streaming callers observe the cancellation as a
    /// dropped stream.
    pub async fn cancel(&self, thread_id: &str, run_id: &str, owner: &str) -> Result<Run, SchedulerError> {
        let run = RunRepository::get(&self.pool, run_id, owner)
            .await?
            .ok_or_else(|| SchedulerError::Database(DatabaseError::not_found(format!("run {run_id}"))))?;

        if run.is_terminal() {
            return Ok(run);
        }

        self.complete_run(thread_id, run_id, RunStatus::Interrupted).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_outcome_run_returns_the_newly_created_run() {
        let run = Run::new("t1".into(), "a1".into(), Value::Null, MultitaskStrategy::Reject, "user-1");
        let run_id = run.run_id.clone();
        let outcome = StartOutcome::Created(run);
        assert_eq!(outcome.run().run_id, run_id);
    }

    #[test]
    fn superseded_outcome_run_returns_the_new_run_not_the_old_one() {
        let old = Run::new("t1".into(), "a1".into(), Value::Null, MultitaskStrategy::Interrupt, "user-1");
        let new = Run::new("t1".into(), "a1".into(), Value::Null, MultitaskStrategy::Interrupt, "user-1");
        let new_id = new.run_id.clone();
        let outcome = StartOutcome::Superseded { new_run: new, superseded: old };
        assert_eq!(outcome.run().run_id, new_id);
    }
}
