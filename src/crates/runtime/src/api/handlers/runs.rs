//! Run execution endpoints (C6/C7, §6) — the stateful and stateless run
//! surfaces, streaming via SSE, and cancellation.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::StreamExt;
use serde_json::Value;
use tokio_stream::wrappers::ReceiverStream;

use crate::agent_run;
use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{CancelRunResponse, CreateRunRequest, RunResponse, ThreadStateResponse};
use crate::api::response;
use crate::api::routes::AppState;
use crate::auth::AuthUser;
use crate::db::models::{Assistant, MultitaskStrategy, Run, RunStatus, Thread, ThreadState};
use crate::db::repositories::{AssistantRepository, RunRepository, ThreadRepository, ThreadStateRepository};
use crate::streaming::{self, FrameBuilder};

async fn resolve_assistant(state: &AppState, assistant_id_or_graph_id: &str, owner: &str) -> ApiResult<Assistant> {
    AssistantRepository::get(state.db.pool(), assistant_id_or_graph_id, owner)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("assistant {assistant_id_or_graph_id}")))
}

fn graph_input(kwargs: &Value) -> Value {
    kwargs.get("input").cloned().unwrap_or(Value::Object(Default::default()))
}

fn fire_webhook(url: &str, run_id: &str, status: &str, values: &Value) {
    let url = url.to_string();
    let run_id = run_id.to_string();
    let status = status.to_string();
    let values = values.clone();
    tokio::spawn(async move {
        let client = reqwest::Client::new();
        let body = serde_json::json!({ "run_id": run_id, "status": status, "values": values });
        if let Err(err) = client.post(&url).json(&body).send().await {
            tracing::warn!(run_id = %run_id, error = %err, "webhook delivery failed");
        }
    });
}

/// Persist the graph's outcome, release the thread, fire the webhook.
/// Returns the final state values on success.
async fn finish_run(
    state: &AppState,
    thread_id: &str,
    run_id: &str,
    outcome: Result<Value, langgraph_core::GraphError>,
    webhook: Option<&str>,
) -> ApiResult<Value> {
    match outcome {
        Ok(values) => {
            ThreadStateRepository::append(state.db.pool(), thread_id, values.clone()).await?;
            ThreadRepository::set_values(state.db.pool(), thread_id, values.clone()).await?;
            state.scheduler.complete_run(thread_id, run_id, RunStatus::Success).await?;
            if let Some(url) = webhook {
                fire_webhook(url, run_id, "success", &values);
            }
            Ok(values)
        }
        Err(err) => {
            state.scheduler.complete_run(thread_id, run_id, RunStatus::Error).await?;
            if let Some(url) = webhook {
                fire_webhook(url, run_id, "error", &Value::String(err.to_string()));
            }
            Err(ApiError::from(err))
        }
    }
}

/// Maybe delete an ephemeral stateless thread once its run has settled.
async fn maybe_delete_ephemeral(state: &AppState, on_completion: Option<&str>, thread_id: &str, owner: &str) {
    if on_completion == Some("delete") {
        if let Err(err) = ThreadRepository::delete(state.db.pool(), thread_id, owner).await {
            tracing::warn!(thread_id = %thread_id, error = %err, "failed to delete ephemeral thread");
        }
    }
}

/// Drive a compiled graph to completion in a detached task, for the
/// background (non-blocking) run surface.
fn spawn_background_run(
    state: AppState,
    thread: Thread,
    run: Run,
    assistant: Assistant,
    kwargs: Value,
    owner: String,
    webhook: Option<String>,
    on_completion: Option<String>,
) {
    tokio::spawn(async move {
        let thread_id = thread.thread_id.clone();
        let run_id = run.run_id.clone();
        let configurable = agent_run::build_configurable(&run, &thread, &assistant, &owner, &kwargs);

        let graph = match agent_run::compile(&state.scheduler, &assistant) {
            Ok(g) => g,
            Err(err) => {
                let _ = state.scheduler.complete_run(&thread_id, &run_id, RunStatus::Error).await;
                tracing::error!(run_id = %run_id, error = %err, "failed to compile graph for background run");
                return;
            }
        };

        let outcome = agent_run::invoke(&graph, graph_input(&kwargs), &thread_id, configurable).await;
        if let Err(err) = finish_run(&state, &thread_id, &run_id, outcome, webhook.as_deref()).await {
            tracing::error!(run_id = %run_id, error = %err, "background run failed");
        }
        maybe_delete_ephemeral(&state, on_completion.as_deref(), &thread_id, &owner).await;
    });
}

fn apply_headers(response: &mut Response, headers: Vec<(&'static str, String)>) {
    for (name, value) in headers {
        if let (Ok(name), Ok(value)) = (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&value)) {
            response.headers_mut().insert(name, value);
        }
    }
}

fn sse_body(receiver: streaming::FrameReceiver) -> Body {
    let stream = ReceiverStream::new(receiver).map(Ok::<_, std::convert::Infallible>);
    Body::from_stream(stream)
}

/// Drive a compiled graph's stream in a detached task, forwarding framed
/// SSE text through `sender`, then settle the run exactly as the
/// background/wait paths do.
fn spawn_streaming_run(
    state: AppState,
    thread: Thread,
    run: Run,
    assistant: Assistant,
    kwargs: Value,
    owner: String,
    stream_mode: Vec<String>,
    on_disconnect: Option<String>,
    webhook: Option<String>,
    on_completion: Option<String>,
    sender: streaming::FrameSender,
) {
    let policy: streaming::DisconnectPolicy = on_disconnect.as_deref().and_then(|s| s.parse().ok()).unwrap_or_default();

    tokio::spawn(async move {
        let thread_id = thread.thread_id.clone();
        let run_id = run.run_id.clone();
        let mut builder = FrameBuilder::new(run_id.clone(), serde_json::json!({}), 1);
        let input = graph_input(&kwargs);
        let configurable = agent_run::build_configurable(&run, &thread, &assistant, &owner, &kwargs);

        let _ = sender.send(builder.metadata_frame()).await;
        let _ = sender.send(builder.initial_values_frame(&input)).await;

        let graph = match agent_run::compile(&state.scheduler, &assistant) {
            Ok(g) => g,
            Err(err) => {
                let _ = sender.send(builder.error_frame(&err.to_string(), None)).await;
                let _ = state.scheduler.complete_run(&thread_id, &run_id, RunStatus::Error).await;
                return;
            }
        };

        let mut chunks = match agent_run::stream(&graph, input, &thread_id, &stream_mode, configurable).await {
            Ok(s) => s,
            Err(err) => {
                let _ = sender.send(builder.error_frame(&err.to_string(), None)).await;
                let _ = state.scheduler.complete_run(&thread_id, &run_id, RunStatus::Error).await;
                return;
            }
        };

        let mut last_values: Option<Value> = None;
        let mut disconnected = false;
        while let Some(chunk) = chunks.next().await {
            if let langgraph_core::StreamEvent::Values { state: values } = &chunk.event {
                last_values = Some(values.clone());
            }
            for frame in builder.frame_for(&chunk) {
                if sender.send(frame).await.is_err() {
                    disconnected = true;
                    if policy == streaming::DisconnectPolicy::Cancel {
                        state.scheduler.complete_run(&thread_id, &run_id, RunStatus::Interrupted).await.ok();
                        return;
                    }
                    // keep draining the graph to completion, but stop trying
                    // to write frames to a closed connection.
                    break;
                }
            }
        }

        let final_values = last_values.unwrap_or(Value::Object(Default::default()));
        if !disconnected {
            let _ = sender.send(builder.final_values_frame(&final_values)).await;
        }
        let outcome: Result<Value, langgraph_core::GraphError> = Ok(final_values);
        let _ = finish_run(&state, &thread_id, &run_id, outcome, webhook.as_deref()).await;
        maybe_delete_ephemeral(&state, on_completion.as_deref(), &thread_id, &owner).await;
    });
}

// ---------------------------------------------------------------------
// Stateful run surface
// ---------------------------------------------------------------------

pub async fn create_run(
    State(state): State<AppState>,
    user: AuthUser,
    Path(thread_id): Path<String>,
    Json(req): Json<CreateRunRequest>,
) -> ApiResult<Json<RunResponse>> {
    let strategy = req.multitask_strategy.unwrap_or(MultitaskStrategy::Enqueue);
    let assistant = resolve_assistant(&state, &req.assistant_id, user.owner()).await?;
    let kwargs = req.kwargs();

    let (thread, outcome) = state
        .scheduler
        .start_run(Some(&thread_id), &assistant.assistant_id, kwargs.clone(), Some(strategy), user.owner())
        .await?;
    let run = outcome.run().clone();

    spawn_background_run(
        state,
        thread,
        run.clone(),
        assistant,
        kwargs,
        user.owner().to_string(),
        req.webhook.clone(),
        req.on_completion.clone(),
    );

    Ok(Json(RunResponse::from(run)))
}

pub async fn stream_run(
    State(state): State<AppState>,
    user: AuthUser,
    Path(thread_id): Path<String>,
    Json(req): Json<CreateRunRequest>,
) -> ApiResult<Response> {
    let strategy = req.multitask_strategy.unwrap_or(MultitaskStrategy::Enqueue);
    let assistant = resolve_assistant(&state, &req.assistant_id, user.owner()).await?;
    let kwargs = req.kwargs();

    let (thread, outcome) = state
        .scheduler
        .start_run(Some(&thread_id), &assistant.assistant_id, kwargs.clone(), Some(strategy), user.owner())
        .await?;
    let run = outcome.run().clone();

    let (sender, receiver) = streaming::frame_channel();
    spawn_streaming_run(
        state,
        thread.clone(),
        run.clone(),
        assistant,
        kwargs,
        user.owner().to_string(),
        req.stream_mode.clone(),
        req.on_disconnect.clone(),
        req.webhook.clone(),
        req.on_completion.clone(),
        sender,
    );

    let headers = streaming::sse_headers(Some(&thread.thread_id), Some(&run.run_id), false);
    let mut response = Response::new(sse_body(receiver));
    apply_headers(&mut response, headers);
    Ok(response)
}

pub async fn wait_run(
    State(state): State<AppState>,
    user: AuthUser,
    Path(thread_id): Path<String>,
    Json(req): Json<CreateRunRequest>,
) -> ApiResult<Json<ThreadStateResponse>> {
    let strategy = req.multitask_strategy.unwrap_or(MultitaskStrategy::Reject);
    let assistant = resolve_assistant(&state, &req.assistant_id, user.owner()).await?;
    let kwargs = req.kwargs();

    let (thread, outcome) = state
        .scheduler
        .start_run(Some(&thread_id), &assistant.assistant_id, kwargs.clone(), Some(strategy), user.owner())
        .await?;
    let run = outcome.run().clone();

    let configurable = agent_run::build_configurable(&run, &thread, &assistant, user.owner(), &kwargs);
    let graph = agent_run::compile(&state.scheduler, &assistant)?;
    let result = agent_run::invoke(&graph, graph_input(&kwargs), &thread.thread_id, configurable).await;
    let values = finish_run(&state, &thread.thread_id, &run.run_id, result, req.webhook.as_deref()).await?;
    maybe_delete_ephemeral(&state, req.on_completion.as_deref(), &thread.thread_id, user.owner()).await;

    let snapshot = ThreadStateRepository::latest(state.db.pool(), &thread.thread_id)
        .await?
        .unwrap_or_else(|| ThreadState::new(thread.thread_id.clone(), values));
    Ok(Json(ThreadStateResponse::from(snapshot)))
}

/// Reconnect to an existing run (§4.7 join-stream semantics): a metadata
/// frame, a single `values` frame with the current snapshot, and — if the
/// run is terminal — a single `updates` frame reflecting its final status.
/// No live token replay.
pub async fn join_stream(
    State(state): State<AppState>,
    user: AuthUser,
    Path((thread_id, run_id)): Path<(String, String)>,
) -> ApiResult<Response> {
    let run = RunRepository::get(state.db.pool(), &run_id, user.owner())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("run {run_id}")))?;

    let snapshot = ThreadStateRepository::latest(state.db.pool(), &thread_id).await?;
    let builder = FrameBuilder::new(run.run_id.clone(), serde_json::json!({}), 1);

    let mut frames = vec![builder.metadata_frame()];
    let values = snapshot.map(|s| s.values.0).unwrap_or(Value::Object(Default::default()));
    frames.push(builder.initial_values_frame(&values));
    if run.is_terminal() {
        frames.push(streaming::updates_event("run", &serde_json::json!({ "status": run.status.clone() })));
    }

    let headers = streaming::sse_headers(Some(&thread_id), Some(&run.run_id), false);
    let mut response = Response::new(Body::from(frames.concat()));
    apply_headers(&mut response, headers);
    Ok(response)
}

pub async fn cancel_run(
    State(state): State<AppState>,
    user: AuthUser,
    Path((thread_id, run_id)): Path<(String, String)>,
) -> ApiResult<Json<CancelRunResponse>> {
    let run = RunRepository::get(state.db.pool(), &run_id, user.owner())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("run {run_id}")))?;

    if run.is_terminal() {
        return Err(ApiError::Conflict(format!("run {run_id} is already {}", run.status)));
    }

    state.scheduler.cancel(&thread_id, &run_id, user.owner()).await?;
    Ok(Json(CancelRunResponse {}))
}

pub async fn get_run(
    State(state): State<AppState>,
    user: AuthUser,
    Path((_thread_id, run_id)): Path<(String, String)>,
) -> ApiResult<Json<RunResponse>> {
    let run = RunRepository::get(state.db.pool(), &run_id, user.owner())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("run {run_id}")))?;
    Ok(Json(RunResponse::from(run)))
}

pub async fn delete_run(
    State(state): State<AppState>,
    user: AuthUser,
    Path((thread_id, run_id)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let deleted = RunRepository::delete(state.db.pool(), &thread_id, &run_id, user.owner()).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("run {run_id}")));
    }
    Ok(response::no_content())
}

// ---------------------------------------------------------------------
// Stateless run surface — thread_id is always `None` at scheduler level,
// so the scheduler mints an ephemeral thread.
// ---------------------------------------------------------------------

pub async fn create_stateless_run(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateRunRequest>,
) -> ApiResult<Json<RunResponse>> {
    let strategy = req.multitask_strategy.unwrap_or(MultitaskStrategy::Enqueue);
    let assistant = resolve_assistant(&state, &req.assistant_id, user.owner()).await?;
    let kwargs = req.kwargs();

    let (thread, outcome) = state
        .scheduler
        .start_run(None, &assistant.assistant_id, kwargs.clone(), Some(strategy), user.owner())
        .await?;
    let run = outcome.run().clone();

    spawn_background_run(
        state,
        thread,
        run.clone(),
        assistant,
        kwargs,
        user.owner().to_string(),
        req.webhook.clone(),
        Some(req.on_completion.clone().unwrap_or_else(|| "delete".to_string())),
    );

    Ok(Json(RunResponse::from(run)))
}

pub async fn stream_stateless_run(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateRunRequest>,
) -> ApiResult<Response> {
    let strategy = req.multitask_strategy.unwrap_or(MultitaskStrategy::Enqueue);
    let assistant = resolve_assistant(&state, &req.assistant_id, user.owner()).await?;
    let kwargs = req.kwargs();

    let (thread, outcome) = state
        .scheduler
        .start_run(None, &assistant.assistant_id, kwargs.clone(), Some(strategy), user.owner())
        .await?;
    let run = outcome.run().clone();

    let (sender, receiver) = streaming::frame_channel();
    spawn_streaming_run(
        state,
        thread.clone(),
        run.clone(),
        assistant,
        kwargs,
        user.owner().to_string(),
        req.stream_mode.clone(),
        req.on_disconnect.clone(),
        req.webhook.clone(),
        Some(req.on_completion.clone().unwrap_or_else(|| "delete".to_string())),
        sender,
    );

    let headers = streaming::sse_headers(None, Some(&run.run_id), true);
    let mut response = Response::new(sse_body(receiver));
    apply_headers(&mut response, headers);
    Ok(response)
}

pub async fn wait_stateless_run(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateRunRequest>,
) -> ApiResult<Json<ThreadStateResponse>> {
    let strategy = req.multitask_strategy.unwrap_or(MultitaskStrategy::Reject);
    let assistant = resolve_assistant(&state, &req.assistant_id, user.owner()).await?;
    let kwargs = req.kwargs();

    let (thread, outcome) = state
        .scheduler
        .start_run(None, &assistant.assistant_id, kwargs.clone(), Some(strategy), user.owner())
        .await?;
    let run = outcome.run().clone();

    let configurable = agent_run::build_configurable(&run, &thread, &assistant, user.owner(), &kwargs);
    let graph = agent_run::compile(&state.scheduler, &assistant)?;
    let result = agent_run::invoke(&graph, graph_input(&kwargs), &thread.thread_id, configurable).await;
    let values = finish_run(&state, &thread.thread_id, &run.run_id, result, req.webhook.as_deref()).await?;

    let on_completion = req.on_completion.clone().unwrap_or_else(|| "delete".to_string());
    maybe_delete_ephemeral(&state, Some(on_completion.as_str()), &thread.thread_id, user.owner()).await;

    let snapshot = ThreadState::new(thread.thread_id.clone(), values);
    Ok(Json(ThreadStateResponse::from(snapshot)))
}
