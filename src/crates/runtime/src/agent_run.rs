//! Graph execution glue shared by the HTTP run endpoints and the C9
//! protocol adapters.
//!
//! Builds the per-request `configurable` auth context (§6), compiles the
//! assistant's graph with freshly constructed, request-scoped
//! checkpointer/store handles, and drives either the blocking
//! `invoke_with_config` path or the chunked streaming path.

use crate::db::models::{Assistant, Run, Thread};
use crate::scheduler::{RunScheduler, SchedulerError};
use langgraph_checkpoint::InMemoryCheckpointSaver;
use langgraph_core::store::InMemoryStore;
use langgraph_core::{CheckpointConfig, CompiledGraph, StreamChunkStream, StreamMode};
use serde_json::Value;
use std::sync::Arc;

/// Merge the caller-supplied `config.configurable` under the auth context
/// §6 specifies must be injected at run start. Caller values never
/// override the auth-derived keys.
pub fn build_configurable(run: &Run, thread: &Thread, assistant: &Assistant, owner: &str, kwargs: &Value) -> Value {
    let mut configurable = kwargs
        .get("config")
        .and_then(|c| c.get("configurable"))
        .cloned()
        .unwrap_or(Value::Object(Default::default()));

    if let Value::Object(map) = &mut configurable {
        map.insert("run_id".into(), Value::String(run.run_id.clone()));
        map.insert("thread_id".into(), Value::String(thread.thread_id.clone()));
        map.insert("assistant_id".into(), Value::String(assistant.assistant_id.clone()));
        map.insert("owner".into(), Value::String(owner.to_string()));
        map.insert("user_id".into(), Value::String(owner.to_string()));
        map.insert(
            "assistant".into(),
            serde_json::to_value(assistant).unwrap_or(Value::Null),
        );
        let org_id = assistant
            .metadata
            .0
            .get("owner")
            .and_then(|v| v.as_str())
            .unwrap_or(owner);
        map.insert("supabase_organization_id".into(), Value::String(org_id.to_string()));
    }

    configurable
}

/// Compile `assistant`'s graph with fresh in-process checkpointer/store
/// handles. Neither survives past the request that creates it, matching
/// §5's "constructed fresh per request" requirement.
pub fn compile(
    scheduler: &RunScheduler,
    assistant: &Assistant,
) -> Result<CompiledGraph, SchedulerError> {
    let checkpointer = Arc::new(InMemoryCheckpointSaver::new());
    let store = Arc::new(InMemoryStore::new());
    scheduler.compile_for(assistant, Some(checkpointer), Some(store))
}

fn parse_stream_modes(modes: &[String]) -> Vec<StreamMode> {
    let parsed: Vec<StreamMode> = modes
        .iter()
        .filter_map(|m| match m.as_str() {
            "values" => Some(StreamMode::Values),
            "updates" => Some(StreamMode::Updates),
            "messages" | "messages-tuple" => Some(StreamMode::Messages),
            "debug" => Some(StreamMode::Debug),
            "events" => Some(StreamMode::Tasks),
            "custom" => Some(StreamMode::Custom),
            _ => None,
        })
        .collect();
    if parsed.is_empty() {
        vec![StreamMode::Messages, StreamMode::Values]
    } else {
        parsed
    }
}

fn checkpoint_config(thread_id: &str, configurable: Value) -> CheckpointConfig {
    let mut config = CheckpointConfig::new().with_thread_id(thread_id.to_string());
    config.extra.insert("configurable".to_string(), configurable);
    config
}

/// Block until the graph reaches a terminal state and return the final
/// state value (§6: `/runs/wait` response body).
pub async fn invoke(
    graph: &CompiledGraph,
    input: Value,
    thread_id: &str,
    configurable: Value,
) -> Result<Value, langgraph_core::GraphError> {
    let config = checkpoint_config(thread_id, configurable);
    graph.invoke_with_config(input, Some(config)).await
}

/// Open the chunked streaming channel for `input` under `stream_mode`
/// (§4.7/§6). The returned stream yields raw `StreamChunk`s for a
/// [`crate::streaming::FrameBuilder`] to turn into SSE frames.
pub async fn stream(
    graph: &CompiledGraph,
    input: Value,
    thread_id: &str,
    stream_mode: &[String],
    configurable: Value,
) -> Result<StreamChunkStream, langgraph_core::GraphError> {
    let config = checkpoint_config(thread_id, configurable);
    let modes = parse_stream_modes(stream_mode);
    graph.stream_chunks_with_modes(input, modes, Some(config)).await
}

/// Extract the textual content of the last AI message in a final state
/// value, per the C9 protocol adapters' non-streaming wrapper contract.
pub fn last_ai_message_text(state: &Value) -> Option<String> {
    let messages = state.get("messages")?.as_array()?;
    messages.iter().rev().find_map(|m| {
        let is_ai = m.get("type").and_then(|t| t.as_str()) == Some("ai");
        if !is_ai {
            return None;
        }
        m.get("content").and_then(|c| c.as_str()).map(|s| s.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::MultitaskStrategy;

    #[test]
    fn build_configurable_injects_auth_context_without_dropping_caller_keys() {
        let run = Run::new("t1".into(), "a1".into(), Value::Null, MultitaskStrategy::Reject, "user-1");
        let thread = Thread::new("t1".into(), "user-1");
        let assistant = Assistant::new("a1".into(), "agent".into(), "user-1");
        let kwargs = serde_json::json!({"config": {"configurable": {"custom_key": "v"}}});

        let configurable = build_configurable(&run, &thread, &assistant, "user-1", &kwargs);
        assert_eq!(configurable["custom_key"], "v");
        assert_eq!(configurable["owner"], "user-1");
        assert_eq!(configurable["thread_id"], "t1");
        assert_eq!(configurable["assistant_id"], "a1");
    }

    #[test]
    fn last_ai_message_text_skips_trailing_non_ai_messages() {
        let state = serde_json::json!({
            "messages": [
                {"type": "human", "content": "2+2"},
                {"type": "ai", "content": "4"},
                {"type": "tool", "content": "ignored"},
            ]
        });
        assert_eq!(last_ai_message_text(&state), Some("4".to_string()));
    }

    #[test]
    fn last_ai_message_text_none_when_no_ai_message_present() {
        let state = serde_json::json!({"messages": [{"type": "human", "content": "hi"}]});
        assert!(last_ai_message_text(&state).is_none());
    }
}
