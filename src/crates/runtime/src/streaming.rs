//! Streaming engine (C7)
//!
//! Converts a graph's internal [`StreamEvent`] stream into the
//! LangGraph-compatible SSE framing clients expect. The framing must be
//! bit-exact: `messages` frames carry only the *new* content since the last
//! frame for a given message id, never the accumulated text, because the
//! SDK's chunk manager concatenates them client-side.

use langgraph_core::stream::{StreamChunk, StreamEvent};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::sync::mpsc;

/// SSE event types emitted to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseEventType {
    Metadata,
    Values,
    Updates,
    Messages,
    Error,
}

impl SseEventType {
    fn as_str(&self) -> &'static str {
        match self {
            SseEventType::Metadata => "metadata",
            SseEventType::Values => "values",
            SseEventType::Updates => "updates",
            SseEventType::Messages => "messages",
            SseEventType::Error => "error",
        }
    }
}

/// Format one SSE frame: `event: <type>\ndata: <json>\n\n`.
pub fn format_event(event_type: SseEventType, data: &impl Serialize) -> String {
    let json_data = serde_json::to_string(data).unwrap_or_else(|_| "null".to_string());
    format!("event: {}\ndata: {}\n\n", event_type.as_str(), json_data)
}

/// The always-first frame of a stream.
pub fn metadata_event(run_id: &str, attempt: u32) -> String {
    format_event(SseEventType::Metadata, &json!({ "run_id": run_id, "attempt": attempt }))
}

pub fn values_event(values: &Value) -> String {
    format_event(SseEventType::Values, values)
}

pub fn updates_event(node_name: &str, updates: &Value) -> String {
    format_event(SseEventType::Updates, &json!({ node_name: updates }))
}

/// `event: messages` carrying a 2-tuple `[message_delta, metadata]`.
/// `message_delta.content` must be the new chunk only.
pub fn messages_tuple_event(message_delta: &Value, metadata: &Value) -> String {
    format_event(SseEventType::Messages, &json!([message_delta, metadata]))
}

pub fn error_event(error: &str, code: Option<&str>) -> String {
    let mut data = json!({ "error": error });
    if let Some(code) = code {
        data["code"] = json!(code);
    }
    format_event(SseEventType::Error, &data)
}

/// Standard SSE response headers, plus `Location`/`Content-Location` so a
/// client can reconnect via the join-stream endpoint.
pub fn sse_headers(thread_id: Option<&str>, run_id: Option<&str>, stateless: bool) -> Vec<(&'static str, String)> {
    let mut headers = vec![
        ("Content-Type", "text/event-stream; charset=utf-8".to_string()),
        ("Cache-Control", "no-store".to_string()),
        ("X-Accel-Buffering", "no".to_string()),
        ("Access-Control-Allow-Origin", "*".to_string()),
        ("Access-Control-Allow-Headers", "Cache-Control".to_string()),
    ];

    if let Some(run_id) = run_id {
        if stateless {
            headers.push(("Location", format!("/runs/{run_id}/stream")));
            headers.push(("Content-Location", format!("/runs/{run_id}")));
        } else if let Some(thread_id) = thread_id {
            headers.push(("Location", format!("/threads/{thread_id}/runs/{run_id}/stream")));
            headers.push(("Content-Location", format!("/threads/{thread_id}/runs/{run_id}")));
        }
    }

    headers
}

fn human_message(content: &str) -> Value {
    json!({
        "content": content,
        "additional_kwargs": {},
        "response_metadata": {},
        "type": "human",
        "name": Value::Null,
        "id": Value::Null,
    })
}

/// Construct a delta-shaped AI message chunk dict — carries only `content`
/// (the new token(s)), never the running total.
fn ai_message_delta(content: &str, message_id: Option<&str>, response_metadata: Value) -> Value {
    json!({
        "content": content,
        "additional_kwargs": {},
        "response_metadata": response_metadata,
        "type": "AIMessageChunk",
        "name": Value::Null,
        "id": message_id,
        "tool_calls": [],
        "invalid_tool_calls": [],
    })
}

/// Build the `response_metadata` for a message's final empty-content delta
/// when `metadata` reports a `finish_reason` — the signal the `llm` crate's
/// backends attach to the last chunk of a completion. Returns `None` for
/// every other chunk, so callers only synthesize a finish delta once.
fn finish_metadata(metadata: Option<&Value>) -> Option<Value> {
    let metadata = metadata?;
    let finish_reason = metadata.get("finish_reason")?;

    let mut response_metadata = metadata
        .get("response_metadata")
        .cloned()
        .unwrap_or_else(|| json!({}));
    if let Value::Object(map) = &mut response_metadata {
        map.insert("finish_reason".to_string(), finish_reason.clone());
        if let Some(model) = metadata.get("model").or_else(|| metadata.get("model_name")) {
            map.insert("model_name".to_string(), model.clone());
        }
        if let Some(provider) = metadata.get("model_provider") {
            map.insert("model_provider".to_string(), provider.clone());
        }
    }
    Some(response_metadata)
}

/// Policy applied to a run's stream when the client disconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectPolicy {
    /// Cancel the run; it transitions to `interrupted`.
    Cancel,
    /// Let the graph continue to completion with no further frames emitted.
    Continue,
}

impl Default for DisconnectPolicy {
    fn default() -> Self {
        DisconnectPolicy::Cancel
    }
}

impl std::str::FromStr for DisconnectPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cancel" => Ok(DisconnectPolicy::Cancel),
            "continue" => Ok(DisconnectPolicy::Continue),
            other => Err(format!("unknown on_disconnect policy: {other}")),
        }
    }
}

/// Translates a graph's [`StreamChunk`]s into framed SSE strings, tracking
/// per-message-id delta state so token chunks are never double-emitted as
/// accumulated text.
pub struct FrameBuilder {
    run_id: String,
    run_metadata: Value,
    attempt: u32,
    seen_message_start: HashMap<String, bool>,
}

impl FrameBuilder {
    pub fn new(run_id: impl Into<String>, run_metadata: Value, attempt: u32) -> Self {
        Self {
            run_id: run_id.into(),
            run_metadata,
            attempt,
            seen_message_start: HashMap::new(),
        }
    }

    pub fn metadata_frame(&self) -> String {
        metadata_event(&self.run_id, self.attempt)
    }

    pub fn initial_values_frame(&self, input: &Value) -> String {
        values_event(input)
    }

    pub fn final_values_frame(&self, state: &Value) -> String {
        values_event(state)
    }

    /// Convert one graph `StreamChunk` into zero or more SSE frames. Returns
    /// an empty `Vec` for event kinds with no SSE representation (e.g. raw
    /// checkpoint/task bookkeeping events surfaced only to `debug` mode).
    ///
    /// A `MessageChunk` can expand into up to three frames: a "start" delta
    /// with empty content the first time a message id is seen (seeding the
    /// SDK's chunk manager), the content delta itself, and a "finish" delta
    /// with empty content carrying `finish_reason`/model metadata when the
    /// chunk's metadata reports one.
    pub fn frame_for(&mut self, chunk: &StreamChunk) -> Vec<String> {
        match &chunk.event {
            StreamEvent::Values { state } => vec![values_event(state)],
            StreamEvent::Updates { node, update } => vec![updates_event(node, update)],
            StreamEvent::MessageChunk { chunk: content, message_id, node, metadata } => {
                let mut meta = self.run_metadata.clone();
                meta["langgraph_node"] = json!(node);
                if let Some(extra) = metadata {
                    if let Value::Object(map) = extra {
                        if let Value::Object(target) = &mut meta {
                            for (k, v) in map {
                                target.insert(k.clone(), v.clone());
                            }
                        }
                    }
                }

                let mut frames = Vec::new();

                let is_start = message_id
                    .as_ref()
                    .map(|id| !self.seen_message_start.contains_key(id))
                    .unwrap_or(true);
                if let Some(id) = message_id {
                    self.seen_message_start.insert(id.clone(), true);
                }
                if is_start {
                    let start = ai_message_delta("", message_id.as_deref(), json!({}));
                    frames.push(messages_tuple_event(&start, &meta));
                }

                let response_metadata = metadata
                    .as_ref()
                    .and_then(|m| m.get("response_metadata"))
                    .cloned()
                    .unwrap_or_else(|| json!({}));

                if !content.is_empty() {
                    let delta = ai_message_delta(content, message_id.as_deref(), response_metadata.clone());
                    frames.push(messages_tuple_event(&delta, &meta));
                }

                if let Some(finish) = finish_metadata(metadata.as_ref()) {
                    let finished = ai_message_delta("", message_id.as_deref(), finish);
                    frames.push(messages_tuple_event(&finished, &meta));
                }

                frames
            }
            StreamEvent::Message { message, metadata } => {
                let meta = metadata.clone().unwrap_or_else(|| self.run_metadata.clone());
                vec![messages_tuple_event(message, &meta)]
            }
            StreamEvent::Checkpoint { .. } | StreamEvent::TaskStart { .. } | StreamEvent::TaskEnd { .. } => vec![],
            StreamEvent::TaskError { error, .. } => vec![error_event(error, None)],
            StreamEvent::Custom { data } => vec![format_event(SseEventType::Updates, &json!({ "custom": data }))],
        }
    }

    pub fn error_frame(&self, error: &str, code: Option<&str>) -> String {
        error_event(error, code)
    }
}

/// Build the first human message frame for the echoed `values` event, in
/// LangChain message-dict shape.
pub fn initial_values_from_input(input_text: Option<&str>) -> Value {
    match input_text {
        Some(text) => json!({ "messages": [human_message(text)] }),
        None => json!({ "messages": [] }),
    }
}

/// Bounded channel capacity for the producer/consumer pair between the
/// worker task driving the graph and the HTTP response body sink. Matches
/// the teacher's execution stream handler default.
pub const STREAM_CHANNEL_CAPACITY: usize = 100;

pub type FrameSender = mpsc::Sender<String>;
pub type FrameReceiver = mpsc::Receiver<String>;

pub fn frame_channel() -> (FrameSender, FrameReceiver) {
    mpsc::channel(STREAM_CHANNEL_CAPACITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use langgraph_core::stream::{Namespace, StreamMode};

    fn chunk(event: StreamEvent) -> StreamChunk {
        StreamChunk::new(Namespace::default(), StreamMode::Messages, event, 1)
    }

    #[test]
    fn metadata_frame_is_well_formed() {
        let frame = metadata_event("run-1", 1);
        assert!(frame.starts_with("event: metadata\n"));
        assert!(frame.ends_with("\n\n"));
        assert!(frame.contains("\"run_id\":\"run-1\""));
    }

    #[test]
    fn messages_tuple_is_a_two_element_array() {
        let frame = messages_tuple_event(&json!({"content": "hi"}), &json!({"langgraph_node": "model"}));
        assert!(frame.starts_with("event: messages\n"));
        let data_line = frame.lines().nth(1).unwrap();
        let data = data_line.strip_prefix("data: ").unwrap();
        let parsed: Value = serde_json::from_str(data).unwrap();
        assert!(parsed.is_array());
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }

    #[test]
    fn message_chunk_delta_carries_only_new_content() {
        let mut builder = FrameBuilder::new("run-1", json!({}), 1);
        let event = StreamEvent::message_chunk_with_metadata("model", "Hel", Some("m1".into()), None);
        let frames1 = builder.frame_for(&chunk(event));
        assert!(frames1.iter().any(|f| f.contains("\"content\":\"Hel\"")));

        let event2 = StreamEvent::message_chunk_with_metadata("model", "lo", Some("m1".into()), None);
        let frames2 = builder.frame_for(&chunk(event2));
        assert!(frames2.iter().any(|f| f.contains("\"content\":\"lo\"")));
        assert!(!frames2.iter().any(|f| f.contains("\"content\":\"Hello\"")));
    }

    #[test]
    fn first_chunk_for_a_message_id_is_preceded_by_an_empty_start_delta() {
        let mut builder = FrameBuilder::new("run-1", json!({}), 1);
        let event = StreamEvent::message_chunk_with_metadata("model", "Hi", Some("m1".into()), None);
        let frames = builder.frame_for(&chunk(event));
        assert_eq!(frames.len(), 2);
        assert!(frames[0].contains("\"content\":\"\""));
        assert!(frames[1].contains("\"content\":\"Hi\""));
    }

    #[test]
    fn second_chunk_for_the_same_message_id_has_no_start_delta() {
        let mut builder = FrameBuilder::new("run-1", json!({}), 1);
        let first = StreamEvent::message_chunk_with_metadata("model", "Hi", Some("m1".into()), None);
        builder.frame_for(&chunk(first));

        let second = StreamEvent::message_chunk_with_metadata("model", " there", Some("m1".into()), None);
        let frames = builder.frame_for(&chunk(second));
        assert_eq!(frames.len(), 1);
        assert!(frames[0].contains("\"content\":\" there\""));
    }

    #[test]
    fn finish_reason_in_metadata_synthesizes_a_trailing_empty_delta() {
        let mut builder = FrameBuilder::new("run-1", json!({}), 1);
        let metadata = json!({ "finish_reason": "stop", "model": "gpt-4o" });
        let event = StreamEvent::message_chunk_with_metadata("model", "done", Some("m1".into()), Some(metadata));
        let frames = builder.frame_for(&chunk(event));
        assert_eq!(frames.len(), 3);
        assert!(frames[0].contains("\"content\":\"\""), "start delta");
        assert!(frames[1].contains("\"content\":\"done\""), "content delta");
        assert!(frames[2].contains("\"content\":\"\""), "finish delta");
        assert!(frames[2].contains("\"finish_reason\":\"stop\""));
        assert!(frames[2].contains("\"model_name\":\"gpt-4o\""));
    }

    #[test]
    fn error_event_includes_code_when_present() {
        let frame = error_event("boom", Some("E1"));
        assert!(frame.contains("\"code\":\"E1\""));
    }

    #[test]
    fn error_event_omits_code_when_absent() {
        let frame = error_event("boom", None);
        assert!(!frame.contains("code"));
    }

    #[test]
    fn sse_headers_stateful_points_at_thread_scoped_urls() {
        let headers = sse_headers(Some("t1"), Some("r1"), false);
        let location = headers.iter().find(|(k, _)| *k == "Location").unwrap();
        assert_eq!(location.1, "/threads/t1/runs/r1/stream");
    }

    #[test]
    fn sse_headers_stateless_points_at_run_scoped_urls() {
        let headers = sse_headers(None, Some("r1"), true);
        let location = headers.iter().find(|(k, _)| *k == "Location").unwrap();
        assert_eq!(location.1, "/runs/r1/stream");
    }

    #[test]
    fn disconnect_policy_parses_known_values() {
        assert_eq!("cancel".parse::<DisconnectPolicy>().unwrap(), DisconnectPolicy::Cancel);
        assert_eq!("continue".parse::<DisconnectPolicy>().unwrap(), DisconnectPolicy::Continue);
        assert!("bogus".parse::<DisconnectPolicy>().is_err());
    }

    #[test]
    fn updates_event_nests_under_node_name() {
        let frame = updates_event("model", &json!({"messages": []}));
        let data_line = frame.lines().nth(1).unwrap();
        let data = data_line.strip_prefix("data: ").unwrap();
        let parsed: Value = serde_json::from_str(data).unwrap();
        assert!(parsed.get("model").is_some());
    }
}
