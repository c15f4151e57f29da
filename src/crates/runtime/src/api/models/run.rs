//! Run request/response DTOs

use crate::db::models::{MultitaskStrategy, Run};
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_stream_mode() -> Vec<String> {
    vec!["messages-tuple".to_string()]
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRunRequest {
    pub assistant_id: String,
    #[serde(default)]
    pub input: Option<Value>,
    pub multitask_strategy: Option<MultitaskStrategy>,
    #[serde(default)]
    pub if_not_exists: Option<String>,
    #[serde(default)]
    pub on_completion: Option<String>,
    #[serde(default)]
    pub on_disconnect: Option<String>,
    #[serde(default = "default_stream_mode")]
    pub stream_mode: Vec<String>,
    #[serde(default)]
    pub interrupt_before: Vec<String>,
    #[serde(default)]
    pub interrupt_after: Vec<String>,
    #[serde(default)]
    pub webhook: Option<String>,
    #[serde(default)]
    pub config: Option<Value>,
}

impl CreateRunRequest {
    /// The graph's invocation payload: `input` wrapped under `messages` if
    /// it arrived as a bare string, or passed through as-is.
    pub fn kwargs(&self) -> Value {
        let input = match &self.input {
            Some(Value::String(text)) => serde_json::json!({
                "messages": [{"type": "human", "content": text}]
            }),
            Some(other) => other.clone(),
            None => Value::Object(Default::default()),
        };
        serde_json::json!({
            "input": input,
            "config": self.config.clone().unwrap_or(Value::Object(Default::default())),
            "interrupt_before": self.interrupt_before,
            "interrupt_after": self.interrupt_after,
            "webhook": self.webhook,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunResponse {
    pub run_id: String,
    pub thread_id: String,
    pub assistant_id: String,
    pub status: String,
    pub metadata: Value,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Run> for RunResponse {
    fn from(run: Run) -> Self {
        Self {
            run_id: run.run_id,
            thread_id: run.thread_id,
            assistant_id: run.assistant_id,
            status: run.status,
            metadata: run.metadata.0,
            created_at: run.created_at.to_rfc3339(),
            updated_at: run.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelRunResponse {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_string_input_wraps_to_a_single_human_message() {
        let req = CreateRunRequest {
            assistant_id: "a1".into(),
            input: Some(Value::String("2+2".into())),
            multitask_strategy: None,
            if_not_exists: None,
            on_completion: None,
            on_disconnect: None,
            stream_mode: default_stream_mode(),
            interrupt_before: vec![],
            interrupt_after: vec![],
            webhook: None,
            config: None,
        };
        let kwargs = req.kwargs();
        let messages = &kwargs["input"]["messages"];
        assert_eq!(messages[0]["type"], "human");
        assert_eq!(messages[0]["content"], "2+2");
    }

    #[test]
    fn structured_input_passes_through_unwrapped() {
        let input = serde_json::json!({"messages": [{"type": "human", "content": "hi"}]});
        let req = CreateRunRequest {
            assistant_id: "a1".into(),
            input: Some(input.clone()),
            multitask_strategy: None,
            if_not_exists: None,
            on_completion: None,
            on_disconnect: None,
            stream_mode: default_stream_mode(),
            interrupt_before: vec![],
            interrupt_after: vec![],
            webhook: None,
            config: None,
        };
        assert_eq!(req.kwargs()["input"], input);
    }
}
