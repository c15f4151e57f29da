//! Protocol adapters (C9, §4.9) — MCP and A2A are both sugar over the
//! core run surface: parse a JSON-RPC envelope, resolve an assistant,
//! invoke a run, and shape the result (or stream) back as JSON-RPC.

pub mod a2a;
pub mod mcp;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agent_run;
use crate::api::error::{ApiError, ApiResult};
use crate::api::routes::AppState;
use crate::db::models::{MultitaskStrategy, RunStatus};
use crate::db::repositories::AssistantRepository;

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default = "default_jsonrpc_version")]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

fn default_jsonrpc_version() -> String {
    "2.0".to_string()
}

/// JSON-RPC 2.0 response envelope. Exactly one of `result`/`error` is set.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcErrorBody {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn ok(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcErrorBody {
                code,
                message: message.into(),
            }),
        }
    }
}

pub(crate) const METHOD_NOT_FOUND: i32 = -32601;
pub(crate) const INVALID_PARAMS: i32 = -32602;
pub(crate) const INTERNAL_ERROR: i32 = -32603;

pub(crate) fn rpc_error_code(err: &ApiError) -> i32 {
    match err {
        ApiError::NotFound(_) | ApiError::ValidationError(_) | ApiError::BadRequest(_) => INVALID_PARAMS,
        _ => INTERNAL_ERROR,
    }
}

/// Run one assistant invocation to completion and return the last AI
/// message's text, per §4.9's "non-streaming wrapper" contract shared by
/// both MCP `tools/call` and A2A `message/send`.
pub async fn execute_agent_run(
    state: &AppState,
    assistant_id_or_graph_id: &str,
    thread_id: Option<&str>,
    input: Value,
    owner: &str,
) -> ApiResult<String> {
    let assistant = AssistantRepository::get(state.db.pool(), assistant_id_or_graph_id, owner)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("assistant {assistant_id_or_graph_id}")))?;

    let kwargs = serde_json::json!({ "input": input });
    let (thread, outcome) = state
        .scheduler
        .start_run(thread_id, &assistant.assistant_id, kwargs.clone(), Some(MultitaskStrategy::Reject), owner)
        .await?;
    let run = outcome.run().clone();

    let configurable = agent_run::build_configurable(&run, &thread, &assistant, owner, &kwargs);
    let graph = agent_run::compile(&state.scheduler, &assistant)?;
    let graph_input = input_value(&kwargs);

    let result = agent_run::invoke(&graph, graph_input, &thread.thread_id, configurable).await;
    let values = match result {
        Ok(values) => {
            state.scheduler.complete_run(&thread.thread_id, &run.run_id, RunStatus::Success).await?;
            values
        }
        Err(err) => {
            state.scheduler.complete_run(&thread.thread_id, &run.run_id, RunStatus::Error).await?;
            return Err(ApiError::from(err));
        }
    };

    Ok(agent_run::last_ai_message_text(&values).unwrap_or_default())
}

fn input_value(kwargs: &Value) -> Value {
    kwargs.get("input").cloned().unwrap_or(Value::Object(Default::default()))
}
