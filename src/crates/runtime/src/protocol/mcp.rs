//! MCP ingress (§4.9): a single `tools/call` method that invokes an
//! assistant and returns its last AI message as MCP tool content.

use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::api::routes::AppState;
use crate::auth::AuthUser;

use super::{execute_agent_run, rpc_error_code, JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, METHOD_NOT_FOUND};

/// `params.arguments` shape expected for a `tools/call` invocation:
/// `{"assistant_id": "...", "input": {...}, "thread_id": "..."}`.
fn parse_tool_call(params: &Value) -> Result<(String, Option<String>, Value), String> {
    let arguments = params.get("arguments").ok_or("missing params.arguments")?;
    let assistant_id = arguments
        .get("assistant_id")
        .or_else(|| arguments.get("graph_id"))
        .and_then(|v| v.as_str())
        .ok_or("arguments.assistant_id is required")?
        .to_string();
    let thread_id = arguments.get("thread_id").and_then(|v| v.as_str()).map(|s| s.to_string());
    let input = arguments.get("input").cloned().unwrap_or(Value::Object(Default::default()));
    Ok((assistant_id, thread_id, input))
}

fn tool_result(text: String) -> Value {
    serde_json::json!({ "content": [{ "type": "text", "text": text }], "isError": false })
}

pub async fn handle(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<JsonRpcRequest>,
) -> Json<JsonRpcResponse> {
    if req.method != "tools/call" {
        return Json(JsonRpcResponse::err(req.id, METHOD_NOT_FOUND, format!("unknown method: {}", req.method)));
    }

    let (assistant_id, thread_id, input) = match parse_tool_call(&req.params) {
        Ok(parsed) => parsed,
        Err(msg) => return Json(JsonRpcResponse::err(req.id, INVALID_PARAMS, msg)),
    };

    match execute_agent_run(&state, &assistant_id, thread_id.as_deref(), input, user.owner()).await {
        Ok(text) => Json(JsonRpcResponse::ok(req.id, tool_result(text))),
        Err(err) => {
            let code = rpc_error_code(&err);
            Json(JsonRpcResponse::err(req.id, code, err.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_assistant_id_thread_id_and_input() {
        let params = serde_json::json!({
            "arguments": {
                "assistant_id": "a1",
                "thread_id": "t1",
                "input": {"messages": []},
            }
        });
        let (assistant_id, thread_id, input) = parse_tool_call(&params).unwrap();
        assert_eq!(assistant_id, "a1");
        assert_eq!(thread_id.as_deref(), Some("t1"));
        assert_eq!(input, serde_json::json!({"messages": []}));
    }

    #[test]
    fn falls_back_to_graph_id_when_assistant_id_absent() {
        let params = serde_json::json!({ "arguments": { "graph_id": "agent" } });
        let (assistant_id, thread_id, input) = parse_tool_call(&params).unwrap();
        assert_eq!(assistant_id, "agent");
        assert!(thread_id.is_none());
        assert_eq!(input, Value::Object(Default::default()));
    }

    #[test]
    fn rejects_missing_arguments() {
        assert!(parse_tool_call(&serde_json::json!({})).is_err());
    }

    #[test]
    fn rejects_missing_assistant_and_graph_id() {
        let params = serde_json::json!({ "arguments": {} });
        assert!(parse_tool_call(&params).is_err());
    }

    #[test]
    fn tool_result_wraps_text_as_mcp_content() {
        let result = tool_result("hello".to_string());
        assert_eq!(result["isError"], false);
        assert_eq!(result["content"][0]["type"], "text");
        assert_eq!(result["content"][0]["text"], "hello");
    }
}
