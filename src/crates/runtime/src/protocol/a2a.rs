//! A2A ingress (§4.9): `message/send` blocks for the last AI message the
//! same way MCP does; `message/stream` pipes the streaming engine's
//! frames through a JSON-RPC SSE envelope.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue};
use axum::response::Response;
use axum::Json;
use futures_util::StreamExt;
use serde_json::Value;

use crate::agent_run;
use crate::api::routes::AppState;
use crate::auth::AuthUser;
use crate::db::models::{MultitaskStrategy, RunStatus};
use crate::db::repositories::AssistantRepository;
use crate::streaming::{self, FrameBuilder};

use super::{
    execute_agent_run, rpc_error_code, JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_PARAMS,
    METHOD_NOT_FOUND,
};

/// `params` shape expected for `message/send` and `message/stream`:
/// `{"assistant_id": "...", "thread_id": "...", "message": {"parts": [...]}}`.
/// The textual parts are concatenated into the graph's `input.messages`
/// the way the teacher's `initial_values_from_input` echoes raw text.
fn parse_message(params: &Value) -> Result<(String, Option<String>, Value), String> {
    let assistant_id = params
        .get("assistant_id")
        .or_else(|| params.get("graph_id"))
        .and_then(|v| v.as_str())
        .ok_or("params.assistant_id is required")?
        .to_string();
    let thread_id = params.get("thread_id").and_then(|v| v.as_str()).map(|s| s.to_string());

    let text = params
        .get("message")
        .and_then(|m| m.get("parts"))
        .and_then(|p| p.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let input = streaming::initial_values_from_input(Some(text.as_str()));
    Ok((assistant_id, thread_id, input))
}

fn task_result(text: String) -> Value {
    serde_json::json!({
        "kind": "message",
        "role": "agent",
        "parts": [{ "kind": "text", "text": text }],
    })
}

pub async fn send(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<JsonRpcRequest>,
) -> Json<JsonRpcResponse> {
    if req.method != "message/send" {
        return Json(JsonRpcResponse::err(req.id, METHOD_NOT_FOUND, format!("unknown method: {}", req.method)));
    }

    let (assistant_id, thread_id, input) = match parse_message(&req.params) {
        Ok(parsed) => parsed,
        Err(msg) => return Json(JsonRpcResponse::err(req.id, INVALID_PARAMS, msg)),
    };

    match execute_agent_run(&state, &assistant_id, thread_id.as_deref(), input, user.owner()).await {
        Ok(text) => Json(JsonRpcResponse::ok(req.id, task_result(text))),
        Err(err) => {
            let code = rpc_error_code(&err);
            Json(JsonRpcResponse::err(req.id, code, err.to_string()))
        }
    }
}

fn apply_headers(response: &mut Response, headers: Vec<(&'static str, String)>) {
    for (name, value) in headers {
        if let (Ok(name), Ok(value)) = (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&value)) {
            response.headers_mut().insert(name, value);
        }
    }
}

fn wrap_frame(id: &Value, frame: &str) -> String {
    let Some(data_line) = frame.lines().nth(1) else {
        return String::new();
    };
    let Some(data) = data_line.strip_prefix("data: ") else {
        return String::new();
    };
    let payload: Value = serde_json::from_str(data).unwrap_or(Value::Null);
    let envelope = JsonRpcResponse::ok(id.clone(), payload);
    let body = serde_json::to_string(&envelope).unwrap_or_else(|_| "null".to_string());
    format!("data: {body}\n\n")
}

/// Stream an assistant invocation as a JSON-RPC SSE envelope: each
/// `values`/`messages` frame the streaming engine produces is rewrapped
/// as a `{jsonrpc, id, result}` object, one per SSE `data:` line.
pub async fn stream(State(state): State<AppState>, user: AuthUser, Json(req): Json<JsonRpcRequest>) -> Response {
    if req.method != "message/stream" {
        let body = JsonRpcResponse::err(req.id, METHOD_NOT_FOUND, format!("unknown method: {}", req.method));
        let text = serde_json::to_string(&body).unwrap_or_else(|_| "null".to_string());
        return Response::new(Body::from(text));
    }

    let (assistant_id, thread_id, input) = match parse_message(&req.params) {
        Ok(parsed) => parsed,
        Err(msg) => {
            let body = JsonRpcResponse::err(req.id, INVALID_PARAMS, msg);
            let text = serde_json::to_string(&body).unwrap_or_else(|_| "null".to_string());
            return Response::new(Body::from(text));
        }
    };

    let owner = user.owner().to_string();
    let rpc_id = req.id.clone();
    let assistant = match AssistantRepository::get(state.db.pool(), &assistant_id, &owner).await {
        Ok(Some(a)) => a,
        Ok(None) => {
            let body = JsonRpcResponse::err(rpc_id, INVALID_PARAMS, format!("assistant {assistant_id} not found"));
            let text = serde_json::to_string(&body).unwrap_or_else(|_| "null".to_string());
            return Response::new(Body::from(text));
        }
        Err(err) => {
            let body = JsonRpcResponse::err(rpc_id, INTERNAL_ERROR, err.to_string());
            let text = serde_json::to_string(&body).unwrap_or_else(|_| "null".to_string());
            return Response::new(Body::from(text));
        }
    };

    let kwargs = serde_json::json!({ "input": input });
    let start = state
        .scheduler
        .start_run(thread_id.as_deref(), &assistant.assistant_id, kwargs.clone(), Some(MultitaskStrategy::Reject), &owner)
        .await;
    let (thread, outcome) = match start {
        Ok(started) => started,
        Err(err) => {
            let body = JsonRpcResponse::err(rpc_id, INTERNAL_ERROR, err.to_string());
            let text = serde_json::to_string(&body).unwrap_or_else(|_| "null".to_string());
            return Response::new(Body::from(text));
        }
    };
    let run = outcome.run().clone();

    let (sender, receiver) = streaming::frame_channel();
    tokio::spawn(async move {
        let thread_id = thread.thread_id.clone();
        let run_id = run.run_id.clone();
        let mut builder = FrameBuilder::new(run_id.clone(), serde_json::json!({}), 1);
        let configurable = agent_run::build_configurable(&run, &thread, &assistant, &owner, &kwargs);

        let _ = sender.send(wrap_frame(&rpc_id, &builder.metadata_frame())).await;

        let graph = match agent_run::compile(&state.scheduler, &assistant) {
            Ok(g) => g,
            Err(err) => {
                let _ = sender.send(wrap_frame(&rpc_id, &builder.error_frame(&err.to_string(), None))).await;
                let _ = state.scheduler.complete_run(&thread_id, &run_id, RunStatus::Error).await;
                return;
            }
        };

        let graph_input = kwargs.get("input").cloned().unwrap_or(Value::Object(Default::default()));
        let chunks = agent_run::stream(&graph, graph_input, &thread_id, &["values".to_string()], configurable).await;
        let mut chunks = match chunks {
            Ok(s) => s,
            Err(err) => {
                let _ = sender.send(wrap_frame(&rpc_id, &builder.error_frame(&err.to_string(), None))).await;
                let _ = state.scheduler.complete_run(&thread_id, &run_id, RunStatus::Error).await;
                return;
            }
        };

        let mut last_values: Option<Value> = None;
        while let Some(chunk) = chunks.next().await {
            if let langgraph_core::StreamEvent::Values { state: values } = &chunk.event {
                last_values = Some(values.clone());
            }
            for frame in builder.frame_for(&chunk) {
                if sender.send(wrap_frame(&rpc_id, &frame)).await.is_err() {
                    return;
                }
            }
        }

        let final_values = last_values.unwrap_or(Value::Object(Default::default()));
        let text = agent_run::last_ai_message_text(&final_values).unwrap_or_default();
        let _ = sender.send(wrap_frame(&rpc_id, &builder.final_values_frame(&task_result(text)))).await;
        let _ = state.scheduler.complete_run(&thread_id, &run_id, RunStatus::Success).await;
    });

    let headers = streaming::sse_headers(None, None, true);
    let stream = tokio_stream::wrappers::ReceiverStream::new(receiver).map(Ok::<_, std::convert::Infallible>);
    let mut response = Response::new(Body::from_stream(stream));
    apply_headers(&mut response, headers);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenates_text_parts_into_a_human_message() {
        let params = serde_json::json!({
            "assistant_id": "a1",
            "thread_id": "t1",
            "message": { "parts": [{"text": "what is "}, {"text": "2+2"}] },
        });
        let (assistant_id, thread_id, input) = parse_message(&params).unwrap();
        assert_eq!(assistant_id, "a1");
        assert_eq!(thread_id.as_deref(), Some("t1"));
        assert_eq!(input["messages"][0]["content"], "what is 2+2");
    }

    #[test]
    fn falls_back_to_graph_id_when_assistant_id_absent() {
        let params = serde_json::json!({ "graph_id": "agent", "message": {"parts": []} });
        let (assistant_id, thread_id, _input) = parse_message(&params).unwrap();
        assert_eq!(assistant_id, "agent");
        assert!(thread_id.is_none());
    }

    #[test]
    fn missing_message_yields_empty_text() {
        let params = serde_json::json!({ "assistant_id": "a1" });
        let (_, _, input) = parse_message(&params).unwrap();
        assert_eq!(input["messages"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn rejects_missing_assistant_and_graph_id() {
        let params = serde_json::json!({ "message": {"parts": []} });
        assert!(parse_message(&params).is_err());
    }

    #[test]
    fn task_result_shapes_an_agent_message() {
        let value = task_result("hi there".to_string());
        assert_eq!(value["kind"], "message");
        assert_eq!(value["role"], "agent");
        assert_eq!(value["parts"][0]["text"], "hi there");
    }

    #[test]
    fn wrap_frame_rewraps_an_sse_data_line_as_json_rpc() {
        let frame = "event: values\ndata: {\"messages\":[]}\n\n";
        let wrapped = wrap_frame(&Value::from(1), frame);
        assert!(wrapped.starts_with("data: "));
        let data = wrapped.trim_start_matches("data: ").trim_end();
        let parsed: Value = serde_json::from_str(data).unwrap();
        assert_eq!(parsed["jsonrpc"], "2.0");
        assert_eq!(parsed["id"], 1);
        assert_eq!(parsed["result"]["messages"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn wrap_frame_returns_empty_string_for_malformed_input() {
        assert_eq!(wrap_frame(&Value::Null, "not an sse frame"), "");
    }
}
