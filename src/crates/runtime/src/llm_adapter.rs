//! Bridges `llm`'s provider-agnostic [`ChatModel`] trait into the
//! `LlmFunction` closures `langgraph-prebuilt`'s agent patterns expect.
//!
//! Graph node executors work over a plain `serde_json::Value` state and the
//! prebuilt crate's own lightweight [`PrebuiltMessage`], while `ChatModel`
//! speaks `langgraph_core`'s richer [`Message`]/[`ChatRequest`] types. This
//! module is the seam that converts both ways.

use langgraph_core::llm::{ChatModel, ChatRequest, ToolDefinition};
use langgraph_core::{Message as CoreMessage, MessageRole};
use langgraph_prebuilt::messages::{Message as PrebuiltMessage, MessageType, ToolCall as PrebuiltToolCall};
use langgraph_prebuilt::PrebuiltError;
use serde_json::Value;
use std::sync::Arc;

fn core_role_for(message_type: &MessageType) -> MessageRole {
    match message_type {
        MessageType::Human => MessageRole::Human,
        MessageType::AI => MessageRole::Assistant,
        MessageType::System => MessageRole::System,
        MessageType::Tool | MessageType::Function => MessageRole::Tool,
    }
}

fn prebuilt_type_for(role: &MessageRole) -> MessageType {
    match role {
        MessageRole::System => MessageType::System,
        MessageRole::Human => MessageType::Human,
        MessageRole::Assistant => MessageType::AI,
        MessageRole::Tool => MessageType::Tool,
        MessageRole::Custom(_) => MessageType::AI,
    }
}

fn to_core_message(message: &PrebuiltMessage) -> CoreMessage {
    let mut core = match &message.tool_call_id {
        Some(id) => CoreMessage::tool(message.content.clone(), id.clone()),
        None => CoreMessage::new(core_role_for(&message.message_type), message.content.clone()),
    };
    if let Some(tool_calls) = &message.tool_calls {
        let converted =
            tool_calls.iter().map(|tc| langgraph_core::llm::ToolCall::new(tc.id.clone(), tc.name.clone(), tc.args.clone())).collect();
        core = core.with_tool_calls(converted);
    }
    core
}

fn from_core_message(message: &CoreMessage) -> PrebuiltMessage {
    let content = message.text().unwrap_or_default().to_string();
    let mut out = PrebuiltMessage::new(prebuilt_type_for(&message.role), content);
    if let Some(tool_calls) = &message.tool_calls {
        let converted: Vec<PrebuiltToolCall> =
            tool_calls.iter().map(|tc| PrebuiltToolCall::new(tc.id.clone(), tc.name.clone(), tc.args.clone())).collect();
        if !converted.is_empty() {
            out = out.with_tool_calls(converted);
        }
    }
    out
}

/// Build the `LlmFunction` closure a prebuilt agent pattern calls per turn.
/// `tools` is forwarded to the model as bindable tool definitions so the
/// model can emit `tool_calls`; pass an empty vec for a no-tools agent.
pub fn make_llm_function(
    model: Arc<dyn ChatModel>,
    tools: Vec<ToolDefinition>,
) -> Arc<dyn Fn(Value) -> std::pin::Pin<Box<dyn std::future::Future<Output = langgraph_prebuilt::Result<PrebuiltMessage>> + Send>> + Send + Sync>
{
    Arc::new(move |state: Value| {
        let model = model.clone();
        let tools = tools.clone();
        Box::pin(async move {
            let messages: Vec<PrebuiltMessage> = state
                .get("messages")
                .and_then(|m| m.as_array())
                .map(|arr| {
                    arr.iter()
                        .filter_map(|v| serde_json::from_value::<PrebuiltMessage>(v.clone()).ok())
                        .collect()
                })
                .unwrap_or_default();

            let core_messages: Vec<CoreMessage> = messages.iter().map(to_core_message).collect();
            let mut request = ChatRequest::new(core_messages);
            if !tools.is_empty() {
                request = request.with_tools(tools);
            }

            let response = model
                .chat(request)
                .await
                .map_err(|e| PrebuiltError::Custom(format!("llm call failed: {e}")))?;

            Ok(from_core_message(&response.message))
        })
    })
}

/// Resolve the chat backend for the process from environment configuration:
/// a configured remote provider if its API key is present, else a local
/// Ollama server (no credentials required, matching the teacher's own
/// "works out of the box against a local model" posture).
pub fn default_chat_model() -> Result<Arc<dyn ChatModel>, llm::LlmError> {
    if let Ok(config) = llm::RemoteLlmConfig::from_env("ANTHROPIC_API_KEY", "https://api.anthropic.com", "claude-3-5-sonnet-20241022") {
        return Ok(Arc::new(llm::remote::ClaudeClient::new(config)));
    }
    if let Ok(config) = llm::RemoteLlmConfig::from_env("OPENAI_API_KEY", "https://api.openai.com/v1", "gpt-4o") {
        return Ok(Arc::new(llm::remote::OpenAiClient::new(config)));
    }

    let base_url = std::env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| "http://localhost:11434".to_string());
    let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3".to_string());
    Ok(Arc::new(llm::local::OllamaClient::new(llm::LocalLlmConfig::new(base_url, model))))
}
