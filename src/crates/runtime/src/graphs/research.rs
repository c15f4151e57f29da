//! Two-phase research graph (§4.3): a "plan" node fans out into parallel
//! "research" branches (one per subtopic, via [`Send`]), which fan back
//! into a single "synthesize" node. Execution pauses for human review
//! before synthesis runs, so a reviewer can inspect the raw findings
//! before the final answer is produced.

use std::collections::HashMap;
use std::sync::Arc;

use langgraph_core::builder::StateGraph;
use langgraph_core::error::GraphError;
use langgraph_core::graph::ChannelType;
use langgraph_core::interrupt::InterruptConfig;
use langgraph_core::llm::ChatModel;
use langgraph_core::send::{ConditionalEdgeResult, Send};
use langgraph_prebuilt::messages::Message as PrebuiltMessage;
use serde_json::{json, Value};

use crate::llm_adapter;
use crate::registry::{GraphBuilder, RegistryError};

const GRAPH_ID: &str = "research";
const RESEARCH_NODE: &str = "research";

/// State-channel reducer: merges objects key by key like `StateGraph`'s
/// default, except array-valued keys present on both sides are
/// concatenated rather than overwritten. Parallel `research` branches each
/// write a one-element `findings` array; this is what accumulates them
/// into a single list instead of the last writer clobbering the rest.
fn merge_state(left: Value, right: Value) -> Value {
    match (left, right) {
        (Value::Object(mut left_obj), Value::Object(right_obj)) => {
            for (key, value) in right_obj {
                match (left_obj.get(&key), &value) {
                    (Some(Value::Array(existing)), Value::Array(incoming)) => {
                        let mut merged = existing.clone();
                        merged.extend(incoming.clone());
                        left_obj.insert(key, Value::Array(merged));
                    }
                    _ => {
                        left_obj.insert(key, value);
                    }
                }
            }
            Value::Object(left_obj)
        }
        (_, right) => right,
    }
}

fn objective_from_messages(state: &Value) -> String {
    state
        .get("messages")
        .and_then(|m| m.as_array())
        .and_then(|arr| arr.iter().rev().find(|m| m.get("type").and_then(|t| t.as_str()) == Some("human")))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Mirrors `plan_execute.rs`'s own `parse_plan_from_response`: a
/// simplified, fixed breakdown rather than parsing a freeform LLM plan.
fn subtopics_for(objective: &str) -> Vec<String> {
    vec![format!("an overview of {objective}"), format!("important details or caveats about {objective}")]
}

async fn call_model(model: &Arc<dyn ChatModel>, prompt: String) -> Result<String, GraphError> {
    let request = langgraph_core::llm::ChatRequest::new(vec![langgraph_core::Message::human(prompt)]);
    let response = model.chat(request).await.map_err(|e| GraphError::Execution(e.to_string()))?;
    Ok(response.message.text().unwrap_or_default().to_string())
}

fn builder() -> GraphBuilder {
    Arc::new(|_configurable, checkpointer, store| {
        let model = llm_adapter::default_chat_model()
            .map_err(|e| RegistryError::FactoryFailed(GRAPH_ID.to_string(), e.to_string()))?;

        let mut graph = StateGraph::new();
        graph.add_channel("state", ChannelType::LastValue, Some(Arc::new(merge_state)));

        // Plan is a cheap heuristic split (mirrors plan_execute's own
        // simplified, non-LLM plan parsing), so it needs no model call.
        graph.add_node("plan", move |state: Value| {
            let objective = objective_from_messages(&state);
            Box::pin(async move {
                let mut next = state;
                let subtopics = subtopics_for(&objective);
                next["subtopics"] = json!(subtopics);
                next["findings"] = json!([]);
                Ok(next)
            })
        });

        let research_model = model.clone();
        graph.add_node(RESEARCH_NODE, move |state: Value| {
            let model = research_model.clone();
            Box::pin(async move {
                let subtopic = state.get("subtopic").and_then(|s| s.as_str()).unwrap_or_default().to_string();
                let summary = call_model(&model, format!("Research and summarize {subtopic}. Be concise.")).await?;
                Ok(json!({ "findings": [{ "subtopic": subtopic, "summary": summary }] }))
            })
        });

        let synthesize_model = model.clone();
        graph.add_node("synthesize", move |state: Value| {
            let model = synthesize_model.clone();
            Box::pin(async move {
                let mut next = state.clone();
                let findings = state.get("findings").and_then(|f| f.as_array()).cloned().unwrap_or_default();
                let objective = objective_from_messages(&state);

                let digest = findings
                    .iter()
                    .map(|f| {
                        let subtopic = f.get("subtopic").and_then(|s| s.as_str()).unwrap_or_default();
                        let summary = f.get("summary").and_then(|s| s.as_str()).unwrap_or_default();
                        format!("- {subtopic}: {summary}")
                    })
                    .collect::<Vec<_>>()
                    .join("\n");

                let answer = call_model(
                    &model,
                    format!("Synthesize a final answer to \"{objective}\" from this research:\n{digest}"),
                )
                .await?;

                if let Some(messages) = next.get_mut("messages").and_then(|m| m.as_array_mut()) {
                    let ai = serde_json::to_value(PrebuiltMessage::ai(answer)).map_err(|e| GraphError::Execution(e.to_string()))?;
                    messages.push(ai);
                }

                Ok(next)
            })
        });

        graph.set_entry("plan");

        let router = |state: &Value| -> ConditionalEdgeResult {
            let subtopics = state.get("subtopics").and_then(|s| s.as_array()).cloned().unwrap_or_default();
            let mut arg = state.clone();
            if let Value::Object(obj) = &mut arg {
                obj.remove("subtopics");
            }

            let sends = subtopics
                .into_iter()
                .map(|subtopic| {
                    let mut send_arg = arg.clone();
                    send_arg["subtopic"] = subtopic;
                    Send::new(RESEARCH_NODE, send_arg)
                })
                .collect();

            ConditionalEdgeResult::Sends(sends)
        };
        let mut branches = HashMap::new();
        branches.insert(RESEARCH_NODE.to_string(), RESEARCH_NODE.to_string());
        graph.add_conditional_edge("plan", router, branches);

        graph.add_edge(RESEARCH_NODE, "synthesize");
        graph.add_finish("synthesize");

        let interrupts = InterruptConfig::new().with_interrupt_before(vec!["synthesize".to_string()]);
        let mut compiled = graph
            .compile_with_interrupts(interrupts)
            .map_err(|e| RegistryError::FactoryFailed(GRAPH_ID.to_string(), e.to_string()))?;

        if let Some(checkpointer) = checkpointer {
            compiled = compiled.with_checkpointer(checkpointer);
        }
        if let Some(store) = store {
            compiled = compiled.with_store(store);
        }
        Ok(compiled)
    })
}

/// `GraphFactory::lazy` entry point for the `"research"` graph.
pub fn resolver() -> GraphBuilder {
    builder()
}
