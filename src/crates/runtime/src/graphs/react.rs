//! Default agent graph (§4.3): a `langgraph-prebuilt` ReAct agent with no
//! bound tools, so in practice it runs the single "agent" node once per
//! turn and answers directly.

use std::sync::Arc;

use langgraph_prebuilt::agents::react::create_react_agent;

use crate::llm_adapter;
use crate::registry::{GraphBuilder, RegistryError};

const GRAPH_ID: &str = "agent";

fn builder() -> GraphBuilder {
    Arc::new(|_configurable, checkpointer, store| {
        let model = llm_adapter::default_chat_model()
            .map_err(|e| RegistryError::FactoryFailed(GRAPH_ID.to_string(), e.to_string()))?;
        let llm_fn = llm_adapter::make_llm_function(model, Vec::new());

        let mut compiled = create_react_agent(llm_fn, Vec::new())
            .with_system_prompt("You are a helpful assistant. Answer the user's question directly and concisely.")
            .with_max_iterations(10)
            .build()
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

/// `GraphFactory::lazy` entry point — resolved the first time `"agent"` is
/// actually requested, then cached for the process lifetime.
pub fn resolver() -> GraphBuilder {
    builder()
}
