//! Response types returned by [`ChatModel`](crate::llm::ChatModel) implementations.

use crate::llm_stream::MessageChunkStream;
use crate::messages::Message;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Token usage reported by a provider for a single `chat` call.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UsageMetadata {
    /// Tokens consumed by the prompt (input) side of the request.
    pub prompt_tokens: usize,

    /// Tokens generated in the response (output) side.
    pub completion_tokens: usize,

    /// Tokens spent on hidden reasoning, for thinking models that report it
    /// separately from `completion_tokens`.
    pub reasoning_tokens: Option<usize>,
}

impl UsageMetadata {
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self { prompt_tokens, completion_tokens, reasoning_tokens: None }
    }

    pub fn with_reasoning(prompt_tokens: usize, completion_tokens: usize, reasoning_tokens: usize) -> Self {
        Self { prompt_tokens, completion_tokens, reasoning_tokens: Some(reasoning_tokens) }
    }

    /// Total tokens across prompt, completion, and any reasoning tokens.
    pub fn total_tokens(&self) -> usize {
        self.prompt_tokens + self.completion_tokens + self.reasoning_tokens.unwrap_or(0)
    }
}

/// Extended reasoning/thinking content a model produced before its answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReasoningContent {
    /// The reasoning text itself.
    pub content: String,
}

impl ReasoningContent {
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into() }
    }
}

/// A complete (non-streaming) response from a [`ChatModel`](crate::llm::ChatModel).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The assistant message the model produced.
    pub message: Message,

    /// Token usage for this call, if the provider reports it.
    pub usage: Option<UsageMetadata>,

    /// Separated reasoning content, for thinking models in
    /// `ReasoningMode::Separated`.
    pub reasoning: Option<ReasoningContent>,

    /// Provider-specific metadata (model name, finish reason, etc.).
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ChatResponse {
    pub fn new(message: Message) -> Self {
        Self { message, usage: None, reasoning: None, metadata: HashMap::new() }
    }
}

/// A streaming response from a [`ChatModel`](crate::llm::ChatModel). Usage is
/// only known once the stream is fully drained, so it isn't available here.
pub struct ChatStreamResponse {
    /// The token/message chunk stream itself.
    pub stream: MessageChunkStream,

    /// Separated reasoning content, already resolved (thinking models that
    /// emit reasoning as a single block ahead of the answer stream).
    pub reasoning: Option<ReasoningContent>,
}

impl std::fmt::Debug for ChatStreamResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatStreamResponse").field("reasoning", &self.reasoning).finish_non_exhaustive()
    }
}
