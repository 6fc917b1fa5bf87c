use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// One completion call: a fixed system instruction, the ordered recent
/// history (already truncated by the caller), and model parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub history: Vec<ChatMessage>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn last_user_message(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find(|message| message.role == ChatRole::User)
            .map(|message| message.content.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {provider} failed: {source}")]
    Http { provider: &'static str, source: reqwest::Error },
    #[error("{provider} returned an API error: {message}")]
    Api { provider: &'static str, message: String },
    #[error("{provider} response had an unexpected shape")]
    UnexpectedPayload { provider: &'static str },
    #[error("{provider} requires credentials that are not configured")]
    MissingCredentials { provider: &'static str },
}

/// A chat-completion backend. Implementations are stateless request/response
/// adapters; retries, fallback, and history truncation live in the caller.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;
}
