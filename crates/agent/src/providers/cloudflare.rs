use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::provider::{ChatProvider, ChatRole, CompletionRequest, ProviderError};

const PROVIDER: &str = "cloudflare";

/// Cloudflare Workers AI behind a deployed worker URL. The worker owns the
/// model choice; this adapter only relays the message array.
pub struct CloudflareProvider {
    client: reqwest::Client,
    worker_url: String,
}

#[derive(Serialize)]
struct ApiRequest<'a> {
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    response: String,
}

impl CloudflareProvider {
    pub fn new(client: reqwest::Client, worker_url: String) -> Self {
        Self { client, worker_url }
    }
}

#[async_trait]
impl ChatProvider for CloudflareProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let mut messages = vec![ApiMessage { role: "system", content: &request.system }];
        messages.extend(request.history.iter().map(|message| ApiMessage {
            role: match message.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            },
            content: &message.content,
        }));

        let response = self
            .client
            .post(&self.worker_url)
            .json(&ApiRequest { messages })
            .send()
            .await
            .map_err(|source| ProviderError::Http { provider: PROVIDER, source })?;

        if !response.status().is_success() {
            return Err(ProviderError::Api {
                provider: PROVIDER,
                message: format!("http status {}", response.status()),
            });
        }

        let payload: ApiResponse = response
            .json()
            .await
            .map_err(|source| ProviderError::Http { provider: PROVIDER, source })?;

        let text = payload.response.trim().to_string();
        if text.is_empty() {
            return Err(ProviderError::UnexpectedPayload { provider: PROVIDER });
        }
        Ok(text)
    }
}
