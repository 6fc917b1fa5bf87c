use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::provider::{ChatProvider, ChatRole, CompletionRequest, ProviderError};

const DEFAULT_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.2";
const PROVIDER: &str = "huggingface";

/// Hugging Face text-generation inference. The free endpoint takes a single
/// instruction-formatted prompt rather than a message array, so the history
/// is flattened into the prompt. The token is optional.
pub struct HuggingFaceProvider {
    client: reqwest::Client,
    token: Option<SecretString>,
    endpoint: String,
}

#[derive(Serialize)]
struct ApiRequest<'a> {
    inputs: &'a str,
    parameters: ApiParameters,
}

#[derive(Serialize)]
struct ApiParameters {
    max_new_tokens: u32,
    temperature: f32,
    return_full_text: bool,
}

#[derive(Deserialize)]
struct ApiGeneration {
    generated_text: String,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: String,
}

impl HuggingFaceProvider {
    pub fn new(
        client: reqwest::Client,
        token: Option<SecretString>,
        endpoint: Option<String>,
    ) -> Self {
        Self {
            client,
            token,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        }
    }

    fn build_prompt(request: &CompletionRequest) -> String {
        let mut prompt = String::new();
        prompt.push_str("[INST] ");
        prompt.push_str(&request.system);
        prompt.push_str("\n\n");
        for message in &request.history {
            let label = match message.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            };
            prompt.push_str(label);
            prompt.push_str(": ");
            prompt.push_str(&message.content);
            prompt.push('\n');
        }
        prompt.push_str("assistant: [/INST]");
        prompt
    }
}

#[async_trait]
impl ChatProvider for HuggingFaceProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let prompt = Self::build_prompt(request);
        let body = ApiRequest {
            inputs: &prompt,
            parameters: ApiParameters {
                max_new_tokens: request.max_tokens,
                temperature: request.temperature,
                return_full_text: false,
            },
        };

        let mut builder = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response = builder
            .send()
            .await
            .map_err(|source| ProviderError::Http { provider: PROVIDER, source })?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<ApiErrorEnvelope>()
                .await
                .map(|envelope| envelope.error)
                .unwrap_or_else(|_| format!("http status {status}"));
            return Err(ProviderError::Api { provider: PROVIDER, message });
        }

        let generations: Vec<ApiGeneration> = response
            .json()
            .await
            .map_err(|source| ProviderError::Http { provider: PROVIDER, source })?;

        generations
            .into_iter()
            .next()
            .map(|generation| generation.generated_text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(ProviderError::UnexpectedPayload { provider: PROVIDER })
    }
}

#[cfg(test)]
mod tests {
    use crate::provider::{ChatMessage, ChatRole, CompletionRequest};

    use super::HuggingFaceProvider;

    #[test]
    fn prompt_flattens_system_and_history() {
        let request = CompletionRequest {
            system: "You are a support agent.".to_string(),
            history: vec![
                ChatMessage { role: ChatRole::User, content: "hello".to_string() },
                ChatMessage { role: ChatRole::Assistant, content: "hi!".to_string() },
                ChatMessage { role: ChatRole::User, content: "price?".to_string() },
            ],
            model: "mistral".to_string(),
            max_tokens: 300,
            temperature: 0.7,
        };

        let prompt = HuggingFaceProvider::build_prompt(&request);
        assert!(prompt.starts_with("[INST] You are a support agent."));
        assert!(prompt.contains("user: hello"));
        assert!(prompt.contains("assistant: hi!"));
        assert!(prompt.ends_with("assistant: [/INST]"));
    }
}
