pub mod anthropic;
pub mod cloudflare;
pub mod demo;
pub mod huggingface;
pub mod openai;

use std::time::Duration;

use chatty_core::config::{AiConfig, AiProvider};
use chatty_core::i18n::Language;
use secrecy::{ExposeSecret, SecretString};

use crate::provider::{ChatProvider, ProviderError};

pub use anthropic::AnthropicProvider;
pub use cloudflare::CloudflareProvider;
pub use demo::DemoProvider;
pub use huggingface::HuggingFaceProvider;
pub use openai::OpenAiProvider;

/// Builds the configured provider. Credentials are checked here so a
/// misconfigured provider fails at startup, not on the first message.
pub fn build_provider(
    config: &AiConfig,
    language: Language,
) -> Result<Box<dyn ChatProvider>, ProviderError> {
    match config.provider {
        AiProvider::Demo => Ok(Box::new(DemoProvider::new(language))),
        AiProvider::OpenAi => {
            let api_key = require_key(config, "openai")?;
            Ok(Box::new(OpenAiProvider::new(
                http_client(config, "openai")?,
                api_key,
                config.base_url.clone(),
            )))
        }
        AiProvider::Anthropic => {
            let api_key = require_key(config, "anthropic")?;
            Ok(Box::new(AnthropicProvider::new(
                http_client(config, "anthropic")?,
                api_key,
                config.base_url.clone(),
            )))
        }
        AiProvider::HuggingFace => Ok(Box::new(HuggingFaceProvider::new(
            http_client(config, "huggingface")?,
            config.api_key.clone(),
            config.base_url.clone(),
        ))),
        AiProvider::Cloudflare => {
            let worker_url = config
                .base_url
                .clone()
                .ok_or(ProviderError::MissingCredentials { provider: "cloudflare" })?;
            Ok(Box::new(CloudflareProvider::new(
                http_client(config, "cloudflare")?,
                worker_url,
            )))
        }
    }
}

fn http_client(config: &AiConfig, provider: &'static str) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|source| ProviderError::Http { provider, source })
}

fn require_key(config: &AiConfig, provider: &'static str) -> Result<SecretString, ProviderError> {
    config
        .api_key
        .clone()
        .filter(|key| !key.expose_secret().trim().is_empty())
        .ok_or(ProviderError::MissingCredentials { provider })
}
