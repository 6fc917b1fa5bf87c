use secrecy::ExposeSecret;
use serde::Serialize;

use chatty_core::config::{AppConfig, LoadOptions};

#[derive(Debug, Serialize)]
struct EffectiveConfig {
    widget: WidgetView,
    ai: AiView,
    server: ServerView,
    storage: StorageView,
    logging: LoggingView,
}

#[derive(Debug, Serialize)]
struct WidgetView {
    bot_name: String,
    company_name: String,
    default_language: &'static str,
    history_cap: usize,
}

#[derive(Debug, Serialize)]
struct AiView {
    provider: String,
    api_key: &'static str,
    base_url: Option<String>,
    model: String,
    timeout_secs: u64,
    max_history: usize,
}

#[derive(Debug, Serialize)]
struct ServerView {
    bind_address: String,
    port: u16,
    static_dir: String,
}

#[derive(Debug, Serialize)]
struct StorageView {
    path: String,
}

#[derive(Debug, Serialize)]
struct LoggingView {
    level: String,
    format: String,
}

/// Effective configuration after all layers, with secrets redacted.
pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config error: {error}"),
    };

    let redacted_key = match &config.ai.api_key {
        Some(key) if !key.expose_secret().is_empty() => "***redacted***",
        _ => "(unset)",
    };

    let view = EffectiveConfig {
        widget: WidgetView {
            bot_name: config.widget.bot_name.clone(),
            company_name: config.widget.company_name.clone(),
            default_language: config.widget.default_language.code(),
            history_cap: config.widget.history_cap,
        },
        ai: AiView {
            provider: format!("{:?}", config.ai.provider).to_lowercase(),
            api_key: redacted_key,
            base_url: config.ai.base_url.clone(),
            model: config.ai.model.clone(),
            timeout_secs: config.ai.timeout_secs,
            max_history: config.ai.max_history,
        },
        server: ServerView {
            bind_address: config.server.bind_address.clone(),
            port: config.server.port,
            static_dir: config.server.static_dir.display().to_string(),
        },
        storage: StorageView { path: config.storage.path.display().to_string() },
        logging: LoggingView {
            level: config.logging.level.clone(),
            format: format!("{:?}", config.logging.format).to_lowercase(),
        },
    };

    serde_json::to_string_pretty(&view)
        .unwrap_or_else(|error| format!("config serialization failed: {error}"))
}
