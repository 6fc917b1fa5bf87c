use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::i18n::Language;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub widget: WidgetConfig,
    pub ai: AiConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct WidgetConfig {
    pub bot_name: String,
    pub company_name: String,
    pub default_language: Language,
    pub history_cap: usize,
}

#[derive(Clone, Debug)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
    /// Most recent messages sent to the remote provider per request.
    pub max_history: usize,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiProvider {
    OpenAi,
    Anthropic,
    HuggingFace,
    Cloudflare,
    Demo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub default_language: Option<Language>,
    pub ai_provider: Option<AiProvider>,
    pub ai_model: Option<String>,
    pub ai_api_key: Option<String>,
    pub storage_path: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            widget: WidgetConfig {
                bot_name: "Chatty".to_string(),
                company_name: "MUSE Studio".to_string(),
                default_language: Language::DEFAULT,
                history_cap: crate::storage::HISTORY_CAP,
            },
            ai: AiConfig {
                provider: AiProvider::Demo,
                api_key: None,
                base_url: None,
                model: "gpt-3.5-turbo".to_string(),
                timeout_secs: 30,
                max_history: 10,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 3000,
                static_dir: PathBuf::from("frontend"),
            },
            storage: StorageConfig { path: PathBuf::from("chatty-store.json") },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for AiProvider {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "huggingface" => Ok(Self::HuggingFace),
            "cloudflare" => Ok(Self::Cloudflare),
            "demo" => Ok(Self::Demo),
            other => Err(ConfigError::Validation(format!(
                "unsupported ai provider `{other}` (expected openai|anthropic|huggingface|cloudflare|demo)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    /// Precedence: defaults, then `chatty.toml`, then `CHATTY_*` environment
    /// variables, then explicit overrides. Validates last.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("chatty.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(widget) = patch.widget {
            if let Some(bot_name) = widget.bot_name {
                self.widget.bot_name = bot_name;
            }
            if let Some(company_name) = widget.company_name {
                self.widget.company_name = company_name;
            }
            if let Some(language) = widget.default_language {
                self.widget.default_language = language.parse().map_err(|_| {
                    ConfigError::Validation(format!(
                        "widget.default_language `{language}` is not one of ko|en|ja|zh"
                    ))
                })?;
            }
            if let Some(history_cap) = widget.history_cap {
                self.widget.history_cap = history_cap;
            }
        }

        if let Some(ai) = patch.ai {
            if let Some(provider) = ai.provider {
                self.ai.provider = provider;
            }
            if let Some(api_key_value) = ai.api_key {
                self.ai.api_key = Some(api_key_value.into());
            }
            if let Some(base_url) = ai.base_url {
                self.ai.base_url = Some(base_url);
            }
            if let Some(model) = ai.model {
                self.ai.model = model;
            }
            if let Some(timeout_secs) = ai.timeout_secs {
                self.ai.timeout_secs = timeout_secs;
            }
            if let Some(max_history) = ai.max_history {
                self.ai.max_history = max_history;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(static_dir) = server.static_dir {
                self.server.static_dir = static_dir;
            }
        }

        if let Some(storage) = patch.storage {
            if let Some(path) = storage.path {
                self.storage.path = path;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("CHATTY_BOT_NAME") {
            self.widget.bot_name = value;
        }
        if let Some(value) = read_env("CHATTY_COMPANY_NAME") {
            self.widget.company_name = value;
        }
        if let Some(value) = read_env("CHATTY_DEFAULT_LANGUAGE") {
            self.widget.default_language = value.parse().map_err(|_| {
                ConfigError::InvalidEnvOverride {
                    key: "CHATTY_DEFAULT_LANGUAGE".to_string(),
                    value,
                }
            })?;
        }
        if let Some(value) = read_env("CHATTY_HISTORY_CAP") {
            self.widget.history_cap = parse_usize("CHATTY_HISTORY_CAP", &value)?;
        }

        if let Some(value) = read_env("CHATTY_AI_PROVIDER") {
            self.ai.provider = value.parse()?;
        }
        if let Some(value) = read_env("CHATTY_AI_API_KEY") {
            self.ai.api_key = Some(value.into());
        }
        if let Some(value) = read_env("CHATTY_AI_BASE_URL") {
            self.ai.base_url = Some(value);
        }
        if let Some(value) = read_env("CHATTY_AI_MODEL") {
            self.ai.model = value;
        }
        if let Some(value) = read_env("CHATTY_AI_TIMEOUT_SECS") {
            self.ai.timeout_secs = parse_u64("CHATTY_AI_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("CHATTY_AI_MAX_HISTORY") {
            self.ai.max_history = parse_usize("CHATTY_AI_MAX_HISTORY", &value)?;
        }

        if let Some(value) = read_env("CHATTY_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("CHATTY_SERVER_PORT") {
            self.server.port = parse_u16("CHATTY_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("CHATTY_SERVER_STATIC_DIR") {
            self.server.static_dir = PathBuf::from(value);
        }

        if let Some(value) = read_env("CHATTY_STORAGE_PATH") {
            self.storage.path = PathBuf::from(value);
        }

        let log_level = read_env("CHATTY_LOGGING_LEVEL").or_else(|| read_env("CHATTY_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("CHATTY_LOGGING_FORMAT").or_else(|| read_env("CHATTY_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(language) = overrides.default_language {
            self.widget.default_language = language;
        }
        if let Some(provider) = overrides.ai_provider {
            self.ai.provider = provider;
        }
        if let Some(model) = overrides.ai_model {
            self.ai.model = model;
        }
        if let Some(api_key) = overrides.ai_api_key {
            self.ai.api_key = Some(api_key.into());
        }
        if let Some(path) = overrides.storage_path {
            self.storage.path = path;
        }
        if let Some(static_dir) = overrides.static_dir {
            self.server.static_dir = static_dir;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_widget(&self.widget)?;
        validate_ai(&self.ai)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("chatty.toml"), PathBuf::from("config/chatty.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_widget(widget: &WidgetConfig) -> Result<(), ConfigError> {
    if widget.bot_name.trim().is_empty() {
        return Err(ConfigError::Validation("widget.bot_name must not be empty".to_string()));
    }
    if widget.history_cap == 0 || widget.history_cap > 500 {
        return Err(ConfigError::Validation(
            "widget.history_cap must be in range 1..=500".to_string(),
        ));
    }
    Ok(())
}

fn validate_ai(ai: &AiConfig) -> Result<(), ConfigError> {
    if ai.timeout_secs == 0 || ai.timeout_secs > 300 {
        return Err(ConfigError::Validation("ai.timeout_secs must be in range 1..=300".to_string()));
    }
    if ai.max_history == 0 {
        return Err(ConfigError::Validation(
            "ai.max_history must be greater than zero".to_string(),
        ));
    }

    match ai.provider {
        AiProvider::OpenAi | AiProvider::Anthropic => {
            let missing = ai
                .api_key
                .as_ref()
                .map(|value| value.expose_secret().trim().is_empty())
                .unwrap_or(true);
            if missing {
                return Err(ConfigError::Validation(
                    "ai.api_key is required for openai/anthropic providers".to_string(),
                ));
            }
        }
        AiProvider::Cloudflare => {
            let missing = ai.base_url.as_ref().map(|value| value.trim().is_empty()).unwrap_or(true);
            if missing {
                return Err(ConfigError::Validation(
                    "ai.base_url (the worker URL) is required for the cloudflare provider"
                        .to_string(),
                ));
            }
        }
        // the hugging face inference API accepts anonymous requests; demo is
        // in-process
        AiProvider::HuggingFace | AiProvider::Demo => {}
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    widget: Option<WidgetPatch>,
    ai: Option<AiPatch>,
    server: Option<ServerPatch>,
    storage: Option<StoragePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct WidgetPatch {
    bot_name: Option<String>,
    company_name: Option<String>,
    default_language: Option<String>,
    history_cap: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct AiPatch {
    provider: Option<AiProvider>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
    max_history: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    static_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct StoragePatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use crate::i18n::Language;

    use super::{AiProvider, AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_load_with_demo_provider() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.ai.provider == AiProvider::Demo, "default provider should be demo")?;
        ensure(
            config.widget.default_language == Language::Ko,
            "default language should be korean",
        )?;
        Ok(())
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_CHATTY_API_KEY", "sk-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("chatty.toml");
            fs::write(
                &path,
                r#"
[ai]
provider = "open_ai"
api_key = "${TEST_CHATTY_API_KEY}"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.ai.provider == AiProvider::OpenAi, "provider should come from file")?;
            let key = config.ai.api_key.as_ref().map(|key| key.expose_secret().to_string());
            ensure(
                key.as_deref() == Some("sk-from-env"),
                "api key should be interpolated from environment",
            )?;
            Ok(())
        })();

        clear_vars(&["TEST_CHATTY_API_KEY"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("CHATTY_DEFAULT_LANGUAGE", "ja");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("chatty.toml");
            fs::write(
                &path,
                r#"
[widget]
default_language = "en"

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.widget.default_language == Language::Ja,
                "env language should win over file",
            )?;
            ensure(config.logging.level == "debug", "override log level should win")?;
            Ok(())
        })();

        clear_vars(&["CHATTY_DEFAULT_LANGUAGE"]);
        result
    }

    #[test]
    fn remote_provider_without_api_key_fails_validation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("CHATTY_AI_PROVIDER", "openai");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("ai.api_key")
            );
            ensure(has_message, "validation failure should mention ai.api_key")
        })();

        clear_vars(&["CHATTY_AI_PROVIDER"]);
        result
    }

    #[test]
    fn secret_values_are_not_leaked_by_debug() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("CHATTY_AI_PROVIDER", "anthropic");
        env::set_var("CHATTY_AI_API_KEY", "sk-ant-secret-value");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            let debug = format!("{config:?}");

            ensure(
                !debug.contains("sk-ant-secret-value"),
                "debug output should not contain the api key",
            )?;
            ensure(
                matches!(config.logging.format, LogFormat::Compact),
                "default logging format should be compact",
            )?;
            Ok(())
        })();

        clear_vars(&["CHATTY_AI_PROVIDER", "CHATTY_AI_API_KEY"]);
        result
    }
}
