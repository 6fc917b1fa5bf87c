use std::path::Path;

use crate::commands::CommandResult;

const STARTER_CONFIG: &str = r#"# chatty configuration
# Every value here can also be set through CHATTY_* environment variables,
# and `${VAR}` expressions are interpolated from the environment at load time.

[widget]
bot_name = "Chatty"
company_name = "MUSE Studio"
# ko | en | ja | zh
default_language = "ko"
history_cap = 50

[ai]
# demo | open_ai | anthropic | hugging_face | cloudflare
provider = "demo"
# api_key = "${CHATTY_AI_KEY}"
# base_url = "https://example.workers.dev/chat"
model = "gpt-3.5-turbo"
timeout_secs = 30
max_history = 10

[server]
bind_address = "127.0.0.1"
port = 3000
static_dir = "frontend"

[storage]
path = "chatty-store.json"

[logging]
level = "info"
# compact | pretty | json
format = "compact"
"#;

/// Writes a starter `chatty.toml` into the working directory.
pub fn run(path: &Path, force: bool) -> CommandResult {
    if path.exists() && !force {
        return CommandResult::failure(
            "setup",
            "config_exists",
            format!("`{}` already exists; pass --force to overwrite", path.display()),
            1,
        );
    }

    match std::fs::write(path, STARTER_CONFIG) {
        Ok(()) => CommandResult::success(
            "setup",
            format!("wrote starter configuration to `{}`", path.display()),
        ),
        Err(error) => CommandResult::failure(
            "setup",
            "io",
            format!("could not write `{}`: {error}", path.display()),
            1,
        ),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::run;

    #[test]
    fn writes_a_parseable_starter_config() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("chatty.toml");

        let result = run(&path, false);
        assert_eq!(result.exit_code, 0);

        let written = std::fs::read_to_string(&path).expect("config written");
        assert!(written.contains("[widget]"));
        assert!(toml::from_str::<toml::Value>(&written).is_ok());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("chatty.toml");
        std::fs::write(&path, "# existing").expect("seed file");

        let refused = run(&path, false);
        assert_eq!(refused.exit_code, 1);
        assert_eq!(std::fs::read_to_string(&path).expect("unchanged"), "# existing");

        let forced = run(&path, true);
        assert_eq!(forced.exit_code, 0);
    }
}
