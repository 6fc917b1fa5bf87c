use std::io::{self, BufRead, Write};
use std::sync::Arc;

use chatty_agent::AssistedResponder;
use chatty_core::catalog::Catalog;
use chatty_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use chatty_core::i18n::Language;
use chatty_core::session::ChatSession;
use chatty_core::storage::JsonFileStore;

use crate::commands::CommandResult;

/// Interactive terminal session against the engine: the same conversation
/// the embedded widget drives, minus the DOM. `/reset`, `/lang <code>`,
/// and `/quit` are handled locally.
pub fn run(language: Option<String>) -> CommandResult {
    let overrides = ConfigOverrides {
        default_language: language.as_deref().map(Language::from_tag),
        ..ConfigOverrides::default()
    };

    let config = match AppConfig::load(LoadOptions { overrides, ..LoadOptions::default() }) {
        Ok(config) => config,
        Err(error) => return CommandResult::failure("chat", "config", error.to_string(), 1),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "chat",
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                1,
            );
        }
    };

    let catalog = Catalog::builtin();
    let store = Arc::new(JsonFileStore::new(config.storage.path.clone()));

    let responder = match AssistedResponder::from_config(&config.ai, &config.widget, &catalog) {
        Ok(responder) => responder,
        Err(error) => return CommandResult::failure("chat", "provider", error.to_string(), 1),
    };

    let mut session = match ChatSession::new(catalog, &config.widget, store) {
        Ok(session) => session,
        Err(error) => return CommandResult::failure("chat", "session", error.to_string(), 1),
    };

    let welcome = session.welcome();
    print_reply(&config.widget.bot_name, &welcome.text, &welcome.quick_replies);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => return CommandResult::failure("chat", "io", error.to_string(), 1),
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/quit" | "/exit" => break,
            "/reset" => {
                if let Err(error) = session.reset() {
                    return CommandResult::failure("chat", "session", error.to_string(), 1);
                }
                let welcome = session.welcome();
                print_reply(&config.widget.bot_name, &welcome.text, &welcome.quick_replies);
                continue;
            }
            command if command.starts_with("/lang") => {
                let tag = command.trim_start_matches("/lang").trim();
                session.set_language(Language::from_tag(tag));
                println!("(language: {})", session.language().code());
                continue;
            }
            _ => {}
        }

        match runtime.block_on(responder.respond(&mut session, input)) {
            Ok(reply) => print_reply(&config.widget.bot_name, &reply.text, &reply.quick_replies),
            Err(error) => {
                eprintln!("(turn failed: {error})");
                let apology = session.apology();
                print_reply(&config.widget.bot_name, &apology.text, &apology.quick_replies);
            }
        }
    }

    CommandResult::success(
        "chat",
        format!("session {} ended via provider `{}`", session.id(), responder.provider_name()),
    )
}

fn print_reply(bot_name: &str, text: &str, quick_replies: &[String]) {
    println!("{bot_name}> {text}");
    if !quick_replies.is_empty() {
        let buttons =
            quick_replies.iter().map(|reply| format!("[{reply}]")).collect::<Vec<_>>().join(" ");
        println!("        {buttons}");
    }
    let _ = io::stdout().flush();
}
