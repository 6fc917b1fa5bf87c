pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "chatty",
    about = "Chatty operator CLI",
    long_about = "Operate the chat widget engine: interactive sessions, config inspection, readiness checks, and first-run setup.",
    after_help = "Examples:\n  chatty chat\n  chatty chat --language en\n  chatty doctor --json\n  chatty setup"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start an interactive chat session against the engine")]
    Chat {
        #[arg(long, help = "Session language tag (ko|en|ja|zh); unknown tags fall back to ko")]
        language: Option<String>,
    },
    #[command(
        about = "Inspect effective configuration values after all layers, with secrets redacted"
    )]
    Config,
    #[command(about = "Validate config, storage access, and AI provider readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Write a starter chatty.toml into the working directory")]
    Setup {
        #[arg(long, default_value = "chatty.toml", help = "Target path for the config file")]
        path: PathBuf,
        #[arg(long, help = "Overwrite an existing config file")]
        force: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Chat { language } => commands::chat::run(language),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Setup { path, force } => commands::setup::run(&path, force),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
