// SPDX-FileCopyrightText: 2026 GuideDesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! GuideDesk - work escalated tourist chats from the terminal.
//!
//! This is the binary entry point: it loads configuration, restores the
//! guide's session, and dispatches to a subcommand.

mod app;
mod auth;
mod chat;
mod push;
mod render;
mod shutdown;
mod tickets;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use guidedesk_config::GuideDeskConfig;
use guidedesk_core::GuideDeskError;

use crate::app::App;

/// GuideDesk - travel-guide escalation desk.
#[derive(Parser, Debug)]
#[command(name = "guidedesk", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in as a guide. The password is read from GUIDEDESK_PASSWORD or a prompt.
    Login {
        /// Prompted for when omitted.
        username: Option<String>,
    },
    /// Log out and forget the stored session.
    Logout,
    /// Show the logged-in guide.
    Whoami,
    /// List escalated tickets.
    Tickets,
    /// Open an interactive chat on a ticket.
    Chat {
        /// The tourist's phone number identifying the ticket.
        phone: String,
    },
    /// Send one reply to a ticket.
    Send {
        phone: String,
        /// Reply text; multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Resolve a ticket.
    Resolve { phone: String },
    /// Ask the tourist to share their location.
    RequestLocation {
        phone: String,
        /// Reason shown to the tourist.
        #[arg(required = true, num_args = 1..)]
        reason: Vec<String>,
    },
    /// Show suggested replies to the tourist's latest message.
    Suggest { phone: String },
    /// Register a device push token with the backend.
    RegisterPush { token: String },
    /// Print the effective configuration with passwords masked.
    Config,
}

fn print_config(config: &GuideDeskConfig) -> Result<(), GuideDeskError> {
    let rendered = guidedesk_config::to_redacted_toml(config)
        .map_err(|e| GuideDeskError::Config(format!("failed to render config: {e}")))?;
    print!("{rendered}");
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> GuideDeskConfig {
    let loaded = match path {
        Some(path) => guidedesk_config::load_and_validate_path(path),
        None => guidedesk_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            guidedesk_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("guidedesk={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(app: &App, command: Commands) -> Result<ExitCode, GuideDeskError> {
    match command {
        Commands::Login { username } => {
            if !auth::login(app, username).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Logout => auth::logout(app).await,
        Commands::Whoami => auth::whoami(app),
        Commands::Tickets => tickets::print_board(app).await?,
        Commands::Chat { phone } => {
            let cancel = shutdown::install_signal_handler();
            chat::run_chat(app, &phone, &cancel).await?;
        }
        Commands::Send { phone, message } => {
            chat::send(app, &phone, &message.join(" ")).await?;
        }
        Commands::Resolve { phone } => chat::resolve(app, &phone).await?,
        Commands::RequestLocation { phone, reason } => {
            chat::request_location(app, &phone, &reason.join(" ")).await?;
        }
        Commands::Suggest { phone } => chat::suggest(app, &phone).await?,
        Commands::RegisterPush { token } => push::register(app, token).await?,
        Commands::Config => print_config(&app.config)?,
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref());
    init_tracing(&config.agent.log_level);

    let app = match App::init(config).await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("{}: {e}", "error".red());
            return ExitCode::FAILURE;
        }
    };

    match run(&app, cli.command).await {
        Ok(code) => code,
        Err(GuideDeskError::NotAuthenticated) => {
            eprintln!(
                "{}: not logged in, run {} first",
                "error".red(),
                "guidedesk login".yellow()
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}: {e}", "error".red());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn send_joins_message_words() {
        let cli = Cli::try_parse_from(["guidedesk", "send", "+15550100", "On", "my", "way"])
            .unwrap();
        match cli.command {
            Commands::Send { phone, message } => {
                assert_eq!(phone, "+15550100");
                assert_eq!(message.join(" "), "On my way");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn send_requires_a_message() {
        assert!(Cli::try_parse_from(["guidedesk", "send", "+15550100"]).is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["guidedesk", "tickets", "--config", "/tmp/g.toml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/g.toml")));
        assert!(matches!(cli.command, Commands::Tickets));
    }

    #[test]
    fn request_location_is_kebab_case() {
        let cli = Cli::try_parse_from([
            "guidedesk",
            "request-location",
            "+15550100",
            "So",
            "I",
            "can",
            "find",
            "you",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::RequestLocation { .. }));
    }

    #[test]
    fn config_command_parses() {
        let cli = Cli::try_parse_from(["guidedesk", "config"]).unwrap();
        assert!(matches!(cli.command, Commands::Config));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = guidedesk_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.sync.poll_interval_ms, 3000);
        assert_eq!(config.backend.language, "english");
    }
}
