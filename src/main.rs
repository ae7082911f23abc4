//! Mastobot CLI entry point.
//!
//! Provides `start`, `poll`, and `check` subcommands for serving the webhook,
//! long polling during local development, or validating configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use mastobot::config::{BotConfig, Profile};
use mastobot::logging;
use mastobot::telegram::{self, UpdateMode};

/// Mastobot: query your Mastodon account from Telegram.
#[derive(Parser)]
#[command(name = "mastobot", version, about)]
struct Cli {
    /// Override the configured runtime profile.
    #[arg(long, global = true, value_enum)]
    profile: Option<Profile>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Register the webhook and serve it (long polling if no WEBHOOK_URL).
    Start,
    /// Receive updates by long polling.
    Poll,
    /// Validate configuration and print a redacted summary.
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A missing .env file is fine; the environment may already be populated.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("warning: ignoring unreadable .env file: {e}");
        }
    }

    let mut config = BotConfig::load().context("failed to load configuration")?;
    if let Some(profile) = cli.profile {
        config.profile = profile;
    }

    match cli.command {
        Command::Start => {
            let mode = UpdateMode::from_config(&config).context("invalid webhook configuration")?;
            handle_run(config, mode).await
        }
        Command::Poll => handle_run(config, UpdateMode::Polling).await,
        Command::Check => handle_check(&config),
    }
}

/// Run the bot in the given update mode until a shutdown signal arrives.
///
/// A missing bot token is not fatal here: it is logged and the process
/// stays up until stopped. Only `check` fails on it.
async fn handle_run(config: BotConfig, mode: UpdateMode) -> anyhow::Result<()> {
    let _logging_guard = logging::init(&config)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        profile = %config.profile,
        locale = %config.locale,
        "mastobot starting"
    );
    config.log_startup_warnings();

    telegram::run(config, mode).await
}

/// Validate configuration and print a summary without secrets.
fn handle_check(config: &BotConfig) -> anyhow::Result<()> {
    logging::init_cli();

    println!("{}", config.redacted_summary());
    config.validate().context("configuration is not usable")?;
    println!("configuration OK");
    Ok(())
}
