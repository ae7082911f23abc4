//! Structured logging setup using `tracing-subscriber` and `tracing-appender`.
//!
//! Three modes:
//! - **Production** ([`init_production`]): JSON file layer (daily rotation) + console layer
//! - **Development** ([`init_dev`]): verbose console output
//! - **CLI** ([`init_cli`]): warnings only, for one-shot subcommands

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::{BotConfig, Profile};

/// Holds the non-blocking writer guard for file logging.
///
/// The [`WorkerGuard`] must be kept alive for the duration of the process.
/// Dropping it flushes pending log entries and closes the file.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Initialise logging for the configured profile.
///
/// Returns a guard only in production mode, where logs go to a file.
///
/// # Errors
///
/// Returns an error if the logs directory cannot be created or a global
/// subscriber is already installed.
pub fn init(config: &BotConfig) -> anyhow::Result<Option<LoggingGuard>> {
    match config.profile {
        Profile::Dev => {
            init_dev()?;
            Ok(None)
        }
        Profile::Prod => init_production(&config.logs_dir).map(Some),
    }
}

/// Initialise production logging.
///
/// Writes JSON logs to `{logs_dir}/mastobot.log.YYYY-MM-DD` with daily
/// rotation. Also emits human-readable output to stderr controlled by the
/// `RUST_LOG` environment variable (default: `info`).
///
/// Returns a [`LoggingGuard`] that must be kept alive for log flushing.
///
/// # Errors
///
/// Returns an error if the logs directory cannot be created or a global
/// subscriber is already installed.
pub fn init_production(logs_dir: &Path) -> anyhow::Result<LoggingGuard> {
    std::fs::create_dir_all(logs_dir).map_err(|e| {
        anyhow::anyhow!(
            "failed to create logs directory {}: {e}",
            logs_dir.display()
        )
    })?;

    let file_appender = tracing_appender::rolling::daily(logs_dir, "mastobot.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking);

    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter(Profile::Prod.default_log_filter()))
        .with(json_layer)
        .with(console_layer)
        .try_init()?;

    Ok(LoggingGuard { _guard: guard })
}

/// Initialise verbose console logging for local development.
///
/// Controlled by `RUST_LOG` (default: `debug`).
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_dev() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(Profile::Dev.default_log_filter()))
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))
}

/// Initialise minimal logging for one-shot subcommands.
///
/// Emits warnings and errors to stderr. Controlled by `RUST_LOG`.
pub fn init_cli() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_writer(std::io::stderr)
        .try_init();
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
