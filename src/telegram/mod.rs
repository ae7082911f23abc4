//! Telegram adapter: slash commands, reply formatting, and the bot dispatcher.
//!
//! Receives updates either through a webhook served at
//! [`WEBHOOK_PATH`](crate::config::WEBHOOK_PATH) or by long polling, turns
//! recognised commands into one Mastodon query each, and sends exactly one
//! plain-text reply per command.

use std::sync::Arc;
use std::time::Duration;

use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::{BotConfig, ConfigError};
use crate::mastodon::{MastodonApi, MastodonClient};
use crate::messages::Messages;

pub mod commands;
pub mod ui;

// ---------------------------------------------------------------------------
// Shared state for handler injection
// ---------------------------------------------------------------------------

/// Shared dependencies injected into teloxide handlers via `dptree::deps!`.
#[derive(Clone)]
struct SharedState {
    api: Arc<dyn MastodonApi>,
    texts: &'static Messages,
    bot_username: Option<String>,
}

/// How the bot receives updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateMode {
    /// Register `url` with `setWebhook` and serve it locally.
    Webhook(Url),
    /// Long-poll `getUpdates`.
    Polling,
}

impl UpdateMode {
    /// Webhook when a webhook URL is configured, polling otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWebhookUrl`] for an unparsable URL.
    pub fn from_config(config: &BotConfig) -> Result<Self, ConfigError> {
        Ok(match config.webhook_endpoint()? {
            Some(url) => Self::Webhook(url),
            None => Self::Polling,
        })
    }
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Run the Telegram bot until SIGINT or SIGTERM.
///
/// Without a bot token nothing can reach Telegram: the problem is logged at
/// `error` and the process idles until it is asked to stop.
pub async fn run(config: BotConfig, mode: UpdateMode) -> anyhow::Result<()> {
    let stop = listen_for_shutdown();

    let Some(token) = config.telegram.bot_token.clone() else {
        error!(
            error = %ConfigError::MissingBotToken,
            "cannot reach Telegram; idling until shutdown"
        );
        wait_for_stop(stop).await;
        info!("bot shut down without connecting");
        return Ok(());
    };
    let bot = Bot::new(token);

    let bot_username = match bot.get_me().await {
        Ok(me) => {
            let username = me.user.username.clone();
            info!(username = ?username, "connected to Telegram");
            username
        }
        Err(e) => {
            warn!(error = %e, "failed to fetch bot identity; accepting any @mention");
            None
        }
    };

    let api: Arc<dyn MastodonApi> =
        Arc::new(MastodonClient::new(&config.mastodon, config.locale));
    let state = SharedState {
        api,
        texts: config.locale.messages(),
        bot_username,
    };

    let handler = Update::filter_message().endpoint(handle_message);

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![state])
        .default_handler(|_update| async {
            debug!("ignoring non-message update");
        })
        .build();

    let shutdown_token = dispatcher.shutdown_token();
    let watcher_stop = stop.clone();
    tokio::spawn(async move {
        wait_for_stop(watcher_stop).await;
        let done = retry_until_running(|| shutdown_token.shutdown()).await;
        done.await;
        info!("dispatcher stopped");
    });

    match mode {
        UpdateMode::Webhook(url) => {
            let options = webhooks::Options::new(config.listen_addr(), url.clone());
            let registered = tokio::select! {
                result = webhooks::axum(bot.clone(), options) => result,
                () = wait_for_stop(stop) => {
                    info!("shutdown requested while registering webhook");
                    return Ok(());
                }
            };
            match registered {
                Ok(listener) => {
                    info!(%url, addr = %config.listen_addr(), "webhook registered, listening");
                    dispatcher
                        .dispatch_with_listener(
                            listener,
                            LoggingErrorHandler::with_custom_text("webhook listener error"),
                        )
                        .await;
                }
                Err(e) => {
                    error!(%url, error = %e, "failed to set webhook; falling back to long polling");
                    dispatcher.dispatch().await;
                }
            }
        }
        UpdateMode::Polling => {
            info!("starting long polling");
            dispatcher.dispatch().await;
        }
    }

    info!("bot shut down cleanly");
    Ok(())
}

// ---------------------------------------------------------------------------
// Message handler
// ---------------------------------------------------------------------------

/// Handle an incoming message: one reply per recognised command.
async fn handle_message(bot: Bot, msg: Message, state: SharedState) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let Some(invocation) =
        commands::parse_command(text, chat_id.0, state.bot_username.as_deref())
    else {
        debug!(chat_id = chat_id.0, "ignoring message without a known command");
        return Ok(());
    };

    info!(
        chat_id = chat_id.0,
        command = invocation.command.name(),
        "command received"
    );
    debug!(argument = %invocation.argument, "command argument");

    let reply = commands::dispatch(&invocation, Arc::clone(&state.api), state.texts).await;
    let reply = ui::truncate_reply(&reply);

    match bot.send_message(chat_id, reply).await {
        Ok(_) => debug!(
            chat_id = chat_id.0,
            command = invocation.command.name(),
            "reply sent"
        ),
        Err(e) => warn!(
            chat_id = chat_id.0,
            command = invocation.command.name(),
            error = %e,
            "failed to send telegram reply"
        ),
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Signals
// ---------------------------------------------------------------------------

/// Pause between shutdown attempts while the dispatcher is still starting.
const SHUTDOWN_RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// Spawn the signal listener. The receiver flips to `true` once and stays
/// there, so a signal that arrives before anyone waits is not lost.
fn listen_for_shutdown() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        // Receivers may all be gone if the bot already stopped.
        let _ = tx.send(true);
    });
    rx
}

/// Resolve once a shutdown has been requested.
async fn wait_for_stop(mut stop: watch::Receiver<bool>) {
    let requested = stop.wait_for(|requested| *requested).await.is_ok();
    if !requested {
        // Sender dropped without a request: nothing will ever stop us.
        std::future::pending::<()>().await;
    }
}

/// Call `attempt` until it succeeds.
///
/// The dispatcher refuses to shut down while idle, which is the case
/// between building it and the first update listener poll.
async fn retry_until_running<T, E: std::fmt::Display>(
    mut attempt: impl FnMut() -> Result<T, E>,
) -> T {
    loop {
        match attempt() {
            Ok(value) => return value,
            Err(e) => {
                debug!(error = %e, "dispatcher not running yet; retrying shutdown");
                tokio::time::sleep(SHUTDOWN_RETRY_INTERVAL).await;
            }
        }
    }
}

/// Resolve on SIGINT (Ctrl+C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received SIGINT, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
