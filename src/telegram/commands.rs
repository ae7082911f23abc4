//! Slash command parsing and dispatch.
//!
//! Each recognised command maps to exactly one [`MastodonApi`] call (or none,
//! for `/help` and an empty `/buscar`) and produces exactly one reply string.

use std::sync::Arc;

use tracing::error;

use crate::mastodon::MastodonApi;
use crate::messages::Messages;

/// Commands understood by the bot. Names are case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `/help`: static usage text.
    Help,
    /// `/perfil`: authenticated account profile.
    Profile,
    /// `/toots`: home timeline.
    Toots,
    /// `/notificaciones`: notifications.
    Notifications,
    /// `/siguiendo`: followed accounts.
    Following,
    /// `/buscar <term>`: status search.
    Search,
}

impl Command {
    /// All commands, in help order.
    pub const ALL: [Self; 6] = [
        Self::Help,
        Self::Profile,
        Self::Toots,
        Self::Notifications,
        Self::Following,
        Self::Search,
    ];

    /// Look up a command by its exact name (without the leading `/`).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.name() == name)
    }

    /// Command name as typed by the user, without the leading `/`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Profile => "perfil",
            Self::Toots => "toots",
            Self::Notifications => "notificaciones",
            Self::Following => "siguiendo",
            Self::Search => "buscar",
        }
    }

    /// Generic retry text used when this command's handler crashes.
    pub fn error_text(self, texts: &Messages) -> &'static str {
        match self {
            Self::Help => texts.help_error,
            Self::Profile => texts.profile_error,
            Self::Toots => texts.timeline_error,
            Self::Notifications => texts.notifications_error,
            Self::Following => texts.following_error,
            Self::Search => texts.search_error,
        }
    }
}

/// One inbound command, created per message and dropped after the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    /// Recognised command.
    pub command: Command,
    /// Trimmed text after the command token; empty when absent.
    pub argument: String,
    /// Chat the reply goes to.
    pub chat_id: i64,
}

/// Parse a message into a command invocation.
///
/// Returns `None` for plain text, unknown commands, and commands addressed
/// to a different bot (`/help@other_bot`). When `bot_username` is `None`
/// any `@suffix` is accepted.
pub fn parse_command(
    text: &str,
    chat_id: i64,
    bot_username: Option<&str>,
) -> Option<CommandInvocation> {
    let without_slash = text.strip_prefix('/')?;
    let (token, rest) = match without_slash.find(char::is_whitespace) {
        Some(idx) => without_slash.split_at(idx),
        None => (without_slash, ""),
    };

    let name = match token.split_once('@') {
        Some((name, mention)) => {
            if let Some(username) = bot_username {
                if !mention.eq_ignore_ascii_case(username) {
                    return None;
                }
            }
            name
        }
        None => token,
    };

    let command = Command::from_name(name)?;
    Some(CommandInvocation {
        command,
        argument: rest.trim().to_owned(),
        chat_id,
    })
}

/// Run a command and return its reply.
///
/// The handler runs in its own task: if it panics, the command's generic
/// retry text is returned so the chat still gets exactly one reply.
pub async fn dispatch(
    invocation: &CommandInvocation,
    api: Arc<dyn MastodonApi>,
    texts: &'static Messages,
) -> String {
    let command = invocation.command;
    let argument = invocation.argument.clone();
    let handle =
        tokio::spawn(async move { run_command(command, &argument, api.as_ref(), texts).await });

    match handle.await {
        Ok(reply) => reply,
        Err(e) => {
            error!(
                command = command.name(),
                chat_id = invocation.chat_id,
                error = %e,
                "command handler crashed"
            );
            command.error_text(texts).to_owned()
        }
    }
}

/// Execute a command against the Mastodon API.
pub async fn run_command(
    command: Command,
    argument: &str,
    api: &dyn MastodonApi,
    texts: &Messages,
) -> String {
    match command {
        Command::Help => handle_help(texts),
        Command::Profile => api.profile().await,
        Command::Toots => with_header(texts.timeline_header, &api.home_timeline().await),
        Command::Notifications => {
            with_header(texts.notifications_header, &api.notifications().await)
        }
        Command::Following => with_header(texts.following_header, &api.following().await),
        Command::Search => handle_search(argument, api, texts).await,
    }
}

/// Static usage text.
pub fn handle_help(texts: &Messages) -> String {
    texts.help.to_owned()
}

/// Search statuses, or prompt for a term when `query` is blank.
pub async fn handle_search(query: &str, api: &dyn MastodonApi, texts: &Messages) -> String {
    let query = query.trim();
    if query.is_empty() {
        return texts.search_prompt.to_owned();
    }
    with_header(texts.search_header, &api.search(query).await)
}

fn with_header(header: &str, body: &str) -> String {
    format!("{header}\n\n{body}")
}
