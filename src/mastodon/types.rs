//! Subset of the Mastodon REST entities the bot reads.
//!
//! Every field is optional: Mastodon instances differ in what they return,
//! and a missing field must render as empty text rather than fail the reply.

use serde::Deserialize;

/// A Mastodon account (`/accounts/verify_credentials`, nested in statuses).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Account {
    /// Profile display name. Often empty on real instances.
    pub display_name: Option<String>,
    /// Webfinger handle (`user` or `user@domain`).
    pub acct: Option<String>,
    /// Bio, as HTML.
    pub note: Option<String>,
    /// Public profile URL.
    pub url: Option<String>,
}

impl Account {
    /// Name to show for this account.
    ///
    /// Falls back to the handle when the display name is blank, and to an
    /// empty string when neither is present.
    pub fn name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.acct.as_deref().unwrap_or_default(),
        }
    }
}

/// A status ("toot").
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Status {
    /// Author of the status.
    pub account: Option<Account>,
    /// Body, as HTML.
    pub content: Option<String>,
}

impl Status {
    /// Display name of the author, empty when unknown.
    pub fn author_name(&self) -> &str {
        self.account.as_ref().map(Account::name).unwrap_or_default()
    }
}

/// A notification (mention, favourite, follow, …).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Notification {
    /// Notification type, e.g. `mention` or `follow`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Account that triggered the notification.
    pub account: Option<Account>,
    /// Status attached to the notification, if any.
    pub status: Option<Status>,
}

impl Notification {
    /// Display name of the actor.
    ///
    /// Uses the notifying account, then the author of the attached status.
    pub fn actor_name(&self) -> &str {
        if let Some(account) = &self.account {
            return account.name();
        }
        self.status
            .as_ref()
            .map(Status::author_name)
            .unwrap_or_default()
    }
}

/// Relationship between the authenticated user and another account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Relationship {
    /// Whether the authenticated user follows the account.
    pub following: Option<bool>,
    /// The related account, when the instance embeds it.
    pub account: Option<Account>,
}

impl Relationship {
    /// `true` only when the instance explicitly reports `following: true`.
    pub fn is_following(&self) -> bool {
        self.following.unwrap_or(false)
    }
}
