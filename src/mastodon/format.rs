//! Plain-text rendering of Mastodon entities for chat replies.

use crate::messages::Messages;

use super::types::{Account, Notification, Relationship, Status};

/// Separator between list entries.
pub const ENTRY_SEPARATOR: &str = "\n\n";

/// Render a profile as a titled name / bio / URL block.
pub fn format_profile(account: &Account, texts: &Messages) -> String {
    format!(
        "{title}\n\n{name_label}: {name}\n{bio_label}: {bio}\n{url_label}: {url}",
        title = texts.profile_title,
        name_label = texts.name_label,
        name = account.name(),
        bio_label = texts.bio_label,
        bio = account.note.as_deref().unwrap_or_default(),
        url_label = texts.url_label,
        url = account.url.as_deref().unwrap_or_default(),
    )
}

/// Render statuses as `"<author>: <content>"` entries.
pub fn format_statuses(statuses: &[Status], empty: &str) -> String {
    join_entries(
        statuses.iter().map(|status| {
            format!(
                "{}: {}",
                status.author_name(),
                status.content.as_deref().unwrap_or_default()
            )
        }),
        empty,
    )
}

/// Render notifications as `"<type>: <actor>"` entries.
pub fn format_notifications(notifications: &[Notification], empty: &str) -> String {
    join_entries(
        notifications.iter().map(|notification| {
            format!(
                "{}: {}",
                notification.kind.as_deref().unwrap_or_default(),
                notification.actor_name()
            )
        }),
        empty,
    )
}

/// Render relationships: the account name when followed, `placeholder` otherwise.
pub fn format_relationships(
    relationships: &[Relationship],
    placeholder: &str,
    empty: &str,
) -> String {
    join_entries(
        relationships.iter().map(|relationship| {
            if relationship.is_following() {
                relationship
                    .account
                    .as_ref()
                    .map(Account::name)
                    .unwrap_or_default()
                    .to_owned()
            } else {
                placeholder.to_owned()
            }
        }),
        empty,
    )
}

/// Join entries with a blank line; an all-empty result becomes `empty`.
fn join_entries(entries: impl Iterator<Item = String>, empty: &str) -> String {
    let joined = entries.collect::<Vec<_>>().join(ENTRY_SEPARATOR);
    if joined.is_empty() {
        empty.to_owned()
    } else {
        joined
    }
}
