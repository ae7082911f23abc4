//! Mastobot: a Telegram bot that relays slash commands to a Mastodon account.
//!
//! Each command issues one authenticated `GET` against the Mastodon REST API
//! and replies with the result rendered as plain text.
//!
//! See `DESIGN.md` for the architecture notes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod logging;
pub mod mastodon;
pub mod messages;
pub mod telegram;
