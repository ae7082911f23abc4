//! Mastodon REST client adapter.
//!
//! Every operation issues exactly one authenticated `GET` against the
//! configured API base URL and reduces the JSON response to a display string.
//! Failures never escape an operation: they are logged and replaced by the
//! locale's fallback text, so callers always get something to reply with.

use async_trait::async_trait;
use regex::Regex;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::MastodonConfig;
use crate::messages::{Locale, Messages};

pub mod format;
pub mod types;

use types::{Account, Notification, Relationship, Status};

/// Path of the authenticated account endpoint.
pub const VERIFY_CREDENTIALS_PATH: &str = "/accounts/verify_credentials";
/// Path of the home timeline endpoint.
pub const HOME_TIMELINE_PATH: &str = "/timelines/home";
/// Path of the notifications endpoint.
pub const NOTIFICATIONS_PATH: &str = "/notifications";
/// Path of the relationships endpoint.
pub const RELATIONSHIPS_PATH: &str = "/accounts/relationships";
/// Path of the status search endpoint.
pub const SEARCH_PATH: &str = "/timelines/search";

const MAX_ERROR_BODY_CHARS: usize = 256;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure of a single Mastodon request.
#[derive(Debug, Error)]
pub enum MastodonError {
    /// HTTP transport failure.
    #[error("mastodon request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The instance responded with a non-success status.
    #[error("mastodon returned non-success status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        body: String,
    },
    /// The response had no body.
    #[error("no data received from the Mastodon API")]
    EmptyBody,
    /// The body was not the expected JSON shape.
    #[error("mastodon response parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// The five queries the bot can relay to Mastodon.
///
/// Each method always resolves to a displayable string: either the formatted
/// result or a fallback message in the configured locale.
#[async_trait]
pub trait MastodonApi: Send + Sync {
    /// Formatted profile of the authenticated account.
    async fn profile(&self) -> String;

    /// Formatted home timeline.
    async fn home_timeline(&self) -> String;

    /// Formatted notifications.
    async fn notifications(&self) -> String;

    /// Formatted list of followed accounts.
    async fn following(&self) -> String;

    /// Formatted statuses matching `query`.
    async fn search(&self, query: &str) -> String;
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for one Mastodon instance, authenticated with a static token.
#[derive(Clone)]
pub struct MastodonClient {
    client: reqwest::Client,
    api_base_url: String,
    access_token: String,
    texts: &'static Messages,
}

impl std::fmt::Debug for MastodonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MastodonClient")
            .field("api_base_url", &self.api_base_url)
            .field("access_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl MastodonClient {
    /// Create a client from configuration.
    ///
    /// A missing access token is sent as an empty bearer credential; the
    /// instance rejects it and every operation returns its fallback text.
    pub fn new(config: &MastodonConfig, locale: Locale) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_owned(),
            access_token: config.access_token.clone().unwrap_or_default(),
            texts: locale.messages(),
        }
    }

    /// Fetch the authenticated account.
    ///
    /// # Errors
    ///
    /// Returns [`MastodonError`] on transport, status, or parse failure.
    pub async fn fetch_profile(&self) -> Result<Account, MastodonError> {
        self.get_json(VERIFY_CREDENTIALS_PATH, &[]).await
    }

    /// Fetch the home timeline.
    ///
    /// # Errors
    ///
    /// Returns [`MastodonError`] on transport, status, or parse failure.
    pub async fn fetch_home_timeline(&self) -> Result<Vec<Status>, MastodonError> {
        self.get_json(HOME_TIMELINE_PATH, &[]).await
    }

    /// Fetch notifications.
    ///
    /// # Errors
    ///
    /// Returns [`MastodonError`] on transport, status, or parse failure.
    pub async fn fetch_notifications(&self) -> Result<Vec<Notification>, MastodonError> {
        self.get_json(NOTIFICATIONS_PATH, &[]).await
    }

    /// Fetch relationships.
    ///
    /// # Errors
    ///
    /// Returns [`MastodonError`] on transport, status, or parse failure.
    pub async fn fetch_relationships(&self) -> Result<Vec<Relationship>, MastodonError> {
        self.get_json(RELATIONSHIPS_PATH, &[]).await
    }

    /// Search statuses.
    ///
    /// # Errors
    ///
    /// Returns [`MastodonError`] on transport, status, or parse failure.
    pub async fn search_statuses(&self, query: &str) -> Result<Vec<Status>, MastodonError> {
        self.get_json(SEARCH_PATH, &[("q", query)]).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, MastodonError> {
        let url = format!("{}{path}", self.api_base_url);
        debug!(%url, "mastodon GET");

        let mut request = self.client.get(&url).bearer_auth(&self.access_token);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;
        let body = check_http_response(response, &self.access_token).await?;
        if body.trim().is_empty() {
            return Err(MastodonError::EmptyBody);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl MastodonApi for MastodonClient {
    async fn profile(&self) -> String {
        match self.fetch_profile().await {
            Ok(account) => format::format_profile(&account, self.texts),
            Err(e) => {
                log_failure("profile", &e);
                self.texts.profile_unavailable.to_owned()
            }
        }
    }

    async fn home_timeline(&self) -> String {
        match self.fetch_home_timeline().await {
            Ok(statuses) => format::format_statuses(&statuses, self.texts.no_posts),
            Err(e) => {
                log_failure("home_timeline", &e);
                self.texts.timeline_unavailable.to_owned()
            }
        }
    }

    async fn notifications(&self) -> String {
        match self.fetch_notifications().await {
            Ok(notifications) => {
                format::format_notifications(&notifications, self.texts.no_notifications)
            }
            Err(e) => {
                log_failure("notifications", &e);
                self.texts.notifications_unavailable.to_owned()
            }
        }
    }

    async fn following(&self) -> String {
        match self.fetch_relationships().await {
            Ok(relationships) => format::format_relationships(
                &relationships,
                self.texts.not_following,
                self.texts.no_following,
            ),
            Err(e) => {
                log_failure("following", &e);
                self.texts.following_unavailable.to_owned()
            }
        }
    }

    async fn search(&self, query: &str) -> String {
        match self.search_statuses(query).await {
            Ok(statuses) => format::format_statuses(&statuses, self.texts.no_results),
            Err(e) => {
                log_failure("search", &e);
                self.texts.search_unavailable.to_owned()
            }
        }
    }
}

fn log_failure(operation: &'static str, err: &MastodonError) {
    match err {
        MastodonError::HttpStatus { status, body } => {
            warn!(operation, status, body = %body, "mastodon returned non-success status");
        }
        other => warn!(operation, error = %other, "mastodon request failed"),
    }
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

/// Check the response status and return the body text or a structured error.
///
/// Error bodies are sanitized: whitespace collapsed, bearer credentials and
/// `secret` redacted, and the result truncated.
///
/// # Errors
///
/// Returns `MastodonError::Request` on transport failure, `MastodonError::HttpStatus` on non-2xx.
pub async fn check_http_response(
    response: reqwest::Response,
    secret: &str,
) -> Result<String, MastodonError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(MastodonError::HttpStatus {
            status: status.as_u16(),
            body: sanitize_http_error_body(&body, secret),
        });
    }
    Ok(body)
}

fn sanitize_http_error_body(raw: &str, secret: &str) -> String {
    let mut sanitized = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    if !secret.is_empty() {
        sanitized = sanitized.replace(secret, "[REDACTED]");
    }
    if let Ok(regex) = Regex::new(r"(?i)bearer\s+[A-Za-z0-9._~+/=\-]+") {
        sanitized = regex
            .replace_all(&sanitized, "Bearer [REDACTED]")
            .into_owned();
    }

    if sanitized.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = sanitized
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }

    sanitized
}
