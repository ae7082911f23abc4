//! Configuration loading and validation.
//!
//! Loads [`BotConfig`] from an optional TOML file (`$MASTOBOT_CONFIG` or
//! `./mastobot.toml`), then applies environment overrides.
//!
//! Precedence: env vars > config file > defaults.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::messages::Locale;

/// Path the Telegram webhook is served on.
pub const WEBHOOK_PATH: &str = "/telegraf";

/// Default Mastodon API base URL.
pub const DEFAULT_MASTODON_API_URL: &str = "https://todon.nl/api/v1";

/// Default listen port for the webhook server.
pub const DEFAULT_PORT: u16 = 3000;

const CONFIG_PATH_ENV: &str = "MASTOBOT_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "mastobot.toml";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read config at {path}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The config file is not valid TOML for [`BotConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// No Telegram bot token was configured.
    #[error("no Telegram bot token configured (set BOT_TOKEN)")]
    MissingBotToken,
    /// The webhook base URL cannot be parsed.
    #[error("invalid webhook URL {url:?}: {source}")]
    InvalidWebhookUrl {
        /// Configured value.
        url: String,
        /// Parse failure.
        source: url::ParseError,
    },
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Runtime profile: selects logging verbosity and sinks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Verbose console logging for local development.
    Dev,
    /// Quiet console logging plus rotated JSON log files.
    #[default]
    Prod,
}

impl Profile {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(self) -> &'static str {
        match self {
            Self::Dev => "debug",
            Self::Prod => "info",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dev => f.write_str("dev"),
            Self::Prod => f.write_str("prod"),
        }
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Dev),
            "prod" | "production" => Ok(Self::Prod),
            other => Err(format!("unknown profile: {other:?}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Top-level bot configuration. Immutable once loaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Telegram settings.
    pub telegram: TelegramConfig,
    /// Mastodon settings.
    pub mastodon: MastodonConfig,
    /// Reply language.
    pub locale: Locale,
    /// Runtime profile.
    pub profile: Profile,
    /// Directory for JSON log files (prod profile).
    pub logs_dir: PathBuf,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            telegram: TelegramConfig::default(),
            mastodon: MastodonConfig::default(),
            locale: Locale::default(),
            profile: Profile::default(),
            logs_dir: PathBuf::from("logs"),
        }
    }
}

/// Telegram-specific configuration.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot API token.
    pub bot_token: Option<String>,
    /// Public base URL; the webhook is registered at `<base>/telegraf`.
    pub webhook_url: Option<String>,
    /// Port the webhook server listens on.
    pub port: u16,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            webhook_url: None,
            port: DEFAULT_PORT,
        }
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &redacted(self.bot_token.as_deref()))
            .field("webhook_url", &self.webhook_url)
            .field("port", &self.port)
            .finish()
    }
}

/// Mastodon-specific configuration.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct MastodonConfig {
    /// API base URL, e.g. `https://todon.nl/api/v1`.
    pub api_base_url: String,
    /// Personal access token sent as a bearer credential.
    pub access_token: Option<String>,
}

impl Default for MastodonConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_MASTODON_API_URL.to_owned(),
            access_token: None,
        }
    }
}

impl fmt::Debug for MastodonConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MastodonConfig")
            .field("api_base_url", &self.api_base_url)
            .field("access_token", &redacted(self.access_token.as_deref()))
            .finish()
    }
}

fn redacted(secret: Option<&str>) -> &'static str {
    match secret {
        Some(_) => "[REDACTED]",
        None => "<unset>",
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl BotConfig {
    /// Load configuration with precedence: env vars > TOML file > defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration using a custom env resolver (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let path = config_path_with(&env);
        let mut config = Self::load_from_file(&path)?;
        config.apply_overrides(env);
        Ok(config)
    }

    /// Load from a TOML file only. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                tracing::info!(path = %path.display(), "loading config from file");
                Self::from_toml(&contents)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file found, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parse a TOML string into config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on invalid TOML.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Apply environment variable overrides. Empty values are ignored.
    ///
    /// Takes a resolver function for testability (avoids `set_var` in tests).
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        // Telegram.
        if let Some(v) = var("BOT_TOKEN") {
            self.telegram.bot_token = Some(v);
        }
        if let Some(v) = var("WEBHOOK_URL") {
            self.telegram.webhook_url = Some(v);
        }
        if let Some(v) = var("PORT") {
            match v.trim().parse() {
                Ok(port) => self.telegram.port = port,
                Err(_) => tracing::warn!(var = "PORT", value = %v, "ignoring invalid env override"),
            }
        }

        // Mastodon.
        if let Some(v) = var("MASTODON_ACCESS_TOKEN") {
            self.mastodon.access_token = Some(v);
        }
        if let Some(v) = var("MASTODON_API_URL") {
            self.mastodon.api_base_url = v;
        }

        // Runtime.
        if let Some(v) = var("BOT_LOCALE") {
            match v.parse() {
                Ok(locale) => self.locale = locale,
                Err(e) => tracing::warn!(var = "BOT_LOCALE", error = %e, "ignoring invalid env override"),
            }
        }
        if let Some(v) = var("BOT_PROFILE") {
            match v.parse() {
                Ok(profile) => self.profile = profile,
                Err(e) => tracing::warn!(var = "BOT_PROFILE", error = %e, "ignoring invalid env override"),
            }
        }
        if let Some(v) = var("LOGS_DIR") {
            self.logs_dir = PathBuf::from(v);
        }
    }

    // -----------------------------------------------------------------------
    // Validation and derived values
    // -----------------------------------------------------------------------

    /// Check the settings required to run the bot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingBotToken`] without a bot token and
    /// [`ConfigError::InvalidWebhookUrl`] for an unparsable webhook URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram.bot_token.is_none() {
            return Err(ConfigError::MissingBotToken);
        }
        self.webhook_endpoint()?;
        Ok(())
    }

    /// Full webhook URL (`<webhook_url>/telegraf`), if a base URL is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWebhookUrl`] if the result does not parse.
    pub fn webhook_endpoint(&self) -> Result<Option<Url>, ConfigError> {
        let Some(base) = self.telegram.webhook_url.as_deref() else {
            return Ok(None);
        };
        let joined = format!("{}{WEBHOOK_PATH}", base.trim_end_matches('/'));
        Url::parse(&joined)
            .map(Some)
            .map_err(|source| ConfigError::InvalidWebhookUrl {
                url: base.to_owned(),
                source,
            })
    }

    /// Socket address the webhook server binds to.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.telegram.port))
    }

    /// Log loud warnings for settings that degrade the bot without stopping it.
    pub fn log_startup_warnings(&self) {
        if self.mastodon.access_token.is_none() {
            tracing::error!(
                "no Mastodon access token configured (set MASTODON_ACCESS_TOKEN); \
                 every Mastodon query will fail"
            );
        }
        if self.telegram.webhook_url.is_none() {
            tracing::warn!("no webhook URL configured (set WEBHOOK_URL)");
        }
    }

    /// Multi-line summary safe to print: secrets are reported as set/unset.
    pub fn redacted_summary(&self) -> String {
        let set = |v: &Option<String>| if v.is_some() { "set" } else { "missing" };
        [
            format!("profile: {}", self.profile),
            format!("locale: {}", self.locale),
            format!("bot token: {}", set(&self.telegram.bot_token)),
            format!(
                "webhook url: {}",
                self.telegram.webhook_url.as_deref().unwrap_or("missing (long polling)")
            ),
            format!("listen port: {}", self.telegram.port),
            format!("mastodon api: {}", self.mastodon.api_base_url),
            format!("mastodon token: {}", set(&self.mastodon.access_token)),
            format!("logs dir: {}", self.logs_dir.display()),
        ]
        .join("\n")
    }
}

/// Resolve the config file path using a custom env resolver.
fn config_path_with(env: impl Fn(&str) -> Option<String>) -> PathBuf {
    match env(CONFIG_PATH_ENV) {
        Some(p) if !p.trim().is_empty() => PathBuf::from(p),
        _ => PathBuf::from(DEFAULT_CONFIG_FILE),
    }
}
