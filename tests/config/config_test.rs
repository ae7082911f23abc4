//! Coverage for config parsing, env overrides, and validation.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use mastobot::config::{
    BotConfig, ConfigError, Profile, DEFAULT_MASTODON_API_URL, DEFAULT_PORT,
};
use mastobot::messages::Locale;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn defaults_match_documented_values() {
    let config = BotConfig::default();
    assert!(config.telegram.bot_token.is_none());
    assert!(config.telegram.webhook_url.is_none());
    assert_eq!(config.telegram.port, DEFAULT_PORT);
    assert_eq!(config.mastodon.api_base_url, DEFAULT_MASTODON_API_URL);
    assert!(config.mastodon.access_token.is_none());
    assert_eq!(config.locale, Locale::En);
    assert_eq!(config.profile, Profile::Prod);
    assert_eq!(config.logs_dir, PathBuf::from("logs"));
}

#[test]
fn parse_full_toml() {
    let toml_str = r#"
locale = "es"
profile = "dev"
logs_dir = "/var/log/mastobot"

[telegram]
bot_token = "123:abc"
webhook_url = "https://bot.example.com"
port = 8443

[mastodon]
api_base_url = "https://mastodon.social/api/v1"
access_token = "masto"
"#;
    let config = BotConfig::from_toml(toml_str).expect("full config should parse");
    assert_eq!(config.locale, Locale::Es);
    assert_eq!(config.profile, Profile::Dev);
    assert_eq!(config.logs_dir, PathBuf::from("/var/log/mastobot"));
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:abc"));
    assert_eq!(config.telegram.port, 8443);
    assert_eq!(
        config.mastodon.api_base_url,
        "https://mastodon.social/api/v1"
    );
    assert_eq!(config.mastodon.access_token.as_deref(), Some("masto"));
}

#[test]
fn partial_toml_keeps_defaults() {
    let config = BotConfig::from_toml("[telegram]\nport = 9000\n").expect("should parse");
    assert_eq!(config.telegram.port, 9000);
    assert_eq!(config.mastodon.api_base_url, DEFAULT_MASTODON_API_URL);
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let err = BotConfig::from_toml("[telegram\nport = ").expect_err("should fail");
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn env_overrides_every_field() {
    let mut config = BotConfig::default();
    config.apply_overrides(env_from(&[
        ("BOT_TOKEN", "123:abc"),
        ("WEBHOOK_URL", "https://bot.example.com"),
        ("PORT", "8080"),
        ("MASTODON_ACCESS_TOKEN", "masto"),
        ("MASTODON_API_URL", "https://fosstodon.org/api/v1"),
        ("BOT_LOCALE", "es"),
        ("BOT_PROFILE", "dev"),
        ("LOGS_DIR", "/tmp/mastobot-logs"),
    ]));

    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:abc"));
    assert_eq!(
        config.telegram.webhook_url.as_deref(),
        Some("https://bot.example.com")
    );
    assert_eq!(config.telegram.port, 8080);
    assert_eq!(config.mastodon.access_token.as_deref(), Some("masto"));
    assert_eq!(config.mastodon.api_base_url, "https://fosstodon.org/api/v1");
    assert_eq!(config.locale, Locale::Es);
    assert_eq!(config.profile, Profile::Dev);
    assert_eq!(config.logs_dir, PathBuf::from("/tmp/mastobot-logs"));
}

#[test]
fn invalid_env_values_are_ignored() {
    let mut config = BotConfig::default();
    config.apply_overrides(env_from(&[
        ("PORT", "not-a-port"),
        ("BOT_LOCALE", "fr"),
        ("BOT_PROFILE", "staging"),
    ]));
    assert_eq!(config.telegram.port, DEFAULT_PORT);
    assert_eq!(config.locale, Locale::En);
    assert_eq!(config.profile, Profile::Prod);
}

#[test]
fn empty_env_values_are_ignored() {
    let mut config = BotConfig::default();
    config.apply_overrides(env_from(&[("BOT_TOKEN", ""), ("WEBHOOK_URL", "  ")]));
    assert!(config.telegram.bot_token.is_none());
    assert!(config.telegram.webhook_url.is_none());
}

#[test]
fn load_reads_file_then_applies_env() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join("mastobot.toml");
    std::fs::write(&path, "[telegram]\nbot_token = \"from-file\"\nport = 9000\n")
        .expect("should write config");
    let path_str = path.display().to_string();

    let config = BotConfig::load_with(env_from(&[
        ("MASTOBOT_CONFIG", path_str.as_str()),
        ("BOT_TOKEN", "from-env"),
    ]))
    .expect("config should load");

    assert_eq!(config.telegram.bot_token.as_deref(), Some("from-env"));
    assert_eq!(config.telegram.port, 9000);
}

#[test]
fn load_without_file_uses_defaults() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let missing = tmp.path().join("absent.toml").display().to_string();

    let config = BotConfig::load_with(env_from(&[("MASTOBOT_CONFIG", missing.as_str())]))
        .expect("missing file should not fail");
    assert_eq!(config.telegram.port, DEFAULT_PORT);
}

#[test]
fn validate_requires_bot_token() {
    let err = BotConfig::default()
        .validate()
        .expect_err("missing token should fail");
    assert!(matches!(err, ConfigError::MissingBotToken));
}

#[test]
fn validate_allows_missing_mastodon_token_and_webhook() {
    let mut config = BotConfig::default();
    config.telegram.bot_token = Some("123:abc".to_owned());
    assert!(config.validate().is_ok());
}

#[test]
fn validate_rejects_unparsable_webhook_url() {
    let mut config = BotConfig::default();
    config.telegram.bot_token = Some("123:abc".to_owned());
    config.telegram.webhook_url = Some("not a url".to_owned());
    let err = config.validate().expect_err("bad url should fail");
    assert!(matches!(err, ConfigError::InvalidWebhookUrl { .. }));
}

#[test]
fn webhook_endpoint_appends_telegraf_path() {
    let mut config = BotConfig::default();
    config.telegram.webhook_url = Some("https://bot.example.com/".to_owned());
    let url = config
        .webhook_endpoint()
        .expect("url should parse")
        .expect("url should be configured");
    assert_eq!(url.as_str(), "https://bot.example.com/telegraf");
}

#[test]
fn webhook_endpoint_is_none_without_base_url() {
    let config = BotConfig::default();
    assert!(config.webhook_endpoint().expect("no url is fine").is_none());
}

#[test]
fn listen_addr_binds_all_interfaces_on_port() {
    let mut config = BotConfig::default();
    config.telegram.port = 8443;
    let expected: SocketAddr = "0.0.0.0:8443".parse().expect("valid addr");
    assert_eq!(config.listen_addr(), expected);
}

#[test]
fn redacted_summary_hides_secrets() {
    let mut config = BotConfig::default();
    config.telegram.bot_token = Some("123:super-secret".to_owned());
    config.mastodon.access_token = Some("masto-secret".to_owned());

    let summary = config.redacted_summary();
    assert!(summary.contains("bot token: set"));
    assert!(summary.contains("mastodon token: set"));
    assert!(!summary.contains("super-secret"));
    assert!(!summary.contains("masto-secret"));
}

#[test]
fn profile_default_filters() {
    assert_eq!(Profile::Dev.default_log_filter(), "debug");
    assert_eq!(Profile::Prod.default_log_filter(), "info");
}
