//! Tests for `telegram::commands` parsing and dispatch.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use mastobot::mastodon::MastodonApi;
use mastobot::messages::{EN, ES};
use mastobot::telegram::commands::{self, Command, CommandInvocation};

/// Fake API that records every call and returns canned text.
#[derive(Default)]
struct RecordingApi {
    calls: AtomicUsize,
    searches: Mutex<Vec<String>>,
    timeline: String,
}

impl RecordingApi {
    fn with_timeline(timeline: &str) -> Self {
        Self {
            timeline: timeline.to_owned(),
            ..Self::default()
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl MastodonApi for RecordingApi {
    async fn profile(&self) -> String {
        self.record();
        "profile".to_owned()
    }

    async fn home_timeline(&self) -> String {
        self.record();
        self.timeline.clone()
    }

    async fn notifications(&self) -> String {
        self.record();
        "mention: Carol".to_owned()
    }

    async fn following(&self) -> String {
        self.record();
        "Erin".to_owned()
    }

    async fn search(&self, query: &str) -> String {
        self.record();
        if let Ok(mut searches) = self.searches.lock() {
            searches.push(query.to_owned());
        }
        format!("result for {query}")
    }
}

/// Fake API whose every method panics.
struct PanickingApi;

#[async_trait]
impl MastodonApi for PanickingApi {
    async fn profile(&self) -> String {
        panic!("profile exploded")
    }

    async fn home_timeline(&self) -> String {
        panic!("timeline exploded")
    }

    async fn notifications(&self) -> String {
        panic!("notifications exploded")
    }

    async fn following(&self) -> String {
        panic!("following exploded")
    }

    async fn search(&self, _query: &str) -> String {
        panic!("search exploded")
    }
}

fn invocation(text: &str) -> CommandInvocation {
    commands::parse_command(text, 42, Some("masto_bot")).expect("command should parse")
}

async fn dispatch_with(api: &Arc<RecordingApi>, text: &str) -> String {
    let api: Arc<dyn MastodonApi> = Arc::clone(api) as Arc<dyn MastodonApi>;
    commands::dispatch(&invocation(text), api, &EN).await
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[test]
fn parse_recognises_every_command() {
    for command in Command::ALL {
        let parsed = commands::parse_command(&format!("/{}", command.name()), 1, None);
        assert_eq!(parsed.map(|inv| inv.command), Some(command));
    }
}

#[test]
fn parse_keeps_chat_and_trimmed_argument() {
    let parsed = commands::parse_command("/buscar   rust lang  ", 7, None);
    assert_eq!(
        parsed,
        Some(CommandInvocation {
            command: Command::Search,
            argument: "rust lang".to_owned(),
            chat_id: 7,
        })
    );
}

#[test]
fn parse_treats_whitespace_only_argument_as_absent() {
    let parsed = commands::parse_command("/buscar \t  ", 1, None).expect("should parse");
    assert_eq!(parsed.argument, "");
}

#[test]
fn parse_accepts_newline_after_command() {
    let parsed = commands::parse_command("/buscar\nrust", 1, None).expect("should parse");
    assert_eq!(parsed.command, Command::Search);
    assert_eq!(parsed.argument, "rust");
}

#[test]
fn parse_strips_own_bot_mention() {
    let parsed = commands::parse_command("/toots@Masto_Bot", 1, Some("masto_bot"));
    assert_eq!(parsed.map(|inv| inv.command), Some(Command::Toots));
}

#[test]
fn parse_ignores_commands_for_other_bots() {
    assert!(commands::parse_command("/toots@other_bot", 1, Some("masto_bot")).is_none());
}

#[test]
fn parse_accepts_any_mention_when_username_unknown() {
    let parsed = commands::parse_command("/help@whoever_bot", 1, None);
    assert_eq!(parsed.map(|inv| inv.command), Some(Command::Help));
}

#[test]
fn parse_rejects_plain_text_and_unknown_commands() {
    assert!(commands::parse_command("hello", 1, None).is_none());
    assert!(commands::parse_command("/start", 1, None).is_none());
    assert!(commands::parse_command("/Help", 1, None).is_none());
    assert!(commands::parse_command("/buscarrust", 1, None).is_none());
    assert!(commands::parse_command("/", 1, None).is_none());
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn help_is_static_and_makes_no_api_call() {
    let api = Arc::new(RecordingApi::default());
    let first = dispatch_with(&api, "/help").await;
    let second = dispatch_with(&api, "/help ignored argument").await;

    assert_eq!(first, EN.help);
    assert_eq!(first, second);
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn toots_reply_prefixes_latest_posts_header() {
    let api = Arc::new(RecordingApi::with_timeline(
        "Alice: <p>one</p>\n\nBob: <p>two</p>",
    ));
    let reply = dispatch_with(&api, "/toots").await;

    assert_eq!(
        reply,
        "Latest posts:\n\nAlice: <p>one</p>\n\nBob: <p>two</p>"
    );
    assert_eq!(api.call_count(), 1);
}

#[tokio::test]
async fn each_query_command_makes_exactly_one_call() {
    let cases = [
        ("/perfil", "profile"),
        ("/notificaciones", "Notifications:\n\nmention: Carol"),
        ("/siguiendo", "Accounts you follow:\n\nErin"),
        ("/buscar rust", "Search results:\n\nresult for rust"),
    ];
    for (text, expected) in cases {
        let api = Arc::new(RecordingApi::default());
        let reply = dispatch_with(&api, text).await;
        assert_eq!(reply, expected, "reply for {text}");
        assert_eq!(api.call_count(), 1, "calls for {text}");
    }
}

#[tokio::test]
async fn search_without_term_prompts_and_skips_api() {
    for text in ["/buscar", "/buscar    ", "/buscar@masto_bot \t"] {
        let api = Arc::new(RecordingApi::default());
        let reply = dispatch_with(&api, text).await;
        assert_eq!(reply, EN.search_prompt, "reply for {text:?}");
        assert_eq!(api.call_count(), 0, "calls for {text:?}");
    }
}

#[tokio::test]
async fn search_passes_trimmed_term() {
    let api = Arc::new(RecordingApi::default());
    let reply = dispatch_with(&api, "/buscar   test  ").await;
    assert_eq!(reply, "Search results:\n\nresult for test");

    let searches = api.searches.lock().expect("lock should not be poisoned");
    assert_eq!(searches.as_slice(), ["test".to_owned()]);
}

#[tokio::test]
async fn handler_panic_yields_generic_retry_text() {
    let cases = [
        ("/perfil", EN.profile_error),
        ("/toots", EN.timeline_error),
        ("/notificaciones", EN.notifications_error),
        ("/siguiendo", EN.following_error),
        ("/buscar rust", EN.search_error),
    ];
    for (text, expected) in cases {
        let api: Arc<dyn MastodonApi> = Arc::new(PanickingApi);
        let reply = commands::dispatch(&invocation(text), api, &EN).await;
        assert_eq!(reply, expected, "reply for {text}");
    }
}

#[tokio::test]
async fn spanish_locale_uses_original_headers() {
    let api: Arc<dyn MastodonApi> = Arc::new(RecordingApi::with_timeline("Alice: hola"));
    let reply = commands::dispatch(&invocation("/toots"), api, &ES).await;
    assert_eq!(reply, "Últimos Toots:\n\nAlice: hola");
}
