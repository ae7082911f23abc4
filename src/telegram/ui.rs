//! Reply text helpers for Telegram messages.
//!
//! Replies are sent as plain text, so the only transformation needed is
//! keeping a reply within Telegram's message length limit.

/// Maximum message length accepted by the Bot API, in UTF-16 code units.
pub const TELEGRAM_MAX_MESSAGE_LEN: usize = 4096;

const ELLIPSIS: char = '…';

/// Truncate `text` so it fits in a single Telegram message.
///
/// Text within the limit is returned unchanged. Longer text is cut at a
/// character boundary and ends with an ellipsis.
pub fn truncate_reply(text: &str) -> String {
    if text.encode_utf16().count() <= TELEGRAM_MAX_MESSAGE_LEN {
        return text.to_owned();
    }

    let budget = TELEGRAM_MAX_MESSAGE_LEN.saturating_sub(ELLIPSIS.len_utf16());
    let mut used = 0_usize;
    let mut truncated = String::new();
    for ch in text.chars() {
        let next = used.saturating_add(ch.len_utf16());
        if next > budget {
            break;
        }
        used = next;
        truncated.push(ch);
    }
    truncated.push(ELLIPSIS);
    truncated
}
