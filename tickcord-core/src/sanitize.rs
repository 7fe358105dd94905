//! Outbound message sanitizer
//!
//! Console capture picks up raw terminal output, including legacy `§x`
//! formatting codes, OSC window-title sequences and stray bell characters.
//! None of those belong in a remote chat message.

use once_cell::sync::Lazy;
use regex::Regex;

/// Hard ceiling for a single outbound message. Sanitized results at or
/// above this length are dropped by the pump rather than split.
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Legacy `§x` color/format control codes.
static FORMAT_CODES: Lazy<Regex> = Lazy::new(|| Regex::new("§.").expect("valid regex"));

/// Terminal artifacts: OSC title sequences, bare BEL bytes and the
/// "Server thread/" logger prefix that leaks into captured output.
static TERMINAL_ARTIFACTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x1b\]0;[^\x07\x1b]*(?:\x07|\x1b\\)?|\x07|Server thread/")
        .expect("valid regex")
});

/// Strip control sequences and truncate to [`MAX_MESSAGE_LEN`] characters.
///
/// Total and side-effect free; an empty result means nothing to send.
pub fn sanitize(raw: &str) -> String {
    let truncated: String = raw.chars().take(MAX_MESSAGE_LEN).collect();
    let stripped = FORMAT_CODES.replace_all(&truncated, "");
    TERMINAL_ARTIFACTS.replace_all(&stripped, "").into_owned()
}
