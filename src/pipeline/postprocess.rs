//! Post-processing: deterministic normalisation of service replies.
//!
//! Even well-prompted models occasionally wrap plain text in code fences,
//! answer with `\r\n` line endings, or leave zero-width characters behind.
//! These rules fix such quirks without touching content, and run before a
//! reply is validated so that, for example, a reply consisting only of an
//! empty fence counts as empty.
//!
//! ## Rule Order
//!
//! Fences are stripped first so the inner text is what the remaining rules
//! see; line endings are normalised before anything works line-by-line.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all normalisation rules to a raw reply.
///
/// Rules (applied in order):
/// 1. Strip an outer code fence (models sometimes disobey the prompt)
/// 2. Normalise line endings (CRLF → LF)
/// 3. Trim trailing whitespace per line
/// 4. Collapse 3+ consecutive blank lines down to 1
/// 5. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens, etc.)
/// 6. Trim trailing whitespace at the end of the reply
pub fn tidy_reply(input: &str) -> String {
    let s = strip_outer_fence(input);
    let s = normalise_line_endings(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    let s = remove_invisible_chars(&s);
    s.trim_end().to_string()
}

// ── Rule 1: Strip outer code fence ───────────────────────────────────────────

static RE_OUTER_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```(?:text|txt|plaintext|markdown|md)?\r?\n(.*?)\r?\n?```\s*$").unwrap()
});

fn strip_outer_fence(input: &str) -> String {
    if let Some(caps) = RE_OUTER_FENCE.captures(input.trim()) {
        caps[1].to_string()
    } else {
        input.to_string()
    }
}

// ── Rule 2: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 3: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 4: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").to_string()
}

// ── Rule 5: Remove invisible Unicode characters ─────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}
