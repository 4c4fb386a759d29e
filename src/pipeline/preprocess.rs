//! Preprocessing: normalise markdown list spacing before HTML conversion.
//!
//! CommonMark-strict converters only recognise a list when a blank line
//! precedes its first item. Documents written by hand (or emitted by chat
//! models) routinely run a list directly under a paragraph:
//!
//! ```text
//! Ingredients:
//! * flour
//! * water
//! ```
//!
//! Without intervention that renders as one paragraph with literal
//! asterisks. The fix is a textual lookbehind transform — insert a blank
//! line before any bullet or ordered-list marker whose previous line is
//! non-blank — not a markdown re-parse. Two regex substitutions cover both
//! marker families, and the transform is idempotent: input whose lists are
//! already separated passes through unchanged.

use once_cell::sync::Lazy;
use regex::Regex;

// Bullet markers: `*`, `+`, or `-` followed by a space, optionally indented.
static RE_BULLET_AFTER_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^\n])\n([ \t]*[*+-] )").unwrap());

// Ordered markers: digits followed by `. `, optionally indented.
static RE_ORDERED_AFTER_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^\n])\n([ \t]*\d+\. )").unwrap());

/// Insert a blank line before list items that directly follow a non-blank
/// line. Idempotent on already-well-separated input.
pub fn normalize_lists(text: &str) -> String {
    let text = RE_BULLET_AFTER_TEXT.replace_all(text, "$1\n\n$2");
    let text = RE_ORDERED_AFTER_TEXT.replace_all(&text, "$1\n\n$2");
    text.into_owned()
}
