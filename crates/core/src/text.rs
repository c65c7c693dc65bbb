//! Small text utilities shared by the metadata and oEmbed extractors.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").unwrap());
static BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|</p>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static NBSP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)&nbsp;").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

fn named_entity(name: &str) -> Option<&'static str> {
    let decoded = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{a0}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "hellip" => "\u{2026}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "middot" => "\u{b7}",
        "bull" => "\u{2022}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        "trade" => "\u{2122}",
        _ => return None,
    };
    Some(decoded)
}

/// Decodes HTML character references in a single pass.
///
/// Unknown named references are left untouched, so `&amp;lt;` decodes to
/// `&lt;` rather than `<`.
pub fn decode_html(value: &str) -> String {
    ENTITY_RE
        .replace_all(value, |caps: &Captures| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32).map(String::from)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32).map(String::from)
            } else {
                named_entity(body).map(str::to_string)
            };
            decoded.unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Replaces tags with spaces; line breaks and paragraph ends become spaces too.
pub fn strip_tags(value: &str) -> String {
    let spaced = BREAK_RE.replace_all(value, " ");
    TAG_RE.replace_all(&spaced, " ").into_owned()
}

/// Collapses whitespace runs (including literal `&nbsp;`) and trims.
pub fn normalize_text(value: &str) -> String {
    let spaced = NBSP_RE.replace_all(value, " ");
    WHITESPACE_RE.replace_all(&spaced, " ").trim().to_string()
}

/// Truncates to at most `max` characters, cutting at a word boundary where one
/// exists and appending `...`.
pub fn truncate_text(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }

    let keep = max.saturating_sub(3);
    let head: String = value.chars().take(keep).collect();
    let next_is_break = value.chars().nth(keep).is_some_and(char::is_whitespace);

    let cut = if next_is_break {
        head.as_str()
    } else {
        match head.rfind(char::is_whitespace) {
            Some(index) if index > 0 => &head[..index],
            _ => head.as_str(),
        }
    };

    format!("{}...", cut.trim_end())
}
