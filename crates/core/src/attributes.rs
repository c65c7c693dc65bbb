//! Tolerant attribute extraction from raw `<meta>` and `<link>` tags.
//!
//! Remote pages are never parsed into a tree: the metadata fetcher only needs a
//! handful of head tags, and pattern matching over the raw markup keeps that
//! path cheap and forgiving of broken documents.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([\w:-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());
static META_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<meta\s+[^>]*>").unwrap());
static LINK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<link\s+[^>]*>").unwrap());

/// Attribute name (lower-cased) to value.
pub type TagAttributes = HashMap<String, String>;

/// Parses the quoted attributes of a single tag fragment.
///
/// Unquoted and malformed attributes are ignored; a later duplicate wins.
///
/// ```rust
/// use linkmark_core::attributes::parse_attributes;
///
/// let attrs = parse_attributes(r#"<meta property='og:title' Content="Hello">"#);
/// assert_eq!(attrs.get("property").map(String::as_str), Some("og:title"));
/// assert_eq!(attrs.get("content").map(String::as_str), Some("Hello"));
/// ```
pub fn parse_attributes(tag: &str) -> TagAttributes {
    ATTR_RE
        .captures_iter(tag)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_lowercase();
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str().to_string();
            Some((name, value))
        })
        .collect()
}

/// Attribute maps of every `<meta>` tag in the markup, in document order.
pub fn extract_meta_tags(html: &str) -> Vec<TagAttributes> {
    META_TAG_RE.find_iter(html).map(|m| parse_attributes(m.as_str())).collect()
}

/// Attribute maps of every `<link>` tag in the markup, in document order.
pub fn extract_link_tags(html: &str) -> Vec<TagAttributes> {
    LINK_TAG_RE.find_iter(html).map(|m| parse_attributes(m.as_str())).collect()
}
