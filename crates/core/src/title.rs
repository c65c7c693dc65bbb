//! Final display title for a mention.
//!
//! Live machine-readable titles outrank URL-derived guesses, which outrank
//! the author's own link text. X/Twitter pages serve generic titles to
//! crawlers, so there the oEmbed and derived titles come first.

use crate::metadata::{MetadataRecord, derive_title};
use crate::urls::{is_external_link, is_twitter_url, strip_scheme};

/// Last-resort title for X/Twitter links.
pub const TWITTER_FALLBACK_TITLE: &str = "X post";

/// Whether a fetched title is really just a URL.
pub fn looks_like_url_title(title: &str) -> bool {
    is_external_link(title) || title.contains("x.com/") || title.contains("twitter.com/")
}

/// Whether a title is the placeholder X/Twitter serves without JavaScript.
pub fn is_generic_twitter_title(title: &str) -> bool {
    let normalized = title.trim().to_lowercase();
    normalized == "x" || normalized == "twitter"
}

/// The fetched title when it is usable as a display title.
pub fn usable_meta_title<'a>(record: &'a MetadataRecord, href: &str) -> Option<&'a str> {
    let title = record.title.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
    if looks_like_url_title(title) {
        return None;
    }
    if is_twitter_url(href) && is_generic_twitter_title(title) {
        return None;
    }
    Some(title)
}

/// Resolves the display title through the fallback chain.
///
/// X/Twitter: oEmbed → derived → meta → `"X post"`.
/// Others: meta → oEmbed → derived → link text → href without scheme.
pub fn resolve_title(record: &MetadataRecord, href: &str, fallback_text: &str) -> String {
    let meta = usable_meta_title(record, href).map(str::to_string);
    let oembed = record.oembed_title.clone().filter(|t| !t.is_empty());
    let derived = record.derived_title.clone().or_else(|| derive_title(href));

    if is_twitter_url(href) {
        return oembed.or(derived).or(meta).unwrap_or_else(|| TWITTER_FALLBACK_TITLE.to_string());
    }

    let fallback = Some(fallback_text.trim()).filter(|t| !t.is_empty()).map(str::to_string);
    meta.or(oembed).or(derived).or(fallback).unwrap_or_else(|| strip_scheme(href).to_string())
}
