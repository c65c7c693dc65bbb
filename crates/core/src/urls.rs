//! URL classification helpers.
//!
//! All functions here are pure and tolerate malformed input by returning a
//! conservative answer.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^https?://").unwrap());

/// Hosts treated as X/Twitter posts.
pub const TWITTER_HOSTS: &[&str] = &["x.com", "twitter.com"];

/// Whether the href is an absolute http(s) URL with a host.
pub fn is_external_link(href: &str) -> bool {
    SCHEME_RE.is_match(href) && Url::parse(href).is_ok_and(|url| url.host_str().is_some_and(|host| !host.is_empty()))
}

/// Removes a leading `http://` or `https://`.
pub fn strip_scheme(href: &str) -> &str {
    match SCHEME_RE.find(href) {
        Some(found) => &href[found.end()..],
        None => href,
    }
}

/// Host with a leading `www.` removed.
pub fn bare_host(url: &Url) -> Option<&str> {
    let host = url.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host))
}

/// Parses `href` and returns its host with `www.` stripped.
pub fn bare_host_of(href: &str) -> Option<String> {
    let url = Url::parse(href).ok()?;
    bare_host(&url).map(str::to_string)
}

pub fn is_twitter_url(href: &str) -> bool {
    bare_host_of(href).is_some_and(|host| TWITTER_HOSTS.contains(&host.as_str()))
}

/// Non-empty path segments of a URL.
pub fn path_segments(url: &Url) -> Vec<&str> {
    url.path().split('/').filter(|segment| !segment.is_empty()).collect()
}

/// `host + path + query + fragment`, the way a browser displays a URL without
/// its scheme.
pub fn display_url(url: &Url) -> String {
    let mut display = String::new();
    display.push_str(url.host_str().unwrap_or_default());
    display.push_str(url.path());
    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        display.push('?');
        display.push_str(query);
    }
    if let Some(fragment) = url.fragment().filter(|f| !f.is_empty()) {
        display.push('#');
        display.push_str(fragment);
    }
    display
}

/// Whether anchor text is a "bare" rendition of its own href.
///
/// Bare text equals the href, the href without scheme, the
/// `host + path + query + fragment` display form, or just the host.
pub fn is_bare_link_text(text: &str, href: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }

    let href = href.trim();
    if text == href || text == strip_scheme(href) {
        return true;
    }

    match Url::parse(href) {
        Ok(url) => text == display_url(&url) || Some(text) == url.host_str(),
        Err(_) => false,
    }
}

/// Whether an absolute href points at embeddable content: a path containing
/// `/embed` (which covers `/embeds/`) or an `embed` query parameter.
pub fn is_embeddable(href: &str) -> bool {
    if !is_external_link(href) {
        return false;
    }
    match Url::parse(href) {
        Ok(url) => url.path().contains("/embed") || url.query_pairs().any(|(key, _)| key == "embed"),
        Err(_) => false,
    }
}
