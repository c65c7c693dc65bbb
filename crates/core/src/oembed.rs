//! X/Twitter post previews via the public oEmbed endpoint.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

use crate::fetch::{FetchConfig, PageFetcher, fetch_with_timeout};
use crate::text::{decode_html, normalize_text, strip_tags, truncate_text};
use crate::{LinkmarkError, Result};

static PARAGRAPH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<p[^>]*>(.*?)</p>").unwrap());

/// Longest title built from a post excerpt, in characters.
pub const MAX_OEMBED_TITLE_CHARS: usize = 140;

/// The parts of an oEmbed response we read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OEmbedResponse {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub author_url: Option<String>,
}

/// Builds the endpoint URL for one post.
pub fn oembed_request_url(endpoint: &str, post_url: &str) -> Result<Url> {
    Url::parse_with_params(endpoint, &[("omit_script", "true"), ("dnt", "true"), ("url", post_url)])
        .map_err(|e| LinkmarkError::InvalidUrl(e.to_string()))
}

/// Queries the oEmbed endpoint and builds a title, or `None` on any failure.
pub async fn fetch_oembed_title<F: PageFetcher>(fetcher: &F, post_url: &str, config: &FetchConfig) -> Option<String> {
    let lookup = async {
        let request = oembed_request_url(&config.oembed_endpoint, post_url)?;
        let body = fetch_with_timeout(fetcher, request.as_str(), config).await?;
        let response: OEmbedResponse = serde_json::from_str(&body)?;
        Ok::<_, LinkmarkError>(response)
    };

    match lookup.await {
        Ok(response) => oembed_title(&response),
        Err(e) => {
            debug!(url = post_url, error = %e, "oEmbed lookup failed");
            None
        }
    }
}

/// Title for a post: `@handle — excerpt`, the bare excerpt, or
/// `X post by @handle`, in that order of preference.
pub fn oembed_title(response: &OEmbedResponse) -> Option<String> {
    let excerpt = response.html.as_deref().and_then(extract_post_text);
    let author = response.author_url.as_deref().and_then(author_handle).map(|handle| format!("@{}", handle));

    match (excerpt, author) {
        (Some(text), Some(author)) => Some(truncate_text(&format!("{} — {}", author, text), MAX_OEMBED_TITLE_CHARS)),
        (Some(text), None) => Some(truncate_text(&text, MAX_OEMBED_TITLE_CHARS)),
        (None, Some(author)) => Some(format!("X post by {}", author)),
        (None, None) => None,
    }
}

/// Plain text of the first paragraph in the embed markup.
pub fn extract_post_text(html: &str) -> Option<String> {
    let raw = PARAGRAPH_RE.captures(html).and_then(|caps| caps.get(1)).map(|m| m.as_str()).unwrap_or_default();
    let cleaned = normalize_text(&decode_html(&strip_tags(raw)));
    if cleaned.is_empty() { None } else { Some(cleaned) }
}

/// First path segment of the author URL.
pub fn author_handle(author_url: &str) -> Option<String> {
    let url = Url::parse(author_url).ok()?;
    url.path().split('/').find(|segment| !segment.is_empty()).map(str::to_string)
}
