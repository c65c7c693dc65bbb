//! Link metadata: what a mention knows about its target URL.
//!
//! [`fetch_metadata`] always produces a complete [`MetadataRecord`]. Network
//! problems only null out the fetched fields (`title`, `icon`); the host label
//! and derived title are computed from the URL alone.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::{debug, warn};
use url::Url;

use crate::LinkmarkError;
use crate::attributes::{extract_link_tags, extract_meta_tags};
use crate::fetch::{FetchConfig, PageFetcher, fetch_with_timeout};
use crate::oembed::fetch_oembed_title;
use crate::text::decode_html;
use crate::urls::{TWITTER_HOSTS, bare_host, is_twitter_url, path_segments};

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<title[^>]*>([^<]*)</title>").unwrap());

/// Hosts under this suffix mostly serve papers; their links get a PDF title.
pub const ACADEMIC_HOST_SUFFIX: &str = ".edu";

/// Host label used when a URL cannot be parsed.
pub const FALLBACK_HOST_LABEL: &str = "EX";

/// Everything known about one URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetadataRecord {
    /// Page title from meta tags or `<title>`
    pub title: Option<String>,
    /// Absolute icon URL
    pub icon: Option<String>,
    /// Two-letter host badge, e.g. `GI` for github.com
    pub host_label: String,
    /// Title computed from URL structure
    pub derived_title: Option<String>,
    /// Title built from the X/Twitter oEmbed payload
    pub oembed_title: Option<String>,
}

impl MetadataRecord {
    /// Record for a URL whose page could not be fetched.
    pub fn unfetched(url: &str) -> Self {
        Self {
            title: None,
            icon: None,
            host_label: host_label(url),
            derived_title: derive_title(url),
            oembed_title: None,
        }
    }
}

/// Fetches and extracts metadata for `url`.
///
/// The page fetch and, for X/Twitter URLs, the oEmbed lookup run concurrently,
/// each bounded by `config.timeout_ms`. A lookup that exceeds the bound is
/// dropped, which cancels its request.
pub async fn fetch_metadata<F: PageFetcher>(fetcher: &F, url: &str, config: &FetchConfig) -> MetadataRecord {
    let page = async {
        match fetch_with_timeout(fetcher, url, config).await {
            Ok(html) => Some(html),
            Err(LinkmarkError::Timeout { timeout_ms }) => {
                warn!(url, timeout_ms, "metadata fetch timed out");
                None
            }
            Err(e) => {
                debug!(url, error = %e, "metadata fetch failed");
                None
            }
        }
    };

    let oembed = async {
        if is_twitter_url(url) { fetch_oembed_title(fetcher, url, config).await } else { None }
    };

    let (page, oembed_title) = tokio::join!(page, oembed);

    let mut record = MetadataRecord::unfetched(url);
    record.oembed_title = oembed_title;
    if let Some(html) = page {
        record.title = pick_title(&html);
        record.icon = pick_icon(&html, url);
        debug!(url, title = ?record.title, icon = ?record.icon, "metadata extracted");
    }
    record
}

/// Extract title with priority fallback:
/// 1. Open Graph `og:title`
/// 2. Twitter `twitter:title`
/// 3. Meta `title`
/// 4. `<title>` element
///
/// Meta tags are keyed by `property`, falling back to `name`.
pub fn pick_title(html: &str) -> Option<String> {
    let meta_tags = extract_meta_tags(html);

    for key in ["og:title", "twitter:title", "title"] {
        let found = meta_tags.iter().find(|tag| {
            let property = tag.get("property").or_else(|| tag.get("name"));
            property.is_some_and(|p| p.eq_ignore_ascii_case(key))
        });

        if let Some(content) = found.and_then(|tag| tag.get("content")) {
            let title = decode_html(content.trim()).trim().to_string();
            if !title.is_empty() {
                return Some(title);
            }
        }
    }

    let caps = TITLE_RE.captures(html)?;
    let title = decode_html(caps[1].trim()).trim().to_string();
    if title.is_empty() { None } else { Some(title) }
}

/// Extract icon with priority fallback:
/// 1. `rel` containing `apple-touch-icon`
/// 2. `rel` containing `icon`
/// 3. `rel` containing `shortcut icon`
///
/// The href is resolved against `base_url`; unresolvable hrefs pass through.
pub fn pick_icon(html: &str, base_url: &str) -> Option<String> {
    let link_tags = extract_link_tags(html);

    for rel in ["apple-touch-icon", "icon", "shortcut icon"] {
        let found = link_tags.iter().find(|tag| {
            let tag_rel = tag.get("rel").map(|r| r.split_whitespace().collect::<Vec<_>>().join(" "));
            tag_rel.is_some_and(|r| r.to_lowercase().contains(rel))
        });

        if let Some(href) = found.and_then(|tag| tag.get("href")).filter(|h| !h.is_empty()) {
            let resolved = Url::parse(base_url).and_then(|base| base.join(href));
            return Some(match resolved {
                Ok(absolute) => absolute.to_string(),
                Err(_) => href.clone(),
            });
        }
    }

    None
}

/// First two characters of the first host label, upper-cased.
///
/// `https://www.github.com/x` gives `GI`; anything unparsable gives `EX`.
pub fn host_label(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return FALLBACK_HOST_LABEL.to_string();
    };
    let label: String = bare_host(&parsed)
        .and_then(|host| host.split('.').next())
        .map(|first| first.chars().take(2).collect())
        .unwrap_or_default();

    if label.is_empty() { FALLBACK_HOST_LABEL.to_string() } else { label.to_uppercase() }
}

/// Title computed purely from URL structure.
///
/// | host              | path                | title                  |
/// |-------------------|---------------------|------------------------|
/// | x.com/twitter.com | `/<user>/...`       | `X post by @<user>`    |
/// | github.com        | `/<owner>/<repo>..` | `GitHub — owner/repo`  |
/// | dune.com          | `/queries/<id>`     | `Dune Query #<id>`     |
/// | dune.com          | `/embeds/<id>`      | `Dune Embed #<id>`     |
/// | `*.edu`           | `/.../paper.pdf`    | `Paper (PDF)`          |
pub fn derive_title(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = bare_host(&parsed)?;
    let segments = path_segments(&parsed);

    if TWITTER_HOSTS.contains(&host) {
        return Some(match segments.first() {
            Some(user) => format!("X post by @{}", user),
            None => "X post".to_string(),
        });
    }

    if host == "github.com" && segments.len() >= 2 {
        return Some(format!("GitHub — {}/{}", segments[0], segments[1]));
    }

    if host == "dune.com" {
        return match segments.as_slice() {
            ["queries", id, ..] => Some(format!("Dune Query #{}", id)),
            ["embeds", id, ..] => Some(format!("Dune Embed #{}", id)),
            _ => None,
        };
    }

    if host.ends_with(ACADEMIC_HOST_SUFFIX) {
        let last = segments.last()?;
        let stem = match last.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => last,
        };
        let title = title_case(&stem.replace(['-', '_', '+'], " "));
        if !title.is_empty() {
            return Some(format!("{} (PDF)", title));
        }
    }

    None
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
