//! Content fetching from URLs, files, and stdin.
//!
//! Remote pages are reached through the [`PageFetcher`] trait so the metadata
//! cache can be driven by a real HTTP client ([`HttpFetcher`]), by nothing at
//! all ([`OfflineFetcher`]), or by a stub in tests.

use std::fs;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::{LinkmarkError, Result};

/// Desktop browser user agent; several sites serve stripped pages to bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Public oEmbed endpoint for X/Twitter posts.
pub const DEFAULT_OEMBED_ENDPOINT: &str = "https://publish.twitter.com/oembed";

/// Per-fetch wait bound in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 6500;

/// HTTP client configuration for metadata lookups.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Bound on each page or oEmbed fetch, in milliseconds.
    pub timeout_ms: u64,
    /// User-Agent sent with every request.
    pub user_agent: String,
    /// oEmbed endpoint queried for X/Twitter URLs.
    pub oembed_endpoint: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            oembed_endpoint: DEFAULT_OEMBED_ENDPOINT.to_string(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Source of remote page bodies.
///
/// Implementations return the body of a successful response and an error for
/// anything else (network failure, non-2xx status). Timeouts are applied by the
/// caller, which drops the returned future when the bound is exceeded.
pub trait PageFetcher: Send + Sync + 'static {
    fn fetch_text(&self, url: &str, user_agent: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Fetches `url` with the configured user agent, giving up after
/// `config.timeout_ms`.
pub async fn fetch_with_timeout<F: PageFetcher>(fetcher: &F, url: &str, config: &FetchConfig) -> Result<String> {
    match tokio::time::timeout(config.timeout(), fetcher.fetch_text(url, &config.user_agent)).await {
        Ok(result) => result,
        Err(_) => Err(LinkmarkError::Timeout { timeout_ms: config.timeout_ms }),
    }
}

/// [`PageFetcher`] backed by a shared reqwest client.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

#[cfg(feature = "fetch")]
impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().build().map_err(LinkmarkError::HttpError)?;
        Ok(Self { client })
    }
}

#[cfg(feature = "fetch")]
impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str, user_agent: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,application/json;q=0.8,*/*;q=0.7",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LinkmarkError::HttpStatus { status: status.as_u16(), url: url.to_string() });
        }

        Ok(response.text().await?)
    }
}

/// [`PageFetcher`] that never touches the network.
///
/// Every lookup fails, so mentions fall back to derived titles and host labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFetcher;

impl PageFetcher for OfflineFetcher {
    async fn fetch_text(&self, url: &str, _user_agent: &str) -> Result<String> {
        Err(LinkmarkError::Offline(url.to_string()))
    }
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(LinkmarkError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(LinkmarkError::from)
    }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(LinkmarkError::from)?;

    Ok(buffer)
}
