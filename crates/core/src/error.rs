//! Error types for linkmark operations.
//!
//! The transform itself never fails: every fetch or parse problem degrades to a
//! fallback value. [`LinkmarkError`] is used at the seams that can fail on
//! their own, such as [`PageFetcher`](crate::fetch::PageFetcher)
//! implementations, configuration loading and file input.
//!
//! # Example
//!
//! ```rust
//! use linkmark_core::{LinkmarkError, Result};
//!
//! fn require_host(url: &str) -> Result<String> {
//!     let parsed = url::Url::parse(url).map_err(|e| LinkmarkError::InvalidUrl(e.to_string()))?;
//!     parsed.host_str().map(str::to_string).ok_or_else(|| LinkmarkError::InvalidUrl(url.to_string()))
//! }
//! # assert!(require_host("https://example.com").is_ok());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for linkmark operations.
#[derive(Error, Debug)]
pub enum LinkmarkError {
    /// HTTP request errors from reqwest.
    ///
    /// Wraps DNS failures, connection problems and body decoding errors.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The remote answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Request timeout.
    #[error("Request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// Network access is disabled for this run.
    #[error("Network access disabled, not fetching {0}")]
    Offline(String),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read/write errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors, from config files or oEmbed payloads.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors.
    ///
    /// Returned when a configuration file is present but holds invalid values.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for LinkmarkError.
pub type Result<T> = std::result::Result<T, LinkmarkError>;
