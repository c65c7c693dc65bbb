//! Transform configuration.
//!
//! [`TransformConfig`] can be built in code through its builder or loaded from
//! a JSON file. Missing keys take their defaults.
//!
//! # Example
//!
//! ```rust
//! use linkmark_core::TransformConfig;
//!
//! let config = TransformConfig::builder()
//!     .timeout_ms(3000)
//!     .embeds(false)
//!     .pseudocode_language("pcode")
//!     .build();
//! assert_eq!(config.fetch.timeout_ms, 3000);
//! assert!(!config.embeds);
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::fetch::FetchConfig;
use crate::{LinkmarkError, Result};

/// Languages whose code blocks are always treated as pseudocode.
pub const DEFAULT_PSEUDOCODE_LANGUAGES: &[&str] = &["pseudocode", "pseudo", "algorithm", "algo"];

/// Languages whose code blocks are pseudocode only when their content looks like it.
pub const PLAIN_TEXT_LANGUAGES: &[&str] = &["plaintext", "text"];

/// Configuration for one transform run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Metadata fetch settings.
    pub fetch: FetchConfig,

    /// Code-block languages recognized as pseudocode, lower-case.
    pub pseudocode_languages: Vec<String>,

    /// Enrich bare links (default: true).
    pub mentions: bool,

    /// Convert single-link paragraphs to embed frames (default: true).
    pub embeds: bool,

    /// Render pseudocode blocks as algorithms (default: true).
    pub algorithms: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            pseudocode_languages: DEFAULT_PSEUDOCODE_LANGUAGES.iter().map(|l| l.to_string()).collect(),
            mentions: true,
            embeds: true,
            algorithms: true,
        }
    }
}

impl TransformConfig {
    /// Creates a new builder for TransformConfig.
    pub fn builder() -> TransformConfigBuilder {
        TransformConfigBuilder::new()
    }

    /// Loads configuration from a JSON file and validates it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LinkmarkError::FileNotFound(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parses configuration from a JSON string and validates it.
    pub fn from_json(raw: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(raw)?;
        config.pseudocode_languages = config.pseudocode_languages.iter().map(|l| l.to_lowercase()).collect();
        config.validate()?;
        Ok(config)
    }

    /// Loads the user's config file when one exists, else the defaults.
    pub fn load_default() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.fetch.timeout_ms == 0 {
            return Err(LinkmarkError::ConfigError("fetch.timeout_ms must be greater than zero".to_string()));
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(LinkmarkError::ConfigError("fetch.user_agent must not be empty".to_string()));
        }
        if url::Url::parse(&self.fetch.oembed_endpoint).is_err() {
            return Err(LinkmarkError::ConfigError(format!(
                "fetch.oembed_endpoint is not a valid URL: {}",
                self.fetch.oembed_endpoint
            )));
        }
        Ok(())
    }

    /// Whether a declared code-block language is always pseudocode.
    pub fn is_pseudocode_language(&self, language: &str) -> bool {
        self.pseudocode_languages.iter().any(|l| l.eq_ignore_ascii_case(language))
    }
}

/// `<config dir>/linkmark/config.json`, e.g. `~/.config/linkmark/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("linkmark").join("config.json"))
}

/// Builder for TransformConfig.
pub struct TransformConfigBuilder {
    config: TransformConfig,
}

impl TransformConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: TransformConfig::default() }
    }

    /// Starts from an existing configuration, e.g. one loaded from a file.
    pub fn from_config(config: TransformConfig) -> Self {
        Self { config }
    }

    pub fn timeout_ms(mut self, value: u64) -> Self {
        self.config.fetch.timeout_ms = value;
        self
    }

    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    pub fn oembed_endpoint(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.oembed_endpoint = value.into();
        self
    }

    /// Adds a language to the pseudocode set.
    pub fn pseudocode_language(mut self, value: &str) -> Self {
        let value = value.to_lowercase();
        if !self.config.pseudocode_languages.contains(&value) {
            self.config.pseudocode_languages.push(value);
        }
        self
    }

    pub fn mentions(mut self, value: bool) -> Self {
        self.config.mentions = value;
        self
    }

    pub fn embeds(mut self, value: bool) -> Self {
        self.config.embeds = value;
        self
    }

    pub fn algorithms(mut self, value: bool) -> Self {
        self.config.algorithms = value;
        self
    }

    pub fn build(self) -> TransformConfig {
        self.config
    }
}

impl Default for TransformConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
