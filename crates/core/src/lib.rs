//! Post-processing transform for rendered HTML documents.
//!
//! Bare links become link mentions enriched with fetched titles and icons,
//! pseudocode blocks become structured algorithms, and paragraphs holding a
//! single embeddable link become embed frames. See [`Transformer`].

pub mod attributes;
pub mod cache;
pub mod collect;
pub mod config;
pub mod error;
pub mod fetch;
pub mod metadata;
pub mod mutate;
pub mod oembed;
pub mod parse;
pub mod pseudocode;
pub mod text;
pub mod title;
pub mod transform;
pub mod tree;
pub mod urls;

#[cfg(test)]
mod test_support;

pub use cache::MetadataCache;
#[doc(hidden)]
pub use collect::{AlgorithmCandidate, Candidates, EmbedCandidate, LinkCandidate, collect_candidates};
pub use config::{TransformConfig, TransformConfigBuilder, default_config_path};
pub use error::{LinkmarkError, Result};
#[cfg(feature = "fetch")]
pub use fetch::HttpFetcher;
pub use fetch::{FetchConfig, OfflineFetcher, PageFetcher};
pub use fetch::{fetch_file, fetch_stdin};
pub use metadata::{MetadataRecord, derive_title, fetch_metadata, host_label};
pub use mutate::{apply_mention, render_algorithm, render_embed};
pub use pseudocode::{AlgorithmBlock, IoEntry, IoLabel, StepLine, parse_pseudocode};
pub use title::resolve_title;
pub use transform::{TransformReport, Transformer};
pub use tree::{AttrValue, Attributes, DocumentTree, Element, Node, NodePath, Text};
