//! The document transform.
//!
//! [`Transformer`] ties the pieces together: one collection pass, synchronous
//! rewriting of algorithm and embed candidates, then concurrent metadata
//! resolution for mention candidates joined as a single barrier before any
//! anchor is touched.
//!
//! # Example
//!
//! ```rust
//! use linkmark_core::{MetadataCache, OfflineFetcher, TransformConfig, Transformer};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let config = TransformConfig::default();
//! let cache = MetadataCache::new(OfflineFetcher, config.fetch.clone());
//! let transformer = Transformer::new(cache, config);
//!
//! let html = transformer
//!     .transform_html(r#"<p>See <a href="https://github.com/acme/widget">github.com/acme/widget</a></p>"#)
//!     .await;
//! assert!(html.contains("GitHub — acme/widget"));
//! # }
//! ```

use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::cache::MetadataCache;
use crate::collect::{Candidates, LinkCandidate, collect_candidates};
use crate::config::TransformConfig;
use crate::fetch::PageFetcher;
use crate::metadata::MetadataRecord;
use crate::mutate::{apply_mention, render_algorithm, render_embed};
use crate::title::resolve_title;
use crate::tree::DocumentTree;

/// Number of nodes rewritten by one transform run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransformReport {
    pub mentions: usize,
    pub embeds: usize,
    pub algorithms: usize,
}

impl TransformReport {
    pub fn total(&self) -> usize {
        self.mentions + self.embeds + self.algorithms
    }
}

/// Runs the transform over document trees.
///
/// The cache is injected so several documents of one build share lookups.
/// Fetch settings come from the cache; `config` controls what is rewritten.
pub struct Transformer<F> {
    cache: MetadataCache<F>,
    config: TransformConfig,
}

impl<F: PageFetcher> Transformer<F> {
    pub fn new(cache: MetadataCache<F>, config: TransformConfig) -> Self {
        Self { cache, config }
    }

    /// Builds a fresh cache around `fetcher` using `config.fetch`.
    pub fn with_fetcher(fetcher: F, config: TransformConfig) -> Self {
        let cache = MetadataCache::new(fetcher, config.fetch.clone());
        Self::new(cache, config)
    }

    pub fn cache(&self) -> &MetadataCache<F> {
        &self.cache
    }

    /// Rewrites `tree` in place.
    ///
    /// Never fails: unreachable metadata falls back to URL-derived titles and
    /// a task that dies leaves its anchor untouched. Running twice over the
    /// same tree is a no-op the second time.
    pub async fn transform(&self, tree: &mut DocumentTree) -> TransformReport {
        let Candidates { mentions, embeds, algorithms } = collect_candidates(tree, &self.config);
        let mut report = TransformReport::default();

        for candidate in algorithms {
            if tree.replace(&candidate.path, render_algorithm(&candidate.block)) {
                report.algorithms += 1;
            }
        }

        for candidate in embeds {
            if tree.replace(&candidate.path, render_embed(&candidate.href)) {
                report.embeds += 1;
            }
        }

        let records = self.resolve_all(&mentions).await;

        for (candidate, record) in mentions.iter().zip(records) {
            let Some(record) = record else {
                continue;
            };
            let Some(anchor) = tree.node_at_mut(&candidate.path).and_then(|node| node.as_element_mut()) else {
                continue;
            };

            let title = resolve_title(&record, &candidate.href, &candidate.fallback_text);
            apply_mention(anchor, &record, &title);
            report.mentions += 1;
        }

        debug!(
            mentions = report.mentions,
            embeds = report.embeds,
            algorithms = report.algorithms,
            cached_urls = self.cache.len(),
            "transform complete"
        );

        report
    }

    /// Parses `html` (fragment or full document), transforms it and
    /// serializes the result.
    pub async fn transform_html(&self, html: &str) -> String {
        let mut tree = DocumentTree::parse(html);
        self.transform(&mut tree).await;
        tree.to_html()
    }

    /// Fetches every candidate's metadata concurrently and waits for all of
    /// them. Slot `i` holds the record for `candidates[i]`.
    async fn resolve_all(&self, candidates: &[LinkCandidate]) -> Vec<Option<Arc<MetadataRecord>>> {
        let mut records = vec![None; candidates.len()];
        if candidates.is_empty() {
            return records;
        }

        let mut tasks = JoinSet::new();
        for (index, candidate) in candidates.iter().enumerate() {
            let cache = self.cache.clone();
            let href = candidate.href.clone();
            tasks.spawn(async move {
                let record = cache.get(&href).await;
                (index, record)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, record)) => records[index] = Some(record),
                Err(e) => warn!(error = %e, "metadata task failed"),
            }
        }

        records
    }
}
