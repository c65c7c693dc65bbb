//! URL-keyed metadata cache with at-most-once fetch semantics.
//!
//! The cache is constructed by the caller and handed to the
//! [`Transformer`](crate::Transformer); one instance is meant to live for one
//! build. The first request for a URL installs a cell and drives the fetch;
//! every other request for the same URL, concurrent or later, awaits that cell.
//! Failed fetches are cached too, so nothing is ever fetched twice.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::fetch::{FetchConfig, PageFetcher};
use crate::metadata::{MetadataRecord, fetch_metadata};

type Entry = Arc<OnceCell<Arc<MetadataRecord>>>;

/// Process-lifetime metadata cache.
///
/// Cloning is cheap and clones share entries.
pub struct MetadataCache<F> {
    fetcher: Arc<F>,
    config: Arc<FetchConfig>,
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl<F> Clone for MetadataCache<F> {
    fn clone(&self) -> Self {
        Self { fetcher: Arc::clone(&self.fetcher), config: Arc::clone(&self.config), entries: Arc::clone(&self.entries) }
    }
}

impl<F: PageFetcher> MetadataCache<F> {
    /// Create an empty cache
    pub fn new(fetcher: F, config: FetchConfig) -> Self {
        Self { fetcher: Arc::new(fetcher), config: Arc::new(config), entries: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Metadata for `url`, fetching it on first request.
    ///
    /// Keys are exact URL strings; no normalization is applied.
    pub async fn get(&self, url: &str) -> Arc<MetadataRecord> {
        let entry = {
            let mut entries = self.entries.lock();
            Arc::clone(entries.entry(url.to_string()).or_default())
        };

        let record = entry
            .get_or_init(|| async { Arc::new(fetch_metadata(self.fetcher.as_ref(), url, &self.config).await) })
            .await;
        Arc::clone(record)
    }

    /// Whether a fetch for `url` has been started.
    pub fn contains(&self, url: &str) -> bool {
        self.entries.lock().contains_key(url)
    }

    /// Number of URLs requested so far, resolved or in flight.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Resolved records, sorted by URL.
    pub fn records(&self) -> Vec<(String, Arc<MetadataRecord>)> {
        let entries = self.entries.lock();
        let mut records: Vec<_> = entries
            .iter()
            .filter_map(|(url, cell)| cell.get().map(|record| (url.clone(), Arc::clone(record))))
            .collect();
        records.sort_by(|a, b| a.0.cmp(&b.0));
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubFetcher;

    const URL: &str = "https://github.com/acme/widget";

    #[tokio::test]
    async fn test_repeated_get_fetches_once() {
        let fetcher = StubFetcher::new().page(URL, "<title>Widget</title>");
        let cache = MetadataCache::new(fetcher.clone(), FetchConfig::default());

        let first = cache.get(URL).await;
        let second = cache.get(URL).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.title.as_deref(), Some("Widget"));
        assert_eq!(fetcher.calls_to(URL), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_get_fetches_once() {
        let fetcher = StubFetcher::new().page(URL, "<title>Widget</title>");
        let cache = MetadataCache::new(fetcher.clone(), FetchConfig::default());

        let (a, b, c) = tokio::join!(cache.get(URL), cache.get(URL), cache.get(URL));

        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&b, &c));
        assert_eq!(fetcher.calls_to(URL), 1);
    }

    #[tokio::test]
    async fn test_failures_are_cached() {
        let fetcher = StubFetcher::new();
        let cache = MetadataCache::new(fetcher.clone(), FetchConfig::default());

        let first = cache.get(URL).await;
        let _ = cache.get(URL).await;

        assert_eq!(first.title, None);
        assert_eq!(first.derived_title.as_deref(), Some("GitHub — acme/widget"));
        assert_eq!(fetcher.calls_to(URL), 1);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let fetcher = StubFetcher::new();
        let cache = MetadataCache::new(fetcher.clone(), FetchConfig::default());
        let clone = cache.clone();

        cache.get(URL).await;
        clone.get(URL).await;

        assert!(clone.contains(URL));
        assert_eq!(fetcher.calls_to(URL), 1);
    }

    #[tokio::test]
    async fn test_records_sorted() {
        let cache = MetadataCache::new(StubFetcher::new(), FetchConfig::default());
        assert!(cache.is_empty());

        cache.get("https://b.example.com").await;
        cache.get("https://a.example.com").await;

        let urls: Vec<_> = cache.records().into_iter().map(|(url, _)| url).collect();
        assert_eq!(urls, vec!["https://a.example.com", "https://b.example.com"]);
    }
}
