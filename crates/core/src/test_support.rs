//! In-memory [`PageFetcher`] for unit tests.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::fetch::PageFetcher;
use crate::{LinkmarkError, Result};

/// Serves canned bodies, hangs forever on selected URLs and answers 404 for
/// everything else. Clones share the call log.
#[derive(Debug, Clone, Default)]
pub struct StubFetcher {
    pages: HashMap<String, String>,
    hanging: HashSet<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    pub fn hang(mut self, url: &str) -> Self {
        self.hanging.insert(url.to_string());
        self
    }

    /// Every URL requested so far, in request order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().iter().filter(|called| called.as_str() == url).count()
    }
}

impl PageFetcher for StubFetcher {
    async fn fetch_text(&self, url: &str, _user_agent: &str) -> Result<String> {
        self.calls.lock().push(url.to_string());
        tokio::task::yield_now().await;

        if self.hanging.contains(url) {
            std::future::pending::<()>().await;
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| LinkmarkError::HttpStatus { status: 404, url: url.to_string() })
    }
}
