use super::{ContentFetcher, RenderMode};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fixture-backed fetcher. Unknown (url, mode) pairs fail, so
/// [`StaticFetcher::offline`] makes every evaluation fall back to URL-only
/// analysis.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    pages: HashMap<(String, RenderMode), String>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, mode: RenderMode, body: impl Into<String>) -> Self {
        self.pages.insert((url.to_string(), mode), body.into());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentFetcher for StaticFetcher {
    async fn fetch(&self, url: &str, mode: RenderMode) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(&(url.to_string(), mode))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no fixture for {} ({})", url, mode))
    }
}
