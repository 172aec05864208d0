pub mod fake;
pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use fake::StaticFetcher;
pub use http::HttpFetcher;

/// How a page is rendered before it is handed to the judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Readable text with markup removed.
    Text,
    /// Raw document, useful when the body is script-rendered but the head
    /// still carries title and meta tags.
    Html,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Html => f.write_str("html"),
        }
    }
}

/// Best-effort content retrieval. Callers treat every error as "no material".
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str, mode: RenderMode) -> anyhow::Result<String>;
}
