//! Three-tier content acquisition.
//!
//! Tiers run in order and stop at the first one that yields enough material:
//! rendered text, then raw HTML, then the bare URL. Fetch failures are never
//! surfaced; they count as "not enough material".

use crate::providers::fetch::{ContentFetcher, RenderMode};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Trimmed text must be longer than this to be used.
pub const TEXT_MIN_CHARS: usize = 50;
/// Trimmed HTML must be longer than this to be used.
pub const HTML_MIN_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    Text,
    HtmlMetadata,
    UrlOnly,
}

impl ContentSource {
    /// Data-source label as written into the judgment task.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "text content",
            Self::HtmlMetadata => "HTML metadata",
            Self::UrlOnly => "URL analysis only",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    pub source: ContentSource,
    pub body: String,
}

pub async fn acquire(fetcher: &dyn ContentFetcher, url: &str) -> Material {
    if let Some(body) = fetch_sufficient(fetcher, url, RenderMode::Text, TEXT_MIN_CHARS).await {
        return Material {
            source: ContentSource::Text,
            body,
        };
    }
    if let Some(body) = fetch_sufficient(fetcher, url, RenderMode::Html, HTML_MIN_CHARS).await {
        return Material {
            source: ContentSource::HtmlMetadata,
            body,
        };
    }
    Material {
        source: ContentSource::UrlOnly,
        body: format!("URL to analyze: {}", url),
    }
}

async fn fetch_sufficient(
    fetcher: &dyn ContentFetcher,
    url: &str,
    mode: RenderMode,
    min_chars: usize,
) -> Option<String> {
    match fetcher.fetch(url, mode).await {
        Ok(body) => {
            let chars = body.trim().chars().count();
            if chars > min_chars {
                Some(body)
            } else {
                debug!(url, %mode, chars, min_chars, "fetched content too short");
                None
            }
        }
        Err(e) => {
            debug!(url, %mode, error = %e, "fetch failed, falling back");
            None
        }
    }
}
