use super::{ContentFetcher, RenderMode};
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("bounty/", env!("CARGO_PKG_VERSION"));

/// Plain HTTP GET fetcher. Text mode strips markup locally; there is no
/// headless rendering, so script-built pages mostly fall through to the HTML
/// or URL-only tiers.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, mode: RenderMode) -> anyhow::Result<String> {
        let parsed = url::Url::parse(url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("unsupported scheme '{}' in {}", parsed.scheme(), url);
        }
        crate::providers::network::check_outbound(url)?;

        let resp = self.client.get(parsed).send().await?;
        if !resp.status().is_success() {
            anyhow::bail!("fetch {} failed with status {}", url, resp.status());
        }
        let body = resp.text().await?;

        Ok(match mode {
            RenderMode::Html => body,
            RenderMode::Text => html_to_text(&body),
        })
    }
}

/// Comments and elements whose bodies are never visible text.
const HIDDEN_BLOCKS: &str = concat!(
    r"(?is)<!--.*?-->",
    r"|<(script|style|noscript|template)\b[^>]*>.*?</(script|style|noscript|template)\s*>",
);

fn block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(HIDDEN_BLOCKS).expect("static pattern"))
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("static pattern"))
}

fn space_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static pattern"))
}

/// Reduce an HTML document to its visible text.
pub fn html_to_text(html: &str) -> String {
    let without_blocks = block_re().replace_all(html, " ");
    let without_tags = tag_re().replace_all(&without_blocks, " ");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    space_re().replace_all(&decoded, " ").trim().to_string()
}
