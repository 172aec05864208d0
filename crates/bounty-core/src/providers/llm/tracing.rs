use super::{LlmClient, LlmResponse};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{info_span, Instrument};

/// Wraps an oracle so every request runs inside an `oracle.request` span.
///
/// Prompts are never recorded inline; the span carries a SHA-256 digest so
/// operators can check that independent evaluators built identical tasks.
pub struct TracingClient {
    inner: Arc<dyn LlmClient>,
}

impl TracingClient {
    pub fn new(inner: Arc<dyn LlmClient>) -> Self {
        Self { inner }
    }
}

pub fn prompt_digest(prompt: &str) -> String {
    hex::encode(Sha256::digest(prompt.as_bytes()))
}

#[async_trait]
impl LlmClient for TracingClient {
    async fn complete(&self, prompt: &str) -> anyhow::Result<LlmResponse> {
        let span = info_span!(
            "oracle.request",
            "oracle.provider" = self.inner.provider_name(),
            "oracle.prompt_sha256" = prompt_digest(prompt).as_str(),
            "oracle.model" = tracing::field::Empty,
            "oracle.answer_chars" = tracing::field::Empty,
            "oracle.latency_ms" = tracing::field::Empty,
            "error" = tracing::field::Empty,
            "error.message" = tracing::field::Empty
        );

        async move {
            let start = std::time::Instant::now();
            let result = self.inner.complete(prompt).await;

            let span = tracing::Span::current();
            span.record("oracle.latency_ms", start.elapsed().as_millis() as u64);
            match &result {
                Ok(resp) => {
                    span.record("oracle.model", resp.model.as_str());
                    span.record("oracle.answer_chars", resp.text.chars().count() as u64);
                }
                Err(e) => {
                    span.record("error", true);
                    span.record("error.message", e.to_string().as_str());
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}
