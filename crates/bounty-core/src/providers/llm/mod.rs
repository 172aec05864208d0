pub mod fake;
pub mod openai;
pub mod tracing;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use self::tracing::TracingClient;
pub use fake::FakeClient;
pub use openai::OpenAIClient;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
    pub meta: serde_json::Value,
}

/// The judgment oracle: a natural-language task in, a natural-language answer
/// out. Answers may differ between calls and between evaluators.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<LlmResponse>;

    fn provider_name(&self) -> &'static str;
}
