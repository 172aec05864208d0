use super::acquire::{self, ContentSource};
use super::{prompt, ConsensusError};
use crate::providers::fetch::ContentFetcher;
use crate::providers::llm::tracing::prompt_digest;
use crate::providers::llm::LlmClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// What a single evaluator is asked to judge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationInput {
    pub content_url: String,
    pub platform_pattern: String,
    pub required_topic: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluatorRole {
    Principal,
    Other,
}

impl fmt::Display for EvaluatorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Principal => f.write_str("principal"),
            Self::Other => f.write_str("other"),
        }
    }
}

/// One evaluator's raw answer and how it was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub answer: String,
    pub source: ContentSource,
    /// SHA-256 of the judgment task sent to the oracle.
    pub task_sha256: String,
}

#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn judge(
        &self,
        role: EvaluatorRole,
        input: &EvaluationInput,
    ) -> Result<Verdict, ConsensusError>;
}

/// Fetch-then-judge evaluator. Holds no cache, so the principal and the
/// other run see independent fetches and oracle calls.
pub struct OracleEvaluator {
    fetcher: Arc<dyn ContentFetcher>,
    oracle: Arc<dyn LlmClient>,
}

impl OracleEvaluator {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, oracle: Arc<dyn LlmClient>) -> Self {
        Self { fetcher, oracle }
    }
}

#[async_trait]
impl Evaluator for OracleEvaluator {
    async fn judge(
        &self,
        role: EvaluatorRole,
        input: &EvaluationInput,
    ) -> Result<Verdict, ConsensusError> {
        let material = acquire::acquire(self.fetcher.as_ref(), &input.content_url).await;
        let task = prompt::judgment_task(&material, &input.required_topic, &input.content_url);
        let task_sha256 = prompt_digest(&task);

        debug!(
            %role,
            url = %input.content_url,
            source = material.source.label(),
            task_sha256 = %task_sha256,
            "judging content"
        );

        let resp = self
            .oracle
            .complete(&task)
            .await
            .map_err(|e| ConsensusError::OracleUnavailable {
                stage: role.to_string(),
                detail: format!("{:#}", e),
            })?;

        Ok(Verdict {
            answer: resp.text,
            source: material.source,
            task_sha256,
        })
    }
}
