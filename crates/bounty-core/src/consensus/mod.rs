//! Validation consensus protocol.
//!
//! Turns individually non-deterministic oracle judgments into one boolean
//! that every evaluator replicates:
//!
//! 1. deterministic platform pre-filter (no oracle call when it fails),
//! 2. two independent fetch-then-judge evaluations ("principal", "other"),
//! 3. a comparator judgment over the two raw answers, read with the
//!    permissive token match in [`strategy::verdict_indicates_valid`].
//!
//! Raw answers are never compared for equality; only the comparator's
//! outcome counts. Evaluators that deviate from the pre-filter, fetch tiers,
//! templates or verdict rule stop agreeing with the rest.

pub mod acquire;
pub mod evaluator;
pub mod prefilter;
pub mod prompt;
pub mod strategy;

use crate::providers::fetch::ContentFetcher;
use crate::providers::llm::LlmClient;
use async_trait::async_trait;
use evaluator::{EvaluationInput, Evaluator, EvaluatorRole, OracleEvaluator, Verdict};
use serde::Serialize;
use std::sync::Arc;
use strategy::{ComparativeStrategy, ConsensusStrategy};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ConsensusError {
    /// An oracle call failed; fetch failures never surface here.
    #[error("oracle unavailable during {stage} judgment: {detail}")]
    OracleUnavailable { stage: String, detail: String },
}

/// The capability the submission pipeline depends on.
#[async_trait]
pub trait ContentValidator: Send + Sync {
    async fn is_content_valid(
        &self,
        content_url: &str,
        platform_pattern: &str,
        required_topic: &str,
    ) -> Result<bool, ConsensusError>;
}

/// Everything the protocol saw while deciding one submission.
#[derive(Debug, Clone, Serialize)]
pub struct ConsensusReport {
    pub valid: bool,
    /// True when the platform pre-filter rejected the URL before any oracle call.
    pub prefiltered: bool,
    pub principal: Option<Verdict>,
    pub other: Option<Verdict>,
    pub comparison: Option<String>,
}

impl ConsensusReport {
    fn prefiltered() -> Self {
        Self {
            valid: false,
            prefiltered: true,
            principal: None,
            other: None,
            comparison: None,
        }
    }
}

pub struct ValidationConsensus {
    evaluator: Arc<dyn Evaluator>,
    strategy: Arc<dyn ConsensusStrategy>,
}

impl ValidationConsensus {
    /// Standard protocol: fetch-then-judge evaluations reconciled by an
    /// oracle comparison.
    pub fn new(fetcher: Arc<dyn ContentFetcher>, oracle: Arc<dyn LlmClient>) -> Self {
        Self {
            evaluator: Arc::new(OracleEvaluator::new(fetcher, oracle.clone())),
            strategy: Arc::new(ComparativeStrategy::new(oracle)),
        }
    }

    pub fn with_parts(evaluator: Arc<dyn Evaluator>, strategy: Arc<dyn ConsensusStrategy>) -> Self {
        Self {
            evaluator,
            strategy,
        }
    }

    pub async fn assess(&self, input: &EvaluationInput) -> Result<ConsensusReport, ConsensusError> {
        if !prefilter::passes(&input.content_url, &input.platform_pattern) {
            info!(
                url = %input.content_url,
                pattern = %input.platform_pattern,
                "url rejected by platform pre-filter"
            );
            return Ok(ConsensusReport::prefiltered());
        }

        let principal = self
            .evaluator
            .judge(EvaluatorRole::Principal, input)
            .await?;
        let other = self.evaluator.judge(EvaluatorRole::Other, input).await?;
        let agreement = self.strategy.reconcile(&principal, &other).await?;

        info!(
            url = %input.content_url,
            principal = %principal.answer.trim(),
            other = %other.answer.trim(),
            comparison = %agreement.verdict.trim(),
            valid = agreement.agreed,
            "consensus reached"
        );

        Ok(ConsensusReport {
            valid: agreement.agreed,
            prefiltered: false,
            principal: Some(principal),
            other: Some(other),
            comparison: Some(agreement.verdict),
        })
    }
}

#[async_trait]
impl ContentValidator for ValidationConsensus {
    async fn is_content_valid(
        &self,
        content_url: &str,
        platform_pattern: &str,
        required_topic: &str,
    ) -> Result<bool, ConsensusError> {
        let input = EvaluationInput {
            content_url: content_url.to_string(),
            platform_pattern: platform_pattern.to_string(),
            required_topic: required_topic.to_string(),
        };
        Ok(self.assess(&input).await?.valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::acquire::ContentSource;
    use crate::consensus::strategy::{verdict_indicates_valid, Agreement};
    use crate::model::{Address, Contest, NewContest, SubmissionStatus};
    use crate::pipeline::SubmissionPipeline;
    use crate::providers::fetch::StaticFetcher;
    use crate::providers::llm::FakeClient;
    use crate::storage::{ContestStore, MemoryStore};

    fn consensus(oracle: Arc<FakeClient>) -> ValidationConsensus {
        ValidationConsensus::new(Arc::new(StaticFetcher::offline()), oracle)
    }

    #[tokio::test]
    async fn prefilter_skips_the_oracle() {
        let oracle = Arc::new(FakeClient::new("fake"));
        let valid = consensus(oracle.clone())
            .is_content_valid("https://mastodon.social/@a/1", "twitter.com", "rust")
            .await
            .unwrap();
        assert!(!valid);
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn three_oracle_calls_and_comparator_decides() {
        let oracle =
            Arc::new(FakeClient::new("fake").with_script(["YES", "Yes", "YES, they agree"]));
        let report = consensus(oracle.clone())
            .assess(&EvaluationInput {
                content_url: "https://TWITTER.com/a/status/1".into(),
                platform_pattern: "twitter.com".into(),
                required_topic: "rust".into(),
            })
            .await
            .unwrap();

        assert!(report.valid);
        assert!(!report.prefiltered);
        assert_eq!(oracle.call_count(), 3);
        let prompts = oracle.prompts();
        assert_eq!(prompts[0], prompts[1]);
        assert!(prompts[2].contains("Validator 1 said: YES"));
        assert!(prompts[2].contains("Validator 2 said: Yes"));
    }

    #[tokio::test]
    async fn comparator_no_means_invalid() {
        let oracle = Arc::new(FakeClient::new("fake").with_script(["YES", "NO", "NO"]));
        let valid = consensus(oracle)
            .is_content_valid("https://x.test/rust", "*", "rust")
            .await
            .unwrap();
        assert!(!valid);
    }

    #[tokio::test]
    async fn oracle_failure_propagates() {
        let oracle = Arc::new(FakeClient::new("fake").failing("quota exceeded"));
        let err = consensus(oracle)
            .is_content_valid("https://x.test/rust", "*", "rust")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("principal"));
        assert!(err.to_string().contains("quota exceeded"));
    }

    /// Answers from a fixed table; no fetch, no oracle.
    struct TableEvaluator {
        principal: &'static str,
        other: &'static str,
    }

    #[async_trait]
    impl Evaluator for TableEvaluator {
        async fn judge(
            &self,
            role: EvaluatorRole,
            _input: &EvaluationInput,
        ) -> Result<Verdict, ConsensusError> {
            let answer = match role {
                EvaluatorRole::Principal => self.principal,
                EvaluatorRole::Other => self.other,
            };
            Ok(Verdict {
                answer: answer.to_string(),
                source: ContentSource::UrlOnly,
                task_sha256: String::new(),
            })
        }
    }

    /// Valid only when both raw answers read as positive on their own.
    struct BothPositive;

    #[async_trait]
    impl ConsensusStrategy for BothPositive {
        async fn reconcile(
            &self,
            principal: &Verdict,
            other: &Verdict,
        ) -> Result<Agreement, ConsensusError> {
            let agreed = verdict_indicates_valid(&principal.answer)
                && verdict_indicates_valid(&other.answer);
            Ok(Agreement {
                verdict: format!("{} / {}", principal.answer, other.answer),
                agreed,
            })
        }
    }

    fn table_consensus(principal: &'static str, other: &'static str) -> ValidationConsensus {
        ValidationConsensus::with_parts(
            Arc::new(TableEvaluator { principal, other }),
            Arc::new(BothPositive),
        )
    }

    #[tokio::test]
    async fn swapped_strategy_decides_without_an_oracle() {
        let input = EvaluationInput {
            content_url: "https://x.test/rust".into(),
            platform_pattern: "*".into(),
            required_topic: "rust".into(),
        };

        let consensus = table_consensus("YES", "Yes");
        let report = consensus.assess(&input).await.unwrap();
        assert!(report.valid);
        assert_eq!(report.comparison.as_deref(), Some("YES / Yes"));

        // Two rejections agree with each other, but this rule wants two accepts.
        let consensus = table_consensus("NO", "NO");
        let report = consensus.assess(&input).await.unwrap();
        assert!(!report.valid);

        // The platform pre-filter still runs ahead of any evaluator.
        let valid = table_consensus("YES", "YES")
            .is_content_valid("https://mastodon.social/@a", "twitter.com", "rust")
            .await
            .unwrap();
        assert!(!valid);
    }

    #[tokio::test]
    async fn pipeline_accepts_a_swapped_strategy_unchanged() {
        let store = Arc::new(MemoryStore::new());
        let contest = Contest::open(
            Address::new("0xcreator"),
            NewContest {
                platform_pattern: "*".into(),
                required_topic: "rust".into(),
                reward_description: String::new(),
                max_winners: 2,
                deadline: 0,
            },
        );
        let id = store.insert_contest(contest).unwrap();
        let validator = Arc::new(table_consensus("YES", "no"));
        let pipeline = SubmissionPipeline::new(store, validator);

        let out = pipeline
            .submit_content(id, &Address::new("0xa"), "https://x.test/rust", 0)
            .await
            .unwrap();
        assert_eq!(out.status, SubmissionStatus::Rejected);
    }
}
