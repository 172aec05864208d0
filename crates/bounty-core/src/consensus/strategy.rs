use super::evaluator::Verdict;
use super::{prompt, ConsensusError};
use crate::providers::llm::LlmClient;
use async_trait::async_trait;
use std::sync::Arc;

/// Tokens that mark a verdict as positive when found anywhere in it.
pub const POSITIVE_TOKENS: [&str; 3] = ["yes", "valid", "accept"];

/// Permissive reading of a free-text verdict: lower-cased, trimmed, and true
/// if any positive token occurs as a substring. "invalid" therefore reads as
/// positive.
pub fn verdict_indicates_valid(text: &str) -> bool {
    let lowered = text.trim().to_lowercase();
    POSITIVE_TOKENS.iter().any(|t| lowered.contains(t))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agreement {
    /// Raw text of whatever settled the agreement.
    pub verdict: String,
    pub agreed: bool,
}

/// Reconciles two independent verdicts into one agreed boolean.
#[async_trait]
pub trait ConsensusStrategy: Send + Sync {
    async fn reconcile(
        &self,
        principal: &Verdict,
        other: &Verdict,
    ) -> Result<Agreement, ConsensusError>;
}

/// Asks the oracle whether the two answers reach the same conclusion; the
/// comparator's verdict is the only ground truth.
pub struct ComparativeStrategy {
    oracle: Arc<dyn LlmClient>,
}

impl ComparativeStrategy {
    pub fn new(oracle: Arc<dyn LlmClient>) -> Self {
        Self { oracle }
    }
}

#[async_trait]
impl ConsensusStrategy for ComparativeStrategy {
    async fn reconcile(
        &self,
        principal: &Verdict,
        other: &Verdict,
    ) -> Result<Agreement, ConsensusError> {
        let task = prompt::comparison_task(&principal.answer, &other.answer);
        let resp = self
            .oracle
            .complete(&task)
            .await
            .map_err(|e| ConsensusError::OracleUnavailable {
                stage: "comparison".to_string(),
                detail: format!("{:#}", e),
            })?;

        let agreed = verdict_indicates_valid(&resp.text);
        Ok(Agreement {
            verdict: resp.text,
            agreed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::acquire::ContentSource;
    use crate::providers::llm::FakeClient;

    fn verdict(answer: &str) -> Verdict {
        Verdict {
            answer: answer.to_string(),
            source: ContentSource::UrlOnly,
            task_sha256: String::new(),
        }
    }

    #[test]
    fn permissive_token_match() {
        assert!(verdict_indicates_valid("YES"));
        assert!(verdict_indicates_valid("  Yes, they agree.\n"));
        assert!(verdict_indicates_valid("Both ACCEPT"));
        assert!(verdict_indicates_valid("The content is valid"));
        assert!(verdict_indicates_valid("invalid"));
        assert!(!verdict_indicates_valid("NO"));
        assert!(!verdict_indicates_valid(""));
        assert!(!verdict_indicates_valid("they disagree"));
    }

    #[tokio::test]
    async fn comparator_sees_both_answers_verbatim() {
        let oracle = Arc::new(FakeClient::new("fake").with_response("NO"));
        let strategy = ComparativeStrategy::new(oracle.clone());
        let agreement = strategy
            .reconcile(&verdict("YES"), &verdict("Yes, on topic"))
            .await
            .unwrap();

        assert!(!agreement.agreed);
        assert_eq!(agreement.verdict, "NO");
        let prompts = oracle.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Validator 1 said: YES"));
        assert!(prompts[0].contains("Validator 2 said: Yes, on topic"));
    }

    #[tokio::test]
    async fn comparator_failure_is_reported() {
        let strategy =
            ComparativeStrategy::new(Arc::new(FakeClient::new("fake").failing("timeout")));
        let err = strategy
            .reconcile(&verdict("YES"), &verdict("YES"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("comparison"));
    }
}
