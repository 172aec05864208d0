//! Submission workflow.
//!
//! Admission checks run against the stored contest, then the (slow,
//! non-deterministic) validation consensus, then a settlement that re-reads
//! the contest inside the store's critical section. Capacity consumed or a
//! close issued while validation was in flight turns a valid submission into
//! `Voided` instead of overshooting `max_winners`.

use crate::consensus::ContentValidator;
use crate::errors::{ContestError, ContestResult};
use crate::lifecycle;
use crate::model::{
    Address, ContestId, SubmissionStatus, SubmissionView, SubmitOutcome, UserSubmission,
};
use crate::storage::ContestStore;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct SubmissionPipeline {
    store: Arc<dyn ContestStore>,
    validator: Arc<dyn ContentValidator>,
}

impl SubmissionPipeline {
    pub fn new(store: Arc<dyn ContestStore>, validator: Arc<dyn ContentValidator>) -> Self {
        Self { store, validator }
    }

    pub async fn submit_content(
        &self,
        contest_id: ContestId,
        submitter: &Address,
        content_url: &str,
        now: i64,
    ) -> ContestResult<SubmitOutcome> {
        let contest = self
            .store
            .contest(contest_id)?
            .ok_or(ContestError::NotFound { contest_id })?;
        lifecycle::admit(contest_id, &contest, now)?;

        if self.store.submission(contest_id, submitter)?.is_some() {
            return Err(ContestError::DuplicateSubmission {
                contest_id,
                submitter: submitter.clone(),
            });
        }

        let valid = self
            .validator
            .is_content_valid(
                content_url,
                &contest.platform_pattern,
                &contest.required_topic,
            )
            .await
            .map_err(|e| {
                warn!(contest_id, submitter = %submitter, error = %e, "validation unavailable");
                ContestError::ValidationUnavailable {
                    detail: e.to_string(),
                }
            })?;

        let settlement = self
            .store
            .settle_submission(contest_id, submitter, content_url, valid)?;

        info!(
            contest_id,
            submitter = %submitter,
            url = %content_url,
            status = %settlement.status,
            reason = settlement.reason(),
            "submission decided"
        );

        Ok(SubmitOutcome {
            status: settlement.status,
            reason: settlement.reason().to_string(),
        })
    }

    /// Submissions in submission order.
    pub fn get_submissions(&self, contest_id: ContestId) -> ContestResult<Vec<SubmissionView>> {
        self.ensure_contest(contest_id)?;
        Ok(self.store.submissions(contest_id)?)
    }

    /// Addresses of accepted submissions, in submission order.
    pub fn get_winners(&self, contest_id: ContestId) -> ContestResult<Vec<Address>> {
        Ok(self
            .get_submissions(contest_id)?
            .into_iter()
            .filter(|s| s.status == SubmissionStatus::Accepted)
            .map(|s| s.submitter)
            .collect())
    }

    pub fn get_user_submission(
        &self,
        contest_id: ContestId,
        address: &Address,
    ) -> ContestResult<UserSubmission> {
        self.ensure_contest(contest_id)?;
        Ok(self
            .store
            .submission(contest_id, address)?
            .map(UserSubmission::from)
            .unwrap_or_else(UserSubmission::none))
    }

    fn ensure_contest(&self, contest_id: ContestId) -> ContestResult<()> {
        match self.store.contest(contest_id)? {
            Some(_) => Ok(()),
            None => Err(ContestError::NotFound { contest_id }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::ConsensusError;
    use crate::model::{Contest, NewContest};
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Validator with a fixed answer that counts its invocations.
    struct FixedValidator {
        answer: Result<bool, String>,
        calls: AtomicUsize,
    }

    impl FixedValidator {
        fn new(answer: Result<bool, String>) -> Arc<Self> {
            Arc::new(Self {
                answer,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ContentValidator for FixedValidator {
        async fn is_content_valid(
            &self,
            _url: &str,
            _pattern: &str,
            _topic: &str,
        ) -> Result<bool, ConsensusError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
                .clone()
                .map_err(|detail| ConsensusError::OracleUnavailable {
                    stage: "principal".into(),
                    detail,
                })
        }
    }

    fn setup(
        max_winners: u32,
        deadline: i64,
        answer: Result<bool, String>,
    ) -> (SubmissionPipeline, Arc<MemoryStore>, Arc<FixedValidator>, ContestId) {
        let store = Arc::new(MemoryStore::new());
        let validator = FixedValidator::new(answer);
        let id = store
            .insert_contest(Contest::open(
                Address::new("0xcreator"),
                NewContest {
                    platform_pattern: "*".into(),
                    required_topic: "rust".into(),
                    reward_description: "swag".into(),
                    max_winners,
                    deadline,
                },
            ))
            .unwrap();
        let pipeline = SubmissionPipeline::new(store.clone(), validator.clone());
        (pipeline, store, validator, id)
    }

    #[tokio::test]
    async fn valid_submission_is_accepted_and_counted() {
        let (pipeline, store, _, id) = setup(2, 0, Ok(true));
        let out = pipeline
            .submit_content(id, &Address::new("0xa"), "https://x.test/1", 100)
            .await
            .unwrap();
        assert_eq!(out.status, SubmissionStatus::Accepted);
        assert_eq!(out.reason, lifecycle::REASON_ACCEPTED);

        let contest = store.contest(id).unwrap().unwrap();
        assert_eq!(contest.accepted_count, 1);
        assert!(contest.is_active);
    }

    #[tokio::test]
    async fn invalid_submission_is_rejected_with_reason() {
        let (pipeline, _, _, id) = setup(2, 0, Ok(false));
        let who = Address::new("0xa");
        let out = pipeline
            .submit_content(id, &who, "https://x.test/1", 100)
            .await
            .unwrap();
        assert_eq!(out.status, SubmissionStatus::Rejected);
        assert_eq!(out.reason, lifecycle::REASON_OFF_TOPIC);

        let stored = pipeline.get_user_submission(id, &who).unwrap();
        assert_eq!(
            stored.rejection_reason.as_deref(),
            Some(lifecycle::REASON_OFF_TOPIC)
        );
        assert!(pipeline.get_winners(id).unwrap().is_empty());
    }

    #[tokio::test]
    async fn deadline_is_enforced_before_validation() {
        let (pipeline, _, validator, id) = setup(2, 50, Ok(true));
        let err = pipeline
            .submit_content(id, &Address::new("0xa"), "https://x.test/1", 51)
            .await
            .unwrap_err();
        assert!(matches!(err, ContestError::DeadlinePassed { .. }));
        assert_eq!(validator.calls.load(Ordering::SeqCst), 0);

        // Submitting exactly at the deadline is still allowed.
        pipeline
            .submit_content(id, &Address::new("0xb"), "https://x.test/2", 50)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn duplicate_is_refused_before_validation() {
        let (pipeline, _, validator, id) = setup(3, 0, Ok(true));
        let who = Address::new("0xa");
        pipeline
            .submit_content(id, &who, "https://x.test/1", 0)
            .await
            .unwrap();
        let err = pipeline
            .submit_content(id, &who, "https://x.test/2", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ContestError::DuplicateSubmission { .. }));
        assert_eq!(validator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn oracle_failure_leaves_no_trace() {
        let (pipeline, store, _, id) = setup(1, 0, Err("rate limited".into()));
        let who = Address::new("0xa");
        let err = pipeline
            .submit_content(id, &who, "https://x.test/1", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ContestError::ValidationUnavailable { .. }));
        assert!(err.is_retryable());

        let mine = pipeline.get_user_submission(id, &who).unwrap();
        assert!(!mine.has_submitted);
        assert!(pipeline.get_submissions(id).unwrap().is_empty());
        assert_eq!(store.contest(id).unwrap().unwrap().accepted_count, 0);
    }

    #[tokio::test]
    async fn reads_on_unknown_contest_fail() {
        let (pipeline, _, _, _) = setup(1, 0, Ok(true));
        assert!(matches!(
            pipeline.get_submissions(999),
            Err(ContestError::NotFound { contest_id: 999 })
        ));
        assert!(matches!(
            pipeline.get_winners(999),
            Err(ContestError::NotFound { .. })
        ));
        assert!(matches!(
            pipeline.get_user_submission(999, &Address::new("0xa")),
            Err(ContestError::NotFound { .. })
        ));
    }
}
