//! `ContentRewards`: the externally callable contest operations.
//!
//! Mutating calls take a [`CallContext`] for caller identity and time; reads
//! take only the contest (and address) they concern.

use crate::consensus::{ContentValidator, ValidationConsensus};
use crate::errors::ContestResult;
use crate::model::{
    Address, CallContext, ContestId, ContestView, NewContest, SubmissionView, SubmitOutcome,
    UserSubmission,
};
use crate::pipeline::SubmissionPipeline;
use crate::providers::fetch::ContentFetcher;
use crate::providers::llm::LlmClient;
use crate::registry::ContestRegistry;
use crate::storage::ContestStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct ContentRewards {
    registry: ContestRegistry,
    pipeline: SubmissionPipeline,
}

impl ContentRewards {
    pub fn new(store: Arc<dyn ContestStore>, validator: Arc<dyn ContentValidator>) -> Self {
        Self {
            registry: ContestRegistry::new(store.clone()),
            pipeline: SubmissionPipeline::new(store, validator),
        }
    }

    /// Wire the standard validation consensus over the given collaborators.
    pub fn with_oracle(
        store: Arc<dyn ContestStore>,
        fetcher: Arc<dyn ContentFetcher>,
        oracle: Arc<dyn LlmClient>,
    ) -> Self {
        Self::new(store, Arc::new(ValidationConsensus::new(fetcher, oracle)))
    }

    pub fn create_contest(
        &self,
        ctx: &CallContext,
        params: NewContest,
    ) -> ContestResult<ContestId> {
        self.registry.create_contest(ctx, params)
    }

    pub async fn submit_content(
        &self,
        ctx: &CallContext,
        contest_id: ContestId,
        content_url: &str,
    ) -> ContestResult<SubmitOutcome> {
        self.pipeline
            .submit_content(contest_id, &ctx.caller, content_url, ctx.timestamp)
            .await
    }

    pub fn close_contest(&self, ctx: &CallContext, contest_id: ContestId) -> ContestResult<()> {
        self.registry.close_contest(contest_id, &ctx.caller)
    }

    pub fn get_contest(&self, contest_id: ContestId) -> ContestResult<ContestView> {
        self.registry.get_contest(contest_id)
    }

    pub fn get_all_contests(&self) -> ContestResult<Vec<ContestView>> {
        self.registry.list_contests()
    }

    pub fn get_submissions(&self, contest_id: ContestId) -> ContestResult<Vec<SubmissionView>> {
        self.pipeline.get_submissions(contest_id)
    }

    pub fn get_winners(&self, contest_id: ContestId) -> ContestResult<Vec<Address>> {
        self.pipeline.get_winners(contest_id)
    }

    pub fn get_user_submission(
        &self,
        contest_id: ContestId,
        address: &Address,
    ) -> ContestResult<UserSubmission> {
        self.pipeline.get_user_submission(contest_id, address)
    }
}
