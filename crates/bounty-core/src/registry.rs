//! Contest registry: creation, creator-only closing, and read views.

use crate::errors::{ContestError, ContestResult};
use crate::model::{Address, CallContext, Contest, ContestId, ContestView, NewContest};
use crate::storage::ContestStore;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct ContestRegistry {
    store: Arc<dyn ContestStore>,
}

impl ContestRegistry {
    pub fn new(store: Arc<dyn ContestStore>) -> Self {
        Self { store }
    }

    /// Register a contest owned by the caller. Parameters are not validated;
    /// a `max_winners` of 0 yields a contest nobody can enter.
    pub fn create_contest(
        &self,
        ctx: &CallContext,
        params: NewContest,
    ) -> ContestResult<ContestId> {
        let contest = Contest::open(ctx.caller.clone(), params);
        let contest_id = self.store.insert_contest(contest.clone())?;
        info!(
            contest_id,
            creator = %contest.creator,
            platform_pattern = %contest.platform_pattern,
            max_winners = contest.max_winners,
            deadline = contest.deadline,
            "contest created"
        );
        Ok(contest_id)
    }

    /// Deactivate a contest. Only its creator may do so; closing an already
    /// closed contest succeeds and changes nothing.
    pub fn close_contest(&self, contest_id: ContestId, caller: &Address) -> ContestResult<()> {
        let contest = self.load(contest_id)?;
        if &contest.creator != caller {
            return Err(ContestError::Unauthorized {
                contest_id,
                caller: caller.clone(),
            });
        }
        if !self.store.deactivate(contest_id)? {
            return Err(ContestError::NotFound { contest_id });
        }
        info!(contest_id, was_active = contest.is_active, "contest closed");
        Ok(())
    }

    pub fn get_contest(&self, contest_id: ContestId) -> ContestResult<ContestView> {
        Ok(self.load(contest_id)?.view(contest_id))
    }

    /// Every contest ever created, closed ones included, ascending by id.
    pub fn list_contests(&self) -> ContestResult<Vec<ContestView>> {
        Ok(self
            .store
            .contests()?
            .into_iter()
            .map(|(id, c)| c.view(id))
            .collect())
    }

    pub(crate) fn load(&self, contest_id: ContestId) -> ContestResult<Contest> {
        self.store
            .contest(contest_id)?
            .ok_or(ContestError::NotFound { contest_id })
    }
}
