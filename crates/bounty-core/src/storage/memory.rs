use super::ContestStore;
use crate::errors::{ContestError, StoreError};
use crate::lifecycle::{self, Settlement};
use crate::model::{Address, Contest, ContestId, Submission};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Arena {
    next_id: ContestId,
    contests: BTreeMap<ContestId, Contest>,
    submitters: BTreeMap<ContestId, Vec<Address>>,
    submissions: HashMap<(ContestId, Address), Submission>,
}

/// Process-local store. One mutex serializes every mutation, which is what
/// makes the post-validation re-check race-free.
#[derive(Debug, Default)]
pub struct MemoryStore {
    arena: Mutex<Arena>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Arena>, StoreError> {
        self.arena.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl ContestStore for MemoryStore {
    fn insert_contest(&self, contest: Contest) -> Result<ContestId, StoreError> {
        let mut arena = self.lock()?;
        let id = arena.next_id;
        arena.next_id += 1;
        arena.contests.insert(id, contest);
        arena.submitters.insert(id, Vec::new());
        Ok(id)
    }

    fn contest(&self, contest_id: ContestId) -> Result<Option<Contest>, StoreError> {
        Ok(self.lock()?.contests.get(&contest_id).cloned())
    }

    fn contests(&self) -> Result<Vec<(ContestId, Contest)>, StoreError> {
        Ok(self
            .lock()?
            .contests
            .iter()
            .map(|(id, c)| (*id, c.clone()))
            .collect())
    }

    fn deactivate(&self, contest_id: ContestId) -> Result<bool, StoreError> {
        let mut arena = self.lock()?;
        match arena.contests.get_mut(&contest_id) {
            Some(contest) => {
                contest.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn submission(
        &self,
        contest_id: ContestId,
        submitter: &Address,
    ) -> Result<Option<Submission>, StoreError> {
        Ok(self
            .lock()?
            .submissions
            .get(&(contest_id, submitter.clone()))
            .cloned())
    }

    fn submissions(&self, contest_id: ContestId) -> Result<Vec<Submission>, StoreError> {
        let arena = self.lock()?;
        let Some(index) = arena.submitters.get(&contest_id) else {
            return Ok(Vec::new());
        };
        Ok(index
            .iter()
            .filter_map(|addr| arena.submissions.get(&(contest_id, addr.clone())).cloned())
            .collect())
    }

    fn settle_submission(
        &self,
        contest_id: ContestId,
        submitter: &Address,
        content_url: &str,
        valid: bool,
    ) -> Result<Settlement, ContestError> {
        let mut guard = self.lock()?;
        let arena = &mut *guard;

        let key = (contest_id, submitter.clone());
        if arena.submissions.contains_key(&key) {
            return Err(ContestError::DuplicateSubmission {
                contest_id,
                submitter: submitter.clone(),
            });
        }
        let contest = arena
            .contests
            .get_mut(&contest_id)
            .ok_or(ContestError::NotFound { contest_id })?;

        let settlement = lifecycle::settle(contest, valid);
        arena.submissions.insert(
            key,
            Submission {
                submitter: submitter.clone(),
                content_url: content_url.to_string(),
                status: settlement.status,
                rejection_reason: settlement.rejection_reason.to_string(),
            },
        );
        arena
            .submitters
            .entry(contest_id)
            .or_default()
            .push(submitter.clone());

        Ok(settlement)
    }
}
