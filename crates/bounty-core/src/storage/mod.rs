//! Contest and submission persistence.
//!
//! Contests are keyed by id; submissions by `(contest_id, submitter)`, with a
//! per-contest ordered submitter index used only for enumeration.

pub mod memory;
pub mod schema;
pub mod sqlite;

use crate::errors::{ContestError, StoreError};
use crate::lifecycle::Settlement;
use crate::model::{Address, Contest, ContestId, Submission};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub trait ContestStore: Send + Sync {
    /// Store a new contest under the next sequential id (starting at 0).
    fn insert_contest(&self, contest: Contest) -> Result<ContestId, StoreError>;

    fn contest(&self, contest_id: ContestId) -> Result<Option<Contest>, StoreError>;

    /// All contests, ascending by id.
    fn contests(&self) -> Result<Vec<(ContestId, Contest)>, StoreError>;

    /// Mark a contest inactive. Returns false if it does not exist.
    fn deactivate(&self, contest_id: ContestId) -> Result<bool, StoreError>;

    fn submission(
        &self,
        contest_id: ContestId,
        submitter: &Address,
    ) -> Result<Option<Submission>, StoreError>;

    /// Submissions of one contest in submission order.
    fn submissions(&self, contest_id: ContestId) -> Result<Vec<Submission>, StoreError>;

    /// Decide and record a validated submission in one atomic step.
    ///
    /// Implementations re-read the contest, refuse a submitter that already
    /// has a record, apply [`crate::lifecycle::settle`] and persist both the
    /// updated contest and the submission before anyone else can observe
    /// either.
    fn settle_submission(
        &self,
        contest_id: ContestId,
        submitter: &Address,
        content_url: &str,
        valid: bool,
    ) -> Result<Settlement, ContestError>;
}
