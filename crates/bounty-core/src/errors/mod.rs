//! Error types surfaced by the contest operations.

use crate::model::{Address, ContestId};

/// Storage backend failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    /// A stored row could not be mapped back into a record.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("store lock poisoned")]
    Poisoned,
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

/// `bounty.yaml` could not be read, parsed or turned into collaborators.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(pub String);

/// Caller-input and state errors of the public operations. None of these are
/// retried internally.
#[derive(Debug, thiserror::Error)]
pub enum ContestError {
    #[error("contest does not exist: {contest_id}")]
    NotFound { contest_id: ContestId },

    #[error("only the contest creator can close contest {contest_id} (caller {caller})")]
    Unauthorized {
        contest_id: ContestId,
        caller: Address,
    },

    #[error("contest {contest_id} is no longer active")]
    ContestInactive { contest_id: ContestId },

    #[error("contest {contest_id} deadline has passed ({deadline} < {now})")]
    DeadlinePassed {
        contest_id: ContestId,
        deadline: i64,
        now: i64,
    },

    #[error("contest {contest_id} has reached maximum winners ({max_winners})")]
    CapacityReached {
        contest_id: ContestId,
        max_winners: u32,
    },

    #[error("{submitter} has already submitted to contest {contest_id}")]
    DuplicateSubmission {
        contest_id: ContestId,
        submitter: Address,
    },

    /// The oracle could not produce a verdict; nothing was recorded.
    #[error("validation unavailable: {detail}")]
    ValidationUnavailable { detail: String },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ContestError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => 1,
            Self::Unauthorized { .. } => 2,

            // Contest state refuses the submission
            Self::ContestInactive { .. } => 3,
            Self::DeadlinePassed { .. } => 3,
            Self::CapacityReached { .. } => 3,
            Self::DuplicateSubmission { .. } => 4,

            // Transient
            Self::ValidationUnavailable { .. } => 5,

            Self::Storage(_) => 6,
        }
    }

    /// Stable machine-readable kind, used in CLI error output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Unauthorized { .. } => "unauthorized",
            Self::ContestInactive { .. } => "contest_inactive",
            Self::DeadlinePassed { .. } => "deadline_passed",
            Self::CapacityReached { .. } => "capacity_reached",
            Self::DuplicateSubmission { .. } => "duplicate_submission",
            Self::ValidationUnavailable { .. } => "validation_unavailable",
            Self::Storage(_) => "storage",
        }
    }

    /// Whether a caller may reasonably try the same call again later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ValidationUnavailable { .. })
    }
}

impl From<rusqlite::Error> for ContestError {
    fn from(e: rusqlite::Error) -> Self {
        ContestError::Storage(e.into())
    }
}

pub type ContestResult<T> = Result<T, ContestError>;
