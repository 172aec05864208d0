pub mod config;
pub mod consensus;
pub mod errors;
pub mod lifecycle;
pub mod model;
pub mod pipeline;
pub mod providers;
pub mod registry;
pub mod service;
pub mod storage;

pub use errors::{ContestError, ContestResult};
pub use model::{Address, CallContext, ContestId, SubmissionStatus, SubmitOutcome};
pub use service::ContentRewards;
