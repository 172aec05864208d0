//! Exit codes of the `bounty` binary. Part of the public contract.
//!
//! Contest errors exit with [`bounty_core::ContestError::exit_code`]
//! (1 not found, 2 unauthorized, 3 contest closed/expired/full,
//! 4 duplicate, 5 validation unavailable, 6 storage).

pub const OK: i32 = 0;
pub const CONFIG_ERROR: i32 = 10; // Unreadable config or unbuildable oracle/fetcher
pub const INTERNAL_ERROR: i32 = 11;
