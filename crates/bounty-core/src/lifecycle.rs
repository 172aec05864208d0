//! Submission state machine.
//!
//! A (contest, submitter) pair moves from no submission to exactly one of
//! `Accepted`, `Rejected` or `Voided`, and never leaves that state. The
//! functions here are pure; storage backends call [`settle`] inside their
//! critical section so the capacity re-check sees the latest counters.

use crate::errors::ContestError;
use crate::model::{Contest, ContestId, SubmissionStatus};

pub const REASON_ACCEPTED: &str = "content accepted";
pub const REASON_OFF_TOPIC: &str = "content did not meet topic requirements";
pub const REASON_FILLED_IN_FLIGHT: &str = "contest reached maximum winners during validation";
pub const REASON_CLOSED_IN_FLIGHT: &str = "contest was closed during validation";

/// Admission checks run before validation starts, in order: active,
/// deadline, capacity.
pub fn admit(contest_id: ContestId, contest: &Contest, now: i64) -> Result<(), ContestError> {
    if !contest.is_active {
        return Err(ContestError::ContestInactive { contest_id });
    }
    if contest.deadline_passed(now) {
        return Err(ContestError::DeadlinePassed {
            contest_id,
            deadline: contest.deadline,
            now,
        });
    }
    if contest.is_full() {
        return Err(ContestError::CapacityReached {
            contest_id,
            max_winners: contest.max_winners,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub status: SubmissionStatus,
    /// Stored on the submission; empty for accepted.
    pub rejection_reason: &'static str,
}

impl Settlement {
    /// Reason reported to the submitter.
    pub fn reason(&self) -> &'static str {
        if self.rejection_reason.is_empty() {
            REASON_ACCEPTED
        } else {
            self.rejection_reason
        }
    }
}

/// Decide the terminal status of a validated submission against the current
/// contest state, and apply the counter changes an acceptance implies.
///
/// Capacity may have been consumed by other submissions while this one was
/// being validated; a valid submission that finds no slot left is voided and
/// does not touch the counters.
pub fn settle(contest: &mut Contest, valid: bool) -> Settlement {
    if !valid {
        return Settlement {
            status: SubmissionStatus::Rejected,
            rejection_reason: REASON_OFF_TOPIC,
        };
    }
    if contest.is_full() {
        return Settlement {
            status: SubmissionStatus::Voided,
            rejection_reason: REASON_FILLED_IN_FLIGHT,
        };
    }
    if !contest.is_active {
        return Settlement {
            status: SubmissionStatus::Voided,
            rejection_reason: REASON_CLOSED_IN_FLIGHT,
        };
    }

    contest.accepted_count += 1;
    if contest.accepted_count >= contest.max_winners {
        contest.is_active = false;
    }
    Settlement {
        status: SubmissionStatus::Accepted,
        rejection_reason: "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Address;

    fn contest(max_winners: u32) -> Contest {
        Contest {
            creator: Address::new("0xc"),
            platform_pattern: "*".into(),
            required_topic: "rust".into(),
            reward_description: String::new(),
            max_winners,
            deadline: 0,
            accepted_count: 0,
            is_active: true,
        }
    }

    #[test]
    fn admit_checks_in_order() {
        let mut c = contest(1);
        c.is_active = false;
        c.deadline = 10;
        assert!(matches!(
            admit(0, &c, 20),
            Err(ContestError::ContestInactive { .. })
        ));

        c.is_active = true;
        assert!(matches!(
            admit(0, &c, 20),
            Err(ContestError::DeadlinePassed { .. })
        ));

        c.deadline = 0;
        c.accepted_count = 1;
        assert!(matches!(
            admit(0, &c, 20),
            Err(ContestError::CapacityReached { .. })
        ));
    }

    #[test]
    fn zero_capacity_contest_admits_nobody() {
        assert!(matches!(
            admit(0, &contest(0), 0),
            Err(ContestError::CapacityReached { .. })
        ));
    }

    #[test]
    fn last_acceptance_auto_closes() {
        let mut c = contest(2);
        let first = settle(&mut c, true);
        assert_eq!(first.status, SubmissionStatus::Accepted);
        assert_eq!(first.reason(), REASON_ACCEPTED);
        assert!(c.is_active);

        settle(&mut c, true);
        assert_eq!(c.accepted_count, 2);
        assert!(!c.is_active);
    }

    #[test]
    fn invalid_is_rejected_without_counting() {
        let mut c = contest(1);
        let s = settle(&mut c, false);
        assert_eq!(s.status, SubmissionStatus::Rejected);
        assert_eq!(s.rejection_reason, REASON_OFF_TOPIC);
        assert_eq!(c.accepted_count, 0);
        assert!(c.is_active);
    }

    #[test]
    fn valid_after_capacity_consumed_is_voided() {
        let mut c = contest(1);
        settle(&mut c, true);
        let late = settle(&mut c, true);
        assert_eq!(late.status, SubmissionStatus::Voided);
        assert_eq!(late.rejection_reason, REASON_FILLED_IN_FLIGHT);
        assert_eq!(c.accepted_count, 1);
    }

    #[test]
    fn valid_after_creator_close_is_voided() {
        let mut c = contest(3);
        c.is_active = false;
        let s = settle(&mut c, true);
        assert_eq!(s.status, SubmissionStatus::Voided);
        assert_eq!(s.rejection_reason, REASON_CLOSED_IN_FLIGHT);
        assert_eq!(c.accepted_count, 0);
    }
}
