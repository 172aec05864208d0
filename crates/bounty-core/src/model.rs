//! Contest and submission records, plus the read views handed to callers.
//!
//! View types serialize with snake_case keys (`contest_id`, `spots_remaining`,
//! `has_submitted`); these are the field names clients consume.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type ContestId = u64;

/// Account identifier. Normalized to trimmed lower-case so that an address
/// typed by a user matches the one recorded from the execution context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Identity and clock of the current call, supplied by the host rather than
/// passed as operation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    /// Unix seconds.
    pub timestamp: i64,
}

impl CallContext {
    pub fn new(caller: impl Into<Address>, timestamp: i64) -> Self {
        Self {
            caller: caller.into(),
            timestamp,
        }
    }

    /// Context stamped with the wall clock.
    pub fn now(caller: impl Into<Address>) -> Self {
        Self::new(caller, chrono::Utc::now().timestamp())
    }
}

/// Parameters of a new contest. The caller becomes the creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContest {
    pub platform_pattern: String,
    pub required_topic: String,
    pub reward_description: String,
    pub max_winners: u32,
    /// Unix seconds; 0 disables the deadline.
    pub deadline: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contest {
    pub creator: Address,
    pub platform_pattern: String,
    pub required_topic: String,
    pub reward_description: String,
    pub max_winners: u32,
    pub deadline: i64,
    pub accepted_count: u32,
    pub is_active: bool,
}

impl Contest {
    pub fn open(creator: Address, params: NewContest) -> Self {
        Self {
            creator,
            platform_pattern: params.platform_pattern,
            required_topic: params.required_topic,
            reward_description: params.reward_description,
            max_winners: params.max_winners,
            deadline: params.deadline,
            accepted_count: 0,
            is_active: true,
        }
    }

    pub fn spots_remaining(&self) -> u32 {
        self.max_winners.saturating_sub(self.accepted_count)
    }

    pub fn is_full(&self) -> bool {
        self.accepted_count >= self.max_winners
    }

    pub fn deadline_passed(&self, now: i64) -> bool {
        self.deadline > 0 && now > self.deadline
    }

    pub fn view(&self, contest_id: ContestId) -> ContestView {
        ContestView {
            contest_id,
            creator: self.creator.clone(),
            platform_pattern: self.platform_pattern.clone(),
            required_topic: self.required_topic.clone(),
            reward_description: self.reward_description.clone(),
            max_winners: self.max_winners,
            deadline: self.deadline,
            accepted_count: self.accepted_count,
            is_active: self.is_active,
            spots_remaining: self.spots_remaining(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestView {
    pub contest_id: ContestId,
    pub creator: Address,
    pub platform_pattern: String,
    pub required_topic: String,
    pub reward_description: String,
    pub max_winners: u32,
    pub deadline: i64,
    pub accepted_count: u32,
    pub is_active: bool,
    pub spots_remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Accepted,
    Rejected,
    Voided,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Voided => "voided",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            "voided" => Some(Self::Voided),
            _ => None,
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A judged submission. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub submitter: Address,
    pub content_url: String,
    pub status: SubmissionStatus,
    /// Empty iff the submission was accepted.
    pub rejection_reason: String,
}

pub type SubmissionView = Submission;

/// Answer of `get_user_submission`. Only `has_submitted` is present for an
/// address that never submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSubmission {
    pub has_submitted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SubmissionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl UserSubmission {
    pub fn none() -> Self {
        Self {
            has_submitted: false,
            content_url: None,
            status: None,
            rejection_reason: None,
        }
    }
}

impl From<Submission> for UserSubmission {
    fn from(sub: Submission) -> Self {
        Self {
            has_submitted: true,
            content_url: Some(sub.content_url),
            status: Some(sub.status),
            rejection_reason: Some(sub.rejection_reason),
        }
    }
}

/// Result of `submit_content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub status: SubmissionStatus,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contest(max_winners: u32, accepted: u32, deadline: i64) -> Contest {
        Contest {
            creator: Address::new("0xCreator"),
            platform_pattern: "*".into(),
            required_topic: "rust".into(),
            reward_description: "swag".into(),
            max_winners,
            deadline,
            accepted_count: accepted,
            is_active: true,
        }
    }

    #[test]
    fn address_is_normalized() {
        assert_eq!(Address::new("  0xAbC "), Address::new("0xabc"));
        assert_eq!(Address::new("0xAbC").as_str(), "0xabc");
    }

    #[test]
    fn view_derives_spots_remaining() {
        let view = contest(3, 1, 0).view(7);
        assert_eq!(view.contest_id, 7);
        assert_eq!(view.spots_remaining, 2);
    }

    #[test]
    fn zero_deadline_never_passes() {
        assert!(!contest(1, 0, 0).deadline_passed(i64::MAX));
        assert!(contest(1, 0, 100).deadline_passed(101));
        assert!(!contest(1, 0, 100).deadline_passed(100));
    }

    #[test]
    fn user_submission_absent_serializes_flag_only() {
        let v = serde_json::to_value(UserSubmission::none()).unwrap();
        assert_eq!(v, serde_json::json!({ "has_submitted": false }));
    }

    #[test]
    fn status_round_trips_through_text() {
        for s in [
            SubmissionStatus::Accepted,
            SubmissionStatus::Rejected,
            SubmissionStatus::Voided,
        ] {
            assert_eq!(SubmissionStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(SubmissionStatus::parse("pending"), None);
    }
}
