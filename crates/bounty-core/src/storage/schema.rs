//! SQLite schema for contests and submissions.
//!
//! Tables:
//! - `contests`: one row per contest, counters mutated in place
//! - `submissions`: append-only, one row per (contest, submitter); `seq`
//!   orders the per-contest submitter index

/// Schema version: 1
pub const CONTEST_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS contests (
    contest_id         INTEGER PRIMARY KEY,
    creator            TEXT NOT NULL,
    platform_pattern   TEXT NOT NULL,
    required_topic     TEXT NOT NULL,
    reward_description TEXT NOT NULL,
    max_winners        INTEGER NOT NULL CHECK (max_winners >= 0),
    deadline           INTEGER NOT NULL DEFAULT 0,
    accepted_count     INTEGER NOT NULL DEFAULT 0,
    is_active          INTEGER NOT NULL DEFAULT 1,
    created_at         TEXT NOT NULL DEFAULT (datetime('now')),
    CHECK (accepted_count <= max_winners)
);

CREATE TABLE IF NOT EXISTS submissions (
    contest_id       INTEGER NOT NULL REFERENCES contests(contest_id),
    submitter        TEXT NOT NULL,
    seq              INTEGER NOT NULL,
    content_url      TEXT NOT NULL,
    status           TEXT NOT NULL CHECK (status IN ('accepted', 'rejected', 'voided')),
    rejection_reason TEXT NOT NULL DEFAULT '',
    submitted_at     TEXT NOT NULL,
    PRIMARY KEY (contest_id, submitter),
    UNIQUE (contest_id, seq)
);

CREATE INDEX IF NOT EXISTS idx_submissions_contest_seq
    ON submissions(contest_id, seq);
"#;
