//! SqliteStore: SQLite-backed contest persistence.
//!
//! Every mutation runs in a `BEGIN IMMEDIATE` transaction, so settlement
//! stays atomic even when several connections (or processes) share one
//! database file.

use super::schema::CONTEST_SCHEMA;
use super::ContestStore;
use crate::errors::{ContestError, StoreError};
use crate::lifecycle::{self, Settlement};
use crate::model::{Address, Contest, ContestId, Submission, SubmissionStatus};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CONTEST_COLUMNS: &str = "creator, platform_pattern, required_topic, reward_description, \
                               max_winners, deadline, accepted_count, is_active";

const INSERT_CONTEST: &str = "INSERT INTO contests (contest_id, creator, platform_pattern, \
                              required_topic, reward_description, max_winners, deadline, \
                              accepted_count, is_active) \
                              VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a file-backed store.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Create an in-memory store (for testing).
    pub fn memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        Self::init_connection(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn init_connection(conn: &Connection) -> Result<(), StoreError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        // WAL mode for file-backed DBs (no-op for in-memory)
        let _ = conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()));
        conn.execute_batch(CONTEST_SCHEMA)?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

/// Run `f` inside `BEGIN IMMEDIATE`, committing on success and rolling back
/// on any error.
fn in_txn<T, E>(conn: &Connection, f: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E>
where
    E: From<rusqlite::Error>,
{
    conn.execute("BEGIN IMMEDIATE", [])?;
    let result = f(conn);
    match &result {
        Ok(_) => {
            conn.execute("COMMIT", [])?;
        }
        Err(_) => {
            let _ = conn.execute("ROLLBACK", []);
        }
    }
    result
}

fn to_sql_id(id: ContestId) -> Result<i64, StoreError> {
    i64::try_from(id).map_err(|_| StoreError::Corrupt(format!("contest id {} out of range", id)))
}

fn from_sql_id(id: i64) -> Result<ContestId, StoreError> {
    ContestId::try_from(id).map_err(|_| StoreError::Corrupt(format!("negative contest id {}", id)))
}

fn contest_from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Contest> {
    Ok(Contest {
        creator: Address::new(row.get::<_, String>(offset)?),
        platform_pattern: row.get(offset + 1)?,
        required_topic: row.get(offset + 2)?,
        reward_description: row.get(offset + 3)?,
        max_winners: row.get(offset + 4)?,
        deadline: row.get(offset + 5)?,
        accepted_count: row.get(offset + 6)?,
        is_active: row.get(offset + 7)?,
    })
}

fn load_contest(conn: &Connection, sql_id: i64) -> rusqlite::Result<Option<Contest>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM contests WHERE contest_id = ?1",
            CONTEST_COLUMNS
        ),
        [sql_id],
        |row| contest_from_row(row, 0),
    )
    .optional()
}

fn submission_from_parts(
    submitter: String,
    content_url: String,
    status: String,
    rejection_reason: String,
) -> Result<Submission, StoreError> {
    let status = SubmissionStatus::parse(&status)
        .ok_or_else(|| StoreError::Corrupt(format!("unknown submission status '{}'", status)))?;
    Ok(Submission {
        submitter: Address::new(submitter),
        content_url,
        status,
        rejection_reason,
    })
}

impl ContestStore for SqliteStore {
    fn insert_contest(&self, contest: Contest) -> Result<ContestId, StoreError> {
        let conn = self.lock()?;
        let id: i64 = in_txn(&conn, |conn| {
            let id: i64 = conn.query_row(
                "SELECT COALESCE(MAX(contest_id) + 1, 0) FROM contests",
                [],
                |row| row.get(0),
            )?;
            conn.execute(
                INSERT_CONTEST,
                params![
                    id,
                    contest.creator.as_str(),
                    contest.platform_pattern,
                    contest.required_topic,
                    contest.reward_description,
                    contest.max_winners,
                    contest.deadline,
                    contest.accepted_count,
                    contest.is_active,
                ],
            )?;
            Ok::<_, StoreError>(id)
        })?;
        from_sql_id(id)
    }

    fn contest(&self, contest_id: ContestId) -> Result<Option<Contest>, StoreError> {
        let conn = self.lock()?;
        Ok(load_contest(&conn, to_sql_id(contest_id)?)?)
    }

    fn contests(&self) -> Result<Vec<(ContestId, Contest)>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT contest_id, {} FROM contests ORDER BY contest_id ASC",
            CONTEST_COLUMNS
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, contest_from_row(row, 1)?))
        })?;

        let mut contests = Vec::new();
        for r in rows {
            let (id, contest) = r?;
            contests.push((from_sql_id(id)?, contest));
        }
        Ok(contests)
    }

    fn deactivate(&self, contest_id: ContestId) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE contests SET is_active = 0 WHERE contest_id = ?1",
            [to_sql_id(contest_id)?],
        )?;
        Ok(changed > 0)
    }

    fn submission(
        &self,
        contest_id: ContestId,
        submitter: &Address,
    ) -> Result<Option<Submission>, StoreError> {
        let conn = self.lock()?;
        let row: Option<(String, String, String, String)> = conn
            .query_row(
                "SELECT submitter, content_url, status, rejection_reason
                 FROM submissions WHERE contest_id = ?1 AND submitter = ?2",
                params![to_sql_id(contest_id)?, submitter.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;
        row.map(|(s, u, st, r)| submission_from_parts(s, u, st, r))
            .transpose()
    }

    fn submissions(&self, contest_id: ContestId) -> Result<Vec<Submission>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT submitter, content_url, status, rejection_reason
             FROM submissions WHERE contest_id = ?1 ORDER BY seq ASC",
        )?;
        let rows = stmt.query_map([to_sql_id(contest_id)?], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut submissions = Vec::new();
        for r in rows {
            let (s, u, st, reason) = r?;
            submissions.push(submission_from_parts(s, u, st, reason)?);
        }
        Ok(submissions)
    }

    fn settle_submission(
        &self,
        contest_id: ContestId,
        submitter: &Address,
        content_url: &str,
        valid: bool,
    ) -> Result<Settlement, ContestError> {
        let sql_id = to_sql_id(contest_id)?;
        let conn = self.lock()?;

        in_txn(&conn, |conn| {
            let existing: Option<i64> = conn
                .query_row(
                    "SELECT seq FROM submissions WHERE contest_id = ?1 AND submitter = ?2",
                    params![sql_id, submitter.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            if existing.is_some() {
                return Err(ContestError::DuplicateSubmission {
                    contest_id,
                    submitter: submitter.clone(),
                });
            }

            let mut contest =
                load_contest(conn, sql_id)?.ok_or(ContestError::NotFound { contest_id })?;
            let settlement = lifecycle::settle(&mut contest, valid);

            conn.execute(
                "UPDATE contests SET accepted_count = ?1, is_active = ?2 WHERE contest_id = ?3",
                params![contest.accepted_count, contest.is_active, sql_id],
            )?;

            let seq: i64 = conn.query_row(
                "SELECT COALESCE(MAX(seq) + 1, 0) FROM submissions WHERE contest_id = ?1",
                [sql_id],
                |row| row.get(0),
            )?;
            conn.execute(
                r#"
                INSERT INTO submissions (
                    contest_id, submitter, seq, content_url, status,
                    rejection_reason, submitted_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    sql_id,
                    submitter.as_str(),
                    seq,
                    content_url,
                    settlement.status.as_str(),
                    settlement.rejection_reason,
                    chrono::Utc::now().to_rfc3339(),
                ],
            )?;

            Ok(settlement)
        })
    }
}
