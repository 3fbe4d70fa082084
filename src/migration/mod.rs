//! One-shot duty-roster schema migration.
//!
//! The schema script is executed verbatim against the hospital database,
//! outside any transaction. A script whose objects already exist is a
//! benign outcome, not a failure.

pub mod http;

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use rusqlite::{Connection, ErrorCode};
use thiserror::Error;

use crate::config;

static ALREADY_EXISTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\balready\s+exists\b").unwrap());

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Cannot read schema file {path}: {reason}")]
    SchemaRead { path: String, reason: String },

    #[error("Cannot connect to database {path}: {reason}")]
    Connection { path: String, reason: String },

    #[error("Migration failed: {0}")]
    Statement(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    Applied,
    /// Driver message kept for display.
    AlreadyExists(String),
}

impl MigrationOutcome {
    pub fn message(&self) -> String {
        match self {
            MigrationOutcome::Applied => "Duty roster schema applied successfully".to_string(),
            MigrationOutcome::AlreadyExists(detail) => {
                format!("Duty roster schema already exists ({detail})")
            }
        }
    }
}

/// True only for errors that mean the schema object is already there.
///
/// SQLite reports that condition under its generic error code, so any
/// other code rules it out before the message is consulted.
pub fn is_already_exists(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, message) => {
            failure.code == ErrorCode::Unknown
                && message
                    .as_deref()
                    .map(|m| ALREADY_EXISTS.is_match(m))
                    .unwrap_or(false)
        }
        other => ALREADY_EXISTS.is_match(&other.to_string()),
    }
}

/// Execute `sql` on an open connection and classify the result.
pub fn apply_schema(conn: &Connection, sql: &str) -> Result<MigrationOutcome, MigrationError> {
    match conn.execute_batch(sql) {
        Ok(()) => Ok(MigrationOutcome::Applied),
        Err(e) if is_already_exists(&e) => Ok(MigrationOutcome::AlreadyExists(e.to_string())),
        Err(e) => Err(MigrationError::Statement(e.to_string())),
    }
}

/// Database and schema locations for one migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRunner {
    database: PathBuf,
    schema: PathBuf,
}

impl Default for MigrationRunner {
    fn default() -> Self {
        Self::new(config::hospital_db_path(), config::DUTY_ROSTER_SCHEMA)
    }
}

impl MigrationRunner {
    pub fn new(database: impl Into<PathBuf>, schema: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
        }
    }

    pub fn database(&self) -> &Path {
        &self.database
    }

    pub fn schema(&self) -> &Path {
        &self.schema
    }

    /// Read the script, connect and apply. Blocking.
    pub fn run(&self) -> Result<MigrationOutcome, MigrationError> {
        let sql = std::fs::read_to_string(&self.schema).map_err(|e| MigrationError::SchemaRead {
            path: self.schema.display().to_string(),
            reason: e.to_string(),
        })?;

        let conn = Connection::open(&self.database).map_err(|e| MigrationError::Connection {
            path: self.database.display().to_string(),
            reason: e.to_string(),
        })?;

        tracing::info!(
            database = %self.database.display(),
            schema = %self.schema.display(),
            "applying duty roster schema"
        );

        let outcome = apply_schema(&conn, &sql);
        match &outcome {
            Ok(MigrationOutcome::Applied) => tracing::info!("duty roster schema applied"),
            Ok(MigrationOutcome::AlreadyExists(detail)) => {
                tracing::info!(%detail, "duty roster schema already present")
            }
            Err(e) => tracing::error!(error = %e, "duty roster migration failed"),
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER_SQL: &str = include_str!("../../resources/migrations/duty_roster.sql");

    fn write_schema(dir: &Path, sql: &str) -> PathBuf {
        let path = dir.join("schema.sql");
        std::fs::write(&path, sql).unwrap();
        path
    }

    #[test]
    fn second_run_reports_already_exists() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write_schema(dir.path(), ROSTER_SQL);
        let runner = MigrationRunner::new(dir.path().join("hospital.db"), schema);

        assert_eq!(runner.run().unwrap(), MigrationOutcome::Applied);

        match runner.run().unwrap() {
            MigrationOutcome::AlreadyExists(detail) => {
                assert!(detail.contains("already exists"));
            }
            other => panic!("expected already exists, got {other:?}"),
        }
    }

    #[test]
    fn schema_creates_duty_roster_table() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn, ROSTER_SQL).unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='duty_roster'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn syntax_error_is_fatal_and_verbatim() {
        let conn = Connection::open_in_memory().unwrap();
        let err = apply_schema(&conn, "CREATE TABEL duty_roster (id INTEGER);").unwrap_err();
        match err {
            MigrationError::Statement(message) => assert!(message.contains("syntax error")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_generic_code_is_never_benign() {
        // SQLITE_CONSTRAINT with a message that happens to match.
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(19),
            Some("row already exists".into()),
        );
        assert!(!is_already_exists(&err));
    }

    #[test]
    fn unique_violation_is_fatal() {
        let conn = Connection::open_in_memory().unwrap();
        let sql = "CREATE TABLE t (id INTEGER PRIMARY KEY);
                   INSERT INTO t VALUES (1);
                   INSERT INTO t VALUES (1);";
        assert!(matches!(
            apply_schema(&conn, sql),
            Err(MigrationError::Statement(_))
        ));
    }

    #[test]
    fn message_match_is_case_insensitive() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(1),
            Some("index idx_duty_roster_date ALREADY EXISTS".into()),
        );
        assert!(is_already_exists(&err));
    }

    #[test]
    fn missing_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let runner = MigrationRunner::new(dir.path().join("h.db"), dir.path().join("nope.sql"));
        assert!(matches!(runner.run(), Err(MigrationError::SchemaRead { .. })));
    }

    #[test]
    fn unreachable_database() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write_schema(dir.path(), ROSTER_SQL);
        let runner = MigrationRunner::new(dir.path().join("missing").join("h.db"), schema);
        assert!(matches!(runner.run(), Err(MigrationError::Connection { .. })));
    }

    #[test]
    fn outcome_messages() {
        assert!(MigrationOutcome::Applied.message().contains("applied"));
        assert!(MigrationOutcome::AlreadyExists("table x already exists".into())
            .message()
            .contains("already exists"));
    }
}
