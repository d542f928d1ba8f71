//! SQLite record store implementation.
//!
//! Every open runs the schema dispatch in [`super::migrations`] before the
//! handle is returned, so callers always see the declared schema (or an
//! untouched newer one, when a downgrade is tolerated).

use crate::error::{Error, Result};
use crate::model::{GradeRecord, NewGradeRecord, RecordQuery};
use crate::storage::migrations::{check_declared, run_migrations, DowngradePolicy, MigrationOutcome};
use crate::storage::schema;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// SQLite-backed store for grade records.
///
/// The connection closes when the store is dropped.
#[derive(Debug)]
pub struct RecordStore {
    conn: Connection,
    migration: MigrationOutcome,
}

impl RecordStore {
    /// Open the database at `path` with the declared schema version,
    /// tolerating a newer schema on disk.
    ///
    /// Creates the file (and its parent directory) if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or the
    /// schema step fails.
    pub fn open(path: &Path, declared: u32) -> Result<Self> {
        Self::open_with(path, declared, DowngradePolicy::Ignore)
    }

    /// Open the database at `path` with an explicit downgrade policy.
    ///
    /// # Errors
    ///
    /// Returns an error if `declared` is out of range, the connection cannot be
    /// established, the policy refuses a downgrade or the schema step fails.
    pub fn open_with(path: &Path, declared: u32, policy: DowngradePolicy) -> Result<Self> {
        check_declared(declared)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        schema::apply_pragmas(&conn)?;

        let migration = run_migrations(&mut conn, declared, policy)?;
        debug!(path = %path.display(), version = declared, step = migration.step.as_str(), "Opened record store");
        Ok(Self { conn, migration })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory(declared: u32) -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        let migration = run_migrations(&mut conn, declared, DowngradePolicy::Ignore)?;
        Ok(Self { conn, migration })
    }

    /// The schema step that ran when this handle was opened.
    #[must_use]
    pub fn migration(&self) -> MigrationOutcome {
        self.migration
    }

    /// Schema version currently stored in the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn schema_version(&self) -> Result<u32> {
        Ok(schema::user_version(&self.conn)?)
    }

    /// Append a record and return the identifier assigned to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails; nothing is written in that case.
    pub fn insert(&mut self, record: &NewGradeRecord) -> Result<i64> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO students (studentID, grade) VALUES (?1, ?2)",
            rusqlite::params![record.student_id, record.grade],
        )?;
        let id = tx.last_insert_rowid();

        tx.commit()?;
        info!(id, student_id = %record.student_id, "Inserted grade record");
        Ok(id)
    }

    /// Get a record by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get(&self, id: i64) -> Result<Option<GradeRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT _id, studentID, grade FROM students WHERE _id = ?1",
                [id],
                map_record_row,
            )
            .optional()?;
        Ok(record)
    }

    /// Query records ordered by student ID, optionally filtered to one student.
    ///
    /// Rows with equal student IDs come back in insertion order. Each call
    /// runs the query again, so results always reflect the current table.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn query_all(&self, query: &RecordQuery) -> Result<Vec<GradeRecord>> {
        let sql = format!(
            "SELECT _id, studentID, grade FROM students
             WHERE (?1 IS NULL OR studentID = ?1)
             ORDER BY studentID {}, _id ASC",
            query.order.as_sql()
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([query.student_id.as_deref()], map_record_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

fn map_record_row(row: &rusqlite::Row) -> rusqlite::Result<GradeRecord> {
    Ok(GradeRecord {
        id: row.get(0)?,
        student_id: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        grade: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
    })
}
