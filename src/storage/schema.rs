//! Record store schema definitions.
//!
//! The store holds a single table. Its version lives in SQLite's
//! `user_version` header field, where 0 means the schema was never created.

use rusqlite::{Connection, Result};

/// Name of the only table.
pub const TABLE_NAME: &str = "students";

/// Auto-assigned row identifier column.
pub const ID_COLUMN: &str = "_id";

/// Student ID column.
pub const STUDENT_ID_COLUMN: &str = "studentID";

/// Grade column.
pub const GRADE_COLUMN: &str = "grade";

/// DDL for the `students` table.
///
/// `AUTOINCREMENT` keeps identifiers monotonic even if the highest row is
/// ever removed.
pub const CREATE_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS students (
    _id INTEGER PRIMARY KEY AUTOINCREMENT,
    studentID TEXT,
    grade TEXT
);
";

/// Highest version `user_version` can hold (the header field is a signed
/// 32-bit integer).
pub const MAX_USER_VERSION: u32 = i32::MAX.unsigned_abs();

/// Removes the `students` table and every row in it.
pub const DROP_TABLE_SQL: &str = "DROP TABLE IF EXISTS students;";

/// Set connection pragmas. Must run before any schema work.
pub fn apply_pragmas(conn: &Connection) -> Result<()> {
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;
    Ok(())
}

/// Read the schema version stored in the database header.
pub fn user_version(conn: &Connection) -> Result<u32> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}

/// Write the schema version into the database header.
pub fn set_user_version(conn: &Connection, version: u32) -> Result<()> {
    conn.pragma_update(None, "user_version", version)
}

/// Create the `students` table if it does not exist.
pub fn create_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLE_SQL)
}

/// Drop the `students` table if it exists.
pub fn drop_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(DROP_TABLE_SQL)
}

/// Check whether the `students` table exists.
pub fn table_exists(conn: &Connection) -> Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [TABLE_NAME],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_table_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_table(&conn).expect("First create failed");
        create_table(&conn).expect("Second create failed");
        assert!(table_exists(&conn).unwrap());
    }

    #[test]
    fn test_columns() {
        let conn = Connection::open_in_memory().unwrap();
        create_table(&conn).unwrap();

        let columns: Vec<String> = conn
            .prepare("SELECT name FROM pragma_table_info('students') ORDER BY cid")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();

        assert_eq!(columns, vec![ID_COLUMN, STUDENT_ID_COLUMN, GRADE_COLUMN]);
    }

    #[test]
    fn test_drop_table() {
        let conn = Connection::open_in_memory().unwrap();
        create_table(&conn).unwrap();
        drop_table(&conn).unwrap();
        assert!(!table_exists(&conn).unwrap());
        // Dropping a missing table is fine
        drop_table(&conn).unwrap();
    }

    #[test]
    fn test_user_version_defaults_to_zero() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(user_version(&conn).unwrap(), 0);
        set_user_version(&conn, 4).unwrap();
        assert_eq!(user_version(&conn).unwrap(), 4);
    }

    #[test]
    fn test_max_user_version_round_trips() {
        let conn = Connection::open_in_memory().unwrap();
        set_user_version(&conn, MAX_USER_VERSION).unwrap();
        assert_eq!(user_version(&conn).unwrap(), MAX_USER_VERSION);
    }
}
