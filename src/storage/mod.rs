//! SQLite storage layer for grade records.
//!
//! # Submodules
//!
//! - [`migrations`] - Schema version dispatch (create / recreate / downgrade)
//! - [`schema`] - Table definition and version header helpers
//! - [`sqlite`] - The [`RecordStore`] itself

pub mod migrations;
pub mod schema;
pub mod sqlite;

pub use migrations::{DowngradePolicy, Migration, MigrationOutcome};
pub use sqlite::RecordStore;
