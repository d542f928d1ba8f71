//! Schema version dispatch for the record store.
//!
//! Opening the store compares the version on disk with the version the code
//! declares and looks the pair up in [`MIGRATIONS`]. The matching step runs
//! in one transaction together with the version bump.
//!
//! | on disk vs declared | step                                  |
//! |---------------------|---------------------------------------|
//! | equal               | current (nothing to do)               |
//! | 0 (absent)          | create the table                      |
//! | older               | drop and recreate (rows are discarded) |
//! | newer               | ignore, or refuse under `Fail` policy |

use crate::error::{Error, Result};
use crate::storage::schema;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::Serialize;
use tracing::{info, warn};

/// What to do when the database is newer than the declared schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DowngradePolicy {
    /// Open the database untouched.
    #[default]
    Ignore,
    /// Refuse to open with `Error::SchemaDowngrade`.
    Fail,
}

/// A schema step chosen for an `(on_disk, declared)` version pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Migration {
    /// Versions match.
    Current,
    /// First open: create the table.
    Create,
    /// Older schema on disk: drop the table and create it again.
    Recreate,
    /// Newer schema on disk: leave everything as it is.
    Downgrade,
}

impl Migration {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Create => "create",
            Self::Recreate => "recreate",
            Self::Downgrade => "downgrade",
        }
    }

    /// Whether the step rewrites the schema and bumps the version.
    #[must_use]
    pub const fn writes(&self) -> bool {
        matches!(self, Self::Create | Self::Recreate)
    }
}

/// One entry of the dispatch table.
struct MigrationRule {
    step: Migration,
    applies: fn(u32, u32) -> bool,
    run: fn(&Transaction<'_>) -> rusqlite::Result<()>,
}

fn is_absent(on_disk: u32, declared: u32) -> bool {
    on_disk == 0 && declared > 0
}

fn is_upgrade(on_disk: u32, declared: u32) -> bool {
    on_disk > 0 && on_disk < declared
}

fn is_downgrade(on_disk: u32, declared: u32) -> bool {
    on_disk > declared
}

fn create(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    schema::create_table(tx)
}

fn recreate(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    schema::drop_table(tx)?;
    schema::create_table(tx)
}

fn leave_as_is(_tx: &Transaction<'_>) -> rusqlite::Result<()> {
    Ok(())
}

/// Dispatch table, checked in order.
const MIGRATIONS: &[MigrationRule] = &[
    MigrationRule {
        step: Migration::Create,
        applies: is_absent,
        run: create,
    },
    MigrationRule {
        step: Migration::Recreate,
        applies: is_upgrade,
        run: recreate,
    },
    MigrationRule {
        step: Migration::Downgrade,
        applies: is_downgrade,
        run: leave_as_is,
    },
];

/// Result of bringing a database to the declared version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MigrationOutcome {
    /// Version found on disk before opening.
    pub from: u32,
    /// Version declared by the caller.
    pub declared: u32,
    /// Step that ran.
    pub step: Migration,
}

/// Check that `declared` is a version the database header can store.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` for 0 or anything above
/// [`schema::MAX_USER_VERSION`].
pub fn check_declared(declared: u32) -> Result<()> {
    if declared == 0 || declared > schema::MAX_USER_VERSION {
        return Err(Error::InvalidArgument(format!(
            "schema version must be between 1 and {}, got {declared}",
            schema::MAX_USER_VERSION
        )));
    }
    Ok(())
}

/// Choose the step for an `(on_disk, declared)` pair.
///
/// # Errors
///
/// Returns `Error::SchemaDowngrade` for a downgrade under
/// [`DowngradePolicy::Fail`].
pub fn plan(on_disk: u32, declared: u32, policy: DowngradePolicy) -> Result<Migration> {
    let step = MIGRATIONS
        .iter()
        .find(|rule| (rule.applies)(on_disk, declared))
        .map_or(Migration::Current, |rule| rule.step);

    if step == Migration::Downgrade && policy == DowngradePolicy::Fail {
        return Err(Error::SchemaDowngrade { on_disk, declared });
    }
    Ok(step)
}

/// Bring the database to `declared`, or leave it alone on a tolerated downgrade.
///
/// # Errors
///
/// Returns an error if `declared` is out of range, the version cannot be
/// read, the policy refuses a downgrade, or the migration fails (in which
/// case it is rolled back).
pub fn run_migrations(
    conn: &mut Connection,
    declared: u32,
    policy: DowngradePolicy,
) -> Result<MigrationOutcome> {
    check_declared(declared)?;
    // IMMEDIATE takes the write lock before reading the version, so two
    // openers cannot both decide to create.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let from = schema::user_version(&tx)?;
    let step = plan(from, declared, policy)?;

    if let Some(rule) = MIGRATIONS.iter().find(|rule| rule.step == step) {
        match step {
            Migration::Downgrade => warn!(
                on_disk = from,
                declared, "Database schema is newer than this build; opening as-is"
            ),
            Migration::Recreate => warn!(
                from,
                to = declared, "Recreating schema; existing rows are discarded"
            ),
            _ => info!(from, to = declared, step = step.as_str(), "Applying schema step"),
        }

        (rule.run)(&tx)?;
        if step.writes() {
            schema::set_user_version(&tx, declared)?;
        }
    }

    tx.commit()?;
    Ok(MigrationOutcome {
        from,
        declared,
        step,
    })
}
