//! Db command implementations.
//!
//! `db status` inspects the record store without migrating it: it reports
//! what the next open would do but never runs the schema step.

use crate::cli::DbCommands;
use crate::config::Settings;
use crate::error::Result;
use crate::storage::{migrations, schema};
use colored::Colorize;
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;

/// Output for db status.
#[derive(Serialize)]
struct StatusOutput {
    path: String,
    exists: bool,
    on_disk_version: u32,
    declared_version: u32,
    /// Step the next open would run, or `null` if the open would be refused.
    next_step: Option<&'static str>,
    records: usize,
}

/// Execute db commands.
///
/// # Errors
///
/// Returns an error if an existing database cannot be read.
pub fn execute(command: &DbCommands, settings: &Settings, json: bool) -> Result<()> {
    match command {
        DbCommands::Status => status(settings, json),
    }
}

fn status(settings: &Settings, json: bool) -> Result<()> {
    let path = &settings.db_path;
    let exists = path.exists();

    let (on_disk_version, records) = if exists {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_WRITE)?;
        let version = schema::user_version(&conn)?;
        let records = if schema::table_exists(&conn)? {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
            usize::try_from(n).unwrap_or(0)
        } else {
            0
        };
        (version, records)
    } else {
        (0, 0)
    };

    let next_step = migrations::plan(
        on_disk_version,
        settings.schema_version,
        settings.downgrade_policy,
    )
    .ok()
    .map(|step| step.as_str());

    let output = StatusOutput {
        path: path.display().to_string(),
        exists,
        on_disk_version,
        declared_version: settings.schema_version,
        next_step,
        records,
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("Database:  {}", output.path);
    if !exists {
        println!("  {}", "not created yet".dimmed());
    }
    println!(
        "Schema:    v{} on disk, v{} declared",
        output.on_disk_version, output.declared_version
    );
    match output.next_step {
        Some("current" | "create") => {}
        Some("recreate") => println!(
            "  {}",
            "next open recreates the table and discards all records".yellow()
        ),
        Some(step) => println!("  next open: {step}"),
        None => println!("  {}", "next open is refused (strict downgrade)".red()),
    }
    println!("Records:   {}", output.records);
    Ok(())
}
