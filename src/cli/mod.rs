//! CLI definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Keep a student ID and grade across runs
#[derive(Parser, Debug)]
#[command(name = "pstate", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (default: ~/.persistent-state/data)
    #[arg(long, global = true, env = "PS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Record store path (default: <data-dir>/databases/CoolDatabase.db)
    #[arg(long, global = true, env = "PS_DB")]
    pub db: Option<PathBuf>,

    /// Preference file name (default: MySenecaPrefs)
    #[arg(long, global = true, env = "PS_PREFS_NAME")]
    pub prefs_name: Option<String>,

    /// Schema version to open the record store with
    #[arg(long, global = true)]
    pub schema_version: Option<u32>,

    /// Fail instead of opening a database with a newer schema
    #[arg(long, global = true)]
    pub strict_downgrade: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print version information
    Version,

    /// Saved form values
    Prefs {
        #[command(subcommand)]
        command: PrefsCommands,
    },

    /// Grade records
    Grade {
        #[command(subcommand)]
        command: GradeCommands,
    },

    /// Record store database
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub use clap_complete::Shell;

// ============================================================================
// Prefs Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum PrefsCommands {
    /// Show the saved form values
    Show,

    /// Change saved form values
    Set {
        /// Student ID
        #[arg(long)]
        student_id: Option<String>,

        /// Grade
        #[arg(long)]
        grade: Option<String>,
    },

    /// Forget the saved form values
    Clear,
}

// ============================================================================
// Grade Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum GradeCommands {
    /// Save a grade record (fields default to the saved form values)
    Save {
        /// Student ID
        #[arg(long)]
        student_id: Option<String>,

        /// Grade
        #[arg(long)]
        grade: Option<String>,
    },

    /// List grade records
    List {
        /// Only records for this student ID
        #[arg(long)]
        student_id: Option<String>,

        /// Sort by student ID descending
        #[arg(long)]
        desc: bool,
    },
}

// ============================================================================
// Db Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum DbCommands {
    /// Show database path, schema version and row count
    Status,
}
