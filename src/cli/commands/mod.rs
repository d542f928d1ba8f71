//! Command implementations.

pub mod completions;
pub mod db;
pub mod grade;
pub mod prefs;
pub mod version;
