//! persistent-state - keep a student ID and grade across runs
//!
//! Two independent local stores, coordinated only by the screen controller:
//!
//! - [`prefs`] - Named key-value preference file holding the last form values
//! - [`storage`] - Schema-versioned SQLite table of grade records
//! - [`app`] - Screen controller and form view-model
//! - [`model`] - Data types (GradeRecord, PreferenceSnapshot, RecordQuery)
//! - [`config`] - Data directory and path resolution
//! - [`cli`] - Command-line interface using clap
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod prefs;
pub mod storage;

pub use error::{Error, Result};
