//! Data models for persistent-state.
//!
//! - `GradeRecord` / `NewGradeRecord` - rows of the record store
//! - `RecordQuery` - filter and ordering for record queries
//! - `PreferenceSnapshot` - the two values kept in the preference store

pub mod record;
pub mod snapshot;

pub use record::{GradeRecord, NewGradeRecord, RecordQuery, SortOrder};
pub use snapshot::PreferenceSnapshot;
