//! Grade record model.
//!
//! One row of the `students` table.

use serde::{Deserialize, Serialize};

/// A persisted grade record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeRecord {
    /// Assigned by the record store on insert; never reused.
    pub id: i64,

    /// Free-form student identifier.
    pub student_id: String,

    /// Free-form grade text.
    pub grade: String,
}

/// A grade record that has not been inserted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGradeRecord {
    pub student_id: String,
    pub grade: String,
}

impl NewGradeRecord {
    #[must_use]
    pub fn new(student_id: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            grade: grade.into(),
        }
    }

    /// Attach the id the store assigned.
    #[must_use]
    pub fn with_id(self, id: i64) -> GradeRecord {
        GradeRecord {
            id,
            student_id: self.student_id,
            grade: self.grade,
        }
    }
}

/// Ordering of query results by student ID.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// SQL keyword for this order.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Parameters for [`crate::storage::RecordStore::query_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    /// Only return rows whose student ID equals this value.
    pub student_id: Option<String>,

    /// Order by student ID.
    pub order: SortOrder,
}

impl RecordQuery {
    /// Every row, ascending by student ID.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn student(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    #[must_use]
    pub fn descending(mut self) -> Self {
        self.order = SortOrder::Descending;
        self
    }
}
