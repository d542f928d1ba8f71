//! Preference snapshot model.

use serde::{Deserialize, Serialize};

/// The last-entered form values as kept by the preference store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceSnapshot {
    pub student_id: String,
    pub grade: String,
}

impl PreferenceSnapshot {
    /// Loaded in place of a missing student ID.
    pub const STUDENT_ID_PLACEHOLDER: &'static str = "Enter student ID:";

    /// Loaded in place of a missing grade.
    pub const GRADE_PLACEHOLDER: &'static str = "Enter student grade:";

    #[must_use]
    pub fn new(student_id: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            grade: grade.into(),
        }
    }

    /// Whether both fields still hold their placeholder text.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.student_id == Self::STUDENT_ID_PLACEHOLDER && self.grade == Self::GRADE_PLACEHOLDER
    }
}

impl Default for PreferenceSnapshot {
    fn default() -> Self {
        Self::new(Self::STUDENT_ID_PLACEHOLDER, Self::GRADE_PLACEHOLDER)
    }
}
