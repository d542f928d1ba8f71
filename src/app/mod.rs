//! Screen controller.
//!
//! Coordinates the two stores the way the single form screen does:
//! preferences are restored on create and written on stop, and the save
//! button appends a record. The form values live in an explicit
//! [`FormState`] rather than in any UI toolkit.

use crate::config::Settings;
use crate::error::Result;
use crate::model::{GradeRecord, NewGradeRecord, PreferenceSnapshot, RecordQuery};
use crate::prefs::PreferenceStore;
use crate::storage::{Migration, RecordStore};
use serde::Serialize;
use tracing::{error, info, warn};

/// Current contents of the two form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
    student_id: String,
    grade: String,
}

impl FormState {
    #[must_use]
    pub fn new(student_id: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            grade: grade.into(),
        }
    }

    #[must_use]
    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    #[must_use]
    pub fn grade(&self) -> &str {
        &self.grade
    }

    pub fn set_student_id(&mut self, value: impl Into<String>) {
        self.student_id = value.into();
    }

    pub fn set_grade(&mut self, value: impl Into<String>) {
        self.grade = value.into();
    }

    /// The record the save button writes.
    ///
    /// Takes each column from its own field. (An earlier form wrote the
    /// student ID into both columns.)
    #[must_use]
    pub fn to_record(&self) -> NewGradeRecord {
        NewGradeRecord::new(&self.student_id, &self.grade)
    }
}

impl From<PreferenceSnapshot> for FormState {
    fn from(snapshot: PreferenceSnapshot) -> Self {
        Self::new(snapshot.student_id, snapshot.grade)
    }
}

impl From<&FormState> for PreferenceSnapshot {
    fn from(form: &FormState) -> Self {
        Self::new(&form.student_id, &form.grade)
    }
}

/// Result of pressing the save button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    pub record: GradeRecord,
    /// Schema step that ran while opening the record store.
    pub migration: Migration,
}

/// Lifecycle handlers for the form screen.
#[derive(Debug, Clone)]
pub struct Screen {
    settings: Settings,
    prefs: PreferenceStore,
}

impl Screen {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let prefs = PreferenceStore::new(&settings.prefs_dir(), &settings.prefs_name);
        Self { settings, prefs }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn preferences(&self) -> &PreferenceStore {
        &self.prefs
    }

    /// Restore the form from preferences.
    ///
    /// An unreadable preference file is logged and the placeholders are used.
    #[must_use]
    pub fn on_create(&self) -> FormState {
        match self.prefs.load() {
            Ok(snapshot) => snapshot.into(),
            Err(e) => {
                warn!(path = %self.prefs.path().display(), error = %e, "Could not load preferences; using placeholders");
                PreferenceSnapshot::default().into()
            }
        }
    }

    /// Append the current form values to the record store.
    ///
    /// The store is opened for this call only and closed before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened or the insert fails.
    pub fn on_save_grade(&self, form: &FormState) -> Result<SaveOutcome> {
        let record = form.to_record();
        info!(student_id = %record.student_id, grade = %record.grade, "Writing to database");

        let mut store = RecordStore::open_with(
            &self.settings.db_path,
            self.settings.schema_version,
            self.settings.downgrade_policy,
        )?;
        let id = store.insert(&record)?;

        info!(id, "Grade saved");
        Ok(SaveOutcome {
            record: record.with_id(id),
            migration: store.migration().step,
        })
    }

    /// Persist the form values to preferences.
    ///
    /// # Errors
    ///
    /// Returns an error if the preference file cannot be written.
    pub fn on_stop(&self, form: &FormState) -> Result<()> {
        self.prefs.save(&form.into()).inspect_err(|e| {
            error!(path = %self.prefs.path().display(), error = %e, "Could not save preferences");
        })
    }

    /// Read records back from the store.
    ///
    /// A database that was never created reads as empty and is not created.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing store cannot be opened or queried.
    pub fn load_records(&self, query: &RecordQuery) -> Result<Vec<GradeRecord>> {
        if !self.settings.db_path.exists() {
            return Ok(Vec::new());
        }
        let store = RecordStore::open_with(
            &self.settings.db_path,
            self.settings.schema_version,
            self.settings.downgrade_policy,
        )?;
        store.query_all(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DowngradePolicy;
    use tempfile::TempDir;

    fn screen(temp: &TempDir) -> Screen {
        Screen::new(Settings::in_dir(temp.path()))
    }

    #[test]
    fn test_first_create_shows_placeholders() {
        let temp = TempDir::new().unwrap();
        let form = screen(&temp).on_create();
        assert_eq!(form.student_id(), "Enter student ID:");
        assert_eq!(form.grade(), "Enter student grade:");
    }

    #[test]
    fn test_stop_then_create_restores_form() {
        let temp = TempDir::new().unwrap();
        let first = screen(&temp);
        let mut form = first.on_create();
        form.set_student_id("N01234567");
        form.set_grade("A");
        first.on_stop(&form).unwrap();

        let restored = screen(&temp).on_create();
        assert_eq!(restored, FormState::new("N01234567", "A"));
    }

    #[test]
    fn test_create_falls_back_on_corrupt_preferences() {
        let temp = TempDir::new().unwrap();
        let screen = screen(&temp);
        std::fs::create_dir_all(screen.settings().prefs_dir()).unwrap();
        std::fs::write(screen.preferences().path(), "[1, 2").unwrap();

        let form = screen.on_create();
        assert_eq!(form, FormState::from(PreferenceSnapshot::default()));
    }

    #[test]
    fn test_stop_recovers_from_corrupt_preferences() {
        let temp = TempDir::new().unwrap();
        let screen = screen(&temp);
        std::fs::create_dir_all(screen.settings().prefs_dir()).unwrap();
        std::fs::write(screen.preferences().path(), "{bad").unwrap();

        let form = FormState::new("N01234567", "A");
        screen.on_stop(&form).unwrap();
        screen.on_stop(&form).unwrap();
        assert_eq!(screen.on_create(), form);
    }

    #[test]
    fn test_save_grade_persists_grade_field_not_student_id() {
        let temp = TempDir::new().unwrap();
        let screen = screen(&temp);

        let outcome = screen.on_save_grade(&FormState::new("N01234567", "A")).unwrap();
        assert_eq!(outcome.record.grade, "A");
        assert_eq!(outcome.migration, Migration::Create);

        let stored = screen.load_records(&RecordQuery::all()).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].student_id, "N01234567");
        assert_eq!(stored[0].grade, "A");
        assert_ne!(stored[0].grade, stored[0].student_id);
    }

    #[test]
    fn test_each_save_appends_a_row() {
        let temp = TempDir::new().unwrap();
        let screen = screen(&temp);

        let a = screen.on_save_grade(&FormState::new("N1", "A")).unwrap();
        let b = screen.on_save_grade(&FormState::new("N1", "A")).unwrap();
        assert_ne!(a.record.id, b.record.id);
        assert_eq!(b.migration, Migration::Current);
        assert_eq!(screen.load_records(&RecordQuery::all()).unwrap().len(), 2);
    }

    #[test]
    fn test_saving_grade_does_not_touch_preferences() {
        let temp = TempDir::new().unwrap();
        let screen = screen(&temp);
        screen.on_save_grade(&FormState::new("N1", "A")).unwrap();

        assert!(!screen.preferences().path().exists());
        assert_eq!(screen.on_create(), FormState::from(PreferenceSnapshot::default()));
    }

    #[test]
    fn test_load_records_without_database_is_empty() {
        let temp = TempDir::new().unwrap();
        let screen = screen(&temp);
        assert!(screen.load_records(&RecordQuery::all()).unwrap().is_empty());
        assert!(!screen.settings().db_path.exists());
    }

    #[test]
    fn test_strict_screen_refuses_newer_database() {
        let temp = TempDir::new().unwrap();
        let mut settings = Settings::in_dir(temp.path());
        settings.schema_version = 2;
        Screen::new(settings.clone())
            .on_save_grade(&FormState::new("N1", "A"))
            .unwrap();

        settings.schema_version = 1;
        settings.downgrade_policy = DowngradePolicy::Fail;
        let strict = Screen::new(settings);
        assert!(strict.on_save_grade(&FormState::new("N2", "B")).is_err());
        assert!(strict.load_records(&RecordQuery::all()).is_err());
    }
}
