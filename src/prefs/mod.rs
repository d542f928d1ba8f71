//! Preference store for the last-entered form values.
//!
//! Wraps a [`PreferenceFile`] and maps the two form fields onto the fixed
//! keys `studentID` and `studentGrade`.

mod file;

pub use file::{Editor, PreferenceFile};

use crate::error::{Error, Result};
use crate::model::PreferenceSnapshot;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Key holding the student ID.
pub const STUDENT_ID_KEY: &str = "studentID";

/// Key holding the grade.
pub const STUDENT_GRADE_KEY: &str = "studentGrade";

/// Stores a [`PreferenceSnapshot`] in a named preference file.
///
/// The file is reopened on every call, so each operation sees what is on
/// disk at that moment and holds no handle afterwards.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    dir: PathBuf,
    name: String,
}

impl PreferenceStore {
    /// Create a store for preference file `name` inside `dir`.
    #[must_use]
    pub fn new(dir: &Path, name: &str) -> Self {
        Self {
            dir: dir.to_path_buf(),
            name: name.to_string(),
        }
    }

    /// Path of the backing preference file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.name))
    }

    /// Load the snapshot, substituting placeholders for absent keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the preference file exists but cannot be read.
    pub fn load(&self) -> Result<PreferenceSnapshot> {
        let file = PreferenceFile::open(&self.dir, &self.name)?;
        Ok(PreferenceSnapshot {
            student_id: file.get_string(
                STUDENT_ID_KEY,
                PreferenceSnapshot::STUDENT_ID_PLACEHOLDER,
            ),
            grade: file.get_string(
                STUDENT_GRADE_KEY,
                PreferenceSnapshot::GRADE_PLACEHOLDER,
            ),
        })
    }

    /// Replace both stored values in a single commit.
    ///
    /// A corrupt file is replaced by one holding only the new values.
    ///
    /// # Errors
    ///
    /// Returns an error if the preference file cannot be read or written.
    pub fn save(&self, snapshot: &PreferenceSnapshot) -> Result<()> {
        let mut file = self.open_or_replace()?;
        file.edit()
            .put_string(STUDENT_ID_KEY, &snapshot.student_id)
            .put_string(STUDENT_GRADE_KEY, &snapshot.grade)
            .commit()?;

        info!(path = %file.path().display(), "Saved preferences");
        Ok(())
    }

    /// Forget both stored values so the next load returns placeholders.
    ///
    /// Other keys in the file are kept. A corrupt file is replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the preference file cannot be written.
    pub fn clear(&self) -> Result<()> {
        self.open_or_replace()?
            .edit()
            .remove(STUDENT_ID_KEY)
            .remove(STUDENT_GRADE_KEY)
            .commit()?;

        info!(path = %self.path().display(), "Cleared preferences");
        Ok(())
    }

    /// Open the file, starting from an empty one if it does not parse.
    fn open_or_replace(&self) -> Result<PreferenceFile> {
        match PreferenceFile::open(&self.dir, &self.name) {
            Err(Error::Json(e)) => {
                warn!(path = %self.path().display(), error = %e, "Replacing unreadable preference file");
                PreferenceFile::empty(&self.dir, &self.name)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn snapshot(student_id: &str, grade: &str) -> PreferenceSnapshot {
        PreferenceSnapshot {
            student_id: student_id.to_string(),
            grade: grade.to_string(),
        }
    }

    #[test]
    fn test_fresh_store_loads_placeholders() {
        let temp = TempDir::new().unwrap();
        let store = PreferenceStore::new(temp.path(), "MySenecaPrefs");

        let loaded = store.load().unwrap();
        assert_eq!(loaded.student_id, "Enter student ID:");
        assert_eq!(loaded.grade, "Enter student grade:");
        assert_eq!(loaded, PreferenceSnapshot::default());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let temp = TempDir::new().unwrap();
        let store = PreferenceStore::new(temp.path(), "MySenecaPrefs");

        for (id, grade) in [("N01234567", "A"), ("", ""), ("ünïcødé", "B+ \"quoted\"\n")] {
            store.save(&snapshot(id, grade)).unwrap();
            assert_eq!(store.load().unwrap(), snapshot(id, grade));
        }
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp = TempDir::new().unwrap();
        PreferenceStore::new(temp.path(), "MySenecaPrefs")
            .save(&snapshot("N01234567", "A"))
            .unwrap();

        let reopened = PreferenceStore::new(temp.path(), "MySenecaPrefs");
        let loaded = reopened.load().unwrap();
        assert_eq!(loaded.student_id, "N01234567");
        assert_eq!(loaded.grade, "A");
    }

    #[test]
    fn test_uses_fixed_keys() {
        let temp = TempDir::new().unwrap();
        let store = PreferenceStore::new(temp.path(), "MySenecaPrefs");
        store.save(&snapshot("N1", "C")).unwrap();

        let file = PreferenceFile::open(temp.path(), "MySenecaPrefs").unwrap();
        assert_eq!(file.get_string("studentID", ""), "N1");
        assert_eq!(file.get_string("studentGrade", ""), "C");
    }

    #[test]
    fn test_separate_names_do_not_share_values() {
        let temp = TempDir::new().unwrap();
        PreferenceStore::new(temp.path(), "One")
            .save(&snapshot("N1", "A"))
            .unwrap();

        let other = PreferenceStore::new(temp.path(), "Two").load().unwrap();
        assert_eq!(other, PreferenceSnapshot::default());
    }

    #[test]
    fn test_clear_restores_placeholders_and_keeps_other_keys() {
        let temp = TempDir::new().unwrap();
        let store = PreferenceStore::new(temp.path(), "MySenecaPrefs");
        store.save(&snapshot("N1", "A")).unwrap();
        {
            let mut file = PreferenceFile::open(temp.path(), "MySenecaPrefs").unwrap();
            file.edit().put_string("theme", "dark").commit().unwrap();
        }

        store.clear().unwrap();

        assert_eq!(store.load().unwrap(), PreferenceSnapshot::default());
        let file = PreferenceFile::open(temp.path(), "MySenecaPrefs").unwrap();
        assert_eq!(file.get_string("theme", ""), "dark");
    }

    #[test]
    fn test_clear_replaces_corrupt_file() {
        let temp = TempDir::new().unwrap();
        let store = PreferenceStore::new(temp.path(), "MySenecaPrefs");
        std::fs::write(store.path(), "garbage").unwrap();
        assert!(store.load().is_err());

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), PreferenceSnapshot::default());
    }

    #[test]
    fn test_save_replaces_corrupt_file() {
        let temp = TempDir::new().unwrap();
        let store = PreferenceStore::new(temp.path(), "MySenecaPrefs");
        std::fs::write(store.path(), "{bad").unwrap();
        assert!(matches!(store.load(), Err(Error::Json(_))));

        store.save(&snapshot("N01234567", "A")).unwrap();
        assert_eq!(store.load().unwrap(), snapshot("N01234567", "A"));

        // Saving again goes through the normal merge path
        store.save(&snapshot("N7", "B")).unwrap();
        assert_eq!(store.load().unwrap(), snapshot("N7", "B"));
    }
}
