//! Configuration management.
//!
//! Resolves where the two stores live and which schema version the record
//! store is opened with.
//!
//! # Layout
//!
//! Everything lives under one data directory (default
//! `~/.persistent-state/data/`):
//! - `shared_prefs/<name>.json` — the preference file
//! - `databases/CoolDatabase.db` — the record store

use crate::error::{Error, Result};
use crate::storage::{migrations, DowngradePolicy};

use std::path::{Path, PathBuf};

/// File name of the record store database.
pub const DB_NAME: &str = "CoolDatabase.db";

/// Schema version this build of the record store declares.
///
/// Bump this whenever the `students` table changes shape. Opening an older
/// database recreates the table and discards its rows.
pub const DB_VERSION: u32 = 1;

/// Default name of the preference file (without extension).
pub const PREF_FILE_NAME: &str = "MySenecaPrefs";

/// Get the global persistent-state directory location (`~/.persistent-state/`).
#[must_use]
pub fn global_root_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".persistent-state"))
}

/// Check if test mode is enabled.
///
/// Test mode is enabled by setting `PS_TEST_DATA=1` (or any non-empty value
/// other than `0`/`false`). It redirects both stores to an isolated directory.
#[must_use]
pub fn is_test_mode() -> bool {
    std::env::var("PS_TEST_DATA")
        .map(|v| is_truthy(&v))
        .unwrap_or(false)
}

fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "0" && value.to_lowercase() != "false"
}

/// Resolve the data directory.
///
/// Priority:
/// 1. `explicit` (from `--data-dir` / `PS_DATA_DIR`)
/// 2. `PS_TEST_DATA` → `~/.persistent-state/test`
/// 3. `~/.persistent-state/data`
///
/// # Errors
///
/// Returns `Error::Config` if no home directory can be determined.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let root = global_root_dir().ok_or_else(|| {
        Error::Config("Could not determine home directory for data storage".to_string())
    })?;

    if is_test_mode() {
        Ok(root.join("test"))
    } else {
        Ok(root.join("data"))
    }
}

/// Directory holding preference files.
#[must_use]
pub fn prefs_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("shared_prefs")
}

/// Resolve the record store path.
///
/// An explicit path (from `--db` / `PS_DB`) wins over
/// `<data_dir>/databases/CoolDatabase.db`.
#[must_use]
pub fn resolve_db_path(explicit: Option<&Path>, data_dir: &Path) -> PathBuf {
    explicit.map_or_else(
        || data_dir.join("databases").join(DB_NAME),
        Path::to_path_buf,
    )
}

/// Fully resolved settings shared by every command.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root data directory.
    pub data_dir: PathBuf,
    /// Record store database file.
    pub db_path: PathBuf,
    /// Preference file name (without extension).
    pub prefs_name: String,
    /// Schema version the record store is opened with.
    pub schema_version: u32,
    /// What to do when the database on disk is newer than `schema_version`.
    pub downgrade_policy: DowngradePolicy,
}

impl Settings {
    /// Settings rooted at `data_dir` with every other value at its default.
    #[must_use]
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            db_path: resolve_db_path(None, data_dir),
            prefs_name: PREF_FILE_NAME.to_string(),
            schema_version: DB_VERSION,
            downgrade_policy: DowngradePolicy::Ignore,
        }
    }

    /// Resolve settings from command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be determined or the
    /// schema version does not fit the database header.
    pub fn resolve(
        data_dir: Option<&Path>,
        db_path: Option<&Path>,
        prefs_name: Option<&str>,
        schema_version: Option<u32>,
        strict_downgrade: bool,
    ) -> Result<Self> {
        let data_dir = resolve_data_dir(data_dir)?;
        let schema_version = schema_version.unwrap_or(DB_VERSION);
        migrations::check_declared(schema_version)?;

        Ok(Self {
            db_path: resolve_db_path(db_path, &data_dir),
            prefs_name: prefs_name.unwrap_or(PREF_FILE_NAME).to_string(),
            schema_version,
            downgrade_policy: if strict_downgrade {
                DowngradePolicy::Fail
            } else {
                DowngradePolicy::Ignore
            },
            data_dir,
        })
    }

    /// Directory holding preference files for these settings.
    #[must_use]
    pub fn prefs_dir(&self) -> PathBuf {
        prefs_dir(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_data_dir_with_explicit() {
        let explicit = PathBuf::from("/custom/data");
        assert_eq!(resolve_data_dir(Some(&explicit)).unwrap(), explicit);
    }

    #[test]
    fn test_resolve_db_path_default_layout() {
        let path = resolve_db_path(None, Path::new("/data"));
        assert_eq!(path, PathBuf::from("/data/databases/CoolDatabase.db"));
    }

    #[test]
    fn test_resolve_db_path_explicit_wins() {
        let explicit = PathBuf::from("/tmp/other.db");
        assert_eq!(resolve_db_path(Some(&explicit), Path::new("/data")), explicit);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::resolve(Some(Path::new("/d")), None, None, None, false).unwrap();
        assert_eq!(settings.prefs_name, PREF_FILE_NAME);
        assert_eq!(settings.schema_version, DB_VERSION);
        assert_eq!(settings.downgrade_policy, DowngradePolicy::Ignore);
        assert_eq!(settings.prefs_dir(), PathBuf::from("/d/shared_prefs"));
    }

    #[test]
    fn test_settings_strict_downgrade() {
        let settings =
            Settings::resolve(Some(Path::new("/d")), None, Some("Other"), Some(3), true).unwrap();
        assert_eq!(settings.prefs_name, "Other");
        assert_eq!(settings.schema_version, 3);
        assert_eq!(settings.downgrade_policy, DowngradePolicy::Fail);
    }

    #[test]
    fn test_settings_rejects_version_zero() {
        let err = Settings::resolve(Some(Path::new("/d")), None, None, Some(0), false).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_settings_rejects_version_beyond_header_range() {
        let d = Path::new("/d");
        let err = Settings::resolve(Some(d), None, None, Some(3_000_000_000), false).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(err.exit_code(), 4);

        let max = u32::try_from(i32::MAX).unwrap();
        let settings = Settings::resolve(Some(d), None, None, Some(max), false).unwrap();
        assert_eq!(settings.schema_version, max);
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(""));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("FALSE"));
        assert!(is_truthy("1"));
        assert!(is_truthy("yes"));
    }
}
