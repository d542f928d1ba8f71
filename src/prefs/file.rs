//! Named key-value preference files.
//!
//! A preference file is a flat JSON object of string values stored at
//! `<dir>/<name>.json`. Reads come from an in-memory copy taken at open;
//! writes are staged on an [`Editor`] and land all at once on
//! [`Editor::commit`] using write-temp-then-rename.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// A named preference file.
#[derive(Debug)]
pub struct PreferenceFile {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl PreferenceFile {
    /// Open the preference file `name` inside `dir`.
    ///
    /// A missing file is treated as empty; it is created on first commit.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` for an unusable name, `Error::Io` if
    /// the file exists but cannot be read and `Error::Json` if it is not a
    /// JSON object of strings.
    pub fn open(dir: &Path, name: &str) -> Result<Self> {
        validate_name(name)?;
        let path = dir.join(format!("{name}.json"));

        let values = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), entries = values.len(), "Opened preference file");
        Ok(Self { path, values })
    }

    /// Bind to the preference file `name` inside `dir` without reading it.
    ///
    /// Committing from an empty handle overwrites whatever is on disk.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` for an unusable name.
    pub fn empty(dir: &Path, name: &str) -> Result<Self> {
        validate_name(name)?;
        Ok(Self {
            path: dir.join(format!("{name}.json")),
            values: BTreeMap::new(),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a string value, falling back to `default` when the key is absent.
    #[must_use]
    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// Whether `key` has a stored value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Stored keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Start a batch of changes.
    pub fn edit(&mut self) -> Editor<'_> {
        Editor {
            file: self,
            clear: false,
            changes: Vec::new(),
        }
    }
}

/// A staged change to a preference file.
#[derive(Debug)]
enum Change {
    Put(String, String),
    Remove(String),
}

/// Batches changes to a [`PreferenceFile`].
///
/// Nothing is written until [`Editor::commit`]. Dropping an editor discards
/// its changes.
#[derive(Debug)]
#[must_use = "changes are discarded unless committed"]
pub struct Editor<'a> {
    file: &'a mut PreferenceFile,
    clear: bool,
    changes: Vec<Change>,
}

impl Editor<'_> {
    /// Stage a string value.
    pub fn put_string(mut self, key: &str, value: &str) -> Self {
        self.changes
            .push(Change::Put(key.to_string(), value.to_string()));
        self
    }

    /// Stage removal of a key.
    pub fn remove(mut self, key: &str) -> Self {
        self.changes.push(Change::Remove(key.to_string()));
        self
    }

    /// Stage removal of every key. Applied before any other staged change.
    pub fn clear(mut self) -> Self {
        self.clear = true;
        self
    }

    /// Write all staged changes synchronously.
    ///
    /// The new contents go to `<name>.json.tmp` (mode 0600 on unix) and are
    /// renamed over the target, so a failed commit leaves the previous file
    /// and the in-memory view untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file cannot
    /// be written or renamed.
    pub fn commit(self) -> Result<()> {
        let mut next = if self.clear {
            BTreeMap::new()
        } else {
            self.file.values.clone()
        };
        for change in self.changes {
            match change {
                Change::Put(key, value) => {
                    next.insert(key, value);
                }
                Change::Remove(key) => {
                    next.remove(&key);
                }
            }
        }

        if let Err(e) = write_atomic(&self.file.path, &next) {
            error!(path = %self.file.path.display(), error = %e, "Preference commit failed");
            return Err(e);
        }

        debug!(path = %self.file.path.display(), entries = next.len(), "Committed preferences");
        self.file.values = next;
        Ok(())
    }
}

fn write_atomic(path: &Path, values: &BTreeMap<String, String>) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| Error::Config(format!("No parent directory for {}", path.display())))?;
    fs::create_dir_all(dir)?;

    let json = serde_json::to_string_pretty(values)?;
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    {
        let mut opts = fs::OpenOptions::new();
        opts.write(true).create(true).truncate(true);
        #[cfg(unix)]
        opts.mode(0o600);
        let mut file = opts.open(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "preference file name must not be empty".to_string(),
        ));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(Error::InvalidArgument(format!(
            "preference file name '{name}' must not contain a path"
        )));
    }
    Ok(())
}
