//! Error types for persistent-state.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=db, 4=validation, 7=config, 8=io)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use thiserror::Error;

/// Result type alias for persistent-state operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Database (exit 2)
    DatabaseError,
    SchemaDowngrade,

    // Validation (exit 4)
    InvalidArgument,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::DatabaseError => "DATABASE_ERROR",
            Self::SchemaDowngrade => "SCHEMA_DOWNGRADE",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::DatabaseError | Self::SchemaDowngrade => 2,
            Self::InvalidArgument => 4,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether retrying with corrected input can succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::InvalidArgument | Self::DatabaseError)
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in persistent-state operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Schema downgrade refused: database is at v{on_disk}, code declares v{declared}")]
    SchemaDowngrade { on_disk: u32, declared: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::SchemaDowngrade { .. } => ErrorCode::SchemaDowngrade,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::SchemaDowngrade { on_disk, .. } => Some(format!(
                "Run with `--schema-version {on_disk}` or drop `--strict-downgrade` to open the \
                 database as-is."
            )),

            Self::Json(_) => Some(
                "The preferences file is not valid JSON. `pstate prefs clear` rewrites it."
                    .to_string(),
            ),

            Self::Config(msg) if msg.contains("home directory") => Some(
                "Pass `--data-dir` or set PS_DATA_DIR to choose where data is stored.".to_string(),
            ),

            Self::Database(_) | Self::Io(_) | Self::InvalidArgument(_) | Self::Config(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_category() {
        let downgrade = Error::SchemaDowngrade {
            on_disk: 3,
            declared: 1,
        };
        assert_eq!(downgrade.exit_code(), 2);
        assert_eq!(Error::InvalidArgument("x".into()).exit_code(), 4);
        assert_eq!(Error::Config("x".into()).exit_code(), 7);
        let io = Error::Io(std::io::Error::other("x"));
        assert_eq!(io.exit_code(), 8);
    }

    #[test]
    fn test_structured_json_includes_hint() {
        let err = Error::SchemaDowngrade {
            on_disk: 2,
            declared: 1,
        };
        let json = err.to_structured_json();
        assert_eq!(json["error"]["code"], "SCHEMA_DOWNGRADE");
        assert_eq!(json["error"]["exit_code"], 2);
        assert!(json["error"]["hint"]
            .as_str()
            .unwrap()
            .contains("--schema-version 2"));
    }

    #[test]
    fn test_structured_json_without_hint() {
        let json = Error::InvalidArgument("boom".into()).to_structured_json();
        assert_eq!(json["error"]["message"], "Invalid argument: boom");
        assert_eq!(json["error"]["retryable"], true);
        assert!(json["error"].get("hint").is_none());
    }
}
