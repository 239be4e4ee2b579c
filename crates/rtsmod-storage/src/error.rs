//! Error types for the storage layer.
//!
//! These errors stay inside the gateway. [`CityRepository`] methods convert
//! them into log lines plus a `bool`/`Option` signal.
//!
//! [`CityRepository`]: crate::CityRepository

use std::path::PathBuf;

/// Errors that can occur while reading or writing city records.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A filesystem operation failed (storage unavailable).
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A record could not be encoded or decoded (malformed record).
    #[error("malformed record at {}: {source}", .path.display())]
    Yaml {
        /// The record involved.
        path: PathBuf,
        /// The underlying YAML error.
        source: serde_yml::Error,
    },

    /// A record file's name is not `<uuid>.yml`.
    #[error("invalid record file name: {}", .0.display())]
    InvalidFileName(PathBuf),
}

impl StorageError {
    /// Wrap an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a YAML error with the path it concerns.
    pub fn yaml(path: impl Into<PathBuf>, source: serde_yml::Error) -> Self {
        Self::Yaml {
            path: path.into(),
            source,
        }
    }
}
