//! Error types for Strata.
//!
//! Only run-level failures live here. Per-file extraction problems are
//! logged and skipped, and contract violations are reported as data.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a generation or verification run.
#[derive(Debug, Error)]
pub enum StrataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A required input (e.g. the type declarations source) does not exist.
    #[error("required {what} not found at {}", path.display())]
    MissingInput { what: &'static str, path: PathBuf },

    /// The graph holds no type definitions, so the declarations source
    /// produced nothing usable.
    #[error("refusing to write {}: graph has no type definitions", path.display())]
    NoTypes { path: PathBuf },

    #[error("graph snapshot not found: {}", path.display())]
    SnapshotNotFound { path: PathBuf },

    #[error("invalid graph snapshot {}: {reason}", path.display())]
    SnapshotInvalid { path: PathBuf, reason: String },
}

impl StrataError {
    /// True for failures that mean "the snapshot could not be loaded at all".
    pub fn is_snapshot_error(&self) -> bool {
        matches!(
            self,
            StrataError::SnapshotNotFound { .. } | StrataError::SnapshotInvalid { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, StrataError>;
