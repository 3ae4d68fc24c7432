//! Error types for `fsview-core`.
//!
//! All fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`.

use std::path::{Path, PathBuf};

/// Unified error type for all core operations.
///
/// Each variant captures just enough context for the caller to display
/// a meaningful message or offer a refresh.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The target path does not exist (or is not part of the current view).
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to access the path.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// A directory was expected but the path points to a file.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A proposed file name is invalid (empty, unchanged, contains separators, etc.).
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// The filesystem refused the rename.
    #[error("rename failed: {path}")]
    RenameFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The filesystem refused the delete. The entry may still be (partially) present.
    #[error("delete failed: {path}")]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A walk was stopped through its cancellation token.
    #[error("operation cancelled")]
    Cancelled,

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// A blocking worker task panicked or was aborted.
    #[error("worker error: {0}")]
    Worker(String),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Maps an I/O error on `path` to the most specific variant.
    pub(crate) fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => CoreError::PermissionDenied(path.to_path_buf()),
            std::io::ErrorKind::NotADirectory => CoreError::NotADirectory(path.to_path_buf()),
            _ => CoreError::Io(err),
        }
    }
}

/// Convenience alias used throughout `fsview-core`.
pub type CoreResult<T> = Result<T, CoreError>;
