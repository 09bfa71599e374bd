//! Error types for dirserve.

use thiserror::Error;

/// Common error type for dirserve.
#[derive(Error, Debug)]
pub enum FileBrowserError {
    /// Requested folder or file does not exist, or the folder could not be
    /// enumerated.
    #[error("{0} not found")]
    NotFound(String),

    /// Requested path resolves outside the served root.
    ///
    /// Callers facing the network must report this exactly like
    /// [`FileBrowserError::NotFound`].
    #[error("path escapes served root: {0}")]
    PathEscape(String),

    /// The served root is missing or is not a directory.
    #[error("invalid root folder: {0}")]
    InvalidRoot(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Upload exceeds the configured size limit (in bytes).
    #[error("file too large (max {0} bytes)")]
    TooLarge(u64),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl FileBrowserError {
    /// Whether this error must be reported to clients as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FileBrowserError::NotFound(_) | FileBrowserError::PathEscape(_)
        )
    }
}

/// Result type alias for dirserve operations.
pub type Result<T> = std::result::Result<T, FileBrowserError>;
