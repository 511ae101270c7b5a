use thiserror::Error;

/// Errors from file-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The location does not exist, is not a directory, or cannot be read.
    ///
    /// Semantically different from an empty listing; callers must treat
    /// this as a hard stop for the location.
    #[error("location {location:?} unavailable: {reason}")]
    LocationUnavailable { location: String, reason: String },

    /// I/O failure from the underlying filesystem.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
