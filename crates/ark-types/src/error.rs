use thiserror::Error;

/// Errors from constructing or looking up foundation types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    /// Application id outside the encodable domain.
    #[error("invalid application id: {value} (allowed 1-9)")]
    InvalidAppId { value: u8 },

    /// Variant id outside the encodable domain.
    #[error("invalid variant id: {value} (allowed 0-9)")]
    InvalidVariantId { value: u8 },

    /// Owner ids are strictly positive.
    #[error("invalid owner id: {value} (must be >= 1)")]
    InvalidOwnerId { value: u64 },

    /// The timestamp is not a representable calendar instant or exceeds
    /// the ten-decimal-digit encoding cap.
    #[error("invalid timestamp: {value} (must be a calendar instant <= {max})", max = crate::temporal::CreatedAt::MAX_SECS)]
    InvalidTimestamp { value: u64 },

    /// The application id is not present in the catalog.
    #[error("unknown application id: {id}")]
    UnknownApp { id: u8 },

    /// The variant id is not present in the catalog.
    #[error("unknown variant id: {id}")]
    UnknownVariant { id: u8 },

    /// No catalog variant carries this name.
    #[error("unknown variant name: {name:?}")]
    UnknownVariantName { name: String },

    /// Two catalog entries share a variant id.
    #[error("duplicate variant id in catalog: {id}")]
    DuplicateVariant { id: u8 },
}

/// Result alias for type construction.
pub type TypeResult<T> = Result<T, TypeError>;
