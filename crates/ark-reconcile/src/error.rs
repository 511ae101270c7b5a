use ark_store::StoreError;
use ark_types::TypeError;
use thiserror::Error;

/// Errors from reconciliation and repair operations.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The file store failed; the audit for that location aborts rather
    /// than silently reporting an empty set.
    #[error("file store: {0}")]
    Store(#[from] StoreError),

    /// The record store failed to load or write back.
    #[error("record store: {reason}")]
    Records { reason: String },

    /// A write-back targeted an owner the record store does not know.
    #[error("no record for owner {owner}")]
    UnknownOwner { owner: u64 },

    /// Catalog or field construction failure.
    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Result alias for reconciliation operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;
