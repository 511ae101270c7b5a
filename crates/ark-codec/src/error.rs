use ark_types::TypeError;
use thiserror::Error;

/// Errors from encoding or decoding tokens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The token is not valid URL-safe base64.
    ///
    /// Distinct from field validation failures: a malformed token points at
    /// corruption or tampering rather than ordinary bad input.
    #[error("invalid token {token:?}: {reason}")]
    InvalidToken { token: String, reason: String },

    /// The token decodes to fewer decimal digits than the four fields
    /// require.
    #[error("token {token:?} decodes to {digits} digits, need at least 13")]
    TokenTooShort { token: String, digits: usize },

    /// The decoded value does not fit the representable numeric range.
    /// Overflow is reported, never truncated.
    #[error("token {token:?} exceeds the representable numeric range")]
    Overflow { token: String },

    /// A decoded field is outside its legal domain (forged or corrupted
    /// token), or an input field failed validation before encoding.
    #[error(transparent)]
    Field(#[from] TypeError),
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
