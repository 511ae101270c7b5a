//! Compact identifier codec for ARK.
//!
//! Packs an [`AssetId`](ark_types::AssetId) into a short, URL-safe,
//! unpadded [`Token`] used as the stored object's file name, and reverses
//! the transformation exactly.
//!
//! # Wire format
//!
//! The four fields are concatenated as decimal digits:
//!
//! ```text
//! app(1 digit) || variant(1 digit) || created_at(10 digits, zero-padded) || owner(1+ digits)
//! ```
//!
//! The concatenation is parsed as one unsigned integer, serialized as its
//! minimal big-endian byte string, and base64-encoded with the URL-safe
//! alphabet, padding stripped. The fixed ten-digit timestamp width is what
//! lets the decoder find the boundary between the timestamp and the
//! variable-width owner field; the leading application digit is never zero,
//! so the integer form never loses a digit.
//!
//! Round-trip law: `decode(&encode(id)?)? == id` for every identity whose
//! fields are inside their legal domains.

pub mod codec;
pub mod error;
pub mod token;

pub use codec::{decode, encode};
pub use error::{CodecError, CodecResult};
pub use token::Token;
