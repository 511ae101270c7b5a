//! Encode and decode between [`AssetId`] and [`Token`].

use ark_types::AssetId;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::{CodecError, CodecResult};
use crate::token::Token;

/// Decimal digits in the fixed-width prefix: app(1) + variant(1) + ts(10).
const FIXED_DIGITS: usize = 12;

/// Minimum decimal digits in a decoded token: the fixed prefix plus at
/// least one owner digit.
const MIN_DIGITS: usize = FIXED_DIGITS + 1;

/// Encode an asset identity into its token form.
///
/// The digit concatenation always fits in a `u128`: twelve fixed digits
/// plus at most twenty owner digits. Overflow is still checked rather than
/// assumed away.
pub fn encode(id: &AssetId) -> CodecResult<Token> {
    let digits = format!(
        "{}{}{:010}{}",
        id.app,
        id.variant,
        id.created_at.as_secs(),
        id.owner
    );
    let value: u128 = digits.parse().map_err(|_| CodecError::Overflow {
        token: digits.clone(),
    })?;

    let bytes = value.to_be_bytes();
    // Minimal representation: the leading app digit is >= 1, so the value
    // is never zero and at least one byte survives.
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len() - 1);
    let encoded = URL_SAFE_NO_PAD.encode(&bytes[start..]);

    Ok(Token::from_encoded(encoded))
}

/// Decode a token back into the asset identity it was minted from.
///
/// Accepts tokens with or without trailing `=` padding. Every decoded
/// field is re-validated, so forged or corrupted tokens surface as typed
/// errors instead of out-of-domain identities.
pub fn decode(token: &str) -> CodecResult<AssetId> {
    if token.is_empty() {
        return Err(CodecError::InvalidToken {
            token: token.to_string(),
            reason: "empty token".to_string(),
        });
    }

    // Stored tokens are unpadded; tolerate padded copies from operators.
    let trimmed = token.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(trimmed)
        .map_err(|e| CodecError::InvalidToken {
            token: token.to_string(),
            reason: e.to_string(),
        })?;

    if bytes.len() > 16 {
        return Err(CodecError::Overflow {
            token: token.to_string(),
        });
    }
    let mut value: u128 = 0;
    for byte in &bytes {
        value = (value << 8) | u128::from(*byte);
    }

    let digits = value.to_string();
    if digits.len() < MIN_DIGITS {
        return Err(CodecError::TokenTooShort {
            token: token.to_string(),
            digits: digits.len(),
        });
    }

    // Fixed-width slices; the ten-digit timestamp ends where the owner
    // field begins.
    let app: u8 = parse_field(&digits[0..1], token)?;
    let variant: u8 = parse_field(&digits[1..2], token)?;
    let created_at: u64 = parse_field(&digits[2..FIXED_DIGITS], token)?;
    let owner: u64 = parse_field(&digits[FIXED_DIGITS..], token)?;

    AssetId::from_parts(app, variant, created_at, owner).map_err(CodecError::Field)
}

fn parse_field<T: std::str::FromStr>(digits: &str, token: &str) -> CodecResult<T> {
    // Slices of a decimal rendering only fail to parse on numeric overflow
    // (e.g. an owner field wider than u64).
    digits.parse().map_err(|_| CodecError::Overflow {
        token: token.to_string(),
    })
}
