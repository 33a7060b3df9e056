//! Base58 text encoding for ciphertext stored as a vault payload.

use crate::error::{EncodingError, Result};

/// Encode bytes as base58 (Bitcoin alphabet).
pub fn encode(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

/// Decode a base58 string.
///
/// # Errors
///
/// Returns `EncodingError::Base58` on characters outside the alphabet.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    bs58::decode(text.trim())
        .into_vec()
        .map_err(|e| EncodingError::Base58(e.to_string()).into())
}
