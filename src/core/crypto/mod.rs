//! Passphrase cryptography.
//!
//! Payloads are sealed with AES-256-GCM under a key derived from the user's
//! passphrase (see [`kdf`]). Every encryption draws a fresh 96-bit nonce and
//! frames the output as `nonce || ciphertext || tag`, so decryption needs
//! nothing but the key. Sealed payloads are stored as base58 text
//! (see [`encoding`]).
//!
//! ## Errors
//!
//! A tag that does not verify is always `CipherError::Authentication`.
//! Bad base58 text is always `EncodingError`, so a wrong passphrase is never
//! confused with a damaged payload encoding.

pub mod encoding;
pub mod kdf;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use tracing::trace;
use zeroize::Zeroizing;

use crate::error::{CipherError, Result};

pub use kdf::DerivedKey;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-GCM tag length in bytes.
pub const TAG_LEN: usize = 16;

fn cipher(key: &DerivedKey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()))
}

/// Encrypt plaintext under a derived key.
///
/// # Returns
///
/// `nonce || ciphertext || tag`.
///
/// # Errors
///
/// Returns `CipherError::EncryptionFailed` if the cipher rejects the input.
pub fn encrypt(plaintext: &[u8], key: &DerivedKey) -> Result<Vec<u8>> {
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let sealed = cipher(key)
        .encrypt(&nonce, plaintext)
        .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

    let mut framed = Vec::with_capacity(NONCE_LEN + sealed.len());
    framed.extend_from_slice(&nonce);
    framed.extend_from_slice(&sealed);

    trace!(
        plaintext_len = plaintext.len(),
        ciphertext_len = framed.len(),
        "encrypted"
    );
    Ok(framed)
}

/// Decrypt `nonce || ciphertext || tag` under a derived key.
///
/// # Errors
///
/// Returns `CipherError::Malformed` if the input cannot hold a nonce and tag,
/// `CipherError::Authentication` if the tag does not verify.
pub fn decrypt(framed: &[u8], key: &DerivedKey) -> Result<Zeroizing<Vec<u8>>> {
    if framed.len() < NONCE_LEN + TAG_LEN {
        return Err(CipherError::Malformed { len: framed.len() }.into());
    }

    let (nonce, sealed) = framed.split_at(NONCE_LEN);
    let plaintext = cipher(key)
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| CipherError::Authentication)?;

    trace!(plaintext_len = plaintext.len(), "decrypted");
    Ok(Zeroizing::new(plaintext))
}

/// Encrypt with a key derived from `passphrase` and encode as base58 text.
pub fn seal(plaintext: &[u8], passphrase: &[u8]) -> Result<String> {
    let key = DerivedKey::from_passphrase(passphrase);
    seal_with_key(plaintext, &key)
}

/// Encrypt with an already derived key and encode as base58 text.
pub fn seal_with_key(plaintext: &[u8], key: &DerivedKey) -> Result<String> {
    Ok(encoding::encode(&encrypt(plaintext, key)?))
}

/// Decode base58 text and decrypt with a key derived from `passphrase`.
///
/// The text is decoded before the key is derived, so a damaged payload fails
/// fast with `EncodingError`.
pub fn open(text: &str, passphrase: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let framed = encoding::decode(text)?;
    let key = DerivedKey::from_passphrase(passphrase);
    decrypt(&framed, &key)
}

/// Decode base58 text and decrypt with an already derived key.
pub fn open_with_key(text: &str, key: &DerivedKey) -> Result<Zeroizing<Vec<u8>>> {
    decrypt(&encoding::decode(text)?, key)
}
