//! Passphrase-based key derivation.
//!
//! Keys are derived with PBKDF2-HMAC-SHA256 under a fixed salt and iteration
//! count. Nothing is stored next to the ciphertext, so the passphrase alone
//! must reproduce the key. Changing any constant here makes every previously
//! stored encrypted secret unreadable.

use std::fmt;

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use tracing::trace;
use zeroize::Zeroizing;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Fixed salt mixed into every derivation.
pub const SALT: &[u8] = b"mksecret.aes-256-gcm.v1";

/// PBKDF2 iteration count.
pub const ITERATIONS: u32 = 100_000;

/// An ephemeral symmetric key derived from a passphrase.
///
/// Zeroized on drop and never printed.
pub struct DerivedKey(Zeroizing<[u8; KEY_LEN]>);

impl DerivedKey {
    /// Derive the key for a passphrase.
    ///
    /// Deterministic and infallible: the same bytes always give the same key.
    pub fn from_passphrase(passphrase: &[u8]) -> Self {
        trace!(iterations = ITERATIONS, "deriving key");
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        pbkdf2_hmac::<Sha256>(passphrase, SALT, ITERATIONS, key.as_mut());
        Self(key)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}
