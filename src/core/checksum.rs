//! CRC32C transport checksums.
//!
//! The vault verifies uploads against the checksum sent with them, and
//! reports one back on access. This guards against transport corruption
//! only; it is not a security control.

use crate::error::{Result, VaultError};

/// CRC32 (Castagnoli polynomial) over the exact bytes being uploaded.
pub fn crc32c(data: &[u8]) -> u32 {
    crc32c::crc32c(data)
}

/// Verify data against a checksum reported by the vault.
///
/// Versions stored without a checksum pass unchecked.
///
/// # Errors
///
/// Returns `VaultError::ChecksumMismatch` when the sums differ.
pub fn verify(name: &str, data: &[u8], expected: Option<u32>) -> Result<()> {
    let Some(expected) = expected else {
        return Ok(());
    };

    let actual = crc32c(data);
    if actual != expected {
        return Err(VaultError::ChecksumMismatch {
            name: name.to_string(),
            expected,
            actual,
        }
        .into());
    }
    Ok(())
}
