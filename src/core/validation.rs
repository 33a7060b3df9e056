//! Input validation for mksecret operations.
//!
//! Validates secret names, values, and passphrases.

use crate::core::constants::MIN_PASSPHRASE_LEN;
use crate::error::{Result, ValidationError};

/// Maximum length of a DNS-1123 label.
const MAX_NAME_LEN: usize = 63;

/// Validate a secret name.
///
/// Secret names must be DNS-1123 labels:
/// - Between 1 and 63 characters
/// - Only lowercase a-z, 0-9, and hyphen
/// - Must start and end with an alphanumeric character
///
/// # Errors
///
/// Returns `ValidationError` if the name is invalid.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName.into());
    }

    let invalid = |reason: String| -> crate::error::Error {
        ValidationError::InvalidName {
            name: name.to_string(),
            reason,
        }
        .into()
    };

    if name.len() > MAX_NAME_LEN {
        return Err(invalid(format!(
            "must be no more than {} characters",
            MAX_NAME_LEN
        )));
    }

    for (i, ch) in name.chars().enumerate() {
        if !ch.is_ascii_lowercase() && !ch.is_ascii_digit() && ch != '-' {
            return Err(invalid(format!(
                "invalid character '{}' at position {}. Only a-z, 0-9, and '-' are allowed",
                ch,
                i + 1
            )));
        }
    }

    let alnum = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    if !name.starts_with(alnum) || !name.ends_with(alnum) {
        return Err(invalid(
            "must start and end with an alphanumeric character".to_string(),
        ));
    }

    Ok(())
}

/// Validate a secret value.
///
/// # Errors
///
/// Returns `ValidationError::EmptyValue` if the value is empty.
pub fn validate_value(value: &[u8]) -> Result<()> {
    if value.is_empty() {
        return Err(ValidationError::EmptyValue.into());
    }
    Ok(())
}

/// Validate a passphrase that is about to encrypt a new version.
///
/// Decryption never calls this: any passphrase accepted before must keep working.
pub fn validate_passphrase(passphrase: &[u8]) -> Result<()> {
    let chars = String::from_utf8_lossy(passphrase).chars().count();
    if chars < MIN_PASSPHRASE_LEN {
        return Err(ValidationError::PassphraseTooShort {
            min: MIN_PASSPHRASE_LEN,
        }
        .into());
    }
    Ok(())
}

/// Generate a fresh secret name for `set` without `--name`.
///
/// A hyphenated UUIDv4 is always a valid DNS-1123 label.
pub fn generate_name() -> String {
    uuid::Uuid::new_v4().to_string()
}
