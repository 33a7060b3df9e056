//! Ownership and encryption labeling protocol.
//!
//! Each secret this tool creates carries two labels: a managed-by marker
//! naming the tool, and an encrypted marker set to `true` when payloads are
//! sealed with a passphrase. The encrypted marker is written once at
//! creation and never changes afterwards.
//!
//! ```text
//!            create(encrypt=false)             create(encrypt=true)
//!   (new) ───────────────────────> Plaintext   (new) ───────────────> Encrypted
//!
//!   Plaintext + write(encrypt=true)  -> ImmutableProperty error
//!   Encrypted + write(encrypt=false) -> proceeds encrypted
//!   Unmanaged + anything             -> Ownership error
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants;
use crate::core::domain::Secret;
use crate::error::{LabelError, Result};

/// Protocol state of a secret, derived from its labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Missing or foreign managed-by label.
    Unmanaged,
    /// Managed, payloads stored as-is.
    ManagedPlaintext,
    /// Managed, payloads sealed with a passphrase.
    ManagedEncrypted,
}

impl State {
    /// Whether payloads of a secret in this state are encrypted.
    pub fn is_encrypted(self) -> bool {
        self == State::ManagedEncrypted
    }
}

/// Label keys and values identifying this tool's secrets.
///
/// Passed explicitly into the vault layer so the ownership marker can be
/// overridden from config and in tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelScheme {
    /// Key of the ownership label.
    pub managed_by_key: String,
    /// Expected value of the ownership label.
    pub managed_by: String,
    /// Key of the encrypted marker.
    pub encrypted_key: String,
    /// Value the encrypted marker holds when set.
    pub true_value: String,
}

impl Default for LabelScheme {
    fn default() -> Self {
        Self {
            managed_by_key: constants::KEY_MANAGED_BY.to_string(),
            managed_by: constants::APP_NAME.to_string(),
            encrypted_key: constants::KEY_ENCRYPTED.to_string(),
            true_value: constants::VALUE_TRUE.to_string(),
        }
    }
}

impl LabelScheme {
    /// Scheme with a different ownership value.
    pub fn managed_by(value: impl Into<String>) -> Self {
        Self {
            managed_by: value.into(),
            ..Self::default()
        }
    }

    /// Classify a label set.
    pub fn state(&self, labels: &BTreeMap<String, String>) -> State {
        if labels.get(&self.managed_by_key) != Some(&self.managed_by) {
            return State::Unmanaged;
        }
        if labels.get(&self.encrypted_key) == Some(&self.true_value) {
            State::ManagedEncrypted
        } else {
            State::ManagedPlaintext
        }
    }

    /// Labels for a secret about to be created.
    pub fn labels_for_new(&self, encrypt: bool) -> BTreeMap<String, String> {
        let mut labels = BTreeMap::new();
        labels.insert(self.managed_by_key.clone(), self.managed_by.clone());
        if encrypt {
            labels.insert(self.encrypted_key.clone(), self.true_value.clone());
        }
        labels
    }

    /// Label filter selecting this tool's secrets in a listing.
    pub fn filter(&self) -> (&str, &str) {
        (&self.managed_by_key, &self.managed_by)
    }

    /// Require that a secret is owned by this tool.
    ///
    /// # Errors
    ///
    /// Returns `LabelError::NotManaged` for unmanaged secrets.
    pub fn ensure_managed(&self, secret: &Secret) -> Result<State> {
        match self.state(secret.labels()) {
            State::Unmanaged => {
                debug!(name = secret.name(), "secret not managed by this tool");
                Err(LabelError::NotManaged(secret.name().to_string()).into())
            }
            state => Ok(state),
        }
    }

    /// Decide whether a write to `secret` is encrypted.
    ///
    /// The stored state always wins: asking for plaintext on an encrypted
    /// secret still encrypts.
    ///
    /// # Errors
    ///
    /// Returns `LabelError::NotManaged` for unmanaged secrets and
    /// `LabelError::EncryptionImmutable` when asking to encrypt a plaintext secret.
    pub fn resolve_write(&self, secret: &Secret, encrypt: bool) -> Result<bool> {
        match self.ensure_managed(secret)? {
            State::ManagedEncrypted => Ok(true),
            State::ManagedPlaintext if encrypt => {
                Err(LabelError::EncryptionImmutable(secret.name().to_string()).into())
            }
            _ => Ok(false),
        }
    }
}
