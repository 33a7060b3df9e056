//! The primary interface for mksecret operations.
//!
//! `Vault` pairs a secrets backend with the label scheme identifying this
//! tool, and enforces the labeling protocol on every read and write.

mod secrets;

pub use secrets::{Fetched, Payload, Provisioned, Revealed, WriteTarget};

use crate::core::backend::{self, SecretManager};
use crate::core::config::Settings;
use crate::core::labels::LabelScheme;
use crate::error::Result;

/// The primary interface for mksecret operations.
pub struct Vault {
    pub(super) backend: Box<dyn SecretManager>,
    pub(super) labels: LabelScheme,
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("backend", &self.backend.name())
            .field("labels", &self.labels)
            .finish()
    }
}

impl Vault {
    /// Wrap a backend with an explicit label scheme.
    pub fn new(backend: Box<dyn SecretManager>, labels: LabelScheme) -> Self {
        Self { backend, labels }
    }

    /// Open the backend selected by `settings`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the backend cannot be configured, or
    /// `VaultError::Unavailable` if it cannot be reached.
    pub fn open(settings: &Settings) -> Result<Self> {
        let backend = backend::open(settings)?;
        Ok(Self::new(backend, settings.labels.clone()))
    }

    /// Label scheme in force.
    pub fn labels(&self) -> &LabelScheme {
        &self.labels
    }

    /// Name of the underlying backend.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
}
