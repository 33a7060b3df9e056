//! Secrets vault backends.
//!
//! The vault is an external collaborator storing named, labeled secrets,
//! each holding an ordered list of immutable versions. This module defines
//! the operations mksecret needs from it and the implementations available.
//!
//! ## Backends
//!
//! - **gcp**: Google Secret Manager over its REST API. Feature-gated (`gcp`, on by default).
//! - **local**: one JSON document per secret in a directory. Offline use and tests.
//! - **memory**: in-process map, for unit tests.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `SecretManager` trait
//! 2. Add the implementation in a new file
//! 3. Add a `BackendKind` variant and wire it into `open`

use std::collections::BTreeMap;

use tracing::debug;

use crate::core::config::{BackendKind, Settings};
use crate::core::domain::{Secret, SecretVersion, VersionRef};
use crate::error::{ConfigError, Result};

mod local;
mod memory;

#[cfg(feature = "gcp")]
pub mod gcp;

pub use local::Local;
pub use memory::Memory;

/// Operations mksecret needs from a secrets vault.
///
/// Errors follow one convention across implementations: a duplicate create
/// is `VaultError::AlreadyExists`, a missing secret or version is
/// `VaultError::NotFound`, anything else is wrapped with the operation name.
pub trait SecretManager {
    /// Backend name for display/logging.
    fn name(&self) -> &'static str;

    /// Create an empty secret carrying `labels`.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::AlreadyExists` if the name is taken.
    fn create_secret(&self, name: &str, labels: &BTreeMap<String, String>) -> Result<Secret>;

    /// Fetch a secret's metadata.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if the secret does not exist.
    fn get_secret(&self, name: &str) -> Result<Secret>;

    /// Delete a secret and all its versions.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if the secret does not exist.
    fn delete_secret(&self, name: &str) -> Result<()>;

    /// List secrets whose label `filter.0` equals `filter.1`.
    ///
    /// Implementations follow pagination to the end.
    fn list_secrets(&self, filter: (&str, &str)) -> Result<Vec<Secret>>;

    /// Append a version holding `payload`.
    ///
    /// The vault verifies `checksum` (CRC32C of `payload`) on receipt.
    ///
    /// # Returns
    ///
    /// The number assigned to the new version.
    fn add_version(&self, name: &str, payload: &[u8], checksum: u32) -> Result<u64>;

    /// Read a version's payload and the checksum the vault holds for it.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if the secret or version does not exist.
    fn access_version(&self, name: &str, version: VersionRef) -> Result<SecretVersion>;
}

/// Open the backend selected by the resolved settings.
///
/// # Errors
///
/// Returns `ConfigError` if the backend is not compiled in or lacks required settings.
pub fn open(settings: &Settings) -> Result<Box<dyn SecretManager>> {
    match settings.backend {
        BackendKind::Local => {
            let dir = settings
                .vault_dir
                .clone()
                .ok_or(ConfigError::Missing("vault_dir"))?;
            debug!(dir = %dir.display(), "opening local backend");
            Ok(Box::new(Local::new(dir)))
        }
        BackendKind::Gcp => {
            #[cfg(feature = "gcp")]
            {
                let project = settings
                    .project
                    .clone()
                    .ok_or(ConfigError::Missing("project"))?;
                debug!(project = %project, "opening gcp backend");
                Ok(Box::new(gcp::Gcp::new(
                    project,
                    settings.endpoint.clone(),
                    settings.credentials.clone(),
                )?))
            }
            #[cfg(not(feature = "gcp"))]
            {
                Err(ConfigError::InvalidValue {
                    field: "backend",
                    reason: "gcp support not compiled. Rebuild with: cargo install mksecret --features gcp".to_string(),
                }
                .into())
            }
        }
    }
}

/// Whether `labels` carry `filter`.
pub(crate) fn matches_filter(labels: &BTreeMap<String, String>, filter: (&str, &str)) -> bool {
    labels.get(filter.0).map(String::as_str) == Some(filter.1)
}
