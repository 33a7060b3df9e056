//! In-memory vault backend.
//!
//! Clones share the same storage, so a test can keep a handle to inspect
//! what a `Vault` wrote through another.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::{matches_filter, SecretManager};
use crate::core::checksum;
use crate::core::domain::{Secret, SecretVersion, VersionRef};
use crate::error::{Result, VaultError};

struct Entry {
    secret: Secret,
    versions: Vec<(Vec<u8>, u32)>,
}

/// Vault held in process memory.
#[derive(Clone, Default)]
pub struct Memory {
    entries: Rc<RefCell<BTreeMap<String, Entry>>>,
}

impl Memory {
    /// Create an empty in-memory vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a secret as-is, bypassing any labeling convention.
    ///
    /// Used to plant secrets owned by someone else.
    pub fn insert(&self, secret: Secret) {
        self.entries.borrow_mut().insert(
            secret.name().to_string(),
            Entry {
                secret,
                versions: Vec::new(),
            },
        );
    }

    /// Number of versions stored for a secret.
    pub fn version_count(&self, name: &str) -> usize {
        self.entries
            .borrow()
            .get(name)
            .map(|e| e.versions.len())
            .unwrap_or(0)
    }

    /// Raw bytes of a stored version (1-based).
    pub fn raw(&self, name: &str, version: u64) -> Option<Vec<u8>> {
        let entries = self.entries.borrow();
        let entry = entries.get(name)?;
        let index = usize::try_from(version).ok()?.checked_sub(1)?;
        entry.versions.get(index).map(|(data, _)| data.clone())
    }
}

impl SecretManager for Memory {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn create_secret(&self, name: &str, labels: &BTreeMap<String, String>) -> Result<Secret> {
        let mut entries = self.entries.borrow_mut();
        if entries.contains_key(name) {
            return Err(VaultError::AlreadyExists(name.to_string()).into());
        }
        let secret = Secret::new(name, labels.clone()).with_created(chrono::Utc::now());
        entries.insert(
            name.to_string(),
            Entry {
                secret: secret.clone(),
                versions: Vec::new(),
            },
        );
        Ok(secret)
    }

    fn get_secret(&self, name: &str) -> Result<Secret> {
        self.entries
            .borrow()
            .get(name)
            .map(|e| e.secret.clone())
            .ok_or_else(|| VaultError::NotFound(name.to_string()).into())
    }

    fn delete_secret(&self, name: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| VaultError::NotFound(name.to_string()).into())
    }

    fn list_secrets(&self, filter: (&str, &str)) -> Result<Vec<Secret>> {
        Ok(self
            .entries
            .borrow()
            .values()
            .filter(|e| matches_filter(e.secret.labels(), filter))
            .map(|e| e.secret.clone())
            .collect())
    }

    fn add_version(&self, name: &str, payload: &[u8], checksum: u32) -> Result<u64> {
        checksum::verify(name, payload, Some(checksum))?;

        let mut entries = self.entries.borrow_mut();
        let entry = entries
            .get_mut(name)
            .ok_or_else(|| VaultError::NotFound(name.to_string()))?;
        entry.versions.push((payload.to_vec(), checksum));
        Ok(entry.versions.len() as u64)
    }

    fn access_version(&self, name: &str, version: VersionRef) -> Result<SecretVersion> {
        let entries = self.entries.borrow();
        let entry = entries
            .get(name)
            .ok_or_else(|| VaultError::NotFound(name.to_string()))?;

        let number = match version {
            VersionRef::Latest => entry.versions.len() as u64,
            VersionRef::Number(n) => n,
        };
        let (data, sum) = usize::try_from(number)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| entry.versions.get(i))
            .ok_or_else(|| VaultError::NotFound(format!("{}/versions/{}", name, version)))?;

        Ok(SecretVersion {
            name: name.to_string(),
            version: number,
            payload: data.clone(),
            checksum: Some(*sum),
        })
    }
}
