//! Secret operations.
//!
//! Reads and writes that honor the labeling protocol: ownership is checked
//! before any payload is touched, and the encrypted marker decides whether
//! payloads are sealed.

use std::collections::BTreeMap;

use tracing::{debug, info};
use zeroize::Zeroizing;

use super::Vault;
use crate::core::checksum;
use crate::core::crypto::{self, DerivedKey};
use crate::core::domain::{Secret, VersionRef};
use crate::core::labels::State;
use crate::core::validation::{validate_name, validate_passphrase, validate_value};
use crate::error::{EncodingError, Error, Result, ValidationError, VaultError};

/// Outcome of create-or-fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provisioned {
    /// The secret did not exist and was created with the requested labels.
    Created(Secret),
    /// The name was taken; this is the existing secret, labels as stored.
    Existing(Secret),
}

/// A secret cleared for writing.
///
/// Resolving a target never creates anything: a missing secret is created
/// by [`Vault::write`] only once the value and passphrase have been accepted.
#[derive(Debug, Clone)]
pub struct WriteTarget {
    name: String,
    existing: Option<Secret>,
    encrypted: bool,
}

impl WriteTarget {
    /// Secret name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the next version must be encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    /// Whether the secret does not exist yet.
    pub fn is_new(&self) -> bool {
        self.existing.is_none()
    }
}

/// A stored payload before any passphrase is applied.
pub enum Payload {
    /// Stored as-is.
    Plain(Zeroizing<Vec<u8>>),
    /// Base58 text of a sealed payload.
    Encrypted(String),
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Plain(p) => write!(f, "Plain({} bytes)", p.len()),
            Payload::Encrypted(t) => write!(f, "Encrypted({} chars)", t.len()),
        }
    }
}

/// A version read from a managed secret.
#[derive(Debug)]
pub struct Fetched {
    pub name: String,
    pub version: u64,
    pub payload: Payload,
}

impl Fetched {
    /// Whether a passphrase is needed to reveal the payload.
    pub fn is_encrypted(&self) -> bool {
        matches!(self.payload, Payload::Encrypted(_))
    }

    /// Reveal the plaintext, decrypting with `passphrase` when sealed.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::PassphraseRequired` for a sealed payload
    /// without passphrase, `EncodingError` for damaged text, and
    /// `CipherError::Authentication` for a wrong passphrase. Nothing is
    /// returned on failure, never partially decrypted bytes.
    pub fn reveal(self, passphrase: Option<&[u8]>) -> Result<Revealed> {
        let payload = match self.payload {
            Payload::Plain(bytes) => bytes,
            Payload::Encrypted(text) => {
                let passphrase = passphrase
                    .ok_or_else(|| ValidationError::PassphraseRequired(self.name.clone()))?;
                crypto::open(&text, passphrase)?
            }
        };

        Ok(Revealed {
            name: self.name,
            version: self.version,
            payload,
        })
    }
}

/// A plaintext payload ready for output.
#[derive(Debug)]
pub struct Revealed {
    pub name: String,
    pub version: u64,
    pub payload: Zeroizing<Vec<u8>>,
}

impl Revealed {
    /// Payload as text, replacing invalid UTF-8.
    pub fn text(&self) -> Zeroizing<String> {
        Zeroizing::new(String::from_utf8_lossy(&self.payload).into_owned())
    }
}

impl Vault {
    /// Create a secret, or fetch it if the name is already taken.
    ///
    /// Only `AlreadyExists` triggers the fetch; every other failure propagates.
    pub fn create_or_fetch(
        &self,
        name: &str,
        labels: &BTreeMap<String, String>,
    ) -> Result<Provisioned> {
        match self.backend.create_secret(name, labels) {
            Ok(secret) => {
                info!(name, "created secret");
                Ok(Provisioned::Created(secret))
            }
            Err(Error::Vault(VaultError::AlreadyExists(_))) => {
                debug!(name, "secret exists, fetching");
                Ok(Provisioned::Existing(self.backend.get_secret(name)?))
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve the secret a `set` will write to, without changing the vault.
    ///
    /// An existing secret must be managed by this tool; its stored encryption
    /// state wins, except that a plaintext secret can never become encrypted.
    /// A missing secret is left to [`Vault::write`], which creates it with
    /// labels matching `encrypt`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a bad name, `LabelError::NotManaged` for
    /// a foreign secret and `LabelError::EncryptionImmutable` when asking to
    /// encrypt a plaintext secret.
    pub fn prepare_write(&self, name: &str, encrypt: bool) -> Result<WriteTarget> {
        validate_name(name)?;

        let target = match self.backend.get_secret(name) {
            Ok(secret) => {
                let encrypted = self.labels.resolve_write(&secret, encrypt)?;
                WriteTarget {
                    name: name.to_string(),
                    existing: Some(secret),
                    encrypted,
                }
            }
            Err(Error::Vault(VaultError::NotFound(_))) => WriteTarget {
                name: name.to_string(),
                existing: None,
                encrypted: encrypt,
            },
            Err(e) => return Err(e),
        };

        debug!(
            name,
            encrypted = target.encrypted,
            new = target.is_new(),
            "write target resolved"
        );
        Ok(target)
    }

    /// Create a target that did not exist when it was resolved.
    ///
    /// If another writer created it in the meantime, its labels must agree
    /// with the encryption state the input was prepared for.
    fn provision(&self, target: &WriteTarget) -> Result<()> {
        if !target.is_new() {
            return Ok(());
        }

        let labels = self.labels.labels_for_new(target.encrypted);
        if let Provisioned::Existing(secret) = self.create_or_fetch(target.name(), &labels)? {
            if self.labels.resolve_write(&secret, target.encrypted)? != target.encrypted {
                return Err(ValidationError::PassphraseRequired(target.name().to_string()).into());
            }
        }
        Ok(())
    }

    /// Add a version to a prepared secret and read it back.
    ///
    /// The value, and for encrypted targets the passphrase, are validated
    /// before anything is written, so a rejected input never creates the
    /// secret. The returned payload is the read-back value, decrypted with
    /// the same key, so it confirms the stored version opens with this
    /// passphrase.
    pub fn write(
        &self,
        target: &WriteTarget,
        value: &[u8],
        passphrase: Option<&[u8]>,
    ) -> Result<Revealed> {
        validate_value(value)?;
        let name = target.name();

        let key = if target.encrypted {
            let passphrase =
                passphrase.ok_or_else(|| ValidationError::PassphraseRequired(name.to_string()))?;
            validate_passphrase(passphrase)?;
            Some(DerivedKey::from_passphrase(passphrase))
        } else {
            None
        };

        let data = match &key {
            Some(key) => Zeroizing::new(crypto::seal_with_key(value, key)?.into_bytes()),
            None => Zeroizing::new(value.to_vec()),
        };
        let sum = checksum::crc32c(&data);

        self.provision(target)?;
        let version = self.backend.add_version(name, &data, sum)?;
        info!(name, version, encrypted = target.encrypted, "added version");

        let stored = self
            .backend
            .access_version(name, VersionRef::Number(version))?;
        checksum::verify(name, &stored.payload, stored.checksum)?;

        let payload = match &key {
            Some(key) => {
                let text = std::str::from_utf8(&stored.payload).map_err(|_| EncodingError::NotText)?;
                crypto::open_with_key(text, key)?
            }
            None => Zeroizing::new(stored.payload),
        };

        Ok(Revealed {
            name: name.to_string(),
            version: stored.version,
            payload,
        })
    }

    /// Validate, prepare and write in one step.
    pub fn set(
        &self,
        name: &str,
        value: &[u8],
        encrypt: bool,
        passphrase: Option<&[u8]>,
    ) -> Result<Revealed> {
        let target = self.prepare_write(name, encrypt)?;
        self.write(&target, value, passphrase)
    }

    /// Fetch a version of a managed secret without decrypting it.
    ///
    /// # Errors
    ///
    /// Returns `LabelError::NotManaged` before any payload is accessed if the
    /// secret is not owned by this tool.
    pub fn fetch(&self, name: &str, version: VersionRef) -> Result<Fetched> {
        validate_name(name)?;

        let secret = self.backend.get_secret(name)?;
        let state = self.labels.ensure_managed(&secret)?;

        let stored = self.backend.access_version(name, version)?;
        checksum::verify(name, &stored.payload, stored.checksum)?;
        debug!(name, version = stored.version, ?state, "fetched version");

        let payload = match state {
            State::ManagedEncrypted => Payload::Encrypted(
                String::from_utf8(stored.payload).map_err(|_| EncodingError::NotText)?,
            ),
            _ => Payload::Plain(Zeroizing::new(stored.payload)),
        };

        Ok(Fetched {
            name: stored.name,
            version: stored.version,
            payload,
        })
    }

    /// Fetch and reveal in one step.
    pub fn get(
        &self,
        name: &str,
        version: VersionRef,
        passphrase: Option<&[u8]>,
    ) -> Result<Revealed> {
        self.fetch(name, version)?.reveal(passphrase)
    }

    /// List secrets managed by this tool, sorted by name.
    pub fn list(&self) -> Result<Vec<Secret>> {
        let mut secrets: Vec<Secret> = self
            .backend
            .list_secrets(self.labels.filter())?
            .into_iter()
            .filter(|s| self.labels.state(s.labels()) != State::Unmanaged)
            .collect();
        secrets.sort_by(|a, b| a.name().cmp(b.name()));

        debug!(count = secrets.len(), "listed secrets");
        Ok(secrets)
    }

    /// Delete a managed secret with all its versions.
    ///
    /// # Errors
    ///
    /// Returns `LabelError::NotManaged` if the secret is not owned by this tool.
    pub fn delete(&self, name: &str) -> Result<()> {
        validate_name(name)?;

        let secret = self.backend.get_secret(name)?;
        self.labels.ensure_managed(&secret)?;

        self.backend.delete_secret(name)?;
        info!(name, "deleted secret");
        Ok(())
    }
}
