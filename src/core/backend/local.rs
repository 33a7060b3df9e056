//! Directory-backed vault.
//!
//! Stores each secret as `<dir>/<name>.json` holding its labels and every
//! version with its CRC32C. Files are written with restricted permissions
//! (0600 on Unix) and replaced atomically.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::{matches_filter, SecretManager};
use crate::core::checksum;
use crate::core::domain::{Secret, SecretVersion, VersionRef};
use crate::error::{Result, VaultError};

/// On-disk document for one secret.
#[derive(Debug, Serialize, Deserialize)]
struct Record {
    name: String,
    #[serde(default)]
    labels: BTreeMap<String, String>,
    created: DateTime<Utc>,
    #[serde(default)]
    versions: Vec<StoredVersion>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredVersion {
    data: Vec<u8>,
    crc32c: u32,
    created: DateTime<Utc>,
}

impl Record {
    fn secret(&self) -> Secret {
        Secret::new(self.name.clone(), self.labels.clone()).with_created(self.created)
    }
}

/// Vault stored in a local directory.
pub struct Local {
    dir: PathBuf,
}

impl Local {
    /// Use `dir` as the vault root. Created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Vault root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    fn load(&self, name: &str) -> Result<Record> {
        let path = self.path(name);
        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(VaultError::NotFound(name.to_string()).into());
            }
            Err(e) => return Err(VaultError::request("read secret", e.to_string()).into()),
        };
        serde_json::from_str(&contents).map_err(|e| {
            VaultError::request("read secret", format!("{}: {}", path.display(), e)).into()
        })
    }

    fn save(&self, record: &Record) -> Result<()> {
        let path = self.path(&record.name);
        let tmp = path.with_extension("json.tmp");
        let contents = serde_json::to_vec_pretty(record)?;

        write_private(&tmp, &contents)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| VaultError::request("write secret", e.to_string()))?;

        trace!(path = %path.display(), bytes = contents.len(), "saved record");
        Ok(())
    }
}

/// Write a file readable only by its owner (Unix).
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

impl SecretManager for Local {
    fn name(&self) -> &'static str {
        "local"
    }

    fn create_secret(&self, name: &str, labels: &BTreeMap<String, String>) -> Result<Secret> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| VaultError::request("create secret", e.to_string()))?;

        let record = Record {
            name: name.to_string(),
            labels: labels.clone(),
            created: Utc::now(),
            versions: Vec::new(),
        };
        let contents = serde_json::to_vec_pretty(&record)?;

        // Claim the name by linking a complete document into place: a
        // concurrent create gets AlreadyExists, readers never see a partial file.
        let path = self.path(name);
        let staged = path.with_extension(format!("json.{}.new", std::process::id()));
        let claimed =
            write_private(&staged, &contents).and_then(|_| fs::hard_link(&staged, &path));
        let _ = fs::remove_file(&staged);

        match claimed {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(VaultError::AlreadyExists(name.to_string()).into());
            }
            Err(e) => return Err(VaultError::request("create secret", e.to_string()).into()),
        }

        debug!(name, "created secret");
        Ok(record.secret())
    }

    fn get_secret(&self, name: &str) -> Result<Secret> {
        Ok(self.load(name)?.secret())
    }

    fn delete_secret(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(VaultError::NotFound(name.to_string()).into())
            }
            Err(e) => Err(VaultError::request("delete secret", e.to_string()).into()),
        }
    }

    fn list_secrets(&self, filter: (&str, &str)) -> Result<Vec<Secret>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(VaultError::request("list secrets", e.to_string()).into()),
        };

        let mut secrets = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| VaultError::request("list secrets", e.to_string()))?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let record = match self.load(name) {
                Ok(record) => record,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable record");
                    continue;
                }
            };
            if matches_filter(&record.labels, filter) {
                secrets.push(record.secret());
            }
        }

        secrets.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(secrets)
    }

    fn add_version(&self, name: &str, payload: &[u8], checksum: u32) -> Result<u64> {
        checksum::verify(name, payload, Some(checksum))?;

        let mut record = self.load(name)?;
        record.versions.push(StoredVersion {
            data: payload.to_vec(),
            crc32c: checksum,
            created: Utc::now(),
        });
        self.save(&record)?;

        let number = record.versions.len() as u64;
        debug!(name, version = number, "added version");
        Ok(number)
    }

    fn access_version(&self, name: &str, version: VersionRef) -> Result<SecretVersion> {
        let record = self.load(name)?;

        let number = match version {
            VersionRef::Latest => record.versions.len() as u64,
            VersionRef::Number(n) => n,
        };
        let stored = usize::try_from(number)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| record.versions.get(i))
            .ok_or_else(|| VaultError::NotFound(format!("{}/versions/{}", name, version)))?;

        Ok(SecretVersion {
            name: name.to_string(),
            version: number,
            payload: stored.data.clone(),
            checksum: Some(stored.crc32c),
        })
    }
}
