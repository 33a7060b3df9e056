//! Version types.
//!
//! Versions are immutable payload revisions addressed by a number the vault
//! assigns, or by the reserved `latest` alias.

use std::fmt;
use std::str::FromStr;

use crate::core::constants::LATEST;
use crate::error::{Error, ValidationError};

/// Which version of a secret to access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionRef {
    /// The newest version.
    #[default]
    Latest,
    /// A specific version number (starting at 1).
    Number(u64),
}

impl FromStr for VersionRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == LATEST {
            return Ok(VersionRef::Latest);
        }
        match s.parse::<u64>() {
            Ok(n) if n > 0 => Ok(VersionRef::Number(n)),
            _ => Err(ValidationError::InvalidVersion(s.to_string()).into()),
        }
    }
}

impl fmt::Display for VersionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionRef::Latest => f.write_str(LATEST),
            VersionRef::Number(n) => write!(f, "{}", n),
        }
    }
}

/// One accessed version: the stored bytes and the vault's checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretVersion {
    /// Secret name.
    pub name: String,
    /// Resolved version number (never the `latest` alias).
    pub version: u64,
    /// Stored payload bytes.
    pub payload: Vec<u8>,
    /// CRC32C reported by the vault, if any.
    pub checksum: Option<u32>,
}
