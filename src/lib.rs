//! mksecret - Store short secrets in a cloud secrets vault, optionally
//! sealed with a passphrase.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── get/set       # Read and write versions
//! │   ├── list/delete   # Manage secrets
//! │   ├── prompt        # Hidden input and confirmations
//! │   ├── render        # native/json/yaml/table output
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── validation    # Names, values, passphrases
//!     ├── crypto/       # PBKDF2 key derivation, AES-256-GCM, base58
//!     ├── checksum      # CRC32C payload integrity
//!     ├── labels        # Ownership and encryption markers
//!     ├── backend/      # SecretManager trait
//!     │   ├── gcp       # Google Secret Manager
//!     │   ├── local     # Directory-backed vault
//!     │   └── memory    # In-process vault
//!     ├── config        # TOML config and settings resolution
//!     └── vault/        # Labeled reads and writes
//! ```
//!
//! # Example
//!
//! ```
//! use mksecret::core::backend::Memory;
//! use mksecret::core::domain::VersionRef;
//! use mksecret::core::labels::LabelScheme;
//! use mksecret::core::vault::Vault;
//!
//! let vault = Vault::new(Box::new(Memory::new()), LabelScheme::default());
//! vault.set("db-password", b"hunter22", true, Some(b"correct-horse".as_slice()))?;
//!
//! let secret = vault.get("db-password", VersionRef::Latest, Some(b"correct-horse".as_slice()))?;
//! assert_eq!(secret.payload.as_slice(), b"hunter22");
//! # Ok::<(), mksecret::error::Error>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
