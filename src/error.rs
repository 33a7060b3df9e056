//! Error types for mksecret.
//!
//! Every fallible operation returns [`Result`], whose error is one of the
//! domain-specific enums below wrapped in the top-level [`Error`].

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Label(#[from] LabelError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize output json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to serialize output yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl Error {
    /// Whether this error is a failed authentication tag check.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Error::Cipher(CipherError::Authentication))
    }
}

/// Rejected user input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("please provide name of the secret")]
    EmptyName,

    #[error("invalid name '{name}', need DNS-1123 label format: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("invalid input of zero length")]
    EmptyValue,

    #[error("passphrase must be at least {min} characters")]
    PassphraseTooShort { min: usize },

    #[error("passphrases do not match")]
    PassphraseMismatch,

    #[error("passphrase is required for encrypted secret '{0}'")]
    PassphraseRequired(String),

    #[error("invalid version '{0}': expected 'latest' or a positive number")]
    InvalidVersion(String),

    #[error("input does not match secret name")]
    ConfirmationMismatch,
}

/// Violations of the ownership/encryption labeling protocol.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LabelError {
    #[error("secret '{0}' is not being managed by this app")]
    NotManaged(String),

    #[error("secret '{0}' was not previously encrypted and this property is immutable")]
    EncryptionImmutable(String),
}

/// Key derivation and authenticated encryption failures.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CipherError {
    #[error("failed to decrypt data: authentication failed (wrong passphrase or corrupted data)")]
    Authentication,

    #[error("malformed ciphertext: {len} bytes is shorter than nonce and tag")]
    Malformed { len: usize },

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),
}

/// Textual encoding failures.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EncodingError {
    #[error("failed to base58 decode stored value: {0}")]
    Base58(String),

    #[error("stored value is not valid text")]
    NotText,
}

/// Failures reported by, or while talking to, the secrets vault.
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("secret already exists: {0}")]
    AlreadyExists(String),

    #[error("secret not found: {0}")]
    NotFound(String),

    #[error("failed to {op}: {message}")]
    Request { op: &'static str, message: String },

    #[error("checksum mismatch for {name}: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch {
        name: String,
        expected: u32,
        actual: u32,
    },

    #[error("vault backend unavailable: {0}")]
    Unavailable(String),
}

impl VaultError {
    /// Wrap a backend failure with the operation it interrupted.
    pub fn request(op: &'static str, message: impl Into<String>) -> Self {
        VaultError::Request {
            op,
            message: message.into(),
        }
    }
}

/// Configuration loading and resolution failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("missing required setting: {0}")]
    Missing(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
