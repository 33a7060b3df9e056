//! Constants used throughout mksecret.
//!
//! Centralizes magic strings and configuration values.

/// Tool identity written into the managed-by label.
pub const APP_NAME: &str = "mksecret";

/// Label key marking secrets owned by this tool.
pub const KEY_MANAGED_BY: &str = "managed-by";

/// Label key marking secrets whose payload is encrypted.
pub const KEY_ENCRYPTED: &str = "encrypted";

/// Value of a set boolean label.
pub const VALUE_TRUE: &str = "true";

/// Reserved alias for the newest version of a secret.
pub const LATEST: &str = "latest";

/// Minimum passphrase length accepted when encrypting.
pub const MIN_PASSPHRASE_LEN: usize = 8;

/// Config file name inside the platform config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Directory name used under platform config/data directories.
pub const APP_DIR: &str = "mksecret";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "MKSECRET_LOG";
