//! Configuration loading and resolution.
//!
//! Settings come from three layers, highest precedence first:
//!
//! 1. Command-line flags (and their environment variables, handled by clap)
//! 2. The TOML config file (`--config`, `MKSECRET_CONFIG`, or
//!    `<config_dir>/mksecret/config.toml`)
//! 3. Built-in defaults
//!
//! ```toml
//! project = "my-project"
//! credentials = "/path/to/service-account.json"
//! output_format = "table"
//! backend = "gcp"
//!
//! [labels]
//! managed_by = "mksecret"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants;
use crate::core::labels::LabelScheme;
use crate::error::{ConfigError, Error, Result};

/// How command results are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Raw payload text.
    #[default]
    Native,
    Json,
    Yaml,
    Table,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "native" => Ok(Self::Native),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            "table" => Ok(Self::Table),
            other => Err(ConfigError::InvalidValue {
                field: "output_format",
                reason: format!("unknown format '{}'. Supported: native, json, yaml, table", other),
            }
            .into()),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Native => "native",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Table => "table",
        })
    }
}

/// Which vault implementation to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Google Secret Manager.
    #[default]
    Gcp,
    /// Directory-backed vault.
    Local,
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "gcp" => Ok(Self::Gcp),
            "local" => Ok(Self::Local),
            other => Err(ConfigError::InvalidValue {
                field: "backend",
                reason: format!("unknown backend '{}'. Supported: gcp, local", other),
            }
            .into()),
        }
    }
}

/// Contents of the config file. Every field is optional.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub project: Option<String>,
    pub credentials: Option<PathBuf>,
    pub output_format: Option<OutputFormat>,
    pub backend: Option<BackendKind>,
    pub vault_dir: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub labels: Option<LabelScheme>,
}

impl FileConfig {
    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::APP_DIR).join(constants::CONFIG_FILE))
    }

    /// Parse config file contents.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents).map_err(ConfigError::Parse)?)
    }

    /// Read a config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` if the file cannot be read,
    /// `ConfigError::Parse` if it is not valid.
    pub fn read(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Load the config file.
    ///
    /// An explicit path must exist. The default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::read(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::read(&path),
            _ => {
                debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Values given on the command line (flags or their env vars).
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub project: Option<String>,
    pub credentials: Option<PathBuf>,
    pub output_format: Option<OutputFormat>,
    pub backend: Option<BackendKind>,
    pub vault_dir: Option<PathBuf>,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub project: Option<String>,
    pub credentials: Option<PathBuf>,
    pub output_format: OutputFormat,
    pub backend: BackendKind,
    pub vault_dir: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub labels: LabelScheme,
}

impl Settings {
    /// Merge overrides over file values over defaults.
    pub fn resolve(overrides: Overrides, file: FileConfig) -> Result<Self> {
        let labels = file.labels.unwrap_or_default();
        validate_labels(&labels)?;

        let settings = Self {
            project: overrides.project.or(file.project),
            credentials: overrides.credentials.or(file.credentials),
            output_format: overrides
                .output_format
                .or(file.output_format)
                .unwrap_or_default(),
            backend: overrides.backend.or(file.backend).unwrap_or_default(),
            vault_dir: overrides
                .vault_dir
                .or(file.vault_dir)
                .or_else(default_vault_dir),
            endpoint: file.endpoint,
            labels,
        };

        debug!(
            backend = ?settings.backend,
            output = %settings.output_format,
            project = settings.project.as_deref().unwrap_or("-"),
            "settings resolved"
        );
        Ok(settings)
    }
}

/// Default directory for the local backend.
fn default_vault_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(constants::APP_DIR).join("vault"))
}

fn validate_labels(labels: &LabelScheme) -> Result<()> {
    let fields = [
        ("labels.managed_by_key", &labels.managed_by_key),
        ("labels.managed_by", &labels.managed_by),
        ("labels.encrypted_key", &labels.encrypted_key),
        ("labels.true_value", &labels.true_value),
    ];
    for (field, value) in fields {
        if value.is_empty() {
            return Err(ConfigError::InvalidValue {
                field,
                reason: "must not be empty".to_string(),
            }
            .into());
        }
    }
    if labels.managed_by_key == labels.encrypted_key {
        return Err(ConfigError::InvalidValue {
            field: "labels.encrypted_key",
            reason: "must differ from labels.managed_by_key".to_string(),
        }
        .into());
    }
    Ok(())
}
