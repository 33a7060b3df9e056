//! Command-line interface.

pub mod completions;
pub mod delete;
pub mod get;
pub mod list;
pub mod output;
pub mod prompt;
pub mod render;
pub mod set;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::debug;

use crate::core::config::{BackendKind, FileConfig, OutputFormat, Overrides, Settings};
use crate::core::domain::VersionRef;
use crate::core::vault::Vault;
use crate::error::{Error, Result};

/// mksecret - Store short secrets in a cloud vault, optionally passphrase-encrypted.
#[derive(Parser)]
#[command(
    name = "mksecret",
    about = "Store short secrets in a cloud secrets vault, optionally sealed with a passphrase",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by every command.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Google Cloud project ID
    #[arg(
        long = "project",
        alias = "google-project-id",
        env = "GOOGLE_PROJECT_ID",
        global = true
    )]
    pub project: Option<String>,

    /// Service account credentials file with Secret Manager access
    #[arg(
        long = "credentials",
        alias = "google-application-credentials",
        env = "GOOGLE_APPLICATION_CREDENTIALS",
        global = true
    )]
    pub credentials: Option<PathBuf>,

    /// Output format: native, json, yaml or table
    #[arg(long, env = "MKSECRET_OUTPUT_FORMAT", global = true, value_parser = parse_output_format)]
    pub output_format: Option<OutputFormat>,

    /// Vault backend: gcp or local
    #[arg(long, env = "MKSECRET_BACKEND", global = true, value_parser = parse_backend)]
    pub backend: Option<BackendKind>,

    /// Directory for the local backend
    #[arg(long, env = "MKSECRET_VAULT_DIR", global = true)]
    pub vault_dir: Option<PathBuf>,

    /// Config file (default: <config dir>/mksecret/config.toml)
    #[arg(long, env = "MKSECRET_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            project: self.project.clone(),
            credentials: self.credentials.clone(),
            output_format: self.output_format,
            backend: self.backend,
            vault_dir: self.vault_dir.clone(),
        }
    }
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Get a named secret
    Get {
        /// Secret name
        name: String,
        /// Version to retrieve
        #[arg(long, default_value = "latest", value_parser = parse_version)]
        version: VersionRef,
        /// Decryption passphrase, if the secret is encrypted
        #[arg(long)]
        passphrase: Option<String>,
        /// Hide all prompts
        #[arg(long)]
        no_prompt: bool,
    },

    /// Write a secret value as a new version
    Set {
        /// Secret name in DNS-1123 label format (random if omitted)
        #[arg(long)]
        name: Option<String>,
        /// Encrypt the value with a passphrase (only when creating the secret)
        #[arg(long)]
        encrypt: bool,
        /// Encryption passphrase (min 8 characters)
        #[arg(long)]
        passphrase: Option<String>,
        /// Hide all prompts
        #[arg(long)]
        no_prompt: bool,
        /// Secret value; read from stdin or a prompt when omitted
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },

    /// List secrets managed by mksecret
    List,

    /// Delete a secret and all its versions
    Delete {
        /// Secret name
        name: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

fn parse_output_format(s: &str) -> std::result::Result<OutputFormat, String> {
    s.parse().map_err(|e: Error| e.to_string())
}

fn parse_backend(s: &str) -> std::result::Result<BackendKind, String> {
    s.parse().map_err(|e: Error| e.to_string())
}

fn parse_version(s: &str) -> std::result::Result<VersionRef, String> {
    s.parse().map_err(|e: Error| e.to_string())
}

/// Resolve settings and open the configured vault.
fn open(global: &GlobalArgs) -> Result<(Vault, OutputFormat)> {
    let file = FileConfig::load(global.config.as_deref())?;
    let settings = Settings::resolve(global.overrides(), file)?;

    let vault = Vault::open(&settings)?;
    debug!(backend = vault.backend_name(), "vault opened");
    Ok((vault, settings.output_format))
}

/// Execute a parsed command line.
pub fn execute(cli: Cli) -> Result<()> {
    let Cli { global, command } = cli;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Get {
            name,
            version,
            passphrase,
            no_prompt,
        } => {
            let (vault, format) = open(&global)?;
            let request = get::Request {
                name,
                version,
                passphrase,
                no_prompt,
            };
            get::execute(&vault, &mut out, format, request)
        }
        Command::Set {
            name,
            encrypt,
            passphrase,
            no_prompt,
            value,
        } => {
            let (vault, format) = open(&global)?;
            let request = set::Request {
                name,
                encrypt,
                passphrase,
                no_prompt,
                value,
            };
            set::execute(&vault, &mut out, format, request)
        }
        Command::List => {
            let (vault, format) = open(&global)?;
            list::execute(&vault, &mut out, format)
        }
        Command::Delete { name, force } => {
            let (vault, _) = open(&global)?;
            delete::execute(&vault, &name, force)
        }
        Command::Completions { shell } => completions::execute(shell, &mut out),
    }
}
