//! mksecret - Store short secrets in a cloud secrets vault.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mksecret::cli::output;
use mksecret::cli::{execute, Cli};
use mksecret::core::constants::LOG_ENV;
use mksecret::error::{ConfigError, Error, LabelError, ValidationError, VaultError};

fn hint(e: &Error) -> Option<&'static str> {
    match e {
        e if e.is_authentication() => Some("check the passphrase and try again"),
        Error::Label(LabelError::NotManaged(_)) => {
            Some("only secrets created by mksecret can be read or changed")
        }
        Error::Label(LabelError::EncryptionImmutable(_)) => {
            Some("write without --encrypt, or use a new secret name")
        }
        Error::Validation(ValidationError::InvalidName { .. }) => {
            Some("use lowercase letters, digits and '-', starting and ending with a letter or digit")
        }
        Error::Config(ConfigError::Missing("project")) => {
            Some("pass --project or set GOOGLE_PROJECT_ID")
        }
        Error::Vault(VaultError::Unavailable(_)) => Some("run: gcloud auth login"),
        _ => None,
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.global.verbose {
            EnvFilter::new("mksecret=debug")
        } else {
            EnvFilter::new("mksecret=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli) {
        output::error(&e.to_string());
        if let Some(h) = hint(&e) {
            output::hint(h);
        }
        std::process::exit(1);
    }
}
