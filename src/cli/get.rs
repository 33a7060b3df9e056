//! Get command.

use std::io::Write;

use tracing::debug;
use zeroize::Zeroizing;

use crate::cli::{prompt, render};
use crate::core::config::OutputFormat;
use crate::core::domain::VersionRef;
use crate::core::vault::Vault;
use crate::error::Result;

/// Arguments of `get`.
#[derive(Debug)]
pub struct Request {
    pub name: String,
    pub version: VersionRef,
    pub passphrase: Option<String>,
    pub no_prompt: bool,
}

/// Print a version of a managed secret.
///
/// A passphrase is requested only when the secret is encrypted.
pub fn execute(
    vault: &Vault,
    out: &mut impl Write,
    format: OutputFormat,
    request: Request,
) -> Result<()> {
    let Request {
        name,
        version,
        passphrase,
        no_prompt,
    } = request;

    let fetched = vault.fetch(&name, version)?;

    let passphrase = if fetched.is_encrypted() {
        debug!(name = %name, "secret is encrypted");
        Some(match passphrase {
            Some(p) => Zeroizing::new(p),
            None => prompt::passphrase(no_prompt)?,
        })
    } else {
        None
    };

    let revealed = fetched.reveal(passphrase.as_ref().map(|p| p.as_bytes()))?;
    render::version(out, format, &revealed)
}
