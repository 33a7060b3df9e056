//! Set command.
//!
//! Writes a new version, creating the secret on first use.

use std::io::Write;

use tracing::debug;
use zeroize::Zeroizing;

use crate::cli::{output, prompt, render};
use crate::core::config::OutputFormat;
use crate::core::validation::generate_name;
use crate::core::vault::Vault;
use crate::error::Result;

/// Arguments of `set`.
#[derive(Debug)]
pub struct Request {
    pub name: Option<String>,
    pub encrypt: bool,
    pub passphrase: Option<String>,
    pub no_prompt: bool,
    pub value: Vec<String>,
}

/// Write a value and print the stored version.
///
/// The secret is resolved before any input is read, so ownership and
/// immutability failures surface without prompting.
pub fn execute(
    vault: &Vault,
    out: &mut impl Write,
    format: OutputFormat,
    request: Request,
) -> Result<()> {
    let Request {
        name,
        encrypt,
        passphrase,
        no_prompt,
        value,
    } = request;

    let name = name.unwrap_or_else(generate_name);
    let target = vault.prepare_write(&name, encrypt)?;

    if target.is_encrypted() && !encrypt {
        output::warn(&format!(
            "{} is encrypted, the new version will be too",
            output::name(&name)
        ));
    }

    let value = if value.is_empty() {
        prompt::value(no_prompt)?
    } else {
        Zeroizing::new(value.join(" "))
    };

    let passphrase = match (target.is_encrypted(), passphrase) {
        (true, Some(p)) => Some(Zeroizing::new(p)),
        (true, None) => Some(prompt::new_passphrase(no_prompt)?),
        (false, Some(_)) => {
            debug!(name = %name, "ignoring passphrase for plaintext secret");
            None
        }
        (false, None) => None,
    };

    let revealed = vault.write(
        &target,
        value.as_bytes(),
        passphrase.as_ref().map(|p| p.as_bytes()),
    )?;

    // the raw payload alone would hide a generated name
    let format = match format {
        OutputFormat::Native => OutputFormat::Table,
        other => other,
    };
    render::version(out, format, &revealed)
}
