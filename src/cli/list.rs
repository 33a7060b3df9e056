//! List command.

use std::io::Write;

use crate::cli::render;
use crate::core::config::OutputFormat;
use crate::core::vault::Vault;
use crate::error::Result;

/// Print the secrets managed by this tool.
pub fn execute(vault: &Vault, out: &mut impl Write, format: OutputFormat) -> Result<()> {
    let secrets = vault.list()?;
    render::secrets(out, format, &secrets)
}
