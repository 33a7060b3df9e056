//! Delete command.

use crate::cli::{output, prompt};
use crate::core::vault::Vault;
use crate::error::Result;

/// Delete a managed secret and all its versions.
///
/// Without `force` the user must type the secret name to confirm.
pub fn execute(vault: &Vault, name: &str, force: bool) -> Result<()> {
    if !force {
        prompt::confirm_name(name)?;
    }

    vault.delete(name)?;
    output::success(&format!("deleted {}", output::name(name)));
    Ok(())
}
