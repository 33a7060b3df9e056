//! Terminal input for values, passphrases and confirmations.
//!
//! Interactive prompts use dialoguer with hidden input. When stdin is not a
//! terminal each request consumes one line from it instead, so values and
//! passphrases can be piped.

use std::io::{self, BufRead, IsTerminal};

use console::Term;
use dialoguer::{Input, Password};
use zeroize::Zeroizing;

use crate::core::validation::validate_passphrase;
use crate::error::{Result, ValidationError};

/// Read one line from stdin, without its line ending.
fn read_line() -> Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    io::stdin().lock().read_line(&mut line)?;
    Ok(Zeroizing::new(
        line.trim_end_matches(['\r', '\n']).to_string(),
    ))
}

fn read_hidden(prompt: &str, no_prompt: bool) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        return read_line();
    }
    if no_prompt {
        return Ok(Zeroizing::new(Term::stderr().read_secure_line()?));
    }
    Ok(Zeroizing::new(
        Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?,
    ))
}

/// Read the secret value.
pub fn value(no_prompt: bool) -> Result<Zeroizing<String>> {
    read_hidden("Enter secret value", no_prompt)
}

/// Read a passphrase for decryption.
pub fn passphrase(no_prompt: bool) -> Result<Zeroizing<String>> {
    read_hidden("Enter passphrase", no_prompt)
}

/// Read a passphrase for encryption.
///
/// Interactive sessions ask twice and fail if the entries differ. Piped
/// input is read once.
///
/// # Errors
///
/// Returns `ValidationError::PassphraseTooShort` before asking for the
/// confirmation, and `ValidationError::PassphraseMismatch` if the two
/// entries differ.
pub fn new_passphrase(no_prompt: bool) -> Result<Zeroizing<String>> {
    let first = read_hidden("Enter passphrase", no_prompt)?;
    validate_passphrase(first.as_bytes())?;

    if io::stdin().is_terminal() {
        let second = read_hidden("Confirm passphrase", no_prompt)?;
        if first.as_str() != second.as_str() {
            return Err(ValidationError::PassphraseMismatch.into());
        }
    }
    Ok(first)
}

/// Ask the user to type `name` to confirm a destructive action.
///
/// # Errors
///
/// Returns `ValidationError::ConfirmationMismatch` unless the input matches.
pub fn confirm_name(name: &str) -> Result<()> {
    let typed = if io::stdin().is_terminal() {
        Input::<String>::new()
            .with_prompt(format!("Type the secret name to delete ({})", name))
            .allow_empty(true)
            .interact_text()?
    } else {
        eprint!("Type the secret name to delete ({}): ", name);
        read_line()?.to_string()
    };

    if typed.trim() != name {
        return Err(ValidationError::ConfirmationMismatch.into());
    }
    Ok(())
}
