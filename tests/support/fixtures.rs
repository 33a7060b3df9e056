//! Test fixtures and constants.

/// Passphrase used for encrypted secrets.
pub const PASSPHRASE: &str = "correct-horse";

/// A passphrase that must fail to decrypt.
pub const WRONG_PASSPHRASE: &str = "wrong-pass";

/// Plaintext secrets used across multiple tests.
pub const STANDARD_SECRETS: &[(&str, &str)] = &[
    ("db-password", "hunter22"),
    ("api-key", "sk-test-12345"),
    ("wallet-mnemonic", "abandon ability able about above absent"),
];
