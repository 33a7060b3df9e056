//! Tests for passphrase-encrypted secrets.

use crate::support::*;

#[test]
fn test_encrypted_roundtrip() {
    let t = Test::new();

    let output = t.set_encrypted("bar", "topsecret", PASSPHRASE);
    assert_success(&output);
    // read-back confirmation shows the decrypted value
    assert_stdout_contains(&output, "topsecret");

    let output = t.get_with("bar", PASSPHRASE);
    assert_success(&output);
    assert_eq!(stdout(&output), "topsecret\n");
}

#[test]
fn test_wrong_passphrase_fails_cleanly() {
    let t = Test::new();
    assert_success(&t.set_encrypted("bar", "topsecret", PASSPHRASE));

    let output = t.get_with("bar", WRONG_PASSPHRASE);
    assert_failure(&output);
    assert_stderr_contains(&output, "authentication failed");
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_ciphertext_at_rest() {
    let t = Test::new();
    assert_success(&t.set_encrypted("bar", "topsecret", PASSPHRASE));

    let raw = std::fs::read_to_string(t.record_path("bar")).unwrap();
    assert!(!raw.contains("topsecret"));

    let record = t.read_record("bar");
    assert_eq!(record["labels"]["managed-by"], "mksecret");
    assert_eq!(record["labels"]["encrypted"], "true");
}

#[test]
fn test_passphrase_from_stdin() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["set", "--name", "bar", "--encrypt", "--no-prompt", "topsecret"])
        .write_stdin(format!("{}\n", PASSPHRASE))
        .output()
        .unwrap();
    assert_success(&output);

    let output = t
        .cmd()
        .args(["get", "bar", "--no-prompt"])
        .write_stdin(format!("{}\n", PASSPHRASE))
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output), "topsecret\n");
}

#[test]
fn test_value_and_passphrase_from_stdin() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["set", "--name", "bar", "--encrypt"])
        .write_stdin(format!("piped value\n{}\n", PASSPHRASE))
        .output()
        .unwrap();
    assert_success(&output);

    let output = t.get_with("bar", PASSPHRASE);
    assert_eq!(stdout(&output), "piped value\n");
}

#[test]
fn test_short_passphrase_rejected() {
    let t = Test::new();

    let output = t.set_encrypted("bar", "topsecret", "short");
    assert_failure(&output);
    assert_stderr_contains(&output, "at least 8 characters");
    assert!(!t.record_path("bar").exists());

    let output = t.set_encrypted("bar", "topsecret", PASSPHRASE);
    assert_success(&output);
    assert_eq!(stdout(&t.get_with("bar", PASSPHRASE)).trim(), "topsecret");
}

#[test]
fn test_encrypted_get_without_passphrase_fails() {
    let t = Test::new();
    assert_success(&t.set_encrypted("bar", "topsecret", PASSPHRASE));

    // empty stdin yields an empty passphrase, which cannot authenticate
    let output = t.cmd().args(["get", "bar"]).write_stdin("").output().unwrap();
    assert_failure(&output);
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_encryption_is_immutable() {
    let t = Test::with_secrets(&[("foo", "plain")]);

    let output = t.set_encrypted("foo", "now secret", PASSPHRASE);
    assert_failure(&output);
    assert_stderr_contains(&output, "immutable");

    // labels and versions untouched
    let record = t.read_record("foo");
    assert!(record["labels"].get("encrypted").is_none());
    assert_eq!(record["versions"].as_array().unwrap().len(), 1);
}

#[test]
fn test_encrypted_secret_stays_encrypted() {
    let t = Test::new();
    assert_success(&t.set_encrypted("bar", "first", PASSPHRASE));

    // no --encrypt, but the secret is encrypted
    let output = t
        .cmd()
        .args(["set", "--name", "bar", "--passphrase", PASSPHRASE, "second"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_stderr_contains(&output, "encrypted");

    let raw = std::fs::read_to_string(t.record_path("bar")).unwrap();
    assert!(!raw.contains("second"));

    let output = t.get_with("bar", PASSPHRASE);
    assert_eq!(stdout(&output), "second\n");
}

#[test]
fn test_tampered_checksum_detected() {
    let t = Test::new();
    assert_success(&t.set_encrypted("bar", "topsecret", PASSPHRASE));

    let mut record = t.read_record("bar");
    record["versions"][0]["crc32c"] = serde_json::json!(12345);
    t.write_record("bar", &record);

    let output = t.get_with("bar", PASSPHRASE);
    assert_failure(&output);
    assert_stderr_contains(&output, "checksum mismatch");
    assert_eq!(stdout(&output), "");
}
