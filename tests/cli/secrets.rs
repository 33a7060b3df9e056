//! Tests for plaintext `mksecret set/get`.

use crate::support::*;

#[test]
fn test_set_and_get_roundtrip() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["set", "--name", "foo", "hello", "world"])
        .output()
        .unwrap();
    assert_success(&output);
    // set shows name and version so generated names are visible
    assert_stdout_contains(&output, "NAME");
    assert_stdout_contains(&output, "foo");
    assert_stdout_contains(&output, "hello world");

    let output = t.get("foo");
    assert_success(&output);
    assert_eq!(stdout(&output), "hello world\n");
}

#[test]
fn test_standard_secrets_roundtrip() {
    let t = Test::new();
    for (name, value) in STANDARD_SECRETS {
        assert_roundtrip(&t, name, value);
    }
}

#[test]
fn test_value_from_stdin() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["set", "--name", "piped"])
        .write_stdin("from a pipe\nsecond line ignored\n")
        .output()
        .unwrap();
    assert_success(&output);

    let output = t.get("piped");
    assert_success(&output);
    assert_eq!(stdout(&output), "from a pipe\n");
}

#[test]
fn test_empty_stdin_value_rejected() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["set", "--name", "empty", "--no-prompt"])
        .write_stdin("")
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "zero length");
    assert!(!t.record_path("empty").exists());

    // the rejected attempt left the name free for an encrypted secret
    let output = t.set_encrypted("empty", "now-set", PASSPHRASE);
    assert_success(&output);
    assert_eq!(t.read_record("empty")["labels"]["encrypted"], "true");
}

#[test]
fn test_versions_accumulate() {
    let t = Test::with_secrets(&[("rotating", "one")]);

    let output = t.set("rotating", "two");
    assert_success(&output);

    let output = t.get("rotating");
    assert_eq!(stdout(&output), "two\n");

    let output = t
        .cmd()
        .args(["get", "rotating", "--version", "1"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output), "one\n");
}

#[test]
fn test_missing_version_fails() {
    let t = Test::with_secrets(&[("foo", "bar")]);

    let output = t
        .cmd()
        .args(["get", "foo", "--version", "7"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "not found");
}

#[test]
fn test_generated_name() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["set", "--output-format", "json", "anonymous"])
        .output()
        .unwrap();
    assert_success(&output);

    let record: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let name = record["name"].as_str().unwrap().to_string();
    assert_eq!(name.len(), 36);
    assert_eq!(record["version"], "1");
    assert_eq!(record["payload"], "anonymous");

    let output = t.get(&name);
    assert_success(&output);
    assert_eq!(stdout(&output), "anonymous\n");
}

#[test]
fn test_get_output_formats() {
    let t = Test::with_secrets(&[("foo", "hello world")]);

    let output = t
        .cmd()
        .args(["get", "foo", "--output-format", "json"])
        .output()
        .unwrap();
    assert_success(&output);
    let record: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(record["name"], "foo");
    assert_eq!(record["payload"], "hello world");

    let output = t
        .cmd()
        .args(["get", "foo", "--output-format", "yaml"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "payload: hello world");

    let output = t
        .cmd()
        .env("MKSECRET_OUTPUT_FORMAT", "table")
        .args(["get", "foo"])
        .output()
        .unwrap();
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.starts_with("NAME"));
    assert!(out.contains("PAYLOAD"));
}

#[test]
fn test_passphrase_ignored_for_plaintext() {
    let t = Test::with_secrets(&[("plain", "visible")]);

    let output = t.get_with("plain", PASSPHRASE);
    assert_success(&output);
    assert_eq!(stdout(&output), "visible\n");
}

#[cfg(unix)]
#[test]
fn test_vault_files_are_private() {
    use std::os::unix::fs::PermissionsExt;

    let t = Test::with_secrets(&[("private", "value")]);
    let mode = std::fs::metadata(t.record_path("private"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}
