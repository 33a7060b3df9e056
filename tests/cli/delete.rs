//! Tests for `mksecret delete`.

use crate::support::*;

#[test]
fn test_delete_with_force() {
    let t = Test::with_secrets(&[("foo", "bar")]);

    let output = t.delete_force("foo");
    assert_success(&output);
    assert_stderr_contains(&output, "deleted foo");
    assert!(!t.record_path("foo").exists());

    let output = t.get("foo");
    assert_failure(&output);
    assert_stderr_contains(&output, "not found");
}

#[test]
fn test_delete_typed_confirmation() {
    let t = Test::with_secrets(&[("foo", "bar")]);

    let output = t
        .cmd()
        .args(["delete", "foo"])
        .write_stdin("foo\n")
        .output()
        .unwrap();
    assert_success(&output);
    assert!(!t.record_path("foo").exists());
}

#[test]
fn test_delete_confirmation_mismatch_keeps_secret() {
    let t = Test::with_secrets(&[("foo", "bar")]);

    let output = t
        .cmd()
        .args(["delete", "foo"])
        .write_stdin("fo\n")
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "does not match");
    assert!(t.record_path("foo").exists());
}

#[test]
fn test_delete_missing_secret() {
    let t = Test::new();

    let output = t.delete_force("ghost");
    assert_failure(&output);
    assert_stderr_contains(&output, "not found");
}

#[test]
fn test_delete_encrypted_needs_no_passphrase() {
    let t = Test::new();
    assert_success(&t.set_encrypted("bar", "topsecret", PASSPHRASE));

    assert_success(&t.delete_force("bar"));
    assert!(!t.record_path("bar").exists());
}
