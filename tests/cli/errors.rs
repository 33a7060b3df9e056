//! Error reporting and exit codes.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_invalid_name_rejected() {
    let t = Test::new();

    for name in ["Bad_Name", "UPPER", "ends-with-dash-", "has.dot"] {
        let output = t.set(name, "value");
        assert_failure(&output);
        assert_stderr_contains(&output, "DNS-1123");
        assert_stderr_contains(&output, "starting and ending with a letter or digit");
        assert!(!t.record_path(name).exists());
    }
}

#[test]
fn test_digit_boundaries_accepted() {
    let t = Test::new();

    for name in ["0abc9", "1starts-with-digit"] {
        assert_success(&t.set(name, "value"));
        assert!(t.record_path(name).exists());
    }
}

#[test]
fn test_name_too_long_rejected() {
    let t = Test::new();

    let output = t.set(&"a".repeat(64), "value");
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid name");
}

#[test]
fn test_error_exit_code() {
    let t = Test::new();

    let output = t.get("missing");
    assert_eq!(output.status.code(), Some(1));
    assert_stderr_contains(&output, "✗");
}

#[test]
fn test_wrong_passphrase_hint() {
    let t = Test::new();
    assert_success(&t.set_encrypted("bar", "topsecret", PASSPHRASE));

    let output = t.get_with("bar", WRONG_PASSPHRASE);
    assert_stderr_contains(&output, "check the passphrase");
}

#[cfg(feature = "gcp")]
#[test]
fn test_gcp_backend_requires_project() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["--backend", "gcp", "list"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "project");
}

#[test]
fn test_unknown_output_format() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["list", "--output-format", "xml"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "xml");
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    t.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_completions() {
    let t = Test::new();

    for shell in ["bash", "zsh", "fish", "power-shell"] {
        t.cmd()
            .args(["completions", shell])
            .assert()
            .success()
            .stdout(predicate::str::contains("mksecret"));
    }
}

#[test]
fn test_missing_subcommand() {
    let t = Test::new();

    t.cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
