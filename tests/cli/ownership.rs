//! Secrets not created by mksecret are off limits.

use crate::support::*;

fn vault_with_foreign() -> Test {
    let t = Test::new();
    t.plant("theirs", &[("owner", "someone-else")]);
    t.plant("spoofed", &[("managed-by", "other-tool"), ("encrypted", "true")]);
    t
}

#[test]
fn test_get_foreign_secret_rejected() {
    let t = vault_with_foreign();

    for name in ["theirs", "spoofed"] {
        let output = t.get_with(name, PASSPHRASE);
        assert_failure(&output);
        assert_stderr_contains(&output, "not being managed");
        assert_eq!(stdout(&output), "");
    }
}

#[test]
fn test_set_foreign_secret_rejected() {
    let t = vault_with_foreign();

    for name in ["theirs", "spoofed"] {
        assert_failure(&t.set(name, "overwrite"));
        let output = t.set_encrypted(name, "overwrite", PASSPHRASE);
        assert_failure(&output);
        assert_stderr_contains(&output, "not being managed");

        let record = t.read_record(name);
        assert!(record["versions"].as_array().unwrap().is_empty());
    }
}

#[test]
fn test_delete_foreign_secret_rejected() {
    let t = vault_with_foreign();

    let output = t.delete_force("theirs");
    assert_failure(&output);
    assert_stderr_contains(&output, "not being managed");
    assert!(t.record_path("theirs").exists());
}

#[test]
fn test_custom_label_scheme_from_config() {
    let t = Test::with_secrets(&[("default-owned", "1")]);

    let config = t.home.path().join("custom.toml");
    std::fs::write(&config, "[labels]\nmanaged_by = \"team-tool\"\n").unwrap();

    let output = t
        .cmd()
        .args(["--config", config.to_str().unwrap()])
        .args(["set", "--name", "team-owned", "value"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(t.read_record("team-owned")["labels"]["managed-by"], "team-tool");

    // each identity sees only its own secrets
    let output = t
        .cmd()
        .args(["--config", config.to_str().unwrap(), "list"])
        .output()
        .unwrap();
    assert_eq!(stdout(&output), "team-owned\n");

    let output = t.get("team-owned");
    assert_failure(&output);
    assert_stderr_contains(&output, "not being managed");
}
