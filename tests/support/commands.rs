//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::path::PathBuf;
use std::process::Output;

impl Test {
    /// Create a mksecret command bound to this test's local vault.
    ///
    /// Returns a Command configured with:
    /// - the local backend rooted at the temp vault directory
    /// - HOME and XDG dirs inside the temporary home directory
    /// - colors and inherited mksecret settings cleared
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("mksecret").expect("failed to find mksecret binary");
        cmd.env("HOME", self.home.path());
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("XDG_CONFIG_HOME", self.home.path().join(".config"));
        cmd.env("XDG_DATA_HOME", self.home.path().join(".local/share"));
        cmd.env("MKSECRET_BACKEND", "local");
        cmd.env("MKSECRET_VAULT_DIR", self.dir.path());
        cmd.env("NO_COLOR", "1");
        for var in [
            "MKSECRET_CONFIG",
            "MKSECRET_LOG",
            "MKSECRET_OUTPUT_FORMAT",
            "GOOGLE_PROJECT_ID",
            "GOOGLE_APPLICATION_CREDENTIALS",
        ] {
            cmd.env_remove(var);
        }
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `mksecret set --name <name> <value>`.
    pub fn set(&self, name: &str, value: &str) -> Output {
        self.cmd()
            .args(["set", "--name", name, value])
            .output()
            .expect("failed to run mksecret set")
    }

    /// Shortcut for an encrypting `mksecret set`.
    pub fn set_encrypted(&self, name: &str, value: &str, passphrase: &str) -> Output {
        self.cmd()
            .args([
                "set",
                "--name",
                name,
                "--encrypt",
                "--passphrase",
                passphrase,
                value,
            ])
            .output()
            .expect("failed to run mksecret set --encrypt")
    }

    /// Shortcut for `mksecret get <name>`.
    pub fn get(&self, name: &str) -> Output {
        self.cmd()
            .args(["get", name])
            .output()
            .expect("failed to run mksecret get")
    }

    /// Shortcut for `mksecret get <name> --passphrase <p>`.
    pub fn get_with(&self, name: &str, passphrase: &str) -> Output {
        self.cmd()
            .args(["get", name, "--passphrase", passphrase])
            .output()
            .expect("failed to run mksecret get")
    }

    /// Shortcut for `mksecret list`.
    pub fn list(&self) -> Output {
        self.cmd()
            .arg("list")
            .output()
            .expect("failed to run mksecret list")
    }

    /// Shortcut for `mksecret list --output-format <format>`.
    pub fn list_as(&self, format: &str) -> Output {
        self.cmd()
            .args(["list", "--output-format", format])
            .output()
            .expect("failed to run mksecret list")
    }

    /// Shortcut for `mksecret delete --force <name>`.
    pub fn delete_force(&self, name: &str) -> Output {
        self.cmd()
            .args(["delete", "--force", name])
            .output()
            .expect("failed to run mksecret delete")
    }

    /// Path of a secret's document in the local vault.
    pub fn record_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(format!("{}.json", name))
    }

    /// Read a secret's document from the local vault.
    pub fn read_record(&self, name: &str) -> serde_json::Value {
        let contents = std::fs::read_to_string(self.record_path(name))
            .expect("failed to read secret record");
        serde_json::from_str(&contents).expect("secret record is not json")
    }

    /// Overwrite a secret's document in the local vault.
    pub fn write_record(&self, name: &str, record: &serde_json::Value) {
        std::fs::write(
            self.record_path(name),
            serde_json::to_vec_pretty(record).expect("failed to serialize record"),
        )
        .expect("failed to write secret record");
    }

    /// Place a secret created by someone else into the vault.
    pub fn plant(&self, name: &str, labels: &[(&str, &str)]) {
        let labels: serde_json::Map<String, serde_json::Value> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
            .collect();
        let record = serde_json::json!({
            "name": name,
            "labels": labels,
            "created": "2024-01-01T00:00:00Z",
            "versions": [],
        });
        self.write_record(name, &record);
    }
}
