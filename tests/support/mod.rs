//! Test support utilities for mksecret integration tests.
//!
//! Every test runs the binary against the local backend in its own temp
//! vault directory, with an isolated home so no user config is picked up.

#![allow(dead_code)]

pub mod commands;
pub mod fixtures;
pub mod skip;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use tempfile::TempDir;

/// Test environment with isolated temp directories.
pub struct Test {
    /// Local vault directory
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self { dir, home }
    }

    /// Create a test environment with plaintext secrets already set.
    pub fn with_secrets(secrets: &[(&str, &str)]) -> Self {
        let t = Self::new();
        for (name, value) in secrets {
            let output = t.set(name, value);
            assert!(
                output.status.success(),
                "Failed to set secret {}: {}",
                name,
                String::from_utf8_lossy(&output.stderr)
            );
        }
        t
    }
}
