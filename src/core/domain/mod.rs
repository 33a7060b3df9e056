//! Domain types.

mod secret;
mod version;

pub use secret::Secret;
pub use version::{SecretVersion, VersionRef};
