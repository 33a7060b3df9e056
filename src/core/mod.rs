//! Core library components.
//!
//! Validation, passphrase cryptography, the labeling protocol, vault
//! backends and configuration. Nothing in here prompts or prints.

pub mod backend;
pub mod checksum;
pub mod config;
pub mod constants;
pub mod crypto;
pub mod domain;
pub mod labels;
pub mod validation;
pub mod vault;
