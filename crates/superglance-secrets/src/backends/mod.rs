//! Credential store backend implementations

#[cfg(feature = "keychain")]
pub mod keychain;
