//! `keyring` crate backend
//!
//! Entries live under one service name with the store key as the username:
//! macOS Keychain, Windows Credential Manager, or the freedesktop Secret
//! Service (GNOME Keyring, KWallet) over D-Bus on Linux.

use keyring::{Entry, Error};

use crate::error::SecretError;

const BACKEND: &str = "keychain";

fn entry(service: &str, username: &str) -> Result<Entry, SecretError> {
    Entry::new(service, username).map_err(|e| SecretError::backend(BACKEND, e.to_string()))
}

fn map_error(error: Error, username: &str) -> SecretError {
    match error {
        Error::NoEntry => SecretError::NotFound(username.to_string()),
        Error::NoStorageAccess(inner) => {
            SecretError::AccessDenied(format!("keychain is locked or unreachable: {}", inner))
        }
        Error::Ambiguous(matches) => SecretError::backend(
            BACKEND,
            format!("{} entries match {}", matches.len(), username),
        ),
        other => SecretError::backend(BACKEND, other.to_string()),
    }
}

pub fn resolve(service: &str, username: &str) -> Result<String, SecretError> {
    entry(service, username)?
        .get_password()
        .map_err(|e| map_error(e, username))
}

pub fn store(service: &str, username: &str, value: &str) -> Result<(), SecretError> {
    entry(service, username)?
        .set_password(value)
        .map_err(|e| map_error(e, username))
}
