//! Credential store adapter

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::SecretError;
use crate::reference::StoreKey;

/// Service name every credential is filed under
pub const SERVICE: &str = "superglance";

/// Get/set access to a secure key-value store.
///
/// Implementations report failures through [`SecretError`] and never panic:
/// `NotFound` means "no credential", every other variant means the backend
/// itself failed. Callers decide what to do with either; nothing is retried.
pub trait CredentialStore {
    /// Look up the credential stored under `key`
    fn get(&self, key: &StoreKey) -> Result<String, SecretError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &StoreKey, value: &str) -> Result<(), SecretError>;
}

impl<S: CredentialStore + ?Sized> CredentialStore for &S {
    fn get(&self, key: &StoreKey) -> Result<String, SecretError> {
        (**self).get(key)
    }

    fn set(&self, key: &StoreKey, value: &str) -> Result<(), SecretError> {
        (**self).set(key, value)
    }
}

/// OS keychain store (macOS Keychain, Windows Credential Manager, Linux Secret Service)
#[derive(Debug, Default)]
pub struct KeyringStore {
    _private: (), // Prevent construction without ::new()
}

impl KeyringStore {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl CredentialStore for KeyringStore {
    fn get(&self, key: &StoreKey) -> Result<String, SecretError> {
        tracing::debug!(key = %key, "Reading credential from keychain");

        #[cfg(feature = "keychain")]
        {
            crate::backends::keychain::resolve(SERVICE, &key.to_string())
        }

        #[cfg(not(feature = "keychain"))]
        {
            Err(SecretError::disabled("keychain"))
        }
    }

    fn set(&self, key: &StoreKey, value: &str) -> Result<(), SecretError> {
        tracing::debug!(key = %key, "Writing credential to keychain");

        #[cfg(feature = "keychain")]
        {
            crate::backends::keychain::store(SERVICE, &key.to_string(), value)
        }

        #[cfg(not(feature = "keychain"))]
        {
            let _ = value;
            Err(SecretError::disabled("keychain"))
        }
    }
}

/// In-process store, keyed by the `scope:identifier` string
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style seeding
    pub fn with(mut self, key: &StoreKey, value: impl Into<String>) -> Self {
        self.entries
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.into());
        self
    }

    // Poisoning is ignored: every write is a single insert
    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &StoreKey) -> Result<String, SecretError> {
        self.entries()
            .get(&key.to_string())
            .cloned()
            .ok_or_else(|| SecretError::NotFound(key.to_string()))
    }

    fn set(&self, key: &StoreKey, value: &str) -> Result<(), SecretError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
