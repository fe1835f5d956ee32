//! Credential store access for superglance
//!
//! Config values may point into the OS credential store instead of holding a
//! secret directly:
//!
//! - `USE_KEYRING` - looked up as `<environment>:<PARAMETER>`
//! - `USE_KEYRING['id']` - looked up as `global:id`, shared between environments
//! - anything else is a literal value
//!
//! Every credential lives under the `superglance` service.
//!
//! # Example
//!
//! ```rust,ignore
//! use superglance_secrets::{CredentialStore, KeyringRef, KeyringStore};
//!
//! let reference: KeyringRef = "USE_KEYRING['rackspace']".parse()?;
//! let key = reference.store_key("dev", "OS_PASSWORD").unwrap();
//! let secret = KeyringStore::new().get(&key)?;
//! ```
//!
//! # Features
//!
//! - `keychain` (default): Enable OS keychain support via `keyring` crate

mod backends;
mod error;
mod reference;
mod store;

pub use error::SecretError;
pub use reference::{KeyringRef, StoreKey, GLOBAL_SCOPE, USE_KEYRING};
pub use store::{CredentialStore, KeyringStore, MemoryStore, SERVICE};
