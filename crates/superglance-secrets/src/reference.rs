use std::fmt;
use std::str::FromStr;

use crate::error::SecretError;

/// Value marker that sends a lookup to the credential store
pub const USE_KEYRING: &str = "USE_KEYRING";

/// Scope used by `USE_KEYRING['id']` references
pub const GLOBAL_SCOPE: &str = "global";

/// Composite credential store key: `<scope>:<identifier>`.
///
/// The scope is an environment name or [`GLOBAL_SCOPE`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey {
    scope: String,
    identifier: String,
}

impl StoreKey {
    pub fn new(scope: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            identifier: identifier.into(),
        }
    }

    /// Key shared between environments
    pub fn global(identifier: impl Into<String>) -> Self {
        Self::new(GLOBAL_SCOPE, identifier)
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scope, self.identifier)
    }
}

/// A raw config value, classified by where its credential lives.
///
/// - `USE_KEYRING` - stored per environment under the parameter name
/// - `USE_KEYRING['id']` - stored once under `global:id`
/// - anything else - literal value written in the config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyringRef {
    /// Literal value (no keyring marker)
    Literal(String),

    /// `USE_KEYRING`
    Environment,

    /// `USE_KEYRING['id']`
    Global(String),
}

impl KeyringRef {
    /// Store key for this reference, or `None` for literals.
    ///
    /// `param` is the uppercased config key.
    pub fn store_key(&self, environment: &str, param: &str) -> Option<StoreKey> {
        match self {
            KeyringRef::Literal(_) => None,
            KeyringRef::Environment => Some(StoreKey::new(environment, param)),
            KeyringRef::Global(id) => Some(StoreKey::global(id.clone())),
        }
    }
}

impl FromStr for KeyringRef {
    type Err = SecretError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == USE_KEYRING {
            Ok(KeyringRef::Environment)
        } else if s.starts_with(USE_KEYRING) {
            parse_global_reference(s)
        } else {
            Ok(KeyringRef::Literal(s.to_string()))
        }
    }
}

/// Parse `USE_KEYRING['id']`, taking `id` verbatim
fn parse_global_reference(s: &str) -> Result<KeyringRef, SecretError> {
    let id = s
        .strip_prefix("USE_KEYRING['")
        .and_then(|rest| rest.strip_suffix("']"))
        .ok_or_else(|| {
            SecretError::invalid_reference(s, "expected USE_KEYRING or USE_KEYRING['identifier']")
        })?;

    Ok(KeyringRef::Global(id.to_string()))
}
