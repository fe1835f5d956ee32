//! Turns an environment's config section into glance credentials

use superglance_secrets::{CredentialStore, KeyringRef};

use crate::config::Document;
use crate::error::ResolveError;

/// Config key prefixes passed on to glance (matched case-insensitively)
pub const RECOGNIZED_PREFIXES: [&str; 3] = ["glance_", "os_", "glanceclient"];

/// Keys that still load but should be migrated, with their replacement hint
pub const DEPRECATED_KEYS: [(&str, &str); 1] = [("insecure", "GLANCECLIENT_INSECURE=1")];

/// A credential ready for injection: uppercase variable name and literal value
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub key: String,
    pub value: String,
}

impl ResolvedEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl std::fmt::Debug for ResolvedEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedEntry")
            .field("key", &self.key)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// Whether a config key is one superglance forwards to glance
pub fn is_recognized_key(key: &str) -> bool {
    let key = key.to_lowercase();
    RECOGNIZED_PREFIXES
        .iter()
        .any(|prefix| key.starts_with(prefix))
}

/// Remove every single and double quote from a literal value
pub fn strip_quotes(value: &str) -> String {
    value.chars().filter(|c| !matches!(c, '"' | '\'')).collect()
}

/// Resolve every recognized key of `environment`.
///
/// Either every recognized key yields a non-empty value or the call fails;
/// a partial credential set is never returned.
pub fn resolve<S>(
    document: &Document,
    environment: &str,
    store: &S,
) -> Result<Vec<ResolvedEntry>, ResolveError>
where
    S: CredentialStore + ?Sized,
{
    let items = document
        .items(environment)
        .ok_or_else(|| ResolveError::UnknownEnvironment(environment.to_string()))?;

    warn_deprecated(document, environment);

    let mut entries = Vec::new();
    for (key, raw) in items {
        if !is_recognized_key(key) {
            continue;
        }

        let param = key.to_uppercase();
        let reference: KeyringRef = raw
            .parse()
            .map_err(|source| ResolveError::MalformedIndirection {
                key: param.clone(),
                source,
            })?;

        let (credential, lookup) = match reference.store_key(environment, &param) {
            Some(store_key) => {
                let credential = match store.get(&store_key) {
                    Ok(value) => Some(value),
                    Err(e) if e.is_not_found() => None,
                    Err(e) => {
                        tracing::warn!(key = %store_key, error = %e, "Credential store lookup failed");
                        None
                    }
                };
                (credential, store_key.to_string())
            }
            None => (Some(strip_quotes(raw)), param.clone()),
        };

        match credential {
            Some(value) if !value.is_empty() => entries.push(ResolvedEntry::new(param, value)),
            _ => {
                let err = ResolveError::MissingCredential { key: param, lookup };
                tracing::error!(environment, "{}", err);
                return Err(err);
            }
        }
    }

    tracing::debug!(environment, count = entries.len(), "Resolved credentials");
    Ok(entries)
}

fn warn_deprecated(document: &Document, environment: &str) {
    for (key, replacement) in DEPRECATED_KEYS {
        if document.has_option(environment, key) {
            tracing::warn!(
                environment,
                "the '{}' option is deprecated. Consider using {} instead.",
                key,
                replacement
            );
        }
    }
}
