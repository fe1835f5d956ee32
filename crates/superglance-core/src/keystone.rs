//! Keystone-style credential fields built from resolved entries

use std::collections::BTreeMap;

use crate::resolver::ResolvedEntry;

/// Leading key tokens dropped from keystone field names
pub const KEYSTONE_PREFIXES: [&str; 3] = ["NOVA", "GLANCECLIENT", "OS"];

/// Field holding the image service endpoint
pub const IMAGE_URL_FIELD: &str = "image_url";

/// Field holding the image API version
pub const VERSION_FIELD: &str = "version";

pub const DEFAULT_IMAGE_API_VERSION: &str = "1";

/// Lowercase `name` after dropping a leading `NOVA`, `GLANCECLIENT` or `OS` token.
///
/// `OS_USERNAME` -> `username`, `CUSTOM_X` -> `custom_x`.
pub fn rm_prefix(name: &str) -> String {
    let (head, rest) = match name.split_once('_') {
        Some((head, rest)) => (head, Some(rest)),
        None => (name, None),
    };

    if KEYSTONE_PREFIXES
        .iter()
        .any(|prefix| head.eq_ignore_ascii_case(prefix))
    {
        return rest.unwrap_or_default().to_lowercase();
    }
    name.to_lowercase()
}

/// Identity-service fields for one environment
#[derive(Clone, PartialEq, Eq, Default)]
pub struct KeystoneCredentials {
    fields: BTreeMap<String, String>,
    image_url: Option<String>,
    version: Option<String>,
}

impl KeystoneCredentials {
    /// Build the field set in entry order.
    ///
    /// When two entries normalize to the same field the later one wins.
    /// `image_url` and `version` are held apart from the auth fields.
    pub fn from_entries(entries: &[ResolvedEntry]) -> Self {
        let mut creds = Self::default();
        for entry in entries {
            let field = rm_prefix(&entry.key);
            match field.as_str() {
                IMAGE_URL_FIELD => creds.image_url = Some(entry.value.clone()),
                VERSION_FIELD => creds.version = Some(entry.value.clone()),
                _ => {
                    creds.fields.insert(field, entry.value.clone());
                }
            }
        }
        creds
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_IMAGE_API_VERSION)
    }
}

impl std::fmt::Debug for KeystoneCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeystoneCredentials")
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("image_url", &self.image_url)
            .field("version", &self.version())
            .finish()
    }
}
