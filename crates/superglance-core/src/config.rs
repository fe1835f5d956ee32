//! superglance configuration file
//!
//! An ini file with one section per environment:
//!
//! ```ini
//! [dev]
//! os_auth_url = https://identity.example.com/v2.0/
//! os_username = USE_KEYRING
//! os_password = USE_KEYRING['shared-password']
//!
//! [all]
//! group = [dev, prod]
//! ```
//!
//! `~/.superglance` is read first, then `.superglance` in the current
//! directory; the later file wins on conflicting keys.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};

use crate::error::ConfigError;

/// Config file name looked up in the home and current directories
pub const CONFIG_FILE_NAME: &str = ".superglance";

/// Section whose keys every other section inherits
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// One named section: lowercase key -> raw value, in first-seen order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set `key`, replacing an existing value in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into().to_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parsed configuration: ordered environment sections plus inherited defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    defaults: Section,
    sections: Vec<Section>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            defaults: Section::new(DEFAULT_SECTION),
            sections: Vec::new(),
        }
    }
}

impl Document {
    /// Parse one ini source.
    ///
    /// Quotes and backslashes are kept verbatim; keys outside any section are
    /// rejected.
    pub fn parse(content: &str) -> Result<Self, String> {
        let opt = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(content, opt).map_err(|e| e.to_string())?;

        let mut document = Document::default();
        for (name, props) in ini.iter() {
            let Some(name) = name else {
                if let Some((key, _)) = props.iter().next() {
                    return Err(format!("option '{}' appears before any section header", key));
                }
                continue;
            };

            let section = document.section_entry(name);
            for (key, value) in props.iter() {
                section.insert(key, value.trim());
            }
        }

        Ok(document)
    }

    /// Merge `other` into `self`; `other` wins on conflicting keys
    pub fn merge(&mut self, other: Document) {
        for (key, value) in other.defaults.entries {
            self.defaults.insert(key, value);
        }
        for section in other.sections {
            let target = self.section_entry(&section.name);
            for (key, value) in section.entries {
                target.insert(key, value);
            }
        }
    }

    /// Environment names, in file order
    pub fn sections(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name()).collect()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn is_valid_environment(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Items of an environment with defaults merged in.
    ///
    /// Inherited keys come first, in the defaults' order; the section's own
    /// value replaces an inherited one in place.
    pub fn items(&self, name: &str) -> Option<Vec<(&str, &str)>> {
        let section = self.section(name)?;

        let mut items: Vec<(&str, &str)> = self.defaults.iter().collect();
        for (key, value) in section.iter() {
            match items.iter_mut().find(|(k, _)| *k == key) {
                Some(item) => item.1 = value,
                None => items.push((key, value)),
            }
        }
        Some(items)
    }

    /// Value of `key` in an environment, falling back to the defaults
    pub fn get(&self, name: &str, key: &str) -> Option<&str> {
        let section = self.section(name)?;
        section.get(key).or_else(|| self.defaults.get(key))
    }

    pub fn has_option(&self, name: &str, key: &str) -> bool {
        self.get(name, key).is_some()
    }

    fn section_entry(&mut self, name: &str) -> &mut Section {
        if name == DEFAULT_SECTION {
            return &mut self.defaults;
        }

        let index = match self.sections.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }
}

/// Loads and caches the configuration from a list of candidate files
#[derive(Debug)]
pub struct ConfigStore {
    candidates: Vec<PathBuf>,
    cache: OnceCell<Document>,
}

impl ConfigStore {
    /// Store reading `~/.superglance` then `./.superglance`
    pub fn new() -> Self {
        Self::with_candidates(Self::default_candidates())
    }

    /// Store reading the given files, later ones taking precedence
    pub fn with_candidates(candidates: Vec<PathBuf>) -> Self {
        Self {
            candidates,
            cache: OnceCell::new(),
        }
    }

    pub fn default_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(CONFIG_FILE_NAME));
        }
        candidates.push(PathBuf::from(CONFIG_FILE_NAME));
        candidates
    }

    /// Return the merged document, reading the files on first use only.
    ///
    /// A document without sections is reported as `NotFound`.
    pub fn load(&self) -> Result<&Document, ConfigError> {
        let document = match self.cache.get() {
            Some(document) => document,
            None => {
                let document = self.read_candidates()?;
                self.cache.get_or_init(|| document)
            }
        };

        if document.is_empty() {
            return Err(ConfigError::NotFound {
                searched: self.candidates.clone(),
            });
        }
        Ok(document)
    }

    fn read_candidates(&self) -> Result<Document, ConfigError> {
        let mut merged = Document::default();

        for path in &self.candidates {
            let Some(content) = read_candidate(path) else {
                continue;
            };

            let document = Document::parse(&content).map_err(|reason| ConfigError::Malformed {
                path: path.clone(),
                reason,
            })?;

            tracing::debug!(path = %path.display(), sections = document.sections.len(), "Loaded configuration file");
            merged.merge(document);
        }

        Ok(merged)
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

fn read_candidate(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Skipping configuration candidate");
            None
        }
    }
}
