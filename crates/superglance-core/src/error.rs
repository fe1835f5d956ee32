use std::path::PathBuf;

use superglance_secrets::SecretError;
use thiserror::Error;

/// Errors raised while loading the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No candidate file produced any section
    #[error("No superglance configuration found (searched: {})", display_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },

    /// A candidate file exists but could not be parsed
    #[error("Malformed configuration file '{}': {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
}

/// Errors raised while turning a config section into credentials
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Environment '{0}' is not defined in the configuration")]
    UnknownEnvironment(String),

    /// A recognized key resolved to nothing
    #[error(
        "Attempted to retrieve a credential for {lookup} but couldn't find it within the keyring"
    )]
    MissingCredential { key: String, lookup: String },

    /// `USE_KEYRING...` value with broken syntax
    #[error("Invalid value for {key}: {source}")]
    MalformedIndirection {
        key: String,
        #[source]
        source: SecretError,
    },
}

/// Errors raised while running the glance client
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Failed to start '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Client stdout was not captured")]
    MissingPipe,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that stop a whole superglance invocation
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Unable to find the '{name}' environment in your configuration file")]
    InvalidEnvironment { name: String, valid: Vec<String> },

    #[error("No arguments were provided to pass along to glance")]
    NoClientArgs,

    #[error("Failed to prepare credentials for '{environment}': {source}")]
    Resolve {
        environment: String,
        #[source]
        source: ResolveError,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
