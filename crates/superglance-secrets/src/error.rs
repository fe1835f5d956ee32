use thiserror::Error;

/// Errors that can occur while talking to the credential store
#[derive(Debug, Error)]
pub enum SecretError {
    /// Malformed `USE_KEYRING[...]` reference
    #[error("Invalid keyring reference '{value}': {reason}")]
    InvalidReference { value: String, reason: String },

    /// No credential stored under this key
    #[error("Secret not found: {0}")]
    NotFound(String),

    /// Backend feature not compiled in
    #[error("Secret backend '{backend}' not available (feature not enabled)")]
    BackendDisabled { backend: String },

    /// Backend runtime error
    #[error("{backend} error: {message}")]
    BackendError { backend: String, message: String },

    /// Permission/access denied
    #[error("Access denied to secret: {0}")]
    AccessDenied(String),
}

impl SecretError {
    /// Create an invalid reference error
    pub fn invalid_reference(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a backend error
    pub fn backend(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BackendError {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Create a backend disabled error
    pub fn disabled(backend: impl Into<String>) -> Self {
        Self::BackendDisabled {
            backend: backend.into(),
        }
    }

    /// True when the store answered but holds nothing for the key.
    ///
    /// Every other variant means the lookup itself could not be performed.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SecretError::NotFound(_))
    }
}
