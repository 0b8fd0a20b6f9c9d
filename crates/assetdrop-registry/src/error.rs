//! Error types for the registry client.

/// Registry errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Release (or asset) not found.
    #[error("not found: {what}")]
    NotFound { what: String },

    /// Authentication failed or token invalid.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// Token lacks the scope required for the operation.
    #[error("forbidden: {message}")]
    Forbidden { message: String },

    /// Network error or unexpected HTTP status.
    #[error("network error: {message}")]
    Network { message: String },

    /// Invalid response from the registry.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// Local file could not be read for upload.
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl RegistryError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        // Every registry failure aborts the run the same way.
        1
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
