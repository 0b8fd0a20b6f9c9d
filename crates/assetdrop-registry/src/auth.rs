//! Token authentication for the registry.
//!
//! The token is sent as `Authorization: Bearer <token>`. It never appears in
//! `Debug` output.

use std::fmt;

/// Token provider for registry authentication.
#[derive(Clone, Default)]
pub enum TokenProvider {
    /// Static token (from config or env).
    Static(String),

    /// No authentication.
    #[default]
    None,
}

impl TokenProvider {
    /// Create a static token provider.
    pub fn static_token(token: impl Into<String>) -> Self {
        Self::Static(token.into())
    }

    /// Get the current token.
    pub fn get_token(&self) -> Option<&str> {
        match self {
            Self::Static(token) if !token.is_empty() => Some(token),
            _ => None,
        }
    }

    /// Check if authentication is configured.
    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(_) => f.write_str("TokenProvider::Static(<redacted>)"),
            Self::None => f.write_str("TokenProvider::None"),
        }
    }
}
