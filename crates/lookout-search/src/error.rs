//! Search error types.

use thiserror::Error;

/// Result type alias using the search error type.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors raised by a search provider.
///
/// Configuration errors are fatal and are raised before any network I/O.
/// Provider errors cover every runtime failure of the outbound call.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The provider credential is absent.
    #[error("Configuration error: {provider} API key is not set (expected {env_var})")]
    MissingApiKey {
        /// Provider name.
        provider: &'static str,
        /// Environment variable the key is usually read from.
        env_var: &'static str,
    },

    /// The provider could not be set up (invalid endpoint, HTTP client build failure).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The provider call failed: non-success HTTP status, network failure,
    /// timeout, or an unreadable response body.
    #[error("{provider} API error: {}", describe_failure(.status, .reason))]
    Provider {
        /// Provider name.
        provider: &'static str,
        /// HTTP status code, when a response was received.
        status: Option<u16>,
        /// Status reason or transport error text.
        reason: String,
    },
}

fn describe_failure(status: &Option<u16>, reason: &str) -> String {
    match status {
        Some(code) => format!("{} {}", code, reason),
        None => reason.to_string(),
    }
}

impl SearchError {
    /// Create a provider error.
    pub fn provider(provider: &'static str, status: Option<u16>, reason: impl Into<String>) -> Self {
        Self::Provider {
            provider,
            status,
            reason: reason.into(),
        }
    }

    /// Whether this error is a configuration problem that must not be
    /// absorbed into a degraded result.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingApiKey { .. } | Self::Config(_))
    }

    /// HTTP status code, if the provider answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Provider { status, .. } => *status,
            _ => None,
        }
    }

    /// Check if this is a server-side (5xx) provider failure.
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }
}
