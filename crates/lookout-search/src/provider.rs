//! Provider abstraction.
//!
//! The rest of the system talks to search backends only through
//! [`SearchProvider`], so a different backend can be substituted without
//! touching the tool executor.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::types::{SearchRequest, SearchResults};

/// A web search backend.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short provider name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Check that the provider has everything it needs to make a call.
    ///
    /// Must not perform I/O. Callers run this before starting any visible
    /// work so configuration problems surface before a request is attempted.
    fn ensure_configured(&self) -> Result<()> {
        Ok(())
    }

    /// Run a search.
    ///
    /// Implementations apply the provider's own request constraints (query
    /// padding, result floors) and return normalized results.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResults>;
}

/// Shared handle to a provider.
pub type SharedProvider = Arc<dyn SearchProvider>;

/// An API credential.
///
/// Never printed: both `Debug` and `Display` redact the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a credential. Returns `None` for blank values.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// The raw credential, for placing on the wire.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}
