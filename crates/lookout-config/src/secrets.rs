//! API key resolution.
//!
//! Resolution order:
//! 1. Environment variable
//! 2. Config file (with warning at load time)
//!
//! Empty values count as absent at every step.

use crate::{ConfigError, Result, SearchBackend};

/// Result of API key resolution with provenance.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedSecret {
    /// The secret value.
    pub value: String,
    /// Where the secret was found.
    pub source: SecretSource,
}

impl std::fmt::Debug for ResolvedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSecret")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

/// Where a secret was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    /// Environment variable.
    EnvVar(String),
    /// Config file (plaintext, not recommended).
    ConfigFile,
}

impl std::fmt::Display for SecretSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretSource::EnvVar(var) => write!(f, "env var {}", var),
            SecretSource::ConfigFile => write!(f, "config file (plaintext)"),
        }
    }
}

/// Resolve an API key for a provider from the process environment, then the
/// config file value.
pub fn resolve_api_key(
    backend: &SearchBackend,
    config_value: Option<&str>,
) -> Option<ResolvedSecret> {
    resolve_api_key_with(backend, config_value, |key| std::env::var(key).ok())
}

/// Like [`resolve_api_key`] with an injected environment lookup.
pub fn resolve_api_key_with(
    backend: &SearchBackend,
    config_value: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<ResolvedSecret> {
    let env_var = backend.env_var();
    if let Some(value) = lookup(env_var)
        && !value.trim().is_empty()
    {
        return Some(ResolvedSecret {
            value,
            source: SecretSource::EnvVar(env_var.to_string()),
        });
    }

    config_value
        .filter(|v| !v.trim().is_empty())
        .map(|v| ResolvedSecret {
            value: v.to_string(),
            source: SecretSource::ConfigFile,
        })
}

/// Resolve an API key, failing with [`ConfigError::ApiKeyNotFound`] when
/// neither source has one.
pub fn require_api_key(
    backend: &SearchBackend,
    config_value: Option<&str>,
) -> Result<ResolvedSecret> {
    resolve_api_key(backend, config_value).ok_or_else(|| missing(backend))
}

fn missing(backend: &SearchBackend) -> ConfigError {
    ConfigError::ApiKeyNotFound {
        provider: backend.name().to_string(),
        env_var: backend.env_var().to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
