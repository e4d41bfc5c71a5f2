//! CLI command handlers.

pub mod config;
pub mod search;
pub mod tools;

use std::sync::Arc;

use anyhow::Result;
use lookout_agent::ToolRegistry;
use lookout_config::{LoadedConfig, SearchSection, resolve_api_key};
use lookout_search::{ApiKey, ProviderConfig, TavilyClient};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
    /// Merged configuration and where it came from.
    pub loaded: LoadedConfig,
}

impl Context {
    /// The effective `[search]` settings.
    pub fn search_settings(&self) -> SearchSection {
        self.loaded.config.search()
    }

    /// Build the provider client and the default tool registry.
    ///
    /// A missing API key is not an error here; the search tool rejects the
    /// call before any request is made.
    pub fn registry(&self) -> Result<ToolRegistry> {
        let settings = self.search_settings();
        let backend = settings.backend();

        let resolved = resolve_api_key(&backend, settings.api_key.as_deref());
        if let Some(ref secret) = resolved {
            tracing::debug!(provider = %backend, source = %secret.source, "API key resolved");
        }

        let mut provider_config = ProviderConfig::new(resolved.and_then(|s| ApiKey::new(s.value)))
            .with_timeout(settings.timeout());
        if let Some(ref endpoint) = settings.endpoint {
            provider_config = provider_config.with_endpoint(endpoint.clone());
        }

        let client = TavilyClient::new(provider_config)?;
        Ok(lookout_agent::default_registry(Arc::new(client)))
    }
}
