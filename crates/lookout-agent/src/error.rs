//! Error types for the agent crate.

use lookout_search::SearchError;
use thiserror::Error;

use crate::tool::ParameterValidationError;

/// Result type alias using the agent error type.
pub type Result<T> = std::result::Result<T, AgentError>;

/// Error type for agent operations.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Search provider error that escaped the tool boundary.
    ///
    /// Only configuration problems reach callers this way; runtime provider
    /// failures are absorbed into a degraded result.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Tool execution error.
    #[error("Tool error: {0}")]
    Tool(String),

    /// Tool not found in registry.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Invalid tool parameters.
    #[error("Invalid tool parameters: {0}")]
    InvalidToolParams(#[from] ParameterValidationError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AgentError {
    /// Create a tool error.
    pub fn tool(msg: impl Into<String>) -> Self {
        Self::Tool(msg.into())
    }

    /// Whether this error is a configuration problem (e.g. missing credential).
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Search(e) if e.is_configuration())
    }
}
