//! Tool framework for agent capabilities.
//!
//! This module defines the [`Tool`] trait that agent tools implement, and the
//! [`ToolRegistry`] the orchestrator dispatches through.
//!
//! # Example
//!
//! ```rust,ignore
//! use lookout_agent::{Tool, ToolContext, ToolResult, ToolRegistry};
//!
//! struct EchoTool;
//!
//! #[async_trait]
//! impl Tool for EchoTool {
//!     fn name(&self) -> &str { "echo" }
//!     fn description(&self) -> &str { "Echo the input" }
//!     fn parameters(&self) -> Value { json!({"type": "object"}) }
//!
//!     async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<ToolResult> {
//!         Ok(ToolResult::json(params))
//!     }
//! }
//!
//! let mut registry = ToolRegistry::new();
//! registry.register(EchoTool);
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::error::{AgentError, Result};
use crate::types::ToolCallId;
use crate::ui::SharedSurface;

// ─────────────────────────────────────────────────────────────────────────────
// Parameter Validation
// ─────────────────────────────────────────────────────────────────────────────

/// Error type for tool parameter validation failures.
///
/// Messages are written for the model: they say what was wrong and how to
/// fix it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParameterValidationError {
    /// A required parameter is missing.
    #[error("missing required parameter '{name}': {hint}")]
    MissingRequired {
        /// The parameter name.
        name: &'static str,
        /// Hint for the model on how to fix.
        hint: &'static str,
    },

    /// A parameter has an invalid type.
    #[error("invalid type for '{name}': expected {expected}, got {actual}")]
    InvalidType {
        /// The parameter name.
        name: &'static str,
        /// The expected type.
        expected: &'static str,
        /// The actual type found.
        actual: String,
    },

    /// A parameter value is out of range.
    #[error("'{name}' value {value} is out of range: {constraint}")]
    OutOfRange {
        /// The parameter name.
        name: &'static str,
        /// The actual value as string.
        value: String,
        /// Description of the valid range.
        constraint: String,
    },

    /// A parameter value doesn't match the expected set.
    #[error("'{name}' has invalid value '{value}': {message}")]
    InvalidValue {
        /// The parameter name.
        name: &'static str,
        /// The invalid value.
        value: String,
        /// Why it's invalid.
        message: String,
    },

    /// Multiple validation errors.
    #[error("parameter validation failed: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ParameterValidationError>),
}

impl ParameterValidationError {
    /// Create a missing required parameter error.
    pub fn missing(name: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { name, hint }
    }

    /// Create an invalid type error.
    pub fn invalid_type(
        name: &'static str,
        expected: &'static str,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidType {
            name,
            expected,
            actual: actual.into(),
        }
    }

    /// Create an out of range error.
    pub fn out_of_range(
        name: &'static str,
        value: impl ToString,
        constraint: impl Into<String>,
    ) -> Self {
        Self::OutOfRange {
            name,
            value: value.to_string(),
            constraint: constraint.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(
        name: &'static str,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            name,
            value: value.into(),
            message: message.into(),
        }
    }

    /// Collapse a list of errors: one error stays as is, several become
    /// [`Multiple`](Self::Multiple). Returns `None` for an empty list.
    pub fn collect(mut errors: Vec<ParameterValidationError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Multiple(errors)),
        }
    }

    /// Get the parameter name associated with this error (if single error).
    pub fn parameter_name(&self) -> Option<&str> {
        match self {
            Self::MissingRequired { name, .. } => Some(name),
            Self::InvalidType { name, .. } => Some(name),
            Self::OutOfRange { name, .. } => Some(name),
            Self::InvalidValue { name, .. } => Some(name),
            Self::Multiple(_) => None,
        }
    }
}

/// Result type for parameter validation.
pub type ParamResult<T> = std::result::Result<T, ParameterValidationError>;

/// JSON type name of a value, for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Helper trait for extracting and validating parameters from JSON.
///
/// Absent and `null` fields are treated the same.
pub trait ParamExt {
    /// Get a required string parameter.
    fn required_str(&self, name: &'static str, hint: &'static str) -> ParamResult<&str>;

    /// Get an optional string parameter. Present but non-string is an error.
    fn optional_str(&self, name: &'static str) -> ParamResult<Option<&str>>;

    /// Get an optional integer parameter. Present but non-integer is an error.
    fn optional_i64(&self, name: &'static str) -> ParamResult<Option<i64>>;

    /// Get an optional list of strings. Absent yields an empty list.
    fn optional_str_list(&self, name: &'static str) -> ParamResult<Vec<String>>;
}

fn present<'a>(params: &'a Value, name: &str) -> Option<&'a Value> {
    params.get(name).filter(|v| !v.is_null())
}

impl ParamExt for Value {
    fn required_str(&self, name: &'static str, hint: &'static str) -> ParamResult<&str> {
        match present(self, name) {
            None => Err(ParameterValidationError::missing(name, hint)),
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(ParameterValidationError::invalid_type(
                name,
                "string",
                json_type_name(other),
            )),
        }
    }

    fn optional_str(&self, name: &'static str) -> ParamResult<Option<&str>> {
        match present(self, name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(ParameterValidationError::invalid_type(
                name,
                "string",
                json_type_name(other),
            )),
        }
    }

    fn optional_i64(&self, name: &'static str) -> ParamResult<Option<i64>> {
        match present(self, name) {
            None => Ok(None),
            Some(value) => value.as_i64().map(Some).ok_or_else(|| {
                let actual = match value {
                    Value::Number(n) => format!("non-integer number {}", n),
                    other => json_type_name(other).to_string(),
                };
                ParameterValidationError::invalid_type(name, "integer", actual)
            }),
        }
    }

    fn optional_str_list(&self, name: &'static str) -> ParamResult<Vec<String>> {
        let items = match present(self, name) {
            None => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(ParameterValidationError::invalid_type(
                    name,
                    "array of strings",
                    json_type_name(other),
                ));
            }
        };

        items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(ParameterValidationError::invalid_type(
                    name,
                    "array of strings",
                    format!("array containing {}", json_type_name(other)),
                )),
            })
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for agent tools.
///
/// Each tool describes its parameters as a JSON Schema and implements async
/// execution.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the unique name of this tool.
    fn name(&self) -> &str;

    /// Get a human-readable description of what this tool does.
    fn description(&self) -> &str;

    /// Get the JSON Schema for this tool's parameters.
    fn parameters(&self) -> Value;

    /// Execute the tool with the given parameters.
    ///
    /// # Arguments
    /// * `params` - The parameters as a JSON value matching the schema
    /// * `ctx` - Execution context with cancellation and UI surface
    ///
    /// # Returns
    /// A `ToolResult`. `Err` is reserved for failures the caller must handle
    /// (invalid parameters, missing configuration).
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<ToolResult>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool Context
// ─────────────────────────────────────────────────────────────────────────────

/// Context provided to tools during execution.
#[derive(Clone, Default)]
pub struct ToolContext {
    /// ID of this tool call.
    pub tool_call_id: ToolCallId,
    /// Token to check for cancellation.
    pub cancellation: CancellationToken,
    /// Live UI surface, if the caller is rendering.
    pub ui: Option<SharedSurface>,
}

impl ToolContext {
    /// Create a new tool context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given cancellation token.
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Attach a UI surface.
    pub fn with_ui(mut self, ui: SharedSurface) -> Self {
        self.ui = Some(ui);
        self
    }

    /// Check if execution has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("tool_call_id", &self.tool_call_id)
            .field("cancelled", &self.is_cancelled())
            .field("ui", &self.ui.is_some())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool Result
// ─────────────────────────────────────────────────────────────────────────────

/// Result of a tool execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolResult {
    /// Successful text output.
    Text {
        /// The text content.
        content: String,
    },
    /// Successful JSON output.
    Json {
        /// The JSON content.
        content: Value,
        /// Text for the surrounding conversation, e.g. an apology when the
        /// content is a degraded fallback.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        narrative: Option<String>,
    },
    /// Tool execution failed.
    Error {
        /// Error message.
        message: String,
        /// Whether the error is recoverable (agent can try again).
        recoverable: bool,
    },
}

impl ToolResult {
    /// Create a text result.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Create a JSON result.
    pub fn json(content: Value) -> Self {
        Self::Json {
            content,
            narrative: None,
        }
    }

    /// Create a recoverable error result.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            recoverable: true,
        }
    }

    /// Check if this result is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Check if this result is successful.
    pub fn is_success(&self) -> bool {
        !self.is_error()
    }

    /// The narrative, if any.
    pub fn narrative(&self) -> Option<&str> {
        match self {
            Self::Json { narrative, .. } => narrative.as_deref(),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool Definition
// ─────────────────────────────────────────────────────────────────────────────

/// Tool description handed to a model for function calling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name of the tool.
    pub name: String,
    /// Description of what the tool does.
    pub description: String,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Create a new tool definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Describe a tool.
    pub fn of(tool: &dyn Tool) -> Self {
        Self::new(tool.name(), tool.description(), tool.parameters())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Registry for managing available tools.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool.
    ///
    /// If a tool with the same name already exists, it will be replaced.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::new(tool));
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool exists.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get all tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Get the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions of all tools, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.names()
            .into_iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| ToolDefinition::of(tool.as_ref()))
            .collect()
    }

    /// Execute a tool by name.
    pub async fn execute(&self, name: &str, params: Value, ctx: &ToolContext) -> Result<ToolResult> {
        let tool = self
            .get(name)
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))?;

        tracing::debug!(tool = name, tool_call_id = %ctx.tool_call_id, "Executing tool");
        let result = tool.execute(params, ctx).await;
        match &result {
            Ok(r) => tracing::debug!(tool = name, success = r.is_success(), "Tool finished"),
            Err(e) => tracing::warn!(tool = name, error = %e, "Tool failed"),
        }
        result
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock Tool (for testing)
// ─────────────────────────────────────────────────────────────────────────────

/// A mock tool for testing.
///
/// Returns a configurable response and tracks calls for verification.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct MockTool {
    name: String,
    response: Arc<parking_lot::Mutex<Option<ToolResult>>>,
    calls: Arc<parking_lot::Mutex<Vec<Value>>>,
}

#[cfg(test)]
impl MockTool {
    /// Create a new mock tool.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            response: Arc::new(parking_lot::Mutex::new(None)),
            calls: Arc::new(parking_lot::Mutex::new(Vec::new())),
        }
    }

    /// Set the response to return.
    pub fn with_response(self, response: ToolResult) -> Self {
        *self.response.lock() = Some(response);
        self
    }

    /// Get the number of calls made, across clones.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[cfg(test)]
#[async_trait]
impl Tool for MockTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "A mock tool for testing"
    }

    fn parameters(&self) -> Value {
        serde_json::json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, params: Value, _ctx: &ToolContext) -> Result<ToolResult> {
        self.calls.lock().push(params);
        Ok(self
            .response
            .lock()
            .clone()
            .unwrap_or_else(|| ToolResult::text("mock response")))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_result_text() {
        let result = ToolResult::text("hello");
        assert!(result.is_success());
        assert!(result.narrative().is_none());
    }

    #[test]
    fn test_tool_result_narrative_round_trips() {
        let result = ToolResult::Json {
            content: json!({"k": "v"}),
            narrative: Some("Something went wrong.".to_string()),
        };
        assert!(result.is_success());
        assert_eq!(result.narrative(), Some("Something went wrong."));
        let restored: ToolResult =
            serde_json::from_value(serde_json::to_value(&result).unwrap()).unwrap();
        assert_eq!(restored, result);
    }

    #[test]
    fn test_tool_result_error() {
        let result = ToolResult::error("something failed");
        assert!(result.is_error());
        assert!(!result.is_success());
    }

    #[test]
    fn test_tool_result_serialization() {
        let result = ToolResult::json(json!([1, 2]));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({"type": "json", "content": [1, 2]}));
        let restored: ToolResult = serde_json::from_value(value).unwrap();
        assert_eq!(restored, result);
    }

    #[test]
    fn test_tool_context() {
        let token = CancellationToken::new();
        let ctx = ToolContext::new().with_cancellation(token.clone());
        assert!(!ctx.is_cancelled());
        assert!(ctx.ui.is_none());
        token.cancel();
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn test_registry_basics() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(MockTool::new("zeta"));
        registry.register(MockTool::new("alpha"));
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("alpha"));
        assert_eq!(registry.names(), vec!["alpha", "zeta"]);

        let defs = registry.definitions();
        assert_eq!(defs[0].name, "alpha");
        assert_eq!(defs[0].description, "A mock tool for testing");
    }

    #[test]
    fn test_registry_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool::new("dup"));
        registry.register(MockTool::new("dup"));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_registry_execute() {
        let tool = MockTool::new("echo").with_response(ToolResult::text("pong"));
        let mut registry = ToolRegistry::new();
        registry.register(tool.clone());

        let result = registry
            .execute("echo", json!({"x": 1}), &ToolContext::new())
            .await
            .unwrap();
        assert_eq!(result, ToolResult::text("pong"));
        assert_eq!(tool.call_count(), 1);
    }

    #[tokio::test]
    async fn test_registry_execute_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry
            .execute("missing", json!({}), &ToolContext::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::ToolNotFound(name) if name == "missing"));
    }

    #[test]
    fn test_param_required_str() {
        let params = json!({"query": "rust", "n": 3});
        assert_eq!(params.required_str("query", "hint").unwrap(), "rust");

        let err = params.required_str("missing", "provide it").unwrap_err();
        assert!(matches!(err, ParameterValidationError::MissingRequired { .. }));

        let err = params.required_str("n", "hint").unwrap_err();
        assert!(matches!(err, ParameterValidationError::InvalidType { .. }));
    }

    #[test]
    fn test_param_optional_i64() {
        let params = json!({"a": 5, "b": 2.5, "c": "7", "d": null});
        assert_eq!(params.optional_i64("a").unwrap(), Some(5));
        assert!(params.optional_i64("b").is_err());
        assert!(params.optional_i64("c").is_err());
        assert_eq!(params.optional_i64("d").unwrap(), None);
        assert_eq!(params.optional_i64("e").unwrap(), None);
    }

    #[test]
    fn test_param_optional_str_list() {
        let params = json!({"ok": ["a", "b"], "bad": ["a", 1], "notlist": "a"});
        assert_eq!(params.optional_str_list("ok").unwrap(), vec!["a", "b"]);
        assert!(params.optional_str_list("bad").is_err());
        assert!(params.optional_str_list("notlist").is_err());
        assert!(params.optional_str_list("absent").unwrap().is_empty());
    }

    #[test]
    fn test_validation_error_collect() {
        assert!(ParameterValidationError::collect(Vec::new()).is_none());

        let single =
            ParameterValidationError::collect(vec![ParameterValidationError::missing("q", "h")])
                .unwrap();
        assert_eq!(single.parameter_name(), Some("q"));

        let many = ParameterValidationError::collect(vec![
            ParameterValidationError::missing("q", "h"),
            ParameterValidationError::out_of_range("n", 0, "must be at least 1"),
        ])
        .unwrap();
        assert!(many.parameter_name().is_none());
        assert!(many.to_string().contains("; "));
    }
}
