//! Agent-side tooling for Lookout.
//!
//! This crate provides the tool framework the orchestrator dispatches
//! through, and the streaming search tool that feeds live results to a UI.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  ToolRegistry                                               │
//! │  - Lookup by name, definitions for function calling        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ execute(params, ctx)
//!                              ▼
//!                       ┌────────────┐   search()   ┌──────────────┐
//!                       │ SearchTool │ ───────────▶ │SearchProvider│
//!                       └────────────┘              └──────────────┘
//!                              │ push / retract
//!                              ▼
//!                       ┌────────────┐   reads   ┌───────────────┐
//!                       │ UiSurface  │ ────────▶ │StreamableValue│
//!                       └────────────┘           └───────────────┘
//! ```
//!
//! # Core Components
//!
//! - [`Tool`] / [`ToolRegistry`]: tool trait and dispatch
//! - [`SearchTool`]: streaming search executor
//! - [`streamable_value`]: close-once value channel
//! - [`UiSurface`]: rendering target contract

pub mod error;
pub mod stream;
pub mod tool;
pub mod tools;
pub mod types;
pub mod ui;

pub use error::{AgentError, Result};
pub use types::{ToolCallId, ToolCallPhase};

// Tool framework
pub use tool::{
    ParamExt, ParamResult, ParameterValidationError, Tool, ToolContext, ToolDefinition,
    ToolRegistry, ToolResult,
};

// Streaming and UI
pub use stream::{StreamValue, StreamWriter, StreamableValue, streamable_value};
pub use ui::{NullSurface, RecordingSurface, SharedSurface, UiNode, UiSurface};

// Built-in tools
pub use tools::{SEARCH_TOOL_NAME, SearchOutcome, SearchParams, SearchTool, default_registry};
