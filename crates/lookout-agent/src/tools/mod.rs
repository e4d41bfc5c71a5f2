//! Built-in tools.
//!
//! - Web search with live UI streaming

mod search;

pub use search::{
    SEARCH_TOOL_NAME, SearchOutcome, SearchParams, SearchTool, failure_narrative,
};

use crate::tool::ToolRegistry;
use lookout_search::SharedProvider;

/// Build a registry holding the default tool set.
pub fn default_registry(provider: SharedProvider) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(SearchTool::from_shared(provider));
    registry
}
