//! UI surface binding.
//!
//! A [`UiSurface`] is a live rendering target owned by the front-end. Tools
//! push a node that references a [`StreamableValue`] and may later retract it
//! by pushing `None`. Pushes never block.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::stream::StreamableValue;

/// A renderable node.
#[derive(Debug, Clone)]
pub enum UiNode {
    /// Search results section, filled in when `result` closes.
    SearchSection {
        /// Serialized search results, streamed.
        result: StreamableValue,
        /// Domain allow-list of the originating request, for display.
        include_domains: Vec<String>,
    },
}

impl UiNode {
    /// Create a search section node.
    pub fn search_section(result: StreamableValue, include_domains: Vec<String>) -> Self {
        Self::SearchSection {
            result,
            include_domains,
        }
    }

    /// The streamed value this node renders.
    pub fn value(&self) -> &StreamableValue {
        match self {
            Self::SearchSection { result, .. } => result,
        }
    }
}

/// A live, append-only rendering target.
pub trait UiSurface: Send + Sync {
    /// Replace the rendered node. `None` retracts it.
    fn update(&self, node: Option<UiNode>);
}

/// Shared handle to a surface.
pub type SharedSurface = Arc<dyn UiSurface>;

/// Surface that discards every push.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl UiSurface for NullSurface {
    fn update(&self, _node: Option<UiNode>) {}
}

/// Surface that records every push, for assertions.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pushes: Mutex<Vec<Option<UiNode>>>,
}

impl RecordingSurface {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All pushes in order.
    pub fn pushes(&self) -> Vec<Option<UiNode>> {
        self.pushes.lock().clone()
    }

    /// Number of pushes received.
    pub fn len(&self) -> usize {
        self.pushes.lock().len()
    }

    /// Whether nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.pushes.lock().is_empty()
    }

    /// The most recent push. `None` if nothing was pushed.
    pub fn last(&self) -> Option<Option<UiNode>> {
        self.pushes.lock().last().cloned()
    }

    /// Whether the latest push retracted the node.
    pub fn is_retracted(&self) -> bool {
        matches!(self.last(), Some(None))
    }
}

impl UiSurface for RecordingSurface {
    fn update(&self, node: Option<UiNode>) {
        self.pushes.lock().push(node);
    }
}
