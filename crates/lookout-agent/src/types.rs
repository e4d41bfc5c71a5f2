//! Core types for the agent crate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─────────────────────────────────────────────────────────────────────────────
// ID Types
// ─────────────────────────────────────────────────────────────────────────────

/// Unique identifier for a single tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolCallId(Uuid);

impl ToolCallId {
    /// Create a new random tool call ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ToolCallId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ToolCallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool Call Phase
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle of one streaming tool call.
///
/// ```text
/// Pending ──▶ Streaming ──┬──▶ Succeeded
///                         └──▶ Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCallPhase {
    /// Invoked, nothing pushed yet.
    Pending,
    /// Placeholder pushed, provider call in flight.
    Streaming,
    /// Channel closed with the result payload.
    Succeeded,
    /// Channel closed with the done sentinel; a degraded result was produced.
    Failed,
}

impl ToolCallPhase {
    /// Whether the call has finished and its channel is closed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Whether `next` is a legal successor of this phase.
    pub fn can_transition_to(&self, next: ToolCallPhase) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Streaming)
                | (Self::Streaming, Self::Succeeded)
                | (Self::Streaming, Self::Failed)
        )
    }
}

impl std::fmt::Display for ToolCallPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Streaming => "streaming",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_call_id_unique() {
        assert_ne!(ToolCallId::new(), ToolCallId::new());
    }

    #[test]
    fn test_phase_transitions() {
        use ToolCallPhase::*;
        assert!(Pending.can_transition_to(Streaming));
        assert!(Streaming.can_transition_to(Succeeded));
        assert!(Streaming.can_transition_to(Failed));
        assert!(!Pending.can_transition_to(Succeeded));
        assert!(!Succeeded.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Streaming));
    }

    #[test]
    fn test_phase_terminal() {
        assert!(!ToolCallPhase::Pending.is_terminal());
        assert!(!ToolCallPhase::Streaming.is_terminal());
        assert!(ToolCallPhase::Succeeded.is_terminal());
        assert!(ToolCallPhase::Failed.is_terminal());
    }

    #[test]
    fn test_phase_serialization() {
        assert_eq!(
            serde_json::to_string(&ToolCallPhase::Succeeded).unwrap(),
            "\"succeeded\""
        );
    }
}
