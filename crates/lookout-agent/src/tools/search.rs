//! Streaming web search tool.
//!
//! One invocation walks `Pending → Streaming → Succeeded | Failed`:
//!
//! 1. A search section referencing an open streamable value is pushed to the
//!    UI before any network I/O.
//! 2. The provider is awaited.
//! 3. On success the serialized results close the stream and are returned.
//! 4. On any provider failure (or cancellation) the section is retracted, the
//!    stream is closed with `Done`, and an empty result for the effective query
//!    is returned together with an apology narrative.
//!
//! Only configuration errors escape as `Err`, and they are raised before the
//! UI is touched.

use async_trait::async_trait;
use lookout_search::{
    DEFAULT_MAX_RESULTS, SearchDepth, SearchError, SearchProvider, SearchRequest, SearchResults,
    SharedProvider,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::stream::streamable_value;
use crate::tool::{ParamExt, ParameterValidationError, Tool, ToolContext, ToolResult};
use crate::types::ToolCallPhase;
use crate::ui::{UiNode, UiSurface};

/// Registered name of the search tool.
pub const SEARCH_TOOL_NAME: &str = "search";

// ─────────────────────────────────────────────────────────────────────────────
// Parameters
// ─────────────────────────────────────────────────────────────────────────────

/// Validated parameters for the search tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// The search query, non-empty after trimming.
    pub query: String,
    /// Requested result count, at least 1.
    pub max_results: u32,
    /// Search depth.
    pub search_depth: SearchDepth,
    /// Domain allow-list.
    pub include_domains: Vec<String>,
    /// Domain deny-list.
    pub exclude_domains: Vec<String>,
}

impl SearchParams {
    /// Build the provider request.
    pub fn into_request(self) -> SearchRequest {
        SearchRequest::new(self.query)
            .with_max_results(self.max_results)
            .with_depth(self.search_depth)
            .with_include_domains(self.include_domains)
            .with_exclude_domains(self.exclude_domains)
    }
}

impl TryFrom<Value> for SearchParams {
    type Error = ParameterValidationError;

    fn try_from(params: Value) -> std::result::Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let query = match params.required_str("query", "provide a search query") {
            Ok(q) if q.trim().is_empty() => {
                errors.push(ParameterValidationError::invalid_value(
                    "query",
                    q,
                    "query cannot be empty",
                ));
                None
            }
            Ok(q) => Some(q.to_string()),
            Err(e) => {
                errors.push(e);
                None
            }
        };

        let max_results = match params.optional_i64("max_results") {
            Ok(None) => Some(DEFAULT_MAX_RESULTS),
            Ok(Some(n)) if n < 1 => {
                errors.push(ParameterValidationError::out_of_range(
                    "max_results",
                    n,
                    "must be at least 1",
                ));
                None
            }
            Ok(Some(n)) => match u32::try_from(n) {
                Ok(n) => Some(n),
                Err(_) => {
                    errors.push(ParameterValidationError::out_of_range(
                        "max_results",
                        n,
                        format!("must be at most {}", u32::MAX),
                    ));
                    None
                }
            },
            Err(e) => {
                errors.push(e);
                None
            }
        };

        let search_depth = match params.optional_str("search_depth") {
            Ok(None) => Some(SearchDepth::default()),
            Ok(Some(raw)) => match raw.parse::<SearchDepth>() {
                Ok(depth) => Some(depth),
                Err(message) => {
                    errors.push(ParameterValidationError::invalid_value(
                        "search_depth",
                        raw,
                        message,
                    ));
                    None
                }
            },
            Err(e) => {
                errors.push(e);
                None
            }
        };

        let include_domains = params
            .optional_str_list("include_domains")
            .map_err(|e| errors.push(e))
            .ok();
        let exclude_domains = params
            .optional_str_list("exclude_domains")
            .map_err(|e| errors.push(e))
            .ok();

        if let Some(err) = ParameterValidationError::collect(errors) {
            return Err(err);
        }

        match (query, max_results, search_depth, include_domains, exclude_domains) {
            (
                Some(query),
                Some(max_results),
                Some(search_depth),
                Some(include_domains),
                Some(exclude_domains),
            ) => Ok(Self {
                query,
                max_results,
                search_depth,
                include_domains,
                exclude_domains,
            }),
            _ => Err(ParameterValidationError::missing(
                "query",
                "provide a search query",
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Outcome
// ─────────────────────────────────────────────────────────────────────────────

/// Result of one search tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Results, empty on failure.
    pub results: SearchResults,
    /// Terminal phase reached.
    pub phase: ToolCallPhase,
    /// Text for the surrounding conversation, set on failure.
    pub narrative: Option<String>,
}

impl SearchOutcome {
    /// Whether this is the degraded fallback.
    pub fn is_degraded(&self) -> bool {
        self.phase == ToolCallPhase::Failed
    }
}

/// Narrative attached to a degraded result.
pub fn failure_narrative(effective_query: &str) -> String {
    format!(
        "An error occurred while searching for \"{}\".",
        effective_query
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Search Tool
// ─────────────────────────────────────────────────────────────────────────────

/// Web search tool that streams its result into a UI surface.
#[derive(Clone)]
pub struct SearchTool {
    provider: SharedProvider,
}

impl SearchTool {
    /// Create a search tool over a provider.
    pub fn new(provider: impl SearchProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Create a search tool over a shared provider.
    pub fn from_shared(provider: SharedProvider) -> Self {
        Self { provider }
    }

    /// Run one search, pushing progress to `ui` when given.
    ///
    /// Never fails on provider errors: those produce a degraded outcome.
    pub async fn run(
        &self,
        request: &SearchRequest,
        ui: Option<&dyn UiSurface>,
    ) -> std::result::Result<SearchOutcome, SearchError> {
        self.run_with_cancellation(request, ui, &CancellationToken::new())
            .await
    }

    /// Like [`run`](Self::run), abandoning the provider call if `cancel` fires.
    pub async fn run_with_cancellation(
        &self,
        request: &SearchRequest,
        ui: Option<&dyn UiSurface>,
        cancel: &CancellationToken,
    ) -> std::result::Result<SearchOutcome, SearchError> {
        self.provider.ensure_configured()?;

        let mut phase = ToolCallPhase::Pending;
        let effective_query = request.effective_query();
        let (writer, value) = streamable_value();

        if let Some(ui) = ui {
            ui.update(Some(UiNode::search_section(
                value,
                request.include_domains().to_vec(),
            )));
        }
        advance(&mut phase, ToolCallPhase::Streaming);

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(CallFailure::Cancelled),
            result = self.provider.search(request) => result.map_err(CallFailure::Provider),
        };

        let failure = match response {
            Ok(results) => match serde_json::to_string(&results) {
                Ok(payload) => {
                    writer.done(Some(payload));
                    advance(&mut phase, ToolCallPhase::Succeeded);
                    tracing::debug!(
                        provider = self.provider.name(),
                        results = results.results.len(),
                        images = results.images.len(),
                        "Search completed"
                    );
                    return Ok(SearchOutcome {
                        results,
                        phase,
                        narrative: None,
                    });
                }
                Err(e) => CallFailure::Serialization(e),
            },
            Err(failure) => failure,
        };

        tracing::warn!(
            provider = self.provider.name(),
            query = %effective_query,
            error = %failure,
            "Search failed, returning empty results"
        );
        if let Some(ui) = ui {
            ui.update(None);
        }
        writer.done(None);
        advance(&mut phase, ToolCallPhase::Failed);

        Ok(SearchOutcome {
            narrative: Some(failure_narrative(&effective_query)),
            results: SearchResults::empty(effective_query),
            phase,
        })
    }
}

impl std::fmt::Debug for SearchTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchTool")
            .field("provider", &self.provider.name())
            .finish()
    }
}

/// Why a call took the failed path.
#[derive(Debug, thiserror::Error)]
enum CallFailure {
    #[error(transparent)]
    Provider(SearchError),
    #[error("search cancelled")]
    Cancelled,
    #[error("failed to serialize results: {0}")]
    Serialization(serde_json::Error),
}

fn advance(phase: &mut ToolCallPhase, next: ToolCallPhase) {
    debug_assert!(phase.can_transition_to(next), "{} -> {}", phase, next);
    tracing::debug!(from = %phase, to = %next, "Search tool phase");
    *phase = next;
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        SEARCH_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Search the web for information"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The query to search for"
                },
                "max_results": {
                    "type": "integer",
                    "minimum": 1,
                    "default": DEFAULT_MAX_RESULTS,
                    "description": "The maximum number of results to return"
                },
                "search_depth": {
                    "type": "string",
                    "enum": ["basic", "advanced"],
                    "default": "basic",
                    "description": "The depth of the search"
                },
                "include_domains": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Only return results from these domains"
                },
                "exclude_domains": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Never return results from these domains"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<ToolResult> {
        let request = SearchParams::try_from(params)?.into_request();
        tracing::debug!(
            tool_call_id = %ctx.tool_call_id,
            query = request.query(),
            max_results = request.max_results(),
            depth = %request.search_depth(),
            "Search tool invoked"
        );

        let outcome = self
            .run_with_cancellation(&request, ctx.ui.as_deref(), &ctx.cancellation)
            .await?;

        let content = serde_json::to_value(&outcome.results)?;
        Ok(ToolResult::Json {
            content,
            narrative: outcome.narrative,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
