//! Search request and result types.
//!
//! - [`SearchRequest`]: immutable parameters for one search call
//! - [`SearchResults`]: the canonical payload returned to the UI and the agent
//! - [`SearchResultImage`]: a bare or annotated image reference

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Minimum query length accepted by the provider.
pub const MIN_QUERY_CHARS: usize = 5;

/// Floor applied to the requested result count.
pub const MIN_RESULTS: u32 = 5;

/// Result count used when the caller does not ask for one.
pub const DEFAULT_MAX_RESULTS: u32 = 10;

// ─────────────────────────────────────────────────────────────────────────────
// Search Depth
// ─────────────────────────────────────────────────────────────────────────────

/// How thoroughly the provider should search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchDepth {
    /// Fast, shallow search.
    #[default]
    Basic,
    /// Slower search with deeper content extraction.
    Advanced,
}

impl SearchDepth {
    /// Wire name of this depth.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchDepth::Basic => "basic",
            SearchDepth::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SearchDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(SearchDepth::Basic),
            "advanced" => Ok(SearchDepth::Advanced),
            other => Err(format!(
                "unknown search depth '{}': expected 'basic' or 'advanced'",
                other
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Search Request
// ─────────────────────────────────────────────────────────────────────────────

/// Pad a query with trailing spaces up to the provider minimum.
///
/// The query is trimmed first; a trimmed query of at least
/// [`MIN_QUERY_CHARS`] characters is returned as-is.
pub fn effective_query(query: &str) -> String {
    let trimmed = query.trim();
    let len = trimmed.chars().count();
    if len >= MIN_QUERY_CHARS {
        return trimmed.to_string();
    }
    let mut padded = String::with_capacity(trimmed.len() + MIN_QUERY_CHARS - len);
    padded.push_str(trimmed);
    padded.extend(std::iter::repeat_n(' ', MIN_QUERY_CHARS - len));
    padded
}

/// Raise a requested result count to the provider floor.
pub fn effective_max_results(max_results: u32) -> u32 {
    max_results.max(MIN_RESULTS)
}

/// Parameters for a single search call.
///
/// Built once per tool invocation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    query: String,
    max_results: u32,
    search_depth: SearchDepth,
    include_domains: Vec<String>,
    exclude_domains: Vec<String>,
}

impl SearchRequest {
    /// Create a request with default depth, result count, and no domain filters.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: DEFAULT_MAX_RESULTS,
            search_depth: SearchDepth::default(),
            include_domains: Vec::new(),
            exclude_domains: Vec::new(),
        }
    }

    /// Set the requested result count.
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set the search depth.
    pub fn with_depth(mut self, depth: SearchDepth) -> Self {
        self.search_depth = depth;
        self
    }

    /// Restrict results to these domains.
    pub fn with_include_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_domains = dedup_domains(domains);
        self
    }

    /// Exclude results from these domains.
    pub fn with_exclude_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_domains = dedup_domains(domains);
        self
    }

    /// The query as supplied by the caller.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The query actually sent to the provider (trimmed, then padded).
    pub fn effective_query(&self) -> String {
        effective_query(&self.query)
    }

    /// The result count as supplied by the caller.
    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    /// The result count actually sent to the provider.
    pub fn effective_max_results(&self) -> u32 {
        effective_max_results(self.max_results)
    }

    /// The requested search depth.
    pub fn search_depth(&self) -> SearchDepth {
        self.search_depth
    }

    /// Domain allow-list.
    pub fn include_domains(&self) -> &[String] {
        &self.include_domains
    }

    /// Domain deny-list.
    pub fn exclude_domains(&self) -> &[String] {
        &self.exclude_domains
    }
}

fn dedup_domains<I, S>(domains: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for domain in domains {
        let domain = domain.into().trim().to_string();
        if !domain.is_empty() && !out.contains(&domain) {
            out.push(domain);
        }
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Search Results
// ─────────────────────────────────────────────────────────────────────────────

/// An image returned alongside search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchResultImage {
    /// Image with a provider-generated description.
    Annotated { url: String, description: String },
    /// Image URL only.
    Bare { url: String },
}

impl SearchResultImage {
    /// The image URL.
    pub fn url(&self) -> &str {
        match self {
            Self::Annotated { url, .. } | Self::Bare { url } => url,
        }
    }

    /// The description, for annotated images.
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Annotated { description, .. } => Some(description),
            Self::Bare { .. } => None,
        }
    }
}

/// Canonical search payload.
///
/// Produced on every call, including failed ones, so consumers never need to
/// handle a missing value. Provider fields without a dedicated slot are kept
/// in `extra` and serialized back at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// The query sent to the provider (possibly padded).
    pub query: String,
    /// Provider result records, passed through untouched.
    #[serde(default)]
    pub results: Vec<Value>,
    /// Normalized images.
    #[serde(default)]
    pub images: Vec<SearchResultImage>,
    /// Number of results reported by the provider.
    #[serde(default)]
    pub number_of_results: u64,
    /// Remaining provider fields (answer, response time, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchResults {
    /// Build an empty result set for the given query.
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            results: Vec::new(),
            images: Vec::new(),
            number_of_results: 0,
            extra: Map::new(),
        }
    }

    /// Whether the payload carries no results and no images.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.images.is_empty()
    }

    /// The provider's direct answer, if it returned one.
    pub fn answer(&self) -> Option<&str> {
        self.extra.get("answer").and_then(|v| v.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
