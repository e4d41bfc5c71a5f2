//! Web search provider client for Lookout.
//!
//! This crate owns everything that touches the search backend: request
//! shaping, the outbound HTTP call, and normalization of the provider's
//! response into a canonical [`SearchResults`] payload.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    search()     ┌──────────────┐   POST /search   ┌─────────┐
//! │SearchRequest │ ──────────────▶ │SearchProvider│ ───────────────▶ │ Tavily  │
//! └──────────────┘                 │(TavilyClient)│ ◀─────────────── │         │
//!                                  └──────────────┘    JSON body     └─────────┘
//!                                         │
//!                                         ▼ normalize_images()
//!                                  ┌──────────────┐
//!                                  │SearchResults │
//!                                  └──────────────┘
//! ```
//!
//! # Core Components
//!
//! - [`SearchProvider`]: backend abstraction
//! - [`TavilyClient`]: the Tavily implementation
//! - [`SearchRequest`] / [`SearchResults`]: request and payload types
//! - [`sanitize_url`] / [`normalize_images`]: image post-processing

pub mod error;
pub mod normalize;
pub mod provider;
pub mod tavily;
pub mod types;

pub use error::{Result, SearchError};
pub use normalize::{is_url_whitespace, normalize_images, sanitize_url};
pub use provider::{ApiKey, SearchProvider, SharedProvider};
pub use tavily::{ProviderConfig, TavilyClient};
pub use types::{
    DEFAULT_MAX_RESULTS, MIN_QUERY_CHARS, MIN_RESULTS, SearchDepth, SearchRequest,
    SearchResultImage, SearchResults, effective_max_results, effective_query,
};
