//! Tavily search client.
//!
//! Tavily requires queries of at least five characters and returns poor
//! results below five hits, so both are raised before the request is sent.
//! Images are always requested with descriptions.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::error::{Result, SearchError};
use crate::normalize::normalize_images;
use crate::provider::{ApiKey, SearchProvider};
use crate::types::{SearchDepth, SearchRequest, SearchResults};

/// Provider name.
pub const PROVIDER_NAME: &str = "tavily";

/// Environment variable conventionally holding the Tavily key.
pub const API_KEY_ENV: &str = "TAVILY_API_KEY";

/// Default Tavily search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.tavily.com/search";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Image descriptions are always requested and expected.
const INCLUDE_IMAGE_DESCRIPTIONS: bool = true;

/// Connection settings for a provider, injected at construction.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider credential. A missing key is reported on first use.
    pub api_key: Option<ApiKey>,
    /// Search endpoint URL.
    pub endpoint: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ProviderConfig {
    /// Create a config with the given key and default endpoint/timeout.
    pub fn new(api_key: Option<ApiKey>) -> Self {
        Self {
            api_key,
            ..Default::default()
        }
    }

    /// Override the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Outbound request body.
#[derive(Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
    search_depth: SearchDepth,
    include_images: bool,
    include_image_descriptions: bool,
    include_answers: bool,
    include_domains: &'a [String],
    exclude_domains: &'a [String],
}

// Keep the key out of logs.
impl std::fmt::Debug for TavilyRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilyRequest")
            .field("api_key", &"[REDACTED]")
            .field("query", &self.query)
            .field("max_results", &self.max_results)
            .field("search_depth", &self.search_depth)
            .field("include_domains", &self.include_domains)
            .field("exclude_domains", &self.exclude_domains)
            .finish()
    }
}

/// Tavily search client.
#[derive(Debug, Clone)]
pub struct TavilyClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl TavilyClient {
    /// Create a client from explicit configuration.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("lookout/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SearchError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// The configured endpoint.
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn api_key(&self) -> Result<&ApiKey> {
        self.config
            .api_key
            .as_ref()
            .ok_or(SearchError::MissingApiKey {
                provider: PROVIDER_NAME,
                env_var: API_KEY_ENV,
            })
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn ensure_configured(&self) -> Result<()> {
        self.api_key().map(|_| ())
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResults> {
        let api_key = self.api_key()?;
        let query = request.effective_query();

        let body = TavilyRequest {
            api_key: api_key.expose(),
            query: &query,
            max_results: request.effective_max_results(),
            search_depth: request.search_depth(),
            include_images: true,
            include_image_descriptions: INCLUDE_IMAGE_DESCRIPTIONS,
            include_answers: true,
            include_domains: request.include_domains(),
            exclude_domains: request.exclude_domains(),
        };
        tracing::debug!(request = ?body, endpoint = %self.config.endpoint, "Sending search request");

        let response = self
            .http
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    format!("request timed out after {:?}", self.config.timeout)
                } else {
                    e.to_string()
                };
                tracing::warn!(provider = PROVIDER_NAME, error = %reason, "Search request failed");
                SearchError::provider(PROVIDER_NAME, e.status().map(|s| s.as_u16()), reason)
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                provider = PROVIDER_NAME,
                status = status.as_u16(),
                "Search provider returned an error status"
            );
            return Err(SearchError::provider(
                PROVIDER_NAME,
                Some(status.as_u16()),
                status.canonical_reason().unwrap_or("Unknown Status"),
            ));
        }

        let data: Map<String, Value> = response.json().await.map_err(|e| {
            tracing::warn!(provider = PROVIDER_NAME, error = %e, "Unreadable search response body");
            SearchError::provider(
                PROVIDER_NAME,
                Some(status.as_u16()),
                format!("invalid response body: {}", e),
            )
        })?;

        Ok(into_results(data, query))
    }
}

/// Shape a decoded response body into [`SearchResults`].
///
/// `images` is normalized; every other field is carried through.
fn into_results(mut data: Map<String, Value>, effective_query: String) -> SearchResults {
    let raw_images = match data.remove("images") {
        Some(Value::Array(images)) => images,
        _ => Vec::new(),
    };
    let raw_count = raw_images.len();
    let images = normalize_images(raw_images, INCLUDE_IMAGE_DESCRIPTIONS);
    if images.len() < raw_count {
        tracing::debug!(
            dropped = raw_count - images.len(),
            kept = images.len(),
            "Dropped malformed image records"
        );
    }

    let results = match data.remove("results") {
        Some(Value::Array(results)) => results,
        _ => Vec::new(),
    };
    let query = match data.remove("query") {
        Some(Value::String(query)) => query,
        _ => effective_query,
    };
    let number_of_results = data
        .remove("number_of_results")
        .and_then(|v| v.as_u64())
        .unwrap_or(results.len() as u64);

    SearchResults {
        query,
        results,
        images,
        number_of_results,
        extra: data,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SearchResultImage;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_into_results_normalizes_images_and_keeps_rest() {
        let data = body(json!({
            "query": "cat  ",
            "answer": "Cats are mammals.",
            "results": [{"title": "Cat", "url": "https://en.wikipedia.org/wiki/Cat"}],
            "images": [
                {"url": "http://a.com/x y.png", "description": "a cat"},
                {"url": "http://b.com/z.png", "description": ""}
            ],
            "response_time": 0.8
        }));

        let results = into_results(data, "cat  ".to_string());
        assert_eq!(results.query, "cat  ");
        assert_eq!(results.results.len(), 1);
        assert_eq!(results.number_of_results, 1);
        assert_eq!(
            results.images,
            vec![SearchResultImage::Annotated {
                url: "http://a.com/x%20y.png".to_string(),
                description: "a cat".to_string(),
            }]
        );
        assert_eq!(results.answer(), Some("Cats are mammals."));
        assert_eq!(results.extra["response_time"], json!(0.8));
        assert!(!results.extra.contains_key("images"));
    }

    #[test]
    fn test_into_results_fills_missing_fields() {
        let results = into_results(body(json!({})), "hello".to_string());
        assert_eq!(results.query, "hello");
        assert!(results.results.is_empty());
        assert!(results.images.is_empty());
        assert_eq!(results.number_of_results, 0);
    }

    #[test]
    fn test_into_results_prefers_provider_count() {
        let data = body(json!({"results": [], "number_of_results": 42}));
        assert_eq!(into_results(data, "hello".to_string()).number_of_results, 42);
    }

    #[test]
    fn test_request_debug_redacts_key() {
        let domains = vec!["docs.rs".to_string()];
        let req = TavilyRequest {
            api_key: "tvly-secret",
            query: "rust async",
            max_results: 5,
            search_depth: SearchDepth::Basic,
            include_images: true,
            include_image_descriptions: true,
            include_answers: true,
            include_domains: &domains,
            exclude_domains: &[],
        };
        let debug = format!("{:?}", req);
        assert!(!debug.contains("tvly-secret"));
        assert!(debug.contains("rust async"));
    }

    #[test]
    fn test_request_wire_shape() {
        let req = TavilyRequest {
            api_key: "k",
            query: "cat  ",
            max_results: 5,
            search_depth: SearchDepth::Advanced,
            include_images: true,
            include_image_descriptions: true,
            include_answers: true,
            include_domains: &[],
            exclude_domains: &[],
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "api_key": "k",
                "query": "cat  ",
                "max_results": 5,
                "search_depth": "advanced",
                "include_images": true,
                "include_image_descriptions": true,
                "include_answers": true,
                "include_domains": [],
                "exclude_domains": []
            })
        );
    }

    #[test]
    fn test_missing_key_fails_configuration_check() {
        let client = TavilyClient::new(ProviderConfig::default()).unwrap();
        let err = client.ensure_configured().unwrap_err();
        assert!(err.is_configuration());
    }
}
