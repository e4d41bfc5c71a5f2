//! HTTP-level tests for the Tavily client against a mock server.

use std::time::Duration;

use lookout_search::{
    ApiKey, ProviderConfig, SearchDepth, SearchProvider, SearchRequest, SearchResultImage,
    TavilyClient,
};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> TavilyClient {
    let config = ProviderConfig::new(ApiKey::new("tvly-test"))
        .with_endpoint(format!("{}/search", server.uri()));
    TavilyClient::new(config).unwrap()
}

async fn sent_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    serde_json::from_slice(&requests[0].body).unwrap()
}

#[tokio::test]
async fn test_short_query_and_small_count_are_raised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({"query": "cat  ", "max_results": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "cat  ",
            "results": [{"title": "Cat", "url": "https://en.wikipedia.org/wiki/Cat"}],
            "images": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = SearchRequest::new("cat").with_max_results(3);
    let results = client_for(&server).search(&request).await.unwrap();

    assert_eq!(results.query, "cat  ");
    assert_eq!(results.results.len(), 1);
    assert_eq!(results.number_of_results, 1);
}

#[tokio::test]
async fn test_request_body_carries_all_flags() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let request = SearchRequest::new("rust async runtime")
        .with_max_results(12)
        .with_depth(SearchDepth::Advanced)
        .with_include_domains(["docs.rs"]);
    client_for(&server).search(&request).await.unwrap();

    let body = sent_body(&server).await;
    assert_eq!(body["api_key"], "tvly-test");
    assert_eq!(body["query"], "rust async runtime");
    assert_eq!(body["max_results"], 12);
    assert_eq!(body["search_depth"], "advanced");
    assert_eq!(body["include_images"], true);
    assert_eq!(body["include_image_descriptions"], true);
    assert_eq!(body["include_answers"], true);
    assert_eq!(body["include_domains"], json!(["docs.rs"]));
    assert_eq!(body["exclude_domains"], json!([]));
}

#[tokio::test]
async fn test_images_are_sanitized_and_filtered() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "kittens",
            "results": [],
            "images": [
                {"url": "http://a.com/x y.png", "description": "a cat"},
                {"url": "http://b.com/z.png", "description": ""}
            ],
            "answer": "Kittens are young cats."
        })))
        .mount(&server)
        .await;

    let results = client_for(&server)
        .search(&SearchRequest::new("kittens"))
        .await
        .unwrap();

    assert_eq!(
        results.images,
        vec![SearchResultImage::Annotated {
            url: "http://a.com/x%20y.png".to_string(),
            description: "a cat".to_string(),
        }]
    );
    assert_eq!(results.answer(), Some("Kittens are young cats."));
}

#[tokio::test]
async fn test_server_error_maps_to_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .search(&SearchRequest::new("anything at all"))
        .await
        .unwrap_err();

    assert!(!err.is_configuration());
    assert_eq!(err.status(), Some(500));
    assert!(err.is_server_error());
    assert!(err.to_string().contains("500 Internal Server Error"));
}

#[tokio::test]
async fn test_unreadable_body_is_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .search(&SearchRequest::new("anything at all"))
        .await
        .unwrap_err();

    assert!(!err.is_configuration());
    assert_eq!(err.status(), Some(200));
}

#[tokio::test]
async fn test_timeout_is_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = ProviderConfig::new(ApiKey::new("tvly-test"))
        .with_endpoint(format!("{}/search", server.uri()))
        .with_timeout(Duration::from_millis(100));
    let client = TavilyClient::new(config).unwrap();

    let err = client
        .search(&SearchRequest::new("slow search"))
        .await
        .unwrap_err();
    assert!(!err.is_configuration());
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn test_missing_key_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(0)
        .mount(&server)
        .await;

    let config = ProviderConfig::new(None).with_endpoint(format!("{}/search", server.uri()));
    let client = TavilyClient::new(config).unwrap();

    let err = client
        .search(&SearchRequest::new("anything"))
        .await
        .unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("TAVILY_API_KEY"));
    assert!(server.received_requests().await.unwrap().is_empty());
}
