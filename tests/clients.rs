use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use quotesphere_client::{
    ErrorKind, JokeApiClient, Query, QuotableClient, QuoteApiError, QuoteSource,
};

fn quotable(server: &MockServer) -> QuotableClient {
    QuotableClient::new(&server.uri(), None).unwrap()
}

fn jokes(server: &MockServer) -> JokeApiClient {
    JokeApiClient::new(&server.uri(), None).unwrap()
}

// ---------------------------------------------------------------------------
// Quote API
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_random_quote_with_category_tag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quotes/random"))
        .and(query_param("limit", "1"))
        .and(query_param("tags", "famous-quotes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "_id": "abc123",
            "content": "Stay hungry, stay foolish.",
            "author": "Steve Jobs",
            "tags": ["Famous Quotes", "Inspirational"]
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let quote = quotable(&server)
        .retrieve(&Query::new("Famous Quotes", ""))
        .await
        .unwrap();

    assert_eq!(quote.text, "Stay hungry, stay foolish.");
    assert_eq!(quote.author, "Steve Jobs");
    assert_eq!(quote.category(), Some("Famous Quotes"));
}

#[tokio::test]
async fn test_random_quote_empty_array_is_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quotes/random"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = quotable(&server)
        .retrieve(&Query::default())
        .await
        .unwrap_err();
    assert!(matches!(err, QuoteApiError::NoResults));
}

#[tokio::test]
async fn test_unknown_tag_404_is_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quotes/random"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"statusCode": 404, "statusMessage": "Could not find any matching quotes"})),
        )
        .mount(&server)
        .await;

    let client = quotable(&server);
    let query = Query::new("Nonexistent", "");

    let raw = client.random(&query).await.unwrap_err();
    assert!(matches!(raw, QuoteApiError::NotFound { .. }));

    let err = client.retrieve(&query).await.unwrap_err();
    assert!(err.is_no_results());
}

#[tokio::test]
async fn test_server_error_is_retryable_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quotes/random"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "Internal Server Error"})),
        )
        .mount(&server)
        .await;

    let err = quotable(&server)
        .retrieve(&Query::default())
        .await
        .unwrap_err();

    match &err {
        QuoteApiError::Api { status, message } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(!err.is_no_results());
    assert_eq!(err.kind(), ErrorKind::Http(500));
}

#[tokio::test]
async fn test_rate_limit_maps_to_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quotes/random"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = quotable(&server)
        .retrieve(&Query::default())
        .await
        .unwrap_err();
    assert!(matches!(err, QuoteApiError::RateLimited { .. }));
    assert_eq!(err.kind(), ErrorKind::Http(429));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quotes/random"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = quotable(&server)
        .retrieve(&Query::default())
        .await
        .unwrap_err();
    assert!(matches!(err, QuoteApiError::Decode(_)));
    assert!(err.is_no_results());
}

#[tokio::test]
async fn test_search_filters_results_by_category() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/quotes"))
        .and(query_param("query", "life"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "totalCount": 2,
            "results": [
                {
                    "content": "Life is what happens when you're busy making other plans.",
                    "author": "John Lennon",
                    "tags": ["Famous Quotes"]
                },
                {
                    "content": "The purpose of our lives is to be happy.",
                    "author": "Dalai Lama",
                    "tags": ["Wisdom", "Life"]
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let quote = quotable(&server)
        .retrieve(&Query::new("Wisdom", "life"))
        .await
        .unwrap();
    assert_eq!(quote.author, "Dalai Lama");
}

#[tokio::test]
async fn test_search_without_match_is_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/quotes"))
        .and(query_param("query", "zzznomatch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 0,
            "totalCount": 0,
            "results": []
        })))
        .mount(&server)
        .await;

    let err = quotable(&server)
        .retrieve(&Query::new("All", "zzznomatch"))
        .await
        .unwrap_err();
    assert!(matches!(err, QuoteApiError::NoResults));
}

// ---------------------------------------------------------------------------
// Joke API
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_single_joke() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/joke/Programming"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": false,
            "category": "Programming",
            "type": "single",
            "joke": "There are 10 kinds of people.",
            "id": 7
        })))
        .expect(1)
        .mount(&server)
        .await;

    let quote = jokes(&server)
        .retrieve(&Query::new("Programming", ""))
        .await
        .unwrap();
    assert_eq!(quote.text, "There are 10 kinds of people.");
    assert_eq!(quote.author, JokeApiClient::ATTRIBUTION);
    assert_eq!(quote.category(), Some("Programming"));
}

#[tokio::test]
async fn test_twopart_joke_with_search_term() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/joke/Any"))
        .and(query_param("contains", "debug"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": false,
            "category": "Programming",
            "type": "twopart",
            "setup": "Why do programmers prefer dark mode?",
            "delivery": "Because light attracts bugs."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let quote = jokes(&server)
        .retrieve(&Query::new("All", "debug"))
        .await
        .unwrap();
    assert_eq!(
        quote.text,
        "Why do programmers prefer dark mode?\nBecause light attracts bugs."
    );
}

#[tokio::test]
async fn test_joke_no_match_is_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/joke/Any"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": true,
            "internalError": false,
            "code": 106,
            "message": "No matching joke found"
        })))
        .mount(&server)
        .await;

    let err = jokes(&server)
        .retrieve(&Query::new("All", "zzznomatch"))
        .await
        .unwrap_err();
    assert!(matches!(err, QuoteApiError::NoResults));
}

#[tokio::test]
async fn test_joke_error_body_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/joke/Any"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": true,
            "internalError": true,
            "code": 100,
            "message": "Something went wrong"
        })))
        .mount(&server)
        .await;

    let err = jokes(&server)
        .retrieve(&Query::default())
        .await
        .unwrap_err();
    match err {
        QuoteApiError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Something went wrong");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Live APIs
// ---------------------------------------------------------------------------

/// Hits the real services. Run with `cargo test -- --ignored --nocapture`.
#[tokio::test]
#[ignore = "requires network access"]
async fn test_live_sources() {
    let quote = QuotableClient::new(quotesphere_client::client::QUOTABLE_BASE_URL, None)
        .unwrap()
        .retrieve(&Query::default())
        .await
        .unwrap();
    println!("quote: \"{}\" - {}", quote.text, quote.author);

    let joke = JokeApiClient::new(quotesphere_client::client::JOKEAPI_BASE_URL, None)
        .unwrap()
        .retrieve(&Query::new("Programming", ""))
        .await
        .unwrap();
    println!("joke: {}", joke.text);
}
