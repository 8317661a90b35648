//! Integration tests for the search index client against a mock upstream

use mockito::{Matcher, Server};
use serde_json::json;

use product_scout::config::SearchConfig;
use product_scout::search::client::{SearchClient, SearchError};

fn test_config(base_url: &str) -> SearchConfig {
    serde_json::from_value(json!({
        "app_id": "TESTAPP",
        "api_key": "test-key",
        "environment": "test",
        "base_url": base_url,
    }))
    .unwrap()
}

#[tokio::test]
async fn test_zero_hits_is_ok_empty() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/1/indexes/hof_test_search/query")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"hits": []}"#)
        .create_async()
        .await;

    let client = SearchClient::new(&test_config(&server.url())).unwrap();
    let hits = client.search("red jacket", &[], None, 6, 0).await.unwrap();

    assert!(hits.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_hits_parse_into_records() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/1/indexes/hof_test_search/query")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"hits": [
                {"objectID": "A", "brand": "Boss", "prices": {"GBP": {"sellingPrice": 39.0, "ticketPrice": 49.0}}},
                {"objectID": "B", "name": {"en-GB": "Red Jacket"}}
            ]})
            .to_string(),
        )
        .create_async()
        .await;

    let client = SearchClient::new(&test_config(&server.url())).unwrap();
    let hits = client.search("jacket", &[], None, 6, 0).await.unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].object_id, "A");
    assert_eq!(hits[0].brand.as_deref(), Some("Boss"));
    assert_eq!(hits[1].object_id, "B");
}

#[tokio::test]
async fn test_request_carries_filters_and_pagination() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/1/indexes/hof_test_search/query")
        .match_header("x-algolia-application-id", "TESTAPP")
        .match_header("x-algolia-api-key", "test-key")
        .match_body(Matcher::PartialJson(json!({
            "query": "Mens cotton",
            "hitsPerPage": 9,
            "page": 2,
            "facetFilters": [["cleancolour.en-GB:Red"]],
            "filters": "prices.GBP.sellingPrice <= 50",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"hits": []}"#)
        .create_async()
        .await;

    let client = SearchClient::new(&test_config(&server.url())).unwrap();
    let facets = vec![vec!["cleancolour.en-GB:Red".to_string()]];
    client
        .search(
            "Mens cotton",
            &facets,
            Some("prices.GBP.sellingPrice <= 50"),
            9,
            2,
        )
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_service_failure_is_not_zero_results() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/1/indexes/hof_test_search/query")
        .with_status(503)
        .with_body("index unavailable")
        .create_async()
        .await;

    let client = SearchClient::new(&test_config(&server.url())).unwrap();
    let result = client.search("jacket", &[], None, 6, 0).await;

    match result {
        Err(SearchError::Upstream { status, body }) => {
            assert_eq!(status, 503);
            assert!(body.contains("index unavailable"));
        }
        other => panic!("Expected Upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/1/indexes/hof_test_search/query")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"unexpected": true}"#)
        .create_async()
        .await;

    let client = SearchClient::new(&test_config(&server.url())).unwrap();
    let result = client.search("jacket", &[], None, 6, 0).await;

    assert!(matches!(result, Err(SearchError::InvalidResponse(_))));
}

#[test]
fn test_missing_credentials_is_configuration_error() {
    let config: SearchConfig = serde_json::from_value(json!({})).unwrap();
    let result = SearchClient::new(&config);
    assert!(matches!(result, Err(SearchError::Configuration(_))));
}
