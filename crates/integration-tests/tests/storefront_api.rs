//! Integration tests for the storefront HTTP API over the fixture catalog.
//!
//! Each test starts its own server on an ephemeral port.

#![allow(clippy::unwrap_used)]

use reqwest::{StatusCode, header};
use serde_json::Value;

use shopora_cli::ClientError;
use shopora_core::ProductId;
use shopora_core::query::{CategoryProductParams, ProductListParams};
use shopora_integration_tests::TestServer;

async fn get(server: &TestServer, path: &str) -> (StatusCode, Value) {
    let resp = reqwest::get(format!("{}{path}", server.api_url()))
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_pagination_walks_all_products() {
    let server = TestServer::memory().await.unwrap();
    let client = server.client().unwrap();

    let mut seen = Vec::new();
    let mut page = 1;
    loop {
        let params = ProductListParams {
            page: Some(page.to_string()),
            limit: Some("5".to_owned()),
            ..Default::default()
        };
        let resp = client.list_products(&params).await.unwrap();
        assert_eq!(resp.pagination.total_pages, 4);
        assert_eq!(resp.pagination.has_prev, page > 1);
        seen.extend(resp.products.iter().map(|p| p.id));
        if !resp.pagination.has_next {
            break;
        }
        page += 1;
    }

    assert_eq!(page, 4);
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 17);
}

#[tokio::test]
async fn test_price_window() {
    let server = TestServer::memory().await.unwrap();
    let (status, body) = get(&server, "/products?minPrice=100&maxPrice=200&limit=100").await;
    assert_eq!(status, StatusCode::OK);

    let products = body["products"].as_array().unwrap();
    assert!(!products.is_empty());
    for product in products {
        let price = product["price"].as_f64().unwrap();
        assert!((100.0..=200.0).contains(&price), "{price} outside window");
    }
}

#[tokio::test]
async fn test_unknown_category_filter_is_empty() {
    let server = TestServer::memory().await.unwrap();
    let (status, body) = get(&server, "/products?category=garden").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"].as_array().unwrap().len(), 0);
    assert_eq!(body["pagination"]["totalProducts"], 0);
    assert_eq!(body["pagination"]["hasNext"], false);
}

#[tokio::test]
async fn test_empty_parameters_are_ignored() {
    let server = TestServer::memory().await.unwrap();
    let (status, body) = get(&server, "/products?category=&search=&page=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["totalProducts"], 17);
}

#[tokio::test]
async fn test_invalid_parameters() {
    let server = TestServer::memory().await.unwrap();
    for path in [
        "/products?page=0",
        "/products?limit=abc",
        "/products?sortOrder=sideways",
        "/products?featured=maybe",
        "/products?minPrice=cheap",
        "/products/featured?limit=-1",
    ] {
        let (status, body) = get(&server, path).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{path}");
        assert!(body["error"].is_string(), "{path}");
    }
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_matches_tags() {
    let server = TestServer::memory().await.unwrap();
    let client = server.client().unwrap();

    let resp = client.search("wireless", None).await.unwrap();
    assert!(
        resp.products
            .iter()
            .any(|p| p.id == ProductId::new(2))
    );
}

#[tokio::test]
async fn test_search_blank_term() {
    let server = TestServer::memory().await.unwrap();
    let client = server.client().unwrap();

    let err = client.search("   ", None).await.unwrap_err();
    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(message, "Search query is required");
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// Categories
// ============================================================================

#[tokio::test]
async fn test_category_routes_agree() {
    let server = TestServer::memory().await.unwrap();
    let client = server.client().unwrap();
    let params = CategoryProductParams::default();

    let a = client.products_by_category("electronics", &params).await.unwrap();
    let b = client.category_products("electronics", &params).await.unwrap();
    assert_eq!(a, b);

    let detail = client.category("electronics").await.unwrap();
    assert_eq!(detail.category.product_count, Some(a.pagination.total_products));
}

#[tokio::test]
async fn test_category_counts_sum_to_catalog() {
    let server = TestServer::memory().await.unwrap();
    let client = server.client().unwrap();

    let categories = client.categories(true).await.unwrap();
    let total: u64 = categories
        .categories
        .iter()
        .map(|c| c.product_count.unwrap())
        .sum();
    assert_eq!(total, 17);

    let without = client.categories(false).await.unwrap();
    assert!(without.categories.iter().all(|c| c.product_count.is_none()));
}

// ============================================================================
// Errors, probes and headers
// ============================================================================

#[tokio::test]
async fn test_not_found_bodies() {
    let server = TestServer::memory().await.unwrap();

    let (status, body) = get(&server, "/products/4040").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");

    let (status, body) = get(&server, "/categories/nowhere/products").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Category not found");

    let (status, body) = get(&server, "/orders").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn test_health_probes() {
    let server = TestServer::memory().await.unwrap();
    let client = server.client().unwrap();

    assert_eq!(client.health().await.unwrap().status, "OK");
    assert_eq!(client.ready().await.unwrap().status, "ready");
}

#[tokio::test]
async fn test_response_headers() {
    let server = TestServer::memory().await.unwrap();
    let resp = reqwest::Client::new()
        .get(format!("{}/health", server.api_url()))
        .header(header::ORIGIN, "http://localhost:5173")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert!(headers.contains_key("x-request-id"));
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
}

#[tokio::test]
async fn test_placeholder_image() {
    let server = TestServer::memory().await.unwrap();
    let resp = reqwest::get(format!("{}/images/categories/furniture", server.api_url()))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "image/svg+xml");
    let svg = resp.text().await.unwrap();
    assert!(svg.contains("Furniture"));
}
