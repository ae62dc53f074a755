//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! # Products
//! GET  /api/products                         - Filtered, sorted, paginated listing
//! GET  /api/products/featured                - Featured products
//! GET  /api/products/search?q=               - Relevance-ranked search
//! GET  /api/products/price-range/stats       - Min / max / average price
//! GET  /api/products/category/{slug}         - Products of one category
//! GET  /api/products/{id}                    - Product detail
//!
//! # Categories
//! GET  /api/categories                       - Active categories
//! GET  /api/categories/{slug}                - Category detail with product count
//! GET  /api/categories/{slug}/products       - Products of one category
//!
//! # Images
//! GET  /api/images/placeholder               - Generic SVG card
//! GET  /api/images/products/{id}/{index}     - SVG card for a product image slot
//! GET  /api/images/categories/{slug}         - SVG card for a category
//!
//! # Probes
//! GET  /api/health                           - Liveness
//! GET  /api/health/ready                     - Readiness (checks the catalog store)
//! ```

pub mod categories;
pub mod health;
pub mod images;
pub mod products;

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};

use shopora_core::api::ErrorBody;

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/featured", get(products::featured))
        .route("/search", get(products::search))
        .route("/price-range/stats", get(products::price_range))
        .route("/category/{slug}", get(products::by_category))
        .route("/{id}", get(products::show))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index))
        .route("/{slug}", get(categories::show))
        .route("/{slug}/products", get(products::by_category))
}

/// Create the image routes router.
pub fn image_routes() -> Router<AppState> {
    Router::new()
        .route("/placeholder", get(images::placeholder))
        .route("/products/{id}/{index}", get(images::product_image))
        .route("/categories/{slug}", get(images::category_image))
}

/// Create the health routes router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::health))
        .route("/ready", get(health::ready))
}

/// Catch-all for unmatched paths.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "Route not found".to_string(),
        }),
    )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/images", image_routes())
        .nest("/health", health_routes());

    Router::new().nest("/api", api).fallback(not_found)
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use super::test_support::{get_json, test_app, test_app_with_placeholders};

    #[tokio::test]
    async fn test_trailing_slash_is_trimmed() {
        let (status, body) = get_json(test_app(), "/api/products/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["totalProducts"], 17);

        let (status, body) = get_json(test_app(), "/api/categories/furniture/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"]["slug"], "furniture");
    }

    #[tokio::test]
    async fn test_fallback_body() {
        let (status, body) = get_json(test_app(), "/api/does-not-exist").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Route not found");
    }

    #[tokio::test]
    async fn test_placeholder_svg() {
        let response = test_app()
            .oneshot(Request::get("/api/images/placeholder").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    }

    #[tokio::test]
    async fn test_product_image_unknown() {
        let (status, body) = get_json(test_app(), "/api/images/products/999/0").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Product not found");
    }

    #[tokio::test]
    async fn test_product_image_card() {
        let response = test_app()
            .oneshot(Request::get("/api/images/products/1/0").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let svg = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(svg.contains("Minimalist Desk Lamp"));
        assert!(svg.contains("Lighting"));
    }

    #[tokio::test]
    async fn test_product_images_rewritten_when_enabled() {
        let (status, body) = get_json(test_app_with_placeholders(), "/api/products/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["product"]["images"][0],
            "http://localhost:5000/api/images/products/2/0"
        );
    }

    #[tokio::test]
    async fn test_security_headers_and_request_id() {
        let response = test_app()
            .oneshot(
                Request::get("/api/health")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let headers = response.headers();
        assert_eq!(headers["x-request-id"], "abc-123");
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers["cross-origin-resource-policy"], "cross-origin");
    }
}
