//! Product route handlers.

use axum::{Json, extract::State};

use shopora_core::ProductId;
use shopora_core::api::{
    CategoryProductsResponse, PriceRangeStats, ProductListResponse, ProductResponse,
    ProductsResponse,
};
use shopora_core::query::{
    CategoryProductParams, DEFAULT_FEATURED_LIMIT, LimitParams, ProductListParams, SearchParams,
    parse_limit,
};

use super::images::{present_category, present_product, present_products};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::{ApiPath, ApiQuery};
use crate::state::AppState;

/// List products with filtering, sorting and pagination.
#[tracing::instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ProductListParams>,
) -> Result<Json<ProductListResponse>> {
    let query = params.parse()?;
    let page = state.catalog().list_products(&query).await?;

    Ok(Json(ProductListResponse {
        products: present_products(&state, page.products),
        pagination: page.pagination,
    }))
}

/// Featured products, newest first.
#[tracing::instrument(skip(state))]
pub async fn featured(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<LimitParams>,
) -> Result<Json<ProductsResponse>> {
    let limit = parse_limit(params.limit.as_ref(), DEFAULT_FEATURED_LIMIT)?;
    let products = state.catalog().featured(limit).await?;

    Ok(Json(ProductsResponse {
        products: present_products(&state, products),
    }))
}

/// Relevance-ranked search over name, tags and description.
#[tracing::instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<ProductsResponse>> {
    let (term, limit) = params.parse()?;
    add_breadcrumb("catalog", "Product search", Some(&[("q", term.as_str())]));
    let products = state.catalog().search(&term, limit).await?;
    tracing::debug!(results = products.len(), "Search complete");

    Ok(Json(ProductsResponse {
        products: present_products(&state, products),
    }))
}

/// Single product by ID.
#[tracing::instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ProductResponse>> {
    let id: ProductId = id.parse()?;
    let product = state
        .catalog()
        .product(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(ProductResponse {
        product: present_product(&state, product),
    }))
}

/// Products of one active category.
///
/// Shared by `/products/category/{slug}` and `/categories/{slug}/products`.
#[tracing::instrument(skip(state))]
pub async fn by_category(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
    ApiQuery(params): ApiQuery<CategoryProductParams>,
) -> Result<Json<CategoryProductsResponse>> {
    let (sort, page) = params.parse()?;
    let category = state
        .catalog()
        .active_category(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    let result = state
        .catalog()
        .products_in_category(category.id, sort, &page)
        .await?;

    Ok(Json(CategoryProductsResponse {
        products: present_products(&state, result.products),
        category: present_category(&state, category),
        pagination: result.pagination,
    }))
}

/// Minimum, maximum and average product price.
#[tracing::instrument(skip(state))]
pub async fn price_range(State(state): State<AppState>) -> Result<Json<PriceRangeStats>> {
    Ok(Json(state.catalog().price_stats().await?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::routes::test_support::{get_json, test_app};

    #[tokio::test]
    async fn test_list_defaults() {
        let (status, body) = get_json(test_app(), "/api/products").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["products"].as_array().unwrap().len(), 12);
        assert_eq!(body["pagination"]["currentPage"], 1);
        assert_eq!(body["pagination"]["totalPages"], 2);
        assert_eq!(body["pagination"]["totalProducts"], 17);
        assert_eq!(body["pagination"]["hasNext"], true);
        assert_eq!(body["pagination"]["hasPrev"], false);
    }

    #[tokio::test]
    async fn test_list_filters_by_category_and_price() {
        let (status, body) = get_json(
            test_app(),
            "/api/products?category=furniture&minPrice=100&sortBy=price&sortOrder=asc",
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let products = body["products"].as_array().unwrap();
        assert!(!products.is_empty());
        assert!(products.iter().all(|p| p["category"]["slug"] == "furniture"));
        assert!(products.iter().all(|p| p["price"].as_f64().unwrap() >= 100.0));

        let prices: Vec<f64> = products.iter().map(|p| p["price"].as_f64().unwrap()).collect();
        assert!(prices.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_list_rejects_bad_sort() {
        let (status, body) = get_json(test_app(), "/api/products?sortBy=color").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("color"));
    }

    #[tokio::test]
    async fn test_featured_limit() {
        let (status, body) = get_json(test_app(), "/api/products/featured?limit=3").await;
        assert_eq!(status, StatusCode::OK);
        let products = body["products"].as_array().unwrap();
        assert_eq!(products.len(), 3);
        assert!(products.iter().all(|p| p["featured"] == true));
    }

    #[tokio::test]
    async fn test_search_requires_term() {
        let (status, body) = get_json(test_app(), "/api/products/search?q=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Search query is required");
    }

    #[tokio::test]
    async fn test_search_ranks_name_matches_first() {
        let (status, body) = get_json(test_app(), "/api/products/search?q=lamp").await;
        assert_eq!(status, StatusCode::OK);
        let first = &body["products"][0];
        assert!(first["name"].as_str().unwrap().to_lowercase().contains("lamp"));
    }

    #[tokio::test]
    async fn test_show_product() {
        let (status, body) = get_json(test_app(), "/api/products/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["product"]["name"], "Minimalist Desk Lamp");
        assert_eq!(body["product"]["category"]["name"], "Lighting");
    }

    #[tokio::test]
    async fn test_show_product_errors() {
        let (status, body) = get_json(test_app(), "/api/products/9999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Product not found");

        let (status, _) = get_json(test_app(), "/api/products/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_by_category() {
        let (status, body) = get_json(test_app(), "/api/products/category/furniture?limit=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"]["slug"], "furniture");
        assert_eq!(body["products"].as_array().unwrap().len(), 2);
        assert_eq!(body["pagination"]["totalProducts"], 5);

        let (status, body) = get_json(test_app(), "/api/products/category/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Category not found");
    }

    #[tokio::test]
    async fn test_price_range() {
        let (status, body) = get_json(test_app(), "/api/products/price-range/stats").await;
        assert_eq!(status, StatusCode::OK);
        let min = body["minPrice"].as_f64().unwrap();
        let max = body["maxPrice"].as_f64().unwrap();
        let avg = body["avgPrice"].as_f64().unwrap();
        assert!(min <= avg && avg <= max);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = test_app()
            .oneshot(Request::get("/api/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
