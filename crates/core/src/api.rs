//! JSON envelopes of the storefront HTTP API.
//!
//! The server serializes these and the client deserializes them, so both
//! sides agree on the wire shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Category, Product};
use crate::query::Pagination;
use crate::types::Price;

/// `GET /api/products`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

/// `GET /api/products/featured` and `GET /api/products/search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

/// `GET /api/products/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub product: Product,
}

/// Category-scoped product listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProductsResponse {
    pub products: Vec<Product>,
    pub category: Category,
    pub pagination: Pagination,
}

/// `GET /api/products/price-range/stats`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeStats {
    pub min_price: Price,
    pub max_price: Price,
    pub avg_price: Price,
}

impl PriceRangeStats {
    /// Range reported when there are no products to measure.
    #[must_use]
    pub fn empty_catalog() -> Self {
        Self {
            min_price: Price::ZERO,
            max_price: Price::from_cents(100_000),
            avg_price: Price::from_cents(5_000),
        }
    }
}

/// A category, optionally annotated with how many products reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    #[serde(flatten)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_count: Option<u64>,
}

/// `GET /api/categories`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryView>,
}

/// `GET /api/categories/{slug}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub category: CategoryView,
}

/// `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// `GET /api/health/ready`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: String,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
