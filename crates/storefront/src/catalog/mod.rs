//! Catalog store behind the HTTP API.
//!
//! The store is either the in-memory fixture set or the `PostgreSQL`
//! repository. Both answer the same operations with the same semantics; the
//! memory variant simply never fails.

pub mod memory;

use std::collections::HashMap;

use sqlx::PgPool;

use shopora_core::api::PriceRangeStats;
use shopora_core::query::{PageRequest, Pagination, ProductQuery, Sort};
use shopora_core::{Category, CategoryId, Product, ProductId};

use crate::db::{CatalogRepository, RepositoryError};

pub use memory::MemoryCatalog;

/// One page of products plus its pagination block.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

/// The configured catalog backend.
#[derive(Debug, Clone)]
pub enum Catalog {
    Memory(MemoryCatalog),
    Postgres(PgPool),
}

impl Catalog {
    /// Backend name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }

    /// Check that the backing store is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the database does not answer.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        match self {
            Self::Memory(_) => Ok(()),
            Self::Postgres(pool) => CatalogRepository::new(pool).ping().await,
        }
    }

    /// Filtered, sorted, paginated product listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, RepositoryError> {
        match self {
            Self::Memory(catalog) => Ok(catalog.list_products(query)),
            Self::Postgres(pool) => {
                let (products, pagination) = CatalogRepository::new(pool).list_products(query).await?;
                Ok(ProductPage {
                    products,
                    pagination,
                })
            }
        }
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        match self {
            Self::Memory(catalog) => Ok(catalog.product(id)),
            Self::Postgres(pool) => CatalogRepository::new(pool).product(id).await,
        }
    }

    /// Featured products, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn featured(&self, limit: u32) -> Result<Vec<Product>, RepositoryError> {
        match self {
            Self::Memory(catalog) => Ok(catalog.featured(limit)),
            Self::Postgres(pool) => CatalogRepository::new(pool).featured(limit).await,
        }
    }

    /// Relevance-ordered search results.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn search(&self, term: &str, limit: u32) -> Result<Vec<Product>, RepositoryError> {
        match self {
            Self::Memory(catalog) => Ok(catalog.search(term, limit)),
            Self::Postgres(pool) => CatalogRepository::new(pool).search(term, limit).await,
        }
    }

    /// Active categories in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn active_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        match self {
            Self::Memory(catalog) => Ok(catalog.active_categories()),
            Self::Postgres(pool) => CatalogRepository::new(pool).active_categories().await,
        }
    }

    /// Look up an active category by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn active_category(&self, slug: &str) -> Result<Option<Category>, RepositoryError> {
        match self {
            Self::Memory(catalog) => Ok(catalog.active_category(slug)),
            Self::Postgres(pool) => CatalogRepository::new(pool).active_category_by_slug(slug).await,
        }
    }

    /// Product count for every category that has products.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn product_counts(&self) -> Result<HashMap<CategoryId, u64>, RepositoryError> {
        match self {
            Self::Memory(catalog) => Ok(catalog.product_counts()),
            Self::Postgres(pool) => CatalogRepository::new(pool).product_counts().await,
        }
    }

    /// Product count for one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn product_count(&self, category: CategoryId) -> Result<u64, RepositoryError> {
        match self {
            Self::Memory(catalog) => Ok(catalog.product_count(category)),
            Self::Postgres(pool) => CatalogRepository::new(pool).product_count(category).await,
        }
    }

    /// Products of one category, sorted and paginated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn products_in_category(
        &self,
        category: CategoryId,
        sort: Sort,
        page: &PageRequest,
    ) -> Result<ProductPage, RepositoryError> {
        match self {
            Self::Memory(catalog) => Ok(catalog.products_in_category(category, sort, page)),
            Self::Postgres(pool) => {
                let (products, pagination) = CatalogRepository::new(pool)
                    .products_in_category(category, sort, page)
                    .await?;
                Ok(ProductPage {
                    products,
                    pagination,
                })
            }
        }
    }

    /// Min, max and average price.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn price_stats(&self) -> Result<PriceRangeStats, RepositoryError> {
        match self {
            Self::Memory(catalog) => Ok(catalog.price_stats()),
            Self::Postgres(pool) => CatalogRepository::new(pool).price_stats().await,
        }
    }
}
