//! In-memory catalog over a fixed set of records.

use std::collections::HashMap;
use std::sync::Arc;

use shopora_core::api::PriceRangeStats;
use shopora_core::query::{self, PageRequest, ProductQuery, Sort};
use shopora_core::{Category, CategoryId, Product, ProductId, ProductRecord, fixtures};

use super::ProductPage;

/// Immutable catalog shared between requests.
#[derive(Debug, Clone)]
pub struct MemoryCatalog {
    categories: Arc<[Category]>,
    products: Arc<[ProductRecord]>,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new(categories: Vec<Category>, products: Vec<ProductRecord>) -> Self {
        Self {
            categories: categories.into(),
            products: products.into(),
        }
    }

    /// The built-in demo catalog.
    #[must_use]
    pub fn fixtures() -> Self {
        Self::new(fixtures::categories(), fixtures::product_records())
    }

    fn resolve<'a>(&self, records: impl IntoIterator<Item = &'a ProductRecord>) -> Vec<Product> {
        records
            .into_iter()
            .map(|record| record.resolve(&self.categories))
            .collect()
    }

    pub fn list_products(&self, query: &ProductQuery) -> ProductPage {
        let (records, pagination) = query::select_products(&self.products, &self.categories, query);
        ProductPage {
            products: self.resolve(records),
            pagination,
        }
    }

    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.products
            .iter()
            .find(|record| record.id == id)
            .map(|record| record.resolve(&self.categories))
    }

    pub fn featured(&self, limit: u32) -> Vec<Product> {
        self.resolve(query::featured_products(&self.products, limit))
    }

    pub fn search(&self, term: &str, limit: u32) -> Vec<Product> {
        self.resolve(query::search_products(&self.products, term, limit))
    }

    pub fn active_categories(&self) -> Vec<Category> {
        query::active_categories(&self.categories)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn active_category(&self, slug: &str) -> Option<Category> {
        query::find_active_category(&self.categories, slug).cloned()
    }

    pub fn product_counts(&self) -> HashMap<CategoryId, u64> {
        let mut counts = HashMap::new();
        for record in self.products.iter() {
            *counts.entry(record.category_id).or_default() += 1;
        }
        counts
    }

    pub fn product_count(&self, category: CategoryId) -> u64 {
        self.products
            .iter()
            .filter(|record| record.category_id == category)
            .count() as u64
    }

    pub fn products_in_category(
        &self,
        category: CategoryId,
        sort: Sort,
        page: &PageRequest,
    ) -> ProductPage {
        let mut records: Vec<_> = self
            .products
            .iter()
            .filter(|record| record.category_id == category)
            .collect();
        records.sort_by(|a, b| sort.compare(a, b));

        let (records, pagination) = query::paginate(records, page);
        ProductPage {
            products: self.resolve(records),
            pagination,
        }
    }

    pub fn price_stats(&self) -> PriceRangeStats {
        query::price_stats(self.products.iter().map(|record| record.price))
    }
}
