//! Catalog records and read models.
//!
//! Stores hold [`ProductRecord`]s, which reference their category by ID.
//! Readers get [`Product`]s, where the reference has been resolved once into
//! a denormalized [`CategoryRef`]. Resolution never writes back to the record.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Price, ProductId, Slug};

/// Maximum length of a product name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum length of a product description.
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: Slug,
    pub description: String,
    pub image: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
}

impl Category {
    /// The denormalized reference embedded in products.
    #[must_use]
    pub fn reference(&self) -> CategoryRef {
        CategoryRef {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
        }
    }
}

/// Category fields embedded in a product read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
    pub slug: Slug,
}

/// A product as stored: the category is a bare reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub description: String,
    pub category_id: CategoryId,
    pub images: Vec<String>,
    pub stock: u32,
    pub featured: bool,
    pub tags: Vec<String>,
    pub specifications: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRecord {
    /// Build the read model, looking the category up in `categories`.
    ///
    /// A dangling reference yields `category: None`.
    #[must_use]
    pub fn resolve(&self, categories: &[Category]) -> Product {
        let category = categories
            .iter()
            .find(|c| c.id == self.category_id)
            .map(Category::reference);

        Product {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            description: self.description.clone(),
            category,
            images: self.images.clone(),
            stock: self.stock,
            featured: self.featured,
            tags: self.tags.clone(),
            specifications: self.specifications.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A product as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub description: String,
    pub category: Option<CategoryRef>,
    pub images: Vec<String>,
    pub stock: u32,
    pub featured: bool,
    pub tags: Vec<String>,
    pub specifications: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// First image URL, used as the cart thumbnail.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Whether the product can currently be added to a cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_resolve_embeds_category() {
        let categories = fixtures::categories();
        let record = fixtures::product_records().into_iter().next().unwrap();

        let product = record.resolve(&categories);
        let category = product.category.unwrap();
        assert_eq!(category.id, record.category_id);
        assert_eq!(category.slug.as_str(), "lighting");
    }

    #[test]
    fn test_resolve_dangling_reference() {
        let mut record = fixtures::product_records().into_iter().next().unwrap();
        record.category_id = CategoryId::new(999);

        let product = record.resolve(&fixtures::categories());
        assert!(product.category.is_none());
    }

    #[test]
    fn test_product_json_shape() {
        let product = fixtures::product_records().first().unwrap().resolve(&fixtures::categories());
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["price"], serde_json::json!(89.99));
        assert_eq!(json["category"]["slug"], "lighting");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }
}
