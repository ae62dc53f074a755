//! Seed the catalog database.
//!
//! Loads the built-in fixture catalog, or a YAML catalog file, and upserts it
//! by ID. With `--clear` all existing categories and products are removed
//! first. Identity sequences are moved past the highest seeded IDs so later
//! inserts do not collide.
//!
//! # YAML format
//!
//! ```yaml
//! categories:
//!   - id: 1
//!     name: Lighting
//!     description: Modern lighting for every room
//! products:
//!   - id: 1
//!     name: Minimalist Desk Lamp
//!     price: 89.99
//!     category: lighting
//!     stock: 25
//!     featured: true
//!     tags: [lamp, desk]
//!     specifications:
//!       Material: Aluminum
//! ```
//!
//! Category slugs default to the slugified name and `sortOrder` to the ID.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use shopora_core::catalog::{MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH};
use shopora_core::{Category, CategoryId, Price, ProductId, ProductRecord, Slug, fixtures};
use shopora_storefront::db::{self, CatalogRepository, RepositoryError};

use super::{DATABASE_URL_VAR, database_config};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),

    #[error("Product {product} references unknown category '{slug}'")]
    UnknownCategory { product: ProductId, slug: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A catalog file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeedCatalog {
    pub categories: Vec<SeedCategory>,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeedCategory {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<Slug>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

const fn active_by_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeedProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    /// Category slug.
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub specifications: BTreeMap<String, String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SeedCatalog {
    /// Validate the file and build store records.
    ///
    /// # Errors
    ///
    /// Returns an error for duplicate IDs or slugs, over-long fields, or
    /// products whose category is not in the file.
    pub fn into_records(self, now: DateTime<Utc>) -> Result<(Vec<Category>, Vec<ProductRecord>), SeedError> {
        let mut categories = Vec::with_capacity(self.categories.len());
        for seed in self.categories {
            let slug = match seed.slug {
                Some(slug) => slug,
                None => Slug::from_name(&seed.name).map_err(|e| {
                    SeedError::Invalid(format!("category '{}' has no usable slug: {e}", seed.name))
                })?,
            };
            categories.push(Category {
                id: seed.id,
                name: seed.name,
                slug,
                description: seed.description,
                image: seed.image,
                is_active: seed.is_active,
                sort_order: seed.sort_order.unwrap_or_else(|| seed.id.as_i32()),
            });
        }

        ensure_unique(categories.iter().map(|c| c.id), "category ID")?;
        ensure_unique(categories.iter().map(|c| c.slug.clone()), "category slug")?;

        let mut products = Vec::with_capacity(self.products.len());
        for seed in self.products {
            if seed.name.trim().is_empty() {
                return Err(SeedError::Invalid(format!("product {} has an empty name", seed.id)));
            }
            validate_text(seed.id, "name", &seed.name, MAX_NAME_LENGTH)?;
            validate_text(seed.id, "description", &seed.description, MAX_DESCRIPTION_LENGTH)?;

            let category = categories
                .iter()
                .find(|c| c.slug == *seed.category.as_str())
                .ok_or_else(|| SeedError::UnknownCategory {
                    product: seed.id,
                    slug: seed.category.clone(),
                })?;

            let created_at = seed.created_at.unwrap_or(now);
            products.push(ProductRecord {
                id: seed.id,
                name: seed.name,
                price: seed.price,
                description: seed.description,
                category_id: category.id,
                images: seed.images,
                stock: seed.stock,
                featured: seed.featured,
                tags: seed.tags,
                specifications: seed.specifications,
                created_at,
                updated_at: created_at,
            });
        }

        ensure_unique(products.iter().map(|p| p.id), "product ID")?;
        Ok((categories, products))
    }
}

fn ensure_unique<T>(values: impl Iterator<Item = T>, what: &str) -> Result<(), SeedError>
where
    T: std::hash::Hash + Eq + std::fmt::Display,
{
    let mut seen = HashSet::new();
    for value in values {
        if let Some(dup) = seen.replace(value) {
            return Err(SeedError::Invalid(format!("duplicate {what}: {dup}")));
        }
    }
    Ok(())
}

fn validate_text(id: ProductId, field: &str, value: &str, max: usize) -> Result<(), SeedError> {
    if value.chars().count() > max {
        return Err(SeedError::Invalid(format!(
            "product {id} {field} exceeds {max} characters"
        )));
    }
    Ok(())
}

/// Load the catalog to seed from `file`, or the built-in fixtures.
async fn load(file: Option<&Path>) -> Result<(Vec<Category>, Vec<ProductRecord>), SeedError> {
    let Some(path) = file else {
        info!("Using built-in fixture catalog");
        return Ok((fixtures::categories(), fixtures::product_records()));
    };

    info!(path = %path.display(), "Loading catalog from file");
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Read {
            path: path.display().to_string(),
            source,
        })?;
    let catalog: SeedCatalog = serde_yaml::from_str(&content)?;
    catalog.into_records(Utc::now())
}

/// Seed the catalog database.
///
/// The catalog is parsed and validated before connecting.
///
/// # Errors
///
/// Returns an error if the catalog is invalid, the database URL is missing,
/// or a database operation fails.
pub async fn run(file: Option<&Path>, clear: bool) -> Result<(), SeedError> {
    let (categories, products) = load(file).await?;
    info!(
        categories = categories.len(),
        products = products.len(),
        "Catalog validated"
    );

    let config = database_config().ok_or(SeedError::MissingEnvVar(DATABASE_URL_VAR))?;
    let pool = db::create_pool(&config).await?;
    info!("Connected to database");

    let repo = CatalogRepository::new(&pool);
    if clear {
        info!("Clearing existing catalog");
        repo.clear().await?;
    }

    for category in &categories {
        repo.upsert_category(category).await?;
    }
    for product in &products {
        repo.upsert_product(product).await?;
    }
    repo.sync_sequences().await?;

    info!("Seeding complete!");
    info!("  Categories: {}", categories.len());
    info!("  Products: {}", products.len());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CATALOG: &str = r"
categories:
  - id: 1
    name: Home Decor
    description: Things for the home
  - id: 2
    name: Lighting
    slug: lights
    isActive: false
    sortOrder: 9
products:
  - id: 10
    name: Vase
    price: 24.5
    category: home-decor
    tags: [ceramic]
    specifications:
      Height: 30cm
  - id: 11
    name: Floor Lamp
    price: 120
    category: lights
    featured: true
";

    fn parse(yaml: &str) -> Result<(Vec<Category>, Vec<ProductRecord>), SeedError> {
        serde_yaml::from_str::<SeedCatalog>(yaml)
            .unwrap()
            .into_records(Utc::now())
    }

    #[test]
    fn test_parse_catalog_defaults() {
        let (categories, products) = parse(CATALOG).unwrap();

        assert_eq!(categories[0].slug.as_str(), "home-decor");
        assert_eq!(categories[0].sort_order, 1);
        assert!(categories[0].is_active);
        assert_eq!(categories[1].slug.as_str(), "lights");
        assert_eq!(categories[1].sort_order, 9);
        assert!(!categories[1].is_active);

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].category_id, CategoryId::new(1));
        assert_eq!(products[0].price, "24.50".parse().unwrap());
        assert_eq!(products[0].specifications["Height"], "30cm");
        assert_eq!(products[0].created_at, products[0].updated_at);
        assert_eq!(products[1].category_id, CategoryId::new(2));
        assert!(products[1].featured);
    }

    #[test]
    fn test_unknown_category() {
        let yaml = r"
categories:
  - id: 1
    name: Lighting
products:
  - id: 5
    name: Sofa
    price: 10
    category: furniture
";
        let err = parse(yaml).unwrap_err();
        assert!(matches!(err, SeedError::UnknownCategory { ref slug, .. } if slug == "furniture"));
    }

    #[test]
    fn test_duplicate_slug() {
        let yaml = r"
categories:
  - id: 1
    name: Lighting
  - id: 2
    name: Lighting
";
        let err = parse(yaml).unwrap_err();
        assert_eq!(err.to_string(), "Invalid catalog: duplicate category slug: lighting");
    }

    #[test]
    fn test_name_too_long() {
        let yaml = format!(
            "categories:\n  - id: 1\n    name: Lighting\nproducts:\n  - id: 1\n    name: {}\n    price: 1\n    category: lighting\n",
            "x".repeat(MAX_NAME_LENGTH + 1)
        );
        let err = parse(&yaml).unwrap_err();
        assert!(err.to_string().contains("name exceeds 100 characters"));
    }

    #[test]
    fn test_negative_price_rejected() {
        let yaml = r"
categories:
  - id: 1
    name: Lighting
products:
  - id: 1
    name: Lamp
    price: -5
    category: lighting
";
        assert!(serde_yaml::from_str::<SeedCatalog>(yaml).is_err());
    }

    #[tokio::test]
    async fn test_load_fixtures_without_file() {
        let (categories, products) = load(None).await.unwrap();
        assert_eq!(categories.len(), 5);
        assert_eq!(products.len(), 17);
    }
}
