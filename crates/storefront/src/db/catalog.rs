//! Catalog repository for the `catalog` schema.
//!
//! Listing queries are assembled with `QueryBuilder` so that every filter
//! value is a bound parameter. Sort columns come from a fixed whitelist.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use shopora_core::api::PriceRangeStats;
use shopora_core::query::{PageRequest, Pagination, ProductFilter, ProductQuery, Sort, SortField, SortOrder};
use shopora_core::{Category, CategoryId, CategoryRef, Price, Product, ProductId, ProductRecord, Slug};

use super::RepositoryError;

const PRODUCT_COLUMNS: &str = "\
    SELECT p.id, p.name, p.price, p.description, p.category_id, p.images, p.stock, \
           p.featured, p.tags, p.specifications, p.created_at, p.updated_at, \
           c.name AS category_name, c.slug AS category_slug \
    FROM catalog.product p \
    LEFT JOIN catalog.category c ON c.id = p.category_id";

const CATEGORY_COLUMNS: &str = "\
    SELECT id, name, slug, description, image, is_active, sort_order \
    FROM catalog.category";

/// Product joined with its category's name and slug.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    price: Decimal,
    description: String,
    category_id: i32,
    images: Vec<String>,
    stock: i32,
    featured: bool,
    tags: Vec<String>,
    specifications: Json<BTreeMap<String, String>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    category_name: Option<String>,
    category_slug: Option<String>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("product {}: {e}", row.id))
        })?;
        let stock = u32::try_from(row.stock).map_err(|_| {
            RepositoryError::DataCorruption(format!("product {}: negative stock", row.id))
        })?;

        let category = match (row.category_name, row.category_slug) {
            (Some(name), Some(slug)) => Some(CategoryRef {
                id: CategoryId::new(row.category_id),
                name,
                slug: parse_slug(&slug)?,
            }),
            _ => None,
        };

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            price,
            description: row.description,
            category,
            images: row.images,
            stock,
            featured: row.featured,
            tags: row.tags,
            specifications: row.specifications.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    slug: String,
    description: String,
    image: Option<String>,
    is_active: bool,
    sort_order: i32,
}

impl TryFrom<CategoryRow> for Category {
    type Error = RepositoryError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CategoryId::new(row.id),
            name: row.name,
            slug: parse_slug(&row.slug)?,
            description: row.description,
            image: row.image,
            is_active: row.is_active,
            sort_order: row.sort_order,
        })
    }
}

fn parse_slug(raw: &str) -> Result<Slug, RepositoryError> {
    Slug::parse(raw)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid slug {raw:?}: {e}")))
}

fn rows_to_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, RepositoryError> {
    rows.into_iter().map(Product::try_from).collect()
}

/// Escape `LIKE` metacharacters and wrap in `%` for a substring match.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Display order of categories; names compare bytewise like `str::cmp`.
const CATEGORY_ORDER: &str = " ORDER BY sort_order ASC, name COLLATE \"C\" ASC";

const fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "p.created_at",
        SortField::UpdatedAt => "p.updated_at",
        SortField::Price => "p.price",
        SortField::Name => "p.name COLLATE \"C\"",
        SortField::Stock => "p.stock",
    }
}

fn push_order_by(builder: &mut QueryBuilder<'_, Postgres>, sort: Sort) {
    let direction = match sort.order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    builder.push(format!(
        " ORDER BY {} {direction}, p.id ASC",
        sort_column(sort.field)
    ));
}

fn push_page(builder: &mut QueryBuilder<'_, Postgres>, page: &PageRequest) {
    builder.push(" LIMIT ");
    builder.push_bind(i64::from(page.limit()));
    builder.push(" OFFSET ");
    builder.push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));
}

fn push_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    filter: &ProductFilter,
    category: Option<CategoryId>,
) {
    builder.push(" WHERE TRUE");

    if let Some(category) = category {
        builder.push(" AND p.category_id = ");
        builder.push_bind(category);
    }
    if let Some(featured) = filter.featured {
        builder.push(" AND p.featured = ");
        builder.push_bind(featured);
    }
    if let Some(min) = filter.min_price {
        builder.push(" AND p.price >= ");
        builder.push_bind(min.amount());
    }
    if let Some(max) = filter.max_price {
        builder.push(" AND p.price <= ");
        builder.push_bind(max.amount());
    }
    if let Some(term) = &filter.search {
        let pattern = contains_pattern(term);
        builder.push(" AND (p.name ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR p.description ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR EXISTS (SELECT 1 FROM unnest(p.tags) AS t(tag) WHERE t.tag ILIKE ");
        builder.push_bind(pattern);
        builder.push("))");
    }
}

fn count(total: i64) -> u64 {
    u64::try_from(total).unwrap_or_default()
}

/// Repository for catalog reads and seeding.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Check that the database answers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(self.pool).await?;
        Ok(())
    }

    /// Active categories ordered by sort order, then name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored slug is invalid.
    pub async fn active_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "{CATEGORY_COLUMNS} WHERE is_active{CATEGORY_ORDER}"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Category::try_from).collect()
    }

    /// Look up an active category by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored slug is invalid.
    pub async fn active_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "{CATEGORY_COLUMNS} WHERE is_active AND slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        row.map(Category::try_from).transpose()
    }

    /// Number of products referencing each category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_counts(&self) -> Result<HashMap<CategoryId, u64>, RepositoryError> {
        let rows: Vec<(CategoryId, i64)> = sqlx::query_as(
            "SELECT category_id, COUNT(*) FROM catalog.product GROUP BY category_id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id, n)| (id, count(n))).collect())
    }

    /// Number of products referencing `category`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_count(&self, category: CategoryId) -> Result<u64, RepositoryError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM catalog.product WHERE category_id = $1")
                .bind(category)
                .fetch_one(self.pool)
                .await?;
        Ok(count(total))
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the row is invalid.
    pub async fn product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{PRODUCT_COLUMNS} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Filtered, sorted, paginated product listing.
    ///
    /// An unknown or inactive category slug yields an empty page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a row is invalid.
    pub async fn list_products(
        &self,
        query: &ProductQuery,
    ) -> Result<(Vec<Product>, Pagination), RepositoryError> {
        let category = match query.filter.category.as_deref() {
            None => None,
            Some(slug) => match self.active_category_by_slug(slug).await? {
                Some(category) => Some(category.id),
                None => return Ok((Vec::new(), Pagination::new(&query.page, 0))),
            },
        };

        let mut counter = QueryBuilder::new("SELECT COUNT(*) FROM catalog.product p");
        push_filters(&mut counter, &query.filter, category);
        let total: i64 = counter.build_query_scalar().fetch_one(self.pool).await?;

        let mut builder = QueryBuilder::new(PRODUCT_COLUMNS);
        push_filters(&mut builder, &query.filter, category);
        push_order_by(&mut builder, query.sort);
        push_page(&mut builder, &query.page);
        let rows: Vec<ProductRow> = builder.build_query_as().fetch_all(self.pool).await?;

        Ok((rows_to_products(rows)?, Pagination::new(&query.page, count(total))))
    }

    /// Products in one category, sorted and paginated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a row is invalid.
    pub async fn products_in_category(
        &self,
        category: CategoryId,
        sort: Sort,
        page: &PageRequest,
    ) -> Result<(Vec<Product>, Pagination), RepositoryError> {
        let total = self.product_count(category).await?;

        let mut builder = QueryBuilder::new(PRODUCT_COLUMNS);
        builder.push(" WHERE p.category_id = ");
        builder.push_bind(category);
        push_order_by(&mut builder, sort);
        push_page(&mut builder, page);
        let rows: Vec<ProductRow> = builder.build_query_as().fetch_all(self.pool).await?;

        Ok((rows_to_products(rows)?, Pagination::new(page, total)))
    }

    /// Featured products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row is invalid.
    pub async fn featured(&self, limit: u32) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{PRODUCT_COLUMNS} WHERE p.featured ORDER BY p.created_at DESC, p.id ASC LIMIT $1"
        ))
        .bind(i64::from(limit))
        .fetch_all(self.pool)
        .await?;

        rows_to_products(rows)
    }

    /// Weighted substring search: name 3, any tag 2, description 1.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row is invalid.
    pub async fn search(&self, term: &str, limit: u32) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT * FROM ( \
                SELECT matched.*, \
                       (CASE WHEN matched.name ILIKE $1 THEN 3 ELSE 0 END \
                      + CASE WHEN EXISTS (SELECT 1 FROM unnest(matched.tags) AS t(tag) WHERE t.tag ILIKE $1) THEN 2 ELSE 0 END \
                      + CASE WHEN matched.description ILIKE $1 THEN 1 ELSE 0 END) AS score \
                FROM ({PRODUCT_COLUMNS}) AS matched \
             ) AS scored \
             WHERE score > 0 \
             ORDER BY score DESC, created_at DESC, id ASC \
             LIMIT $2"
        ))
        .bind(contains_pattern(term))
        .bind(i64::from(limit))
        .fetch_all(self.pool)
        .await?;

        rows_to_products(rows)
    }

    /// Min, max and average price across the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is negative.
    pub async fn price_stats(&self) -> Result<PriceRangeStats, RepositoryError> {
        let (min, max, avg): (Option<Decimal>, Option<Decimal>, Option<Decimal>) =
            sqlx::query_as("SELECT MIN(price), MAX(price), AVG(price) FROM catalog.product")
                .fetch_one(self.pool)
                .await?;

        let (Some(min), Some(max), Some(avg)) = (min, max, avg) else {
            return Ok(PriceRangeStats::empty_catalog());
        };

        let price = |amount: Decimal| {
            Price::new(amount).map_err(|e| RepositoryError::DataCorruption(e.to_string()))
        };
        Ok(PriceRangeStats {
            min_price: price(min)?,
            max_price: price(max)?,
            avg_price: price(avg.round_dp(2))?,
        })
    }

    /// Insert or replace a category, keeping its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert_category(&self, category: &Category) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO catalog.category (id, name, slug, description, image, is_active, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                slug = EXCLUDED.slug,
                description = EXCLUDED.description,
                image = EXCLUDED.image,
                is_active = EXCLUDED.is_active,
                sort_order = EXCLUDED.sort_order,
                updated_at = now()
            ",
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(category.slug.as_str())
        .bind(&category.description)
        .bind(&category.image)
        .bind(category.is_active)
        .bind(category.sort_order)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Insert or replace a product, keeping its ID and timestamps.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stock does not fit the column.
    pub async fn upsert_product(&self, record: &ProductRecord) -> Result<(), RepositoryError> {
        let stock = i32::try_from(record.stock).map_err(|_| {
            RepositoryError::DataCorruption(format!("product {}: stock too large", record.id))
        })?;

        sqlx::query(
            r"
            INSERT INTO catalog.product
                (id, name, price, description, category_id, images, stock, featured,
                 tags, specifications, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                price = EXCLUDED.price,
                description = EXCLUDED.description,
                category_id = EXCLUDED.category_id,
                images = EXCLUDED.images,
                stock = EXCLUDED.stock,
                featured = EXCLUDED.featured,
                tags = EXCLUDED.tags,
                specifications = EXCLUDED.specifications,
                created_at = EXCLUDED.created_at,
                updated_at = EXCLUDED.updated_at
            ",
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(record.price.amount())
        .bind(&record.description)
        .bind(record.category_id)
        .bind(&record.images)
        .bind(stock)
        .bind(record.featured)
        .bind(&record.tags)
        .bind(Json(&record.specifications))
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Delete every product and category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self) -> Result<(), RepositoryError> {
        sqlx::query("TRUNCATE catalog.product, catalog.category RESTART IDENTITY")
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Move identity sequences past the highest seeded IDs.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sync_sequences(&self) -> Result<(), RepositoryError> {
        for table in ["catalog.category", "catalog.product"] {
            sqlx::query(&format!(
                "SELECT setval(pg_get_serial_sequence('{table}', 'id'), \
                 COALESCE((SELECT MAX(id) FROM {table}), 0) + 1, false)"
            ))
            .execute(self.pool)
            .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("lamp"), "%lamp%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b\\c"), "%a\\_b\\\\c%");
    }

    #[test]
    fn test_order_by_is_whitelisted() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1");
        push_order_by(
            &mut builder,
            Sort {
                field: SortField::Price,
                order: SortOrder::Asc,
            },
        );
        assert_eq!(builder.sql(), "SELECT 1 ORDER BY p.price ASC, p.id ASC");
    }

    #[test]
    fn test_name_ordering_is_bytewise() {
        assert!(sort_column(SortField::Name).ends_with("COLLATE \"C\""));
        assert!(CATEGORY_ORDER.contains("name COLLATE \"C\" ASC"));
    }

    #[test]
    fn test_filters_bind_values() {
        let filter = ProductFilter {
            featured: Some(true),
            search: Some("lamp".into()),
            ..ProductFilter::default()
        };
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM catalog.product p");
        push_filters(&mut builder, &filter, Some(CategoryId::new(1)));

        let sql = builder.sql();
        assert!(sql.contains("p.category_id = $1"));
        assert!(sql.contains("p.featured = $2"));
        assert!(sql.contains("p.name ILIKE $3"));
        assert!(!sql.contains("lamp"));
    }
}
