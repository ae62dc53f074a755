//! Catalog query model.
//!
//! Raw query-string parameters come in as strings so that empty values can be
//! treated as absent and every parse failure surfaces as a [`QueryError`]
//! with a readable message. The parsed forms ([`ProductQuery`],
//! [`PageRequest`], [`Sort`]) are shared by both catalog backends.
//!
//! The memory backend evaluates queries with the pure functions in this
//! module; the PostgreSQL backend translates the same types into SQL.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::PriceRangeStats;
use crate::catalog::{Category, ProductRecord};
use crate::types::{CategoryId, Price};

/// Page size when none is requested.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default size of the featured products list.
pub const DEFAULT_FEATURED_LIMIT: u32 = 8;

/// Default number of search results.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Relevance weight of a name match.
pub const NAME_WEIGHT: u32 = 3;
/// Relevance weight of a tag match.
pub const TAG_WEIGHT: u32 = 2;
/// Relevance weight of a description match.
pub const DESCRIPTION_WEIGHT: u32 = 1;

/// Errors produced while parsing query parameters.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("page must be a positive integer")]
    InvalidPage,
    #[error("limit must be a positive integer")]
    InvalidLimit,
    #[error("unknown sort field: {0}")]
    InvalidSortField(String),
    #[error("sort order must be 'asc' or 'desc'")]
    InvalidSortOrder,
    #[error("{0} must be 'true' or 'false'")]
    InvalidFlag(&'static str),
    #[error("{0} must be a non-negative number")]
    InvalidPrice(&'static str),
    #[error("Search query is required")]
    MissingSearchTerm,
}

/// Treat missing, empty and whitespace-only values the same.
fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_flag(name: &'static str, value: Option<&String>) -> Result<Option<bool>, QueryError> {
    match present(value) {
        None => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(_) => Err(QueryError::InvalidFlag(name)),
    }
}

fn parse_price(name: &'static str, value: Option<&String>) -> Result<Option<Price>, QueryError> {
    present(value)
        .map(|v| v.parse::<Price>().map_err(|_| QueryError::InvalidPrice(name)))
        .transpose()
}

/// Parse a `limit` parameter, applying `default` and capping at
/// [`MAX_PAGE_SIZE`].
///
/// # Errors
///
/// Returns [`QueryError::InvalidLimit`] for zero or non-numeric input.
pub fn parse_limit(value: Option<&String>, default: u32) -> Result<u32, QueryError> {
    match present(value) {
        None => Ok(default),
        Some(raw) => match raw.parse::<u32>() {
            Ok(0) | Err(_) => Err(QueryError::InvalidLimit),
            Ok(limit) => Ok(limit.min(MAX_PAGE_SIZE)),
        },
    }
}

/// Product field a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Price,
    Name,
    Stock,
}

impl SortField {
    /// Query-string spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
            Self::Price => "price",
            Self::Name => "name",
            Self::Stock => "stock",
        }
    }
}

impl FromStr for SortField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(Self::CreatedAt),
            "updatedAt" => Ok(Self::UpdatedAt),
            "price" => Ok(Self::Price),
            "name" => Ok(Self::Name),
            "stock" => Ok(Self::Stock),
            other => Err(QueryError::InvalidSortField(other.to_owned())),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Query-string spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(QueryError::InvalidSortOrder),
        }
    }
}

/// Requested ordering; defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Sort {
    fn parse(field: Option<&String>, order: Option<&String>) -> Result<Self, QueryError> {
        Ok(Self {
            field: present(field).map(str::parse).transpose()?.unwrap_or_default(),
            order: present(order).map(str::parse).transpose()?.unwrap_or_default(),
        })
    }

    /// Compare two records; ties fall back to ascending ID.
    #[must_use]
    pub fn compare(&self, a: &ProductRecord, b: &ProductRecord) -> Ordering {
        let ordering = match self.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Price => a.price.cmp(&b.price),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Stock => a.stock.cmp(&b.stock),
        };
        let ordering = match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        };
        ordering.then_with(|| a.id.cmp(&b.id))
    }
}

/// A validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a page window from raw parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if `page` or `limit` is zero or not an integer.
    pub fn parse(page: Option<&String>, limit: Option<&String>) -> Result<Self, QueryError> {
        let page = match present(page) {
            None => 1,
            Some(raw) => match raw.parse::<u32>() {
                Ok(0) | Err(_) => return Err(QueryError::InvalidPage),
                Ok(page) => page,
            },
        };
        Ok(Self {
            page,
            limit: parse_limit(limit, DEFAULT_PAGE_SIZE)?,
        })
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size, already capped.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items to skip.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

/// Pagination block returned with every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_products: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Describe `page` within a collection of `total` items.
    #[must_use]
    pub const fn new(page: &PageRequest, total: u64) -> Self {
        let total_pages = total.div_ceil(page.limit as u64);
        Self {
            current_page: page.page,
            total_pages,
            total_products: total,
            has_next: (page.page as u64) < total_pages,
            has_prev: page.page > 1,
        }
    }
}

/// Product filters. All present filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Category slug; matched against active categories only.
    pub category: Option<String>,
    pub featured: Option<bool>,
    /// Case-insensitive substring over name, description and tags.
    pub search: Option<String>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
}

impl ProductFilter {
    /// Whether `record` passes every filter except the category slug.
    ///
    /// `category` is the already-resolved category ID, if the filter named one.
    #[must_use]
    pub fn matches(&self, record: &ProductRecord, category: Option<CategoryId>) -> bool {
        if category.is_some_and(|id| id != record.category_id) {
            return false;
        }
        if self.featured.is_some_and(|featured| featured != record.featured) {
            return false;
        }
        if self.min_price.is_some_and(|min| record.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| record.price > max) {
            return false;
        }
        self.search
            .as_deref()
            .is_none_or(|term| relevance(record, term) > 0)
    }
}

/// Raw parameters of `GET /api/products`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<String>,
}

/// A fully parsed product listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub filter: ProductFilter,
    pub sort: Sort,
    pub page: PageRequest,
}

impl ProductListParams {
    /// Validate and convert into a [`ProductQuery`].
    ///
    /// # Errors
    ///
    /// Returns the first parameter that fails to parse.
    pub fn parse(&self) -> Result<ProductQuery, QueryError> {
        Ok(ProductQuery {
            filter: ProductFilter {
                category: present(self.category.as_ref()).map(str::to_owned),
                featured: parse_flag("featured", self.featured.as_ref())?,
                search: present(self.search.as_ref()).map(str::to_owned),
                min_price: parse_price("minPrice", self.min_price.as_ref())?,
                max_price: parse_price("maxPrice", self.max_price.as_ref())?,
            },
            sort: Sort::parse(self.sort_by.as_ref(), self.sort_order.as_ref())?,
            page: PageRequest::parse(self.page.as_ref(), self.limit.as_ref())?,
        })
    }
}

/// Raw parameters of category-scoped product listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProductParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
}

impl CategoryProductParams {
    /// Validate into a sort and page window.
    ///
    /// # Errors
    ///
    /// Returns the first parameter that fails to parse.
    pub fn parse(&self) -> Result<(Sort, PageRequest), QueryError> {
        Ok((
            Sort::parse(self.sort_by.as_ref(), self.sort_order.as_ref())?,
            PageRequest::parse(self.page.as_ref(), self.limit.as_ref())?,
        ))
    }
}

/// Raw parameters of `GET /api/products/featured`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

/// Raw parameters of `GET /api/products/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

impl SearchParams {
    /// The trimmed search term and result limit.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MissingSearchTerm`] when `q` is absent or blank.
    pub fn parse(&self) -> Result<(String, u32), QueryError> {
        let term = present(self.q.as_ref()).ok_or(QueryError::MissingSearchTerm)?;
        Ok((
            term.to_owned(),
            parse_limit(self.limit.as_ref(), DEFAULT_SEARCH_LIMIT)?,
        ))
    }
}

/// Raw parameters of `GET /api/categories`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_product_count: Option<String>,
}

impl CategoryListParams {
    /// Whether product counts were requested.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidFlag`] for values other than `true`/`false`.
    pub fn include_product_count(&self) -> Result<bool, QueryError> {
        Ok(parse_flag("includeProductCount", self.include_product_count.as_ref())?.unwrap_or(false))
    }
}

/// Weighted substring relevance of `record` for `term`.
///
/// A name match scores [`NAME_WEIGHT`], a match in any tag [`TAG_WEIGHT`] and
/// a description match [`DESCRIPTION_WEIGHT`]. Zero means no match.
#[must_use]
pub fn relevance(record: &ProductRecord, term: &str) -> u32 {
    let term = term.to_lowercase();
    let mut score = 0;
    if record.name.to_lowercase().contains(&term) {
        score += NAME_WEIGHT;
    }
    if record.tags.iter().any(|t| t.to_lowercase().contains(&term)) {
        score += TAG_WEIGHT;
    }
    if record.description.to_lowercase().contains(&term) {
        score += DESCRIPTION_WEIGHT;
    }
    score
}

/// Active categories, ordered by sort order then name.
#[must_use]
pub fn active_categories(categories: &[Category]) -> Vec<&Category> {
    let mut active: Vec<_> = categories.iter().filter(|c| c.is_active).collect();
    active.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.name.cmp(&b.name))
    });
    active
}

/// Look up an active category by slug.
#[must_use]
pub fn find_active_category<'a>(categories: &'a [Category], slug: &str) -> Option<&'a Category> {
    categories.iter().find(|c| c.is_active && c.slug == *slug)
}

/// Evaluate a listing: filter, sort, then cut out the requested page.
///
/// An unknown or inactive category slug matches nothing.
#[must_use]
pub fn select_products<'a>(
    records: &'a [ProductRecord],
    categories: &[Category],
    query: &ProductQuery,
) -> (Vec<&'a ProductRecord>, Pagination) {
    let category = match query.filter.category.as_deref() {
        None => None,
        Some(slug) => match find_active_category(categories, slug) {
            Some(category) => Some(category.id),
            None => return (Vec::new(), Pagination::new(&query.page, 0)),
        },
    };

    let mut matched: Vec<_> = records
        .iter()
        .filter(|r| query.filter.matches(r, category))
        .collect();
    matched.sort_by(|a, b| query.sort.compare(a, b));
    paginate(matched, &query.page)
}

/// Slice one page out of an already ordered collection.
#[must_use]
pub fn paginate<T>(items: Vec<T>, page: &PageRequest) -> (Vec<T>, Pagination) {
    let pagination = Pagination::new(page, items.len() as u64);
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let items = items
        .into_iter()
        .skip(offset)
        .take(page.limit() as usize)
        .collect();
    (items, pagination)
}

/// Featured products, newest first.
#[must_use]
pub fn featured_products(records: &[ProductRecord], limit: u32) -> Vec<&ProductRecord> {
    let mut featured: Vec<_> = records.iter().filter(|r| r.featured).collect();
    featured.sort_by(|a, b| Sort::default().compare(a, b));
    featured.truncate(limit as usize);
    featured
}

/// Matches for `term` ordered by relevance, then newest first, then ID.
#[must_use]
pub fn search_products<'a>(
    records: &'a [ProductRecord],
    term: &str,
    limit: u32,
) -> Vec<&'a ProductRecord> {
    let mut scored: Vec<_> = records
        .iter()
        .map(|r| (relevance(r, term), r))
        .filter(|(score, _)| *score > 0)
        .collect();
    scored.sort_by(|(sa, a), (sb, b)| sb.cmp(sa).then_with(|| Sort::default().compare(a, b)));
    scored
        .into_iter()
        .take(limit as usize)
        .map(|(_, r)| r)
        .collect()
}

/// Min, max and average price over `prices`.
///
/// An empty catalog reports a 0-1000 range with a 50 average.
#[must_use]
pub fn price_stats(prices: impl IntoIterator<Item = Price>) -> PriceRangeStats {
    let mut count: u32 = 0;
    let mut min: Option<Price> = None;
    let mut max: Option<Price> = None;
    let mut sum = Decimal::ZERO;

    for price in prices {
        count += 1;
        sum += price.amount();
        min = Some(min.map_or(price, |m| m.min(price)));
        max = Some(max.map_or(price, |m| m.max(price)));
    }

    match (min, max) {
        (Some(min_price), Some(max_price)) => PriceRangeStats {
            min_price,
            max_price,
            avg_price: Price::new((sum / Decimal::from(count)).round_dp(2))
                .unwrap_or(Price::ZERO),
        },
        _ => PriceRangeStats::empty_catalog(),
    }
}
