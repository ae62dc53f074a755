//! HTTP client for the storefront API.
//!
//! Every method maps to one endpoint and returns the shared envelope type
//! from [`shopora_core::api`], so client and server agree on the wire shape.

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use shopora_core::ProductId;
use shopora_core::api::{
    CategoriesResponse, CategoryProductsResponse, CategoryResponse, ErrorBody, HealthResponse,
    PriceRangeStats, ProductListResponse, ProductResponse, ProductsResponse, ReadinessResponse,
};
use shopora_core::query::{CategoryListParams, CategoryProductParams, LimitParams, ProductListParams, SearchParams};

/// Base URL used when `SHOPORA_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Errors that can occur when talking to the storefront API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL cannot have path segments appended.
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// The `error` field of the body, or the status reason.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Typed client for the storefront JSON API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Create a client for the API rooted at `base` (e.g. `http://host:5000/api`).
    ///
    /// # Errors
    ///
    /// Returns an error if `base` cannot be used as a base URL or the HTTP
    /// client cannot be built.
    pub fn new(base: Url) -> Result<Self, ClientError> {
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base.to_string()));
        }
        let client = reqwest::Client::builder()
            .user_agent(concat!("shopora-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base })
    }

    /// Parse `base` and create a client for it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if `base` is not a valid URL.
    pub fn from_url(base: &str) -> Result<Self, ClientError> {
        let url = Url::parse(base).map_err(|e| ClientError::InvalidBaseUrl(format!("{base}: {e}")))?;
        Self::new(url)
    }

    /// The API base URL.
    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// Build the URL of an endpoint below the base, escaping each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T, Q>(&self, segments: &[&str], query: Option<&Q>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let mut url = self.endpoint(segments)?;
        if let Some(query) = query {
            append_query(&mut url, query)?;
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            tracing::debug!(%status, "API returned error status");
            Err(status_error(status, &body))
        }
    }

    /// `GET /products`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the query.
    #[instrument(skip(self))]
    pub async fn list_products(&self, params: &ProductListParams) -> Result<ProductListResponse, ClientError> {
        self.get(&["products"], Some(params)).await
    }

    /// `GET /products/featured`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn featured(&self, limit: Option<u32>) -> Result<ProductsResponse, ClientError> {
        let params = LimitParams {
            limit: limit.map(|l| l.to_string()),
        };
        self.get(&["products", "featured"], Some(&params)).await
    }

    /// `GET /products/search`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the term is blank.
    #[instrument(skip(self))]
    pub async fn search(&self, q: &str, limit: Option<u32>) -> Result<ProductsResponse, ClientError> {
        let params = SearchParams {
            q: Some(q.to_owned()),
            limit: limit.map(|l| l.to_string()),
        };
        self.get(&["products", "search"], Some(&params)).await
    }

    /// `GET /products/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the product does not exist.
    #[instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Result<ProductResponse, ClientError> {
        self.get::<_, ()>(&["products", &id.to_string()], None).await
    }

    /// `GET /products/category/{slug}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the category does not exist.
    #[instrument(skip(self))]
    pub async fn products_by_category(
        &self,
        slug: &str,
        params: &CategoryProductParams,
    ) -> Result<CategoryProductsResponse, ClientError> {
        self.get(&["products", "category", slug], Some(params)).await
    }

    /// `GET /products/price-range/stats`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn price_range(&self) -> Result<PriceRangeStats, ClientError> {
        self.get::<_, ()>(&["products", "price-range", "stats"], None)
            .await
    }

    /// `GET /categories`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self, include_product_count: bool) -> Result<CategoriesResponse, ClientError> {
        let params = CategoryListParams {
            include_product_count: include_product_count.then(|| "true".to_owned()),
        };
        self.get(&["categories"], Some(&params)).await
    }

    /// `GET /categories/{slug}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the category does not exist.
    #[instrument(skip(self))]
    pub async fn category(&self, slug: &str) -> Result<CategoryResponse, ClientError> {
        self.get::<_, ()>(&["categories", slug], None).await
    }

    /// `GET /categories/{slug}/products`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the category does not exist.
    #[instrument(skip(self))]
    pub async fn category_products(
        &self,
        slug: &str,
        params: &CategoryProductParams,
    ) -> Result<CategoryProductsResponse, ClientError> {
        self.get(&["categories", slug, "products"], Some(params)).await
    }

    /// `GET /health`
    ///
    /// # Errors
    ///
    /// Returns an error if the API is unreachable.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.get::<_, ()>(&["health"], None).await
    }

    /// `GET /health/ready`
    ///
    /// # Errors
    ///
    /// Returns an error if the API is unreachable or not ready.
    #[instrument(skip(self))]
    pub async fn ready(&self) -> Result<ReadinessResponse, ClientError> {
        self.get::<_, ()>(&["health", "ready"], None).await
    }
}

/// Append the fields of a flat parameter struct as query pairs.
fn append_query<Q: Serialize + ?Sized>(url: &mut Url, query: &Q) -> Result<(), ClientError> {
    let serde_json::Value::Object(fields) = serde_json::to_value(query)? else {
        return Ok(());
    };
    if fields.is_empty() {
        return Ok(());
    }

    let mut pairs = url.query_pairs_mut();
    for (key, value) in fields {
        match value {
            serde_json::Value::Null => {}
            serde_json::Value::String(s) => {
                pairs.append_pair(&key, &s);
            }
            other => {
                pairs.append_pair(&key, &other.to_string());
            }
        }
    }
    Ok(())
}

/// Build a [`ClientError::Status`] from an error response body.
fn status_error(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorBody>(body).map_or_else(
        |_| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned()
        },
        |b| b.error,
    );
    ClientError::Status { status, message }
}
