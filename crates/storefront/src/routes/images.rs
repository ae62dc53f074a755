//! SVG placeholder cards and image URL rewriting.
//!
//! Demo deployments often have no image host. When placeholder images are
//! enabled, every product and category image URL in an API response is
//! replaced with a link to one of the card endpoints below.

use axum::{
    extract::State,
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::IntoResponse,
};
use url::Url;

use shopora_core::{Category, Product, ProductId};

use crate::error::{AppError, Result};
use crate::extract::ApiPath;
use crate::state::AppState;

const BRAND: &str = "SHOPORA";
const TAGLINE: &str = "Minimal Commerce";

/// Escape text for use inside SVG markup.
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render an 800x800 card with a title, an optional subtitle and the brand.
#[must_use]
pub fn render_card(title: &str, subtitle: Option<&str>) -> String {
    let subtitle = subtitle
        .filter(|s| !s.is_empty())
        .map(|s| {
            format!(
                r##"<text x="50%" y="54%" text-anchor="middle" font-family="Helvetica, Arial, sans-serif" font-size="22" font-weight="500" fill="#6b7280">{}</text>"##,
                escape_xml(s)
            )
        })
        .unwrap_or_default();

    format!(
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="800" height="800" viewBox="0 0 800 800">
<defs><linearGradient id="g" x1="0" y1="0" x2="1" y2="1"><stop offset="0%" stop-color="#f3f4f6"/><stop offset="100%" stop-color="#e5e7eb"/></linearGradient></defs>
<rect width="800" height="800" rx="48" fill="url(#g)"/>
<text x="50%" y="46%" text-anchor="middle" font-family="Helvetica, Arial, sans-serif" font-size="42" font-weight="700" fill="#111827">{title}</text>
{subtitle}
<text x="50%" y="70%" text-anchor="middle" font-family="Helvetica, Arial, sans-serif" font-size="18" font-weight="600" fill="#9ca3af" letter-spacing="6">{BRAND}</text>
</svg>
"##,
        title = escape_xml(title),
    )
}

fn svg(body: String) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "image/svg+xml"), (CACHE_CONTROL, "no-store")],
        body,
    )
}

/// Generic placeholder card.
pub async fn placeholder() -> impl IntoResponse {
    svg(render_card(BRAND, Some(TAGLINE)))
}

/// Card for one product image slot.
#[tracing::instrument(skip(state))]
pub async fn product_image(
    State(state): State<AppState>,
    ApiPath((id, index)): ApiPath<(String, u32)>,
) -> Result<impl IntoResponse> {
    let id: ProductId = id.parse()?;
    let product = state
        .catalog()
        .product(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let subtitle = product.category.as_ref().map(|c| c.name.as_str());
    Ok(svg(render_card(&product.name, subtitle)))
}

/// Card for a category.
#[tracing::instrument(skip(state))]
pub async fn category_image(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<impl IntoResponse> {
    let category = state
        .catalog()
        .active_category(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    Ok(svg(render_card(&category.name, Some(&category.description))))
}

/// Rewrites image URLs to the placeholder endpoints under a public base URL.
#[derive(Debug, Clone)]
pub struct ImageRewriter {
    base: String,
}

impl ImageRewriter {
    #[must_use]
    pub fn new(public_url: &Url) -> Self {
        Self {
            base: public_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    /// Point every image slot at its card. A product without images gets one.
    pub fn product(&self, product: &mut Product) {
        let slots = product.images.len().max(1);
        product.images = (0..slots)
            .map(|index| format!("{}/api/images/products/{}/{index}", self.base, product.id))
            .collect();
    }

    pub fn category(&self, category: &mut Category) {
        category.image = Some(format!("{}/api/images/categories/{}", self.base, category.slug));
    }
}

/// The rewriter to apply to responses, if placeholder images are enabled.
#[must_use]
pub fn rewriter(state: &AppState) -> Option<ImageRewriter> {
    let config = state.config();
    config
        .placeholder_images
        .then(|| ImageRewriter::new(&config.public_url))
}

/// Apply placeholder URLs to a batch of products when enabled.
#[must_use]
pub fn present_products(state: &AppState, mut products: Vec<Product>) -> Vec<Product> {
    if let Some(rewriter) = rewriter(state) {
        products.iter_mut().for_each(|p| rewriter.product(p));
    }
    products
}

/// Apply placeholder URLs to one product when enabled.
#[must_use]
pub fn present_product(state: &AppState, mut product: Product) -> Product {
    if let Some(rewriter) = rewriter(state) {
        rewriter.product(&mut product);
    }
    product
}

/// Apply a placeholder URL to a category when enabled.
#[must_use]
pub fn present_category(state: &AppState, mut category: Category) -> Category {
    if let Some(rewriter) = rewriter(state) {
        rewriter.category(&mut category);
    }
    category
}
