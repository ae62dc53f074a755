//! Product browsing commands.

use shopora_cli::output::{self, Format, emit_as};
use shopora_cli::ApiClient;
use shopora_core::ProductId;
use shopora_core::query::{CategoryProductParams, ProductListParams};

use crate::PageArgs;

/// Build listing parameters from command-line filters.
pub fn list_params(
    page: &PageArgs,
    category: Option<String>,
    featured: Option<bool>,
    search: Option<String>,
    min_price: Option<String>,
    max_price: Option<String>,
) -> ProductListParams {
    ProductListParams {
        page: page.page.map(|p| p.to_string()),
        limit: page.limit.map(|l| l.to_string()),
        category,
        featured: featured.map(|f| f.to_string()),
        search,
        sort_by: page.sort_by.clone(),
        sort_order: page.sort_order.clone(),
        min_price,
        max_price,
    }
}

/// `shopora products list`
pub async fn list(
    client: &ApiClient,
    params: &ProductListParams,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = client.list_products(params).await?;
    emit_as(format, &response, || {
        format!(
            "{}\n{}",
            output::product_table(&response.products),
            output::pagination(&response.pagination)
        )
    })?;
    Ok(())
}

/// `shopora products show`
pub async fn show(client: &ApiClient, id: &str, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let id: ProductId = id.parse()?;
    let response = client.product(id).await?;
    emit_as(format, &response, || output::product_detail(&response.product))?;
    Ok(())
}

/// `shopora products featured`
pub async fn featured(
    client: &ApiClient,
    limit: Option<u32>,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = client.featured(limit).await?;
    emit_as(format, &response, || output::product_table(&response.products))?;
    Ok(())
}

/// `shopora products search`
pub async fn search(
    client: &ApiClient,
    query: &str,
    limit: Option<u32>,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = client.search(query, limit).await?;
    emit_as(format, &response, || output::product_table(&response.products))?;
    Ok(())
}

/// `shopora products category`
pub async fn by_category(
    client: &ApiClient,
    slug: &str,
    params: &CategoryProductParams,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = client.products_by_category(slug, params).await?;
    emit_as(format, &response, || {
        format!(
            "{}\n\n{}\n{}",
            response.category.name,
            output::product_table(&response.products),
            output::pagination(&response.pagination)
        )
    })?;
    Ok(())
}

/// `shopora products price-range`
pub async fn price_range(client: &ApiClient, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let stats = client.price_range().await?;
    emit_as(format, &stats, || output::price_range(&stats))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_from_flags() {
        let page = PageArgs {
            page: Some(2),
            limit: None,
            sort_by: Some("price".to_owned()),
            sort_order: Some("asc".to_owned()),
        };
        let params = list_params(&page, Some("furniture".to_owned()), Some(false), None, Some("15".to_owned()), None);

        assert_eq!(params.page.as_deref(), Some("2"));
        assert_eq!(params.limit, None);
        assert_eq!(params.featured.as_deref(), Some("false"));
        assert_eq!(params.category.as_deref(), Some("furniture"));
        assert_eq!(params.min_price.as_deref(), Some("15"));

        let query = params.parse().unwrap();
        assert_eq!(query.page.page(), 2);
        assert_eq!(query.filter.featured, Some(false));
    }
}
