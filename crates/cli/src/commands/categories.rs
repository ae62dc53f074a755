//! Category browsing commands.

use shopora_cli::ApiClient;
use shopora_cli::output::{self, Format, emit_as};
use shopora_core::query::CategoryProductParams;

/// `shopora categories list`
pub async fn list(
    client: &ApiClient,
    with_counts: bool,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = client.categories(with_counts).await?;
    emit_as(format, &response, || output::category_table(&response.categories))?;
    Ok(())
}

/// `shopora categories show`
pub async fn show(client: &ApiClient, slug: &str, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let response = client.category(slug).await?;
    emit_as(format, &response, || {
        output::category_detail(&response.category.category, response.category.product_count)
    })?;
    Ok(())
}

/// `shopora categories products`
pub async fn products(
    client: &ApiClient,
    slug: &str,
    params: &CategoryProductParams,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = client.category_products(slug, params).await?;
    emit_as(format, &response, || {
        format!(
            "{}\n\n{}\n{}",
            output::category_detail(&response.category, None).trim_end(),
            output::product_table(&response.products),
            output::pagination(&response.pagination)
        )
    })?;
    Ok(())
}
