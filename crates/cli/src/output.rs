//! Plain-text and JSON rendering for command output.

use std::fmt::Write as _;

use serde::Serialize;

use shopora_core::api::{CategoryView, PriceRangeStats};
use shopora_core::cart::CartLine;
use shopora_core::checkout::OrderConfirmation;
use shopora_core::query::Pagination;
use shopora_core::{Category, Price, Product};

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// Write rendered output to stdout.
#[allow(clippy::print_stdout)]
pub fn emit(text: &str) {
    println!("{}", text.trim_end());
}

/// Write `value` as pretty JSON, or `text()` in text mode.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized.
pub fn emit_as<T: Serialize>(
    format: Format,
    value: &T,
    text: impl FnOnce() -> String,
) -> Result<(), serde_json::Error> {
    match format {
        Format::Json => emit(&serde_json::to_string_pretty(value)?),
        Format::Text => emit(&text()),
    }
    Ok(())
}

/// One line per product.
#[must_use]
pub fn product_table(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products found.".to_owned();
    }

    let mut out = String::new();
    for product in products {
        let category = product.category.as_ref().map_or("-", |c| c.name.as_str());
        let _ = write!(
            out,
            "#{:<4} {:<34} {:>10}  {:<12} stock {:<4}",
            product.id.to_string(),
            product.name,
            product.price.to_string(),
            category,
            product.stock,
        );
        if product.featured {
            out.push_str(" *featured*");
        }
        out.push('\n');
    }
    out
}

/// Product detail view.
#[must_use]
pub fn product_detail(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", product.name, product.id);
    let _ = writeln!(out, "Price:    {}", product.price);
    if let Some(category) = &product.category {
        let _ = writeln!(out, "Category: {} ({})", category.name, category.slug);
    }
    let _ = writeln!(
        out,
        "Stock:    {}",
        if product.in_stock() {
            product.stock.to_string()
        } else {
            "out of stock".to_owned()
        }
    );
    if !product.tags.is_empty() {
        let _ = writeln!(out, "Tags:     {}", product.tags.join(", "));
    }
    let _ = writeln!(out, "\n{}", product.description);
    if !product.specifications.is_empty() {
        out.push_str("\nSpecifications:\n");
        for (key, value) in &product.specifications {
            let _ = writeln!(out, "  {key}: {value}");
        }
    }
    out
}

#[must_use]
pub fn pagination(pagination: &Pagination) -> String {
    let mut out = format!(
        "Page {}/{} ({} products)",
        pagination.current_page, pagination.total_pages, pagination.total_products
    );
    if pagination.has_next {
        out.push_str(" - more with --page ");
        out.push_str(&(pagination.current_page + 1).to_string());
    }
    out
}

/// One line per category.
#[must_use]
pub fn category_table(categories: &[CategoryView]) -> String {
    if categories.is_empty() {
        return "No categories found.".to_owned();
    }

    let mut out = String::new();
    for view in categories {
        let _ = write!(out, "{:<16} {:<16}", view.category.slug.as_str(), view.category.name);
        if let Some(count) = view.product_count {
            let _ = write!(out, " {count:>3} products");
        }
        out.push('\n');
    }
    out
}

#[must_use]
pub fn category_detail(category: &Category, product_count: Option<u64>) -> String {
    let mut out = format!("{} ({})\n{}\n", category.name, category.slug, category.description);
    if let Some(count) = product_count {
        let _ = writeln!(out, "{count} products");
    }
    out
}

#[must_use]
pub fn price_range(stats: &PriceRangeStats) -> String {
    format!(
        "Min: {}\nMax: {}\nAvg: {}",
        stats.min_price, stats.max_price, stats.avg_price
    )
}

/// Cart contents with subtotals and totals.
#[must_use]
pub fn cart(lines: &[CartLine], total_items: u64, total_price: Price) -> String {
    if lines.is_empty() {
        return "Your cart is empty.".to_owned();
    }

    let mut out = String::new();
    for line in lines {
        let _ = writeln!(
            out,
            "#{:<4} {:<34} {:>3} x {:>10} = {:>10}",
            line.id.to_string(),
            line.name,
            line.quantity,
            line.price.to_string(),
            line.subtotal().to_string(),
        );
    }
    let _ = write!(out, "\n{total_items} items, total {total_price}");
    out
}

#[must_use]
pub fn confirmation(order: &OrderConfirmation) -> String {
    format!(
        "Order placed successfully!\nOrder number: {}\nItems: {}\nTotal: {}\nPlaced at: {}",
        order.order_number,
        order.item_count,
        order.total,
        order.placed_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}
