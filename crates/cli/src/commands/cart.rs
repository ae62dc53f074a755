//! Local cart commands.
//!
//! The cart lives in `<cart-dir>/cart.json`. Only `add` talks to the API, to
//! snapshot the product's name, price and image.

use serde::Serialize;

use shopora_cli::output::{self, Format, emit_as};
use shopora_cli::{ApiClient, FileStorage};
use shopora_core::cart::{Cart, CartLine, CartStorage};
use shopora_core::{Price, ProductId};

/// Cart contents as printed in JSON mode.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CartSummary<'a> {
    items: &'a [CartLine],
    total_items: u64,
    total_price: Price,
}

fn print<S: CartStorage>(cart: &Cart<S>, format: Format) -> Result<(), serde_json::Error> {
    let summary = CartSummary {
        items: cart.lines(),
        total_items: cart.total_items(),
        total_price: cart.total_price(),
    };
    emit_as(format, &summary, || {
        output::cart(summary.items, summary.total_items, summary.total_price)
    })
}

/// `shopora cart show`
pub fn show(storage: FileStorage, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let cart = Cart::load(storage)?;
    print(&cart, format)?;
    Ok(())
}

/// `shopora cart add`
pub async fn add(
    client: &ApiClient,
    storage: FileStorage,
    id: &str,
    quantity: u32,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let id: ProductId = id.parse()?;
    let product = client.product(id).await?.product;
    if !product.in_stock() {
        return Err(format!("{} is out of stock", product.name).into());
    }

    let mut cart = Cart::load(storage)?;
    cart.add(&product, quantity)?;
    tracing::info!(product = %product.name, quantity, "Added to cart");
    print(&cart, format)?;
    Ok(())
}

/// `shopora cart set`
pub fn set(
    storage: FileStorage,
    id: &str,
    quantity: u32,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let id: ProductId = id.parse()?;
    let mut cart = Cart::load(storage)?;
    if cart.line(id).is_none() {
        tracing::warn!(%id, "Product is not in the cart");
    }
    cart.set_quantity(id, quantity)?;
    print(&cart, format)?;
    Ok(())
}

/// `shopora cart remove`
pub fn remove(storage: FileStorage, id: &str, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let id: ProductId = id.parse()?;
    let mut cart = Cart::load(storage)?;
    cart.remove(id)?;
    print(&cart, format)?;
    Ok(())
}

/// `shopora cart clear`
pub fn clear(storage: FileStorage, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let mut cart = Cart::load(storage)?;
    cart.clear()?;
    print(&cart, format)?;
    Ok(())
}
