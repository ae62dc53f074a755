//! Client-side shopping cart.
//!
//! A [`Cart`] owns its line items and writes the whole list back to its
//! [`CartStorage`] after every mutation. Storage is a plain string key/value
//! store holding a JSON array under [`CART_STORAGE_KEY`], the same layout a
//! browser client keeps in local storage.

use std::collections::HashMap;
use std::io;

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{Price, ProductId};

/// Storage key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "cart";

/// Errors from cart persistence.
#[derive(thiserror::Error, Debug)]
pub enum CartError {
    #[error("cart storage error: {0}")]
    Storage(#[from] io::Error),

    #[error("failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key/value string storage for client state.
pub trait CartStorage {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// In-process storage; contents live as long as the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// One product in the cart with a snapshot of its name, price and image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: Option<String>,
    pub quantity: u32,
}

impl CartLine {
    /// Price of the line: unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price * self.quantity
    }
}

/// Enforce one line per product with a quantity of at least one.
fn normalize(stored: Vec<CartLine>) -> Vec<CartLine> {
    let mut lines: Vec<CartLine> = Vec::with_capacity(stored.len());
    for line in stored {
        if line.quantity == 0 {
            continue;
        }
        match lines.iter_mut().find(|existing| existing.id == line.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => lines.push(line),
        }
    }
    lines
}

/// Cart state backed by `S`.
#[derive(Debug)]
pub struct Cart<S> {
    storage: S,
    lines: Vec<CartLine>,
}

impl<S: CartStorage> Cart<S> {
    /// Rehydrate the cart from `storage`.
    ///
    /// Missing data starts an empty cart. Data that does not parse is logged
    /// and discarded. Lines with a zero quantity are dropped and repeated
    /// product IDs are merged into the first line.
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage itself cannot be read.
    pub fn load(storage: S) -> Result<Self, CartError> {
        let lines = match storage.get(CART_STORAGE_KEY)? {
            None => Vec::new(),
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable cart data");
                Vec::new()
            }),
        };
        Ok(Self {
            storage,
            lines: normalize(lines),
        })
    }

    /// Current line items in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Look up the line for `id`.
    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// Add `quantity` of `product`, merging into an existing line.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Ok(());
        }

        if let Some(line) = self.lines.iter_mut().find(|line| line.id == product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine {
                id: product.id,
                name: product.name.clone(),
                price: product.price,
                image: product.primary_image().map(str::to_owned),
                quantity,
            });
        }

        self.persist()
    }

    /// Set the quantity of an existing line; zero removes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn set_quantity(&mut self, id: ProductId, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove(id);
        }

        match self.lines.iter_mut().find(|line| line.id == id) {
            Some(line) => line.quantity = quantity,
            None => return Ok(()),
        }

        self.persist()
    }

    /// Remove the line for `id`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn remove(&mut self, id: ProductId) -> Result<(), CartError> {
        self.lines.retain(|line| line.id != id);
        self.persist()
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.lines.clear();
        self.persist()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of all line subtotals.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Consume the cart and hand back its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) -> Result<(), CartError> {
        let json = serde_json::to_string(&self.lines)?;
        self.storage.set(CART_STORAGE_KEY, &json)?;
        tracing::debug!(lines = self.lines.len(), "Cart saved");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn product(id: i32, cents: u32) -> Product {
        let categories = fixtures::categories();
        let mut product = fixtures::product_records()
            .into_iter()
            .next()
            .unwrap()
            .resolve(&categories);
        product.id = ProductId::new(id);
        product.price = Price::from_cents(cents);
        product
    }

    fn empty_cart() -> Cart<MemoryStorage> {
        Cart::load(MemoryStorage::new()).unwrap()
    }

    #[test]
    fn test_add_same_product_twice_merges() {
        let mut cart = empty_cart();
        let lamp = product(1, 8999);
        cart.add(&lamp, 1).unwrap();
        cart.add(&lamp, 1).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(lamp.id).unwrap().quantity, 2);
    }

    #[test]
    fn test_add_snapshots_product() {
        let mut cart = empty_cart();
        let lamp = product(1, 8999);
        cart.add(&lamp, 3).unwrap();

        let line = cart.line(lamp.id).unwrap();
        assert_eq!(line.name, "Minimalist Desk Lamp");
        assert_eq!(line.image.as_deref(), lamp.primary_image());
        assert_eq!(line.quantity, 3);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = empty_cart();
        cart.add(&product(1, 100), 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = empty_cart();
        cart.add(&product(1, 100), 4).unwrap();
        cart.set_quantity(ProductId::new(1), 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_unknown_is_noop() {
        let mut cart = empty_cart();
        cart.add(&product(1, 100), 1).unwrap();
        cart.set_quantity(ProductId::new(2), 5).unwrap();
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_quantity_saturates() {
        let mut cart = empty_cart();
        let item = product(1, 1);
        cart.add(&item, u32::MAX).unwrap();
        cart.add(&item, 10).unwrap();
        assert_eq!(cart.line(item.id).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_totals() {
        let mut cart = empty_cart();
        cart.add(&product(1, 1000), 2).unwrap();
        cart.add(&product(2, 500), 1).unwrap();

        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), Price::from_cents(2500));
    }

    #[test]
    fn test_every_mutation_persists() {
        let mut cart = empty_cart();
        cart.add(&product(1, 1000), 2).unwrap();
        cart.add(&product(2, 500), 1).unwrap();
        cart.remove(ProductId::new(1)).unwrap();

        let storage = cart.into_storage();
        let raw = storage.get(CART_STORAGE_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["id"], 2);
        assert_eq!(json[0]["price"], serde_json::json!(5.0));
        assert_eq!(json[0]["quantity"], 1);

        let reloaded = Cart::load(storage).unwrap();
        assert_eq!(reloaded.total_items(), 1);
    }

    #[test]
    fn test_corrupt_storage_loads_empty() {
        let mut storage = MemoryStorage::new();
        storage.set(CART_STORAGE_KEY, "{not json").unwrap();

        let cart = Cart::load(storage).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cart = empty_cart();
        cart.add(&product(1, 1000), 2).unwrap();
        cart.clear().unwrap();

        assert_eq!(cart.total_price(), Price::ZERO);
        let raw = cart.into_storage().get(CART_STORAGE_KEY).unwrap();
        assert_eq!(raw.as_deref(), Some("[]"));
    }

    #[test]
    fn test_load_drops_empty_and_merges_duplicates() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                CART_STORAGE_KEY,
                r#"[
                    {"id":1,"name":"Lamp","price":10.0,"image":null,"quantity":0},
                    {"id":2,"name":"Pad","price":5.0,"image":null,"quantity":1},
                    {"id":2,"name":"Pad","price":5.0,"image":null,"quantity":2}
                ]"#,
            )
            .unwrap();

        let cart = Cart::load(storage).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert!(cart.lines().iter().all(|line| line.quantity >= 1));
        assert_eq!(cart.line(ProductId::new(2)).unwrap().quantity, 3);
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_huge_totals_saturate() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                CART_STORAGE_KEY,
                r#"[{"id":1,"name":"Lamp","price":1e20,"image":null,"quantity":4294967295}]"#,
            )
            .unwrap();

        let cart = Cart::load(storage).unwrap();
        assert_eq!(cart.total_price().amount(), rust_decimal::Decimal::MAX);
    }
}
