//! Mock checkout command.
//!
//! Reads the shipping and payment form from a YAML file (JSON also parses),
//! places the order against the local cart and clears it. Nothing is sent
//! to the API.
//!
//! ```yaml
//! firstName: Ada
//! lastName: Lovelace
//! email: ada@example.com
//! phone: 555-0100
//! address: 12 Analytical Way
//! city: London
//! state: LDN
//! zipCode: "10001"
//! cardNumber: "4242 4242 4242 4242"
//! cardName: Ada Lovelace
//! expiryDate: "12/30"
//! cvv: "123"
//! ```

use std::path::Path;

use chrono::Utc;

use shopora_cli::FileStorage;
use shopora_cli::output::{self, Format, emit_as};
use shopora_core::cart::Cart;
use shopora_core::checkout::{CheckoutError, CheckoutForm, place_order};

/// Parse a checkout form file.
async fn read_form(path: &Path) -> Result<CheckoutForm, Box<dyn std::error::Error>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    Ok(serde_yaml::from_str(&content)?)
}

/// `shopora checkout --form <file>`
pub async fn run(storage: FileStorage, form: &Path, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let form = read_form(form).await?;
    let mut cart = Cart::load(storage)?;

    match place_order(&mut cart, &form, Utc::now()) {
        Ok(order) => {
            emit_as(format, &order, || output::confirmation(&order))?;
            Ok(())
        }
        Err(CheckoutError::MissingFields(missing)) => {
            for field in &missing {
                tracing::error!(field = field.field, "{}", field.message);
            }
            Err(CheckoutError::MissingFields(missing).into())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use shopora_core::fixtures;

    const FORM: &str = r#"
firstName: Ada
lastName: Lovelace
email: ada@example.com
phone: 555-0100
address: 12 Analytical Way
city: London
state: LDN
zipCode: "10001"
cardNumber: "4242 4242 4242 4242"
cardName: Ada Lovelace
expiryDate: "12/30"
cvv: "123"
"#;

    #[tokio::test]
    async fn test_checkout_clears_cart() {
        let dir = tempfile::tempdir().unwrap();
        let form_path = dir.path().join("form.yaml");
        std::fs::write(&form_path, FORM).unwrap();

        let cart_dir = dir.path().join("cart");
        let product = fixtures::product_records()[0].resolve(&fixtures::categories());
        let mut cart = Cart::load(FileStorage::new(&cart_dir)).unwrap();
        cart.add(&product, 1).unwrap();
        drop(cart);

        run(FileStorage::new(&cart_dir), &form_path, Format::Json)
            .await
            .unwrap();

        let cart = Cart::load(FileStorage::new(&cart_dir)).unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_form_defaults_country() {
        let dir = tempfile::tempdir().unwrap();
        let form_path = dir.path().join("form.yaml");
        std::fs::write(&form_path, FORM).unwrap();

        let form = read_form(&form_path).await.unwrap();
        assert_eq!(form.country(), "United States");
        assert!(form.missing_fields().is_empty());
    }

    #[tokio::test]
    async fn test_incomplete_form_keeps_cart() {
        let dir = tempfile::tempdir().unwrap();
        let form_path = dir.path().join("form.yaml");
        std::fs::write(&form_path, "firstName: Ada\n").unwrap();

        let product = fixtures::product_records()[0].resolve(&fixtures::categories());
        let mut cart = Cart::load(FileStorage::new(dir.path())).unwrap();
        cart.add(&product, 2).unwrap();
        drop(cart);

        let err = run(FileStorage::new(dir.path()), &form_path, Format::Text)
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("missing required fields"));

        let cart = Cart::load(FileStorage::new(dir.path())).unwrap();
        assert_eq!(cart.total_items(), 2);
    }

    #[tokio::test]
    async fn test_empty_cart() {
        let dir = tempfile::tempdir().unwrap();
        let form_path = dir.path().join("form.yaml");
        std::fs::write(&form_path, FORM).unwrap();

        let err = run(FileStorage::new(dir.path().join("cart")), &form_path, Format::Text)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "cart is empty");
    }
}
