//! Mock checkout.
//!
//! There is no payment gateway and nothing is sent to the server. Placing an
//! order checks the form for required fields, captures the cart totals,
//! fabricates an order number and empties the cart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartError, CartStorage};
use crate::types::Price;

/// Country used when the form leaves it blank.
pub const DEFAULT_COUNTRY: &str = "United States";

/// Shipping and payment details entered by the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub apartment: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub card_number: String,
    pub card_name: String,
    pub expiry_date: String,
    pub cvv: String,
    pub order_notes: Option<String>,
}

impl Default for CheckoutForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            apartment: None,
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: DEFAULT_COUNTRY.to_owned(),
            card_number: String::new(),
            card_name: String::new(),
            expiry_date: String::new(),
            cvv: String::new(),
            order_notes: None,
        }
    }
}

/// A required form field left blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MissingField {
    /// Form key, as spelled in the serialized form.
    pub field: &'static str,
    pub message: &'static str,
}

impl CheckoutForm {
    /// Every required field that is empty after trimming, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<MissingField> {
        [
            ("firstName", &self.first_name, "First name is required"),
            ("lastName", &self.last_name, "Last name is required"),
            ("email", &self.email, "Email is required"),
            ("phone", &self.phone, "Phone number is required"),
            ("address", &self.address, "Address is required"),
            ("city", &self.city, "City is required"),
            ("state", &self.state, "State is required"),
            ("zipCode", &self.zip_code, "ZIP code is required"),
            ("cardNumber", &self.card_number, "Card number is required"),
            ("cardName", &self.card_name, "Name on card is required"),
            ("expiryDate", &self.expiry_date, "Expiry date is required"),
            ("cvv", &self.cvv, "CVV is required"),
        ]
        .into_iter()
        .filter(|(_, value, _)| value.trim().is_empty())
        .map(|(field, _, message)| MissingField { field, message })
        .collect()
    }

    /// Country to ship to, falling back to [`DEFAULT_COUNTRY`].
    #[must_use]
    pub fn country(&self) -> &str {
        let country = self.country.trim();
        if country.is_empty() {
            DEFAULT_COUNTRY
        } else {
            country
        }
    }
}

/// Reasons an order cannot be placed.
#[derive(thiserror::Error, Debug)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("missing required fields: {}", .0.iter().map(|f| f.field).collect::<Vec<_>>().join(", "))]
    MissingFields(Vec<MissingField>),

    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Result of a successful mock checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_number: String,
    pub placed_at: DateTime<Utc>,
    pub item_count: u64,
    pub total: Price,
}

/// Order number for an order placed at `at`: `ORD-` and the last eight
/// digits of the Unix time in milliseconds.
#[must_use]
pub fn order_number(at: DateTime<Utc>) -> String {
    format!("ORD-{:08}", at.timestamp_millis().rem_euclid(100_000_000))
}

/// Place an order for everything in `cart`, then clear it.
///
/// The cart is left untouched when validation fails.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] for an empty cart,
/// [`CheckoutError::MissingFields`] listing every blank required field, or a
/// storage error if the cleared cart cannot be saved.
pub fn place_order<S: CartStorage>(
    cart: &mut Cart<S>,
    form: &CheckoutForm,
    at: DateTime<Utc>,
) -> Result<OrderConfirmation, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let missing = form.missing_fields();
    if !missing.is_empty() {
        return Err(CheckoutError::MissingFields(missing));
    }

    let confirmation = OrderConfirmation {
        order_number: order_number(at),
        placed_at: at,
        item_count: cart.total_items(),
        total: cart.total_price(),
    };
    cart.clear()?;

    tracing::info!(
        order_number = %confirmation.order_number,
        items = confirmation.item_count,
        total = %confirmation.total,
        "Order placed"
    );
    Ok(confirmation)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::cart::MemoryStorage;
    use crate::fixtures;

    fn complete_form() -> CheckoutForm {
        CheckoutForm {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "555-0100".into(),
            address: "12 Analytical Way".into(),
            city: "London".into(),
            state: "LDN".into(),
            zip_code: "10001".into(),
            card_number: "4242 4242 4242 4242".into(),
            card_name: "A Lovelace".into(),
            expiry_date: "12/30".into(),
            cvv: "123".into(),
            ..CheckoutForm::default()
        }
    }

    fn filled_cart() -> Cart<MemoryStorage> {
        let categories = fixtures::categories();
        let mut cart = Cart::load(MemoryStorage::new()).unwrap();
        for record in fixtures::product_records().iter().take(2) {
            cart.add(&record.resolve(&categories), 2).unwrap();
        }
        cart
    }

    #[test]
    fn test_order_number_last_eight_digits() {
        let at = Utc.timestamp_millis_opt(1_705_312_345_678).unwrap();
        assert_eq!(order_number(at), "ORD-12345678");

        let at = Utc.timestamp_millis_opt(1_700_000_000_042).unwrap();
        assert_eq!(order_number(at), "ORD-00000042");
    }

    #[test]
    fn test_place_order_clears_cart() {
        let mut cart = filled_cart();
        let total = cart.total_price();
        let at = Utc::now();

        let confirmation = place_order(&mut cart, &complete_form(), at).unwrap();
        assert_eq!(confirmation.item_count, 4);
        assert_eq!(confirmation.total, total);
        assert_eq!(confirmation.placed_at, at);
        assert!(confirmation.order_number.starts_with("ORD-"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_empty_cart_rejected() {
        let mut cart = Cart::load(MemoryStorage::new()).unwrap();
        let err = place_order(&mut cart, &complete_form(), Utc::now()).unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let mut cart = filled_cart();
        let form = CheckoutForm {
            email: "  ".into(),
            cvv: String::new(),
            ..complete_form()
        };

        let err = place_order(&mut cart, &form, Utc::now()).unwrap_err();
        let CheckoutError::MissingFields(missing) = err else {
            panic!("expected missing fields, got {err:?}");
        };
        let fields: Vec<_> = missing.iter().map(|f| f.field).collect();
        assert_eq!(fields, ["email", "cvv"]);
        assert_eq!(cart.total_items(), 4);
    }

    #[test]
    fn test_optional_fields_and_country_default() {
        let form: CheckoutForm = serde_json::from_value(serde_json::json!({
            "firstName": "Ada",
        }))
        .unwrap();
        assert_eq!(form.country(), DEFAULT_COUNTRY);
        assert!(form.apartment.is_none());
        assert!(form.order_notes.is_none());
        assert_eq!(form.missing_fields().len(), 11);
    }
}
