//! End-to-end shopping: browse over HTTP, fill a cart, check out.

#![allow(clippy::unwrap_used)]

use chrono::{TimeZone, Utc};

use shopora_cli::FileStorage;
use shopora_core::cart::{Cart, MemoryStorage};
use shopora_core::checkout::{CheckoutError, CheckoutForm, place_order};
use shopora_core::{Price, ProductId};
use shopora_integration_tests::TestServer;

fn complete_form() -> CheckoutForm {
    CheckoutForm {
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        email: "ada@example.com".to_owned(),
        phone: "555-0100".to_owned(),
        address: "12 Analytical Way".to_owned(),
        city: "London".to_owned(),
        state: "LDN".to_owned(),
        zip_code: "10001".to_owned(),
        card_number: "4242 4242 4242 4242".to_owned(),
        card_name: "Ada Lovelace".to_owned(),
        expiry_date: "12/30".to_owned(),
        cvv: "123".to_owned(),
        ..CheckoutForm::default()
    }
}

#[tokio::test]
async fn test_browse_add_and_checkout() {
    let server = TestServer::memory().await.unwrap();
    let client = server.client().unwrap();

    let featured = client.featured(Some(2)).await.unwrap().products;
    assert_eq!(featured.len(), 2);

    let mut cart = Cart::load(MemoryStorage::new()).unwrap();
    for product in &featured {
        let fetched = client.product(product.id).await.unwrap().product;
        cart.add(&fetched, 1).unwrap();
    }
    cart.add(&featured[0], 1).unwrap();

    assert_eq!(cart.lines().len(), 2);
    assert_eq!(cart.line(featured[0].id).unwrap().quantity, 2);
    assert_eq!(cart.total_items(), 3);

    let expected = featured[0].price.amount() * rust_decimal::Decimal::from(2) + featured[1].price.amount();
    assert_eq!(cart.total_price().amount(), expected);

    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let order = place_order(&mut cart, &complete_form(), at).unwrap();
    assert!(order.order_number.starts_with("ORD-"));
    assert_eq!(order.item_count, 3);
    assert_eq!(order.total.amount(), expected);
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_set_quantity_zero_removes_line() {
    let server = TestServer::memory().await.unwrap();
    let client = server.client().unwrap();

    let product = client.product(ProductId::new(1)).await.unwrap().product;
    let mut cart = Cart::load(MemoryStorage::new()).unwrap();
    cart.add(&product, 3).unwrap();
    cart.set_quantity(product.id, 0).unwrap();

    assert!(cart.is_empty());
    assert_eq!(cart.total_price(), Price::ZERO);
}

#[tokio::test]
async fn test_cart_survives_reload() {
    let server = TestServer::memory().await.unwrap();
    let client = server.client().unwrap();
    let dir = tempfile::tempdir().unwrap();

    let results = client.search("lamp", Some(1)).await.unwrap().products;
    let lamp = &results[0];

    let mut cart = Cart::load(FileStorage::new(dir.path())).unwrap();
    cart.add(lamp, 2).unwrap();
    drop(cart);

    let reloaded = Cart::load(FileStorage::new(dir.path())).unwrap();
    let line = reloaded.line(lamp.id).unwrap();
    assert_eq!(line.quantity, 2);
    assert_eq!(line.name, lamp.name);
    assert_eq!(line.price, lamp.price);
}

#[tokio::test]
async fn test_incomplete_checkout_keeps_cart() {
    let server = TestServer::memory().await.unwrap();
    let client = server.client().unwrap();

    let product = client.product(ProductId::new(2)).await.unwrap().product;
    let mut cart = Cart::load(MemoryStorage::new()).unwrap();
    cart.add(&product, 1).unwrap();

    let form = CheckoutForm {
        email: String::new(),
        cvv: "  ".to_owned(),
        ..complete_form()
    };
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    match place_order(&mut cart, &form, at) {
        Err(CheckoutError::MissingFields(missing)) => {
            let fields: Vec<_> = missing.iter().map(|f| f.field).collect();
            assert_eq!(fields, ["email", "cvv"]);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(cart.total_items(), 1);
}
