//! End-to-end pipeline tests against the in-process mock backend.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::time::Duration;

use rust_decimal::Decimal;
use url::Url;

use farmstand_core::{PaymentMethod, Price, Product, ProductId};
use farmstand_integration_tests::mock;
use farmstand_storefront::catalog::normalize::{normalize_rows, parse_csv};
use farmstand_storefront::checkout::{CheckoutForm, ValidationError};
use farmstand_storefront::config::StoreConfig;
use farmstand_storefront::notify::OrderModal;
use farmstand_storefront::state::{PlaceOrderError, StoreState};
use farmstand_storefront::submit::{OrderOutcome, SubmitError, SubmitState};

// =============================================================================
// Fixtures
// =============================================================================

const PRODUCTS_JSON: &str = r#"{
    "status": "success",
    "products": [
        {"id": "product-1", "Name": "Rice", "Brand": "Grains", "price": 100, "description": "new harvest", "image": "https://img.example/rice.jpg"},
        {"id": "product-2", "name": "Tea", "category": "Leaves", "price": "85.5"}
    ]
}"#;

const PRODUCTS_CSV: &str = "Name,Brand,Price\nRice,Grains,100\nTea,Leaves,85.5\n";

fn state_for(addr: SocketAddr) -> StoreState {
    let endpoint = Url::parse(&format!("http://{addr}/exec")).unwrap();
    StoreState::new(StoreConfig::for_endpoint(endpoint)).unwrap()
}

fn fixture_product() -> Product {
    Product {
        id: ProductId::new("p1"),
        name: "Rice".to_string(),
        brand: "Grains".to_string(),
        price: Price::new(Decimal::from(100)),
        description: String::new(),
        image_url: String::new(),
    }
}

fn fill_checkout(state: &StoreState) {
    state.update_form(|form| {
        form.customer_name = "A".to_string();
        form.customer_phone = "0912".to_string();
        form.address = "X".to_string();
        form.payment_method = PaymentMethod::Pickup;
    });
}

fn seed_cart(state: &StoreState) {
    state.add_to_cart(fixture_product());
    state.set_quantity(&ProductId::new("p1"), 2);
}

// =============================================================================
// Catalog synchronization
// =============================================================================

#[tokio::test]
async fn catalog_loads_from_primary_json_tier() {
    let (addr, _) = mock::serve(PRODUCTS_JSON, None, "{}", Duration::ZERO).await;
    let state = state_for(addr);

    state.refresh_catalog().await;

    let products = state.products();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Rice");
    assert_eq!(products[0].price, Price::new(Decimal::from(100)));
    assert_eq!(products[1].brand, "Leaves");
    assert_eq!(state.brands(), ["All", "Grains", "Leaves"]);
    assert!(state.notifications().current_toast().is_none());
}

#[tokio::test]
async fn catalog_falls_back_to_csv_when_primary_is_malformed() {
    let (addr, _) =
        mock::serve("<html>whoops</html>", Some(PRODUCTS_CSV), "{}", Duration::ZERO).await;
    let state = state_for(addr);

    state.refresh_catalog().await;

    // The fallback result is exactly what the shared normalization produces
    // from the same CSV text
    let expected = normalize_rows(parse_csv(PRODUCTS_CSV));
    assert_eq!(state.products(), expected);
    assert_eq!(state.brands(), ["All", "Grains", "Leaves"]);
}

#[tokio::test]
async fn catalog_falls_back_to_csv_on_error_envelope() {
    let (addr, _) = mock::serve(
        r#"{"status":"error","message":"Failed to get products"}"#,
        Some(PRODUCTS_CSV),
        "{}",
        Duration::ZERO,
    )
    .await;
    let state = state_for(addr);

    state.refresh_catalog().await;

    assert_eq!(state.products().len(), 2);
}

#[tokio::test]
async fn catalog_degrades_to_empty_with_toast_when_both_tiers_fail() {
    let (addr, _) = mock::serve("<html>whoops</html>", None, "{}", Duration::ZERO).await;
    let state = state_for(addr);

    state.refresh_catalog().await;

    assert!(state.products().is_empty());
    let toast = state.notifications().current_toast().expect("toast shown");
    assert!(toast.message.contains("Could not load"));
}

// =============================================================================
// Order submission
// =============================================================================

#[tokio::test]
async fn order_success_clears_cart_only_on_modal_dismissal() {
    let (addr, posts) = mock::serve(
        PRODUCTS_JSON,
        None,
        r#"{"status":"success","orderId":"ORD-1"}"#,
        Duration::ZERO,
    )
    .await;
    let state = state_for(addr);
    seed_cart(&state);
    fill_checkout(&state);

    let outcome = state.place_order().await.unwrap();
    assert_eq!(
        outcome,
        OrderOutcome::Succeeded {
            order_id: "ORD-1".to_string()
        }
    );
    assert_eq!(posts.load(Ordering::SeqCst), 1);

    // Confirmed, but not yet acknowledged: the cart survives
    assert_eq!(state.cart_lines().len(), 1);
    assert_eq!(
        state.notifications().modal(),
        Some(OrderModal::Placed {
            order_id: "ORD-1".to_string()
        })
    );

    state.dismiss_placed_modal();
    assert!(state.cart_lines().is_empty());
    assert_eq!(state.form(), CheckoutForm::new());
    assert_eq!(state.submit_state(), SubmitState::Idle);
}

#[tokio::test]
async fn order_server_error_preserves_cart_for_retry() {
    let (addr, _) = mock::serve(
        PRODUCTS_JSON,
        None,
        r#"{"status":"error","message":"out of stock"}"#,
        Duration::ZERO,
    )
    .await;
    let state = state_for(addr);
    seed_cart(&state);
    fill_checkout(&state);

    let outcome = state.place_order().await.unwrap();
    assert_eq!(
        outcome,
        OrderOutcome::Failed {
            message: "out of stock".to_string()
        }
    );

    // Recoverable: everything stays for the shopper to correct and retry
    assert_eq!(state.cart_lines().len(), 1);
    assert_eq!(state.form().customer_name, "A");
    assert!(state.notifications().modal().is_none());
    let toast = state.notifications().current_toast().expect("toast shown");
    assert!(toast.message.contains("out of stock"));
}

#[tokio::test]
async fn order_unparseable_response_is_indeterminate() {
    let (addr, _) = mock::serve(PRODUCTS_JSON, None, "<html>gateway</html>", Duration::ZERO).await;
    let state = state_for(addr);
    seed_cart(&state);
    fill_checkout(&state);

    let outcome = state.place_order().await.unwrap();
    assert_eq!(outcome, OrderOutcome::Indeterminate);

    // Never assume success: the cart must not clear on its own
    assert_eq!(state.cart_lines().len(), 1);
    assert_eq!(state.notifications().modal(), Some(OrderModal::Unconfirmed));

    // The retry path keeps everything and reopens submission
    state.retry_unconfirmed();
    assert_eq!(state.cart_lines().len(), 1);
    assert_eq!(state.submit_state(), SubmitState::Idle);
}

#[tokio::test]
async fn order_transport_failure_is_indeterminate() {
    // Bind and immediately drop a listener so the port refuses connections
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let state = state_for(addr);
    seed_cart(&state);
    fill_checkout(&state);

    let outcome = state.place_order().await.unwrap();
    assert_eq!(outcome, OrderOutcome::Indeterminate);
    assert_eq!(state.cart_lines().len(), 1);
    assert_eq!(state.notifications().modal(), Some(OrderModal::Unconfirmed));

    // Treat-as-placed is the other acknowledgement path: it resets like a
    // confirmed order
    state.acknowledge_unconfirmed_as_placed();
    assert!(state.cart_lines().is_empty());
    assert_eq!(state.form(), CheckoutForm::new());
}

#[tokio::test]
async fn concurrent_submissions_issue_exactly_one_post() {
    let (addr, posts) = mock::serve(
        PRODUCTS_JSON,
        None,
        r#"{"status":"success","orderId":"ORD-1"}"#,
        Duration::from_millis(300),
    )
    .await;
    let state = state_for(addr);
    seed_cart(&state);
    fill_checkout(&state);

    let first_state = state.clone();
    let first = tokio::spawn(async move { first_state.place_order().await });

    // Let the first attempt reach its POST (held open by the mock delay)
    tokio::time::sleep(Duration::from_millis(100)).await;
    let second = state.place_order().await;
    assert!(matches!(
        second,
        Err(PlaceOrderError::Submit(SubmitError::AlreadySubmitting))
    ));

    let first = first.await.unwrap().unwrap();
    assert!(matches!(first, OrderOutcome::Succeeded { .. }));
    assert_eq!(posts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn validation_failure_issues_no_request() {
    let (addr, posts) = mock::serve(PRODUCTS_JSON, None, "{}", Duration::ZERO).await;
    let state = state_for(addr);
    fill_checkout(&state);

    // Empty cart: the first check fails even though every field is filled
    let result = state.place_order().await;
    assert!(matches!(
        result,
        Err(PlaceOrderError::Validation(ValidationError::EmptyCart))
    ));
    assert_eq!(posts.load(Ordering::SeqCst), 0);
    assert!(state.notifications().current_toast().is_some());
}

// =============================================================================
// Backend extras
// =============================================================================

#[tokio::test]
async fn ping_reports_a_running_backend() {
    let (addr, _) = mock::serve(PRODUCTS_JSON, None, "{}", Duration::ZERO).await;
    let state = state_for(addr);

    let envelope = state.backend().ping().await.unwrap();
    assert_eq!(envelope.status, "success");
    assert!(envelope.message.unwrap().contains("running"));
}

#[tokio::test]
async fn add_product_resolves_on_success_envelope() {
    use farmstand_storefront::backend::types::AddProductRequest;

    let (addr, posts) =
        mock::serve(PRODUCTS_JSON, None, r#"{"status":"success"}"#, Duration::ZERO).await;
    let state = state_for(addr);

    let request = AddProductRequest::new(
        "Grains",
        "Millet",
        Decimal::from(60),
        "small batch",
        "https://img.example/millet.jpg",
    );
    state.backend().add_product(&request).await.unwrap();
    assert_eq!(posts.load(Ordering::SeqCst), 1);
}
