//! Farmstand storefront connectivity check.
//!
//! Loads configuration, pings the spreadsheet web-app backend, and runs one
//! catalog synchronization cycle, logging what a storefront frontend would
//! render. Frontends embed [`farmstand_storefront::state::StoreState`]
//! directly; this binary exists to verify an endpoint before wiring one up.

#![cfg_attr(not(test), forbid(unsafe_code))]

use farmstand_storefront::config::StoreConfig;
use farmstand_storefront::state::StoreState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed before anything logs)
    let config = StoreConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "farmstand_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(endpoint = %config.endpoint, "checking backend");

    let state = StoreState::new(config).expect("Failed to build HTTP client");

    match state.backend().ping().await {
        Ok(envelope) => tracing::info!(
            status = %envelope.status,
            message = envelope.message.as_deref().unwrap_or(""),
            "backend reachable"
        ),
        Err(error) => tracing::warn!(error = %error, "backend ping failed"),
    }

    state.refresh_catalog().await;

    let products = state.products();
    let brands = state.brands();
    tracing::info!(
        products = products.len(),
        brands = brands.len().saturating_sub(1),
        "catalog synchronized"
    );
    for product in &products {
        tracing::debug!(
            id = %product.id,
            name = %product.name,
            brand = %product.brand,
            price = %product.price,
            "product"
        );
    }

    if let Some(toast) = state.notifications().current_toast() {
        tracing::warn!(message = %toast.message, "notice");
    }
}
