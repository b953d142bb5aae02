//! Shared pipeline state.
//!
//! The original storefront held all of this in framework-reactive UI
//! variables. Here it is an explicit container exposing pure operations and
//! a watch-based revision channel, decoupled from any rendering technology.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use farmstand_core::{Price, Product, ProductId};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::backend::{BackendClient, BackendError};
use crate::cart::{CartLineItem, CartStore};
use crate::catalog::{ProductCatalog, source};
use crate::checkout::{self, CheckoutForm, ValidationError};
use crate::config::StoreConfig;
use crate::notify::{NotificationCenter, OrderModal, ToastKind};
use crate::submit::{
    OrderOutcome, OrderSubmitter, SubmitError, SubmitState, build_order, interpret_response,
};

/// Errors surfaced by [`StoreState::place_order`].
#[derive(Debug, thiserror::Error)]
pub enum PlaceOrderError {
    /// A checkout check failed; no request was issued.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Submission is gated (already in flight, or awaiting confirmation).
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

/// The explicit state container for the storefront pipeline.
///
/// Cheaply cloneable via `Arc`. The pipeline is logically single-threaded:
/// the only suspension points are the two network calls, and order
/// submission is serialized by the `Idle`/`Submitting` gate. Locks are never
/// held across an `.await`.
#[derive(Clone)]
pub struct StoreState {
    inner: Arc<StoreStateInner>,
}

struct StoreStateInner {
    config: StoreConfig,
    backend: BackendClient,
    catalog: Mutex<ProductCatalog>,
    cart: Mutex<CartStore>,
    form: Mutex<CheckoutForm>,
    submitter: Mutex<OrderSubmitter>,
    notifications: NotificationCenter,
    fetch_generation: AtomicU64,
    revision: watch::Sender<u64>,
}

impl StoreState {
    /// Create the pipeline state for a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: StoreConfig) -> Result<Self, BackendError> {
        let backend = BackendClient::new(&config)?;
        let (revision, _) = watch::channel(0);

        Ok(Self {
            inner: Arc::new(StoreStateInner {
                config,
                backend,
                catalog: Mutex::new(ProductCatalog::new()),
                cart: Mutex::new(CartStore::new()),
                form: Mutex::new(CheckoutForm::new()),
                submitter: Mutex::new(OrderSubmitter::new()),
                notifications: NotificationCenter::new(),
                fetch_generation: AtomicU64::new(0),
                revision,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    #[must_use]
    pub fn notifications(&self) -> &NotificationCenter {
        &self.inner.notifications
    }

    /// Subscribe to state revisions. The receiver wakes whenever any part
    /// of the pipeline state changes; rendering layers re-read what they
    /// need.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    fn bump_revision(&self) {
        self.inner.revision.send_modify(|revision| *revision += 1);
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Run one catalog fetch cycle.
    ///
    /// Never fails: when both tiers are down the catalog empties and a toast
    /// reports it. A fetch that resolves after a later one started is
    /// discarded by its stale generation token.
    #[instrument(skip(self))]
    pub async fn refresh_catalog(&self) {
        let generation = self.inner.fetch_generation.fetch_add(1, Ordering::SeqCst) + 1;

        let products = match source::fetch(&self.inner.backend).await {
            Ok(products) => products,
            Err(error) => {
                warn!(error = %error, "catalog unavailable from both tiers");
                self.inner.notifications.toast(
                    ToastKind::Error,
                    "Could not load products, please try again later",
                );
                Vec::new()
            }
        };

        if lock(&self.inner.catalog).apply(generation, products) {
            self.bump_revision();
        } else {
            debug!(generation, "discarded stale catalog fetch");
        }
    }

    /// Snapshot of all products.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        lock(&self.inner.catalog).products().to_vec()
    }

    /// Snapshot of the brand tabs.
    #[must_use]
    pub fn brands(&self) -> Vec<String> {
        lock(&self.inner.catalog).brands().to_vec()
    }

    /// Snapshot of products under a brand tab.
    #[must_use]
    pub fn filtered_products(&self, selected_brand: &str) -> Vec<Product> {
        lock(&self.inner.catalog)
            .filter(selected_brand)
            .into_iter()
            .cloned()
            .collect()
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one unit to the cart. No-op while the confirmation modal is up.
    pub fn add_to_cart(&self, product: Product) {
        if self.inner.notifications.is_modal_open() {
            return;
        }
        lock(&self.inner.cart).add(product);
        self.bump_revision();
    }

    /// Remove a line item. No-op while the confirmation modal is up.
    pub fn remove_from_cart(&self, id: &ProductId) {
        if self.inner.notifications.is_modal_open() {
            return;
        }
        lock(&self.inner.cart).remove(id);
        self.bump_revision();
    }

    /// Set a line quantity (zero removes). No-op while the confirmation
    /// modal is up.
    pub fn set_quantity(&self, id: &ProductId, quantity: u32) {
        if self.inner.notifications.is_modal_open() {
            return;
        }
        lock(&self.inner.cart).set_quantity(id, quantity);
        self.bump_revision();
    }

    /// Snapshot of the cart lines.
    #[must_use]
    pub fn cart_lines(&self) -> Vec<CartLineItem> {
        lock(&self.inner.cart).lines().to_vec()
    }

    #[must_use]
    pub fn cart_total(&self) -> Price {
        lock(&self.inner.cart).total()
    }

    #[must_use]
    pub fn cart_count(&self) -> u32 {
        lock(&self.inner.cart).count()
    }

    // =========================================================================
    // Checkout form
    // =========================================================================

    /// Mutate the checkout form. No-op while the confirmation modal is up.
    pub fn update_form(&self, update: impl FnOnce(&mut CheckoutForm)) {
        if self.inner.notifications.is_modal_open() {
            return;
        }
        update(&mut lock(&self.inner.form));
        self.bump_revision();
    }

    /// Snapshot of the checkout form.
    #[must_use]
    pub fn form(&self) -> CheckoutForm {
        lock(&self.inner.form).clone()
    }

    // =========================================================================
    // Order submission
    // =========================================================================

    /// Snapshot of the submission state.
    #[must_use]
    pub fn submit_state(&self) -> SubmitState {
        lock(&self.inner.submitter).state().clone()
    }

    /// Validate, build, and submit the order, then route the outcome to the
    /// notification center.
    ///
    /// Validation failures are toasted and issue no request. Exactly one
    /// POST can be in flight; concurrent calls are rejected without a
    /// request.
    ///
    /// # Errors
    ///
    /// Returns the failed checkout check or the submission-gate rejection.
    #[instrument(skip(self))]
    pub async fn place_order(&self) -> Result<OrderOutcome, PlaceOrderError> {
        if self.inner.notifications.is_modal_open() {
            return Err(SubmitError::ConfirmationPending.into());
        }

        // Validate and snapshot under the locks, then release before the POST
        let order = {
            let cart = lock(&self.inner.cart);
            let form = lock(&self.inner.form);
            if let Err(error) = checkout::validate(&cart, &form) {
                self.inner
                    .notifications
                    .toast(ToastKind::Error, error.to_string());
                return Err(error.into());
            }
            build_order(&cart, &form)
        };

        lock(&self.inner.submitter).begin()?;
        self.bump_revision();

        let response = self.inner.backend.post_order(&order).await;
        let outcome = interpret_response(response);
        lock(&self.inner.submitter).finish(&outcome);

        match &outcome {
            OrderOutcome::Succeeded { order_id } => {
                info!(order_id = %order_id, "order confirmed");
                self.inner.notifications.open_modal(OrderModal::Placed {
                    order_id: order_id.clone(),
                });
            }
            OrderOutcome::Failed { message } => {
                self.inner
                    .notifications
                    .toast(ToastKind::Error, format!("Order submission failed: {message}"));
            }
            OrderOutcome::Indeterminate => {
                self.inner.notifications.open_modal(OrderModal::Unconfirmed);
            }
        }
        self.bump_revision();

        Ok(outcome)
    }

    /// Dismiss the placed-order modal.
    ///
    /// This is the single reset point after a confirmed order: cart and
    /// checkout form clear together, atomically, so no stale line items or
    /// payment details leak into the next order.
    pub fn dismiss_placed_modal(&self) {
        if matches!(
            self.inner.notifications.modal(),
            Some(OrderModal::Placed { .. })
        ) {
            self.inner.notifications.close_modal();
            self.reset_after_order();
        }
    }

    /// Treat an unconfirmed order as placed. Resets like a confirmed order.
    pub fn acknowledge_unconfirmed_as_placed(&self) {
        if matches!(
            self.inner.notifications.modal(),
            Some(OrderModal::Unconfirmed)
        ) {
            self.inner.notifications.close_modal();
            self.reset_after_order();
        }
    }

    /// Keep the unconfirmed order's cart and form and return to `Idle` so
    /// the shopper can submit again.
    pub fn retry_unconfirmed(&self) {
        if matches!(
            self.inner.notifications.modal(),
            Some(OrderModal::Unconfirmed)
        ) {
            self.inner.notifications.close_modal();
            lock(&self.inner.submitter).acknowledge();
            self.bump_revision();
        }
    }

    // Cart and form clear under their locks together; observers never see
    // one reset without the other.
    fn reset_after_order(&self) {
        {
            let mut cart = lock(&self.inner.cart);
            let mut form = lock(&self.inner.form);
            cart.clear();
            form.clear();
        }
        lock(&self.inner.submitter).acknowledge();
        self.bump_revision();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
