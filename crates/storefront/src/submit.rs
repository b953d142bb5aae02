//! Order submission state machine.
//!
//! A submission must end in a definite state even when the backend's answer
//! is garbage. A response that cannot be parsed - or that never arrives -
//! becomes [`OrderOutcome::Indeterminate`]: the cart stays intact and the
//! shopper chooses between treating the order as placed and retrying.
//! Success is never assumed from an unparseable response, and failure is
//! never assumed from a missing one.

use farmstand_core::PaymentMethod;
use thiserror::Error;
use uuid::Uuid;

use crate::backend::BackendError;
use crate::backend::types::{OrderItem, OrderRequest, STATUS_SUCCESS, SubmitEnvelope};
use crate::cart::CartStore;
use crate::checkout::CheckoutForm;

/// Where the submission pipeline currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitState {
    /// Nothing in flight; submission may begin.
    #[default]
    Idle,
    /// A POST is in flight; re-entry is rejected until it resolves.
    Submitting,
    /// The backend confirmed the order.
    Succeeded { order_id: String },
    /// The backend rejected the order; cart and form survive for retry.
    Failed { message: String },
    /// The backend's answer could not be confirmed or denied.
    Indeterminate,
}

/// Definite result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderOutcome {
    Succeeded { order_id: String },
    Failed { message: String },
    Indeterminate,
}

/// Rejected entry into `Submitting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("an order submission is already in flight")]
    AlreadySubmitting,
    #[error("the previous order is awaiting confirmation")]
    ConfirmationPending,
}

/// Serializes order submission: at most one POST in flight.
///
/// Transitions are `Idle -> Submitting -> {Succeeded | Failed |
/// Indeterminate}`, then back to `Idle` on acknowledgement. Beginning a new
/// attempt from a terminal state is the retry form of acknowledgement.
#[derive(Debug, Default)]
pub struct OrderSubmitter {
    state: SubmitState,
}

impl OrderSubmitter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: SubmitState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &SubmitState {
        &self.state
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self.state, SubmitState::Submitting)
    }

    /// Try to enter `Submitting`.
    ///
    /// # Errors
    ///
    /// Rejects re-entry while an attempt is already in flight; the caller
    /// must issue no POST in that case.
    pub fn begin(&mut self) -> Result<(), SubmitError> {
        if self.is_submitting() {
            return Err(SubmitError::AlreadySubmitting);
        }
        self.state = SubmitState::Submitting;
        Ok(())
    }

    /// Record the terminal state of the in-flight attempt.
    pub fn finish(&mut self, outcome: &OrderOutcome) {
        self.state = match outcome {
            OrderOutcome::Succeeded { order_id } => SubmitState::Succeeded {
                order_id: order_id.clone(),
            },
            OrderOutcome::Failed { message } => SubmitState::Failed {
                message: message.clone(),
            },
            OrderOutcome::Indeterminate => SubmitState::Indeterminate,
        };
    }

    /// Explicit acknowledgement of a terminal state; returns to `Idle`.
    pub fn acknowledge(&mut self) {
        if !self.is_submitting() {
            self.state = SubmitState::Idle;
        }
    }
}

/// Build the wire payload from a cart/checkout snapshot.
///
/// Customer fields are trimmed, the transfer digits are included only for
/// bank transfers, and line items are reduced to what the order sheet
/// records.
#[must_use]
pub fn build_order(cart: &CartStore, form: &CheckoutForm) -> OrderRequest {
    let last5_digits = if form.payment_method == PaymentMethod::Transfer {
        form.last5_digits().trim().to_string()
    } else {
        String::new()
    };

    OrderRequest {
        action: "new_order",
        customer: form.customer_name.trim().to_string(),
        phone: form.customer_phone.trim().to_string(),
        address: form.address.trim().to_string(),
        payment_method: form.payment_method,
        last5_digits,
        items: cart
            .lines()
            .iter()
            .map(|line| OrderItem {
                name: line.product.name.clone(),
                brand: line.product.brand.clone(),
                price: line.product.price.amount(),
                quantity: line.quantity,
            })
            .collect(),
        total: cart.total().amount(),
    }
}

/// Interpret the transport result of an order POST.
///
/// Pure over the response, so the ambiguous cases are testable without a
/// network. A parsed `status:"success"` without an order id still
/// succeeds, under a generated placeholder id.
#[must_use]
pub fn interpret_response(response: Result<SubmitEnvelope, BackendError>) -> OrderOutcome {
    match response {
        Ok(envelope) if envelope.status == STATUS_SUCCESS => OrderOutcome::Succeeded {
            order_id: envelope.order_id.unwrap_or_else(placeholder_order_id),
        },
        Ok(envelope) => OrderOutcome::Failed {
            message: envelope
                .message
                .unwrap_or_else(|| "unknown error".to_string()),
        },
        Err(error) => {
            tracing::warn!(error = %error, "order submission unconfirmed");
            OrderOutcome::Indeterminate
        }
    }
}

fn placeholder_order_id() -> String {
    format!("unconfirmed-{}", Uuid::new_v4())
}
