//! Wire types for the spreadsheet web-app backend.
//!
//! The backend is loosely typed: catalog rows arrive as free-form JSON maps
//! whose headers drift between deployments, and every response shares the
//! same `{status, ...}` envelope convention. Header synonyms and defaults
//! are resolved by catalog normalization, not here.

use farmstand_core::PaymentMethod;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Envelope status tag for a successful operation.
pub const STATUS_SUCCESS: &str = "success";

/// Envelope status tag for a failed operation.
pub const STATUS_ERROR: &str = "error";

/// A loosely-typed catalog row as the backend delivers it.
pub type ProductRow = Map<String, Value>;

/// Envelope returned by `GET {endpoint}?action=get_products`.
#[derive(Debug, Deserialize)]
pub struct ProductsEnvelope {
    /// `"success"` or `"error"`.
    pub status: String,
    /// Product rows; present only on success.
    #[serde(default)]
    pub products: Option<Vec<ProductRow>>,
    /// Human-readable error detail; present only on error.
    #[serde(default)]
    pub message: Option<String>,
}

/// Envelope returned for `POST` submissions.
#[derive(Debug, Deserialize)]
pub struct SubmitEnvelope {
    /// `"success"` or `"error"`.
    pub status: String,
    /// Backend-assigned order identifier, when the backend supplies one.
    #[serde(rename = "orderId", default)]
    pub order_id: Option<String>,
    /// Human-readable error detail.
    #[serde(default)]
    pub message: Option<String>,
}

/// Envelope returned by a plain `GET {endpoint}` with no action.
#[derive(Debug, Deserialize)]
pub struct PingEnvelope {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// One line of an order as the backend records it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    pub name: String,
    pub brand: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
}

/// The order submission payload.
///
/// Built once from a cart/checkout snapshot at submission time and never
/// mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Always `"new_order"`; the backend dispatches on this tag.
    pub action: &'static str,
    pub customer: String,
    pub phone: String,
    pub address: String,
    pub payment_method: PaymentMethod,
    /// Last five digits of the remitting account; empty unless paying by
    /// transfer.
    pub last5_digits: String,
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// Payload for the admin-side `add_product` action.
#[derive(Debug, Clone, Serialize)]
pub struct AddProductRequest {
    /// Always `"add_product"`.
    pub action: &'static str,
    pub category: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub description: String,
    pub image: String,
}

impl AddProductRequest {
    /// Create an `add_product` payload.
    #[must_use]
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
        description: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            action: "add_product",
            category: category.into(),
            name: name.into(),
            price,
            description: description.into(),
            image: image.into(),
        }
    }
}
