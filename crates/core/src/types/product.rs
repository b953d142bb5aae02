//! The normalized catalog product.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product available for purchase.
///
/// Constructed only by catalog normalization and immutable afterwards; a new
/// fetch cycle replaces the whole list rather than patching entries in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identity. Stable within a fetch cycle.
    pub id: ProductId,
    /// Display name. Rows without a name never become products.
    pub name: String,
    /// Brand (or category) used for the filter tabs.
    pub brand: String,
    /// Unit price; zero when the source row had none.
    pub price: Price,
    /// Free-text description, possibly empty.
    pub description: String,
    /// Image URL; a placeholder when the source row had none.
    pub image_url: String,
}
