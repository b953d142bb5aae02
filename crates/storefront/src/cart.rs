//! The in-memory cart.

use farmstand_core::{Price, Product, ProductId};

/// A product plus the quantity the shopper wants.
///
/// A line item with quantity zero cannot exist; [`CartStore::set_quantity`]
/// removes the line instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartLineItem {
    /// Price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }
}

/// Ordered collection of line items keyed by product identity.
///
/// Insertion order is preserved for display. Every operation is a
/// synchronous total function over the current snapshot; nothing here
/// fails, blocks, or observes another operation mid-flight.
#[derive(Debug, Default)]
pub struct CartStore {
    lines: Vec<CartLineItem>,
}

impl CartStore {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of a product, merging into an existing line for the
    /// same product id.
    pub fn add(&mut self, product: Product) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product.id == product.id)
        {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLineItem {
                product,
                quantity: 1,
            });
        }
    }

    /// Delete a line item; no-op when absent.
    pub fn remove(&mut self, id: &ProductId) {
        self.lines.retain(|line| line.product.id != *id);
    }

    /// Update a line's quantity in place; zero removes the line.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(id);
        } else if let Some(line) = self.lines.iter_mut().find(|line| line.product.id == *id) {
            line.quantity = quantity;
        }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    /// Sum of price times quantity across all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLineItem::line_total).sum()
    }

    /// Total unit count across all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |sum, line| sum.saturating_add(line.quantity))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drop every line item.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
