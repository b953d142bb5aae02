//! Core types for Farmstand.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod payment;
pub mod price;
pub mod product;

pub use id::ProductId;
pub use payment::{PaymentMethod, PaymentMethodError};
pub use price::Price;
pub use product::Product;
