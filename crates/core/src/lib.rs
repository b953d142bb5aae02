//! Farmstand Core - Shared types library.
//!
//! This crate provides common types used across Farmstand components:
//! - `storefront` - The shopper-facing catalog/cart/checkout pipeline
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices, plus the
//!   payment-method enum shared by checkout and the order wire format

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
