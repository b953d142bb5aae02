//! Newtype IDs for type-safe entity references.

use serde::{Deserialize, Serialize};

/// Identifier of a catalog product.
///
/// Backed by a string because neither backend tier supplies a numeric key;
/// the normalizer either passes through the backend-assigned id or
/// synthesizes a deterministic one from the row index. Two products are the
/// same catalog entry iff their ids are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_display() {
        let id = ProductId::new("product-3");
        assert_eq!(id.to_string(), "product-3");
        assert_eq!(id.as_str(), "product-3");
    }

    #[test]
    fn test_product_id_equality() {
        assert_eq!(ProductId::from("p1"), ProductId::new("p1".to_string()));
        assert_ne!(ProductId::from("p1"), ProductId::from("p2"));
    }
}
