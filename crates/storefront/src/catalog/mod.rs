//! Catalog state: two-tier retrieval, normalization, and the brand filter.

pub mod normalize;
pub mod source;

use farmstand_core::Product;

/// Brand tab that disables filtering.
pub const ALL_BRANDS: &str = "All";

/// The in-memory product catalog.
///
/// Replaced wholesale by each fetch cycle; there is no incremental diffing.
/// Fetch cycles can overlap, so each one carries a generation token and
/// [`ProductCatalog::apply`] drops snapshots that arrive out of order.
#[derive(Debug)]
pub struct ProductCatalog {
    generation: u64,
    products: Vec<Product>,
    brands: Vec<String>,
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductCatalog {
    /// An empty catalog at generation zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            generation: 0,
            products: Vec::new(),
            brands: vec![ALL_BRANDS.to_string()],
        }
    }

    /// Replace the catalog with the snapshot of a fetch cycle.
    ///
    /// Returns `false` (and changes nothing) when `generation` is not newer
    /// than the last applied snapshot, so a slow early fetch can never
    /// clobber the result of a later one.
    pub fn apply(&mut self, generation: u64, products: Vec<Product>) -> bool {
        if generation <= self.generation {
            return false;
        }
        self.generation = generation;
        self.brands = derive_brands(&products);
        self.products = products;
        true
    }

    /// Generation of the currently applied snapshot (zero before the first).
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// `"All"` followed by each distinct brand in first-seen order.
    #[must_use]
    pub fn brands(&self) -> &[String] {
        &self.brands
    }

    /// Products matching a brand tab; `"All"` returns everything.
    #[must_use]
    pub fn filter(&self, selected_brand: &str) -> Vec<&Product> {
        if selected_brand == ALL_BRANDS {
            self.products.iter().collect()
        } else {
            self.products
                .iter()
                .filter(|product| product.brand == selected_brand)
                .collect()
        }
    }
}

fn derive_brands(products: &[Product]) -> Vec<String> {
    let mut brands = vec![ALL_BRANDS.to_string()];
    for product in products {
        if !brands.iter().skip(1).any(|brand| *brand == product.brand) {
            brands.push(product.brand.clone());
        }
    }
    brands
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmstand_core::{Price, ProductId};

    fn product(id: &str, name: &str, brand: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            brand: brand.to_string(),
            price: Price::ZERO,
            description: String::new(),
            image_url: String::new(),
        }
    }

    #[test]
    fn test_brands_first_seen_order() {
        let mut catalog = ProductCatalog::new();
        catalog.apply(
            1,
            vec![
                product("p1", "Rice", "Grains"),
                product("p2", "Tea", "Leaves"),
                product("p3", "Brown Rice", "Grains"),
            ],
        );

        assert_eq!(catalog.brands(), ["All", "Grains", "Leaves"]);
    }

    #[test]
    fn test_filter_all_and_exact() {
        let mut catalog = ProductCatalog::new();
        catalog.apply(
            1,
            vec![
                product("p1", "Rice", "Grains"),
                product("p2", "Tea", "Leaves"),
            ],
        );

        assert_eq!(catalog.filter(ALL_BRANDS).len(), 2);
        let grains = catalog.filter("Grains");
        assert_eq!(grains.len(), 1);
        assert_eq!(grains[0].name, "Rice");
        assert!(catalog.filter("Dairy").is_empty());
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let mut catalog = ProductCatalog::new();
        assert!(catalog.apply(2, vec![product("p1", "Rice", "Grains")]));

        // A fetch that started earlier resolves late; it must not win
        assert!(!catalog.apply(1, vec![product("p9", "Stale", "Old")]));
        assert_eq!(catalog.products().len(), 1);
        assert_eq!(catalog.products()[0].name, "Rice");
        assert_eq!(catalog.generation(), 2);

        assert!(catalog.apply(3, Vec::new()));
        assert!(catalog.products().is_empty());
        assert_eq!(catalog.brands(), ["All"]);
    }
}
