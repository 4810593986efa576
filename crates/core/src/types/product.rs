//! Catalog product record.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product as listed in the catalog.
///
/// Stores treat products as immutable snapshots: the wishlist and
/// recently-viewed collections persist the whole record, the cart copies
/// the fields it needs for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stable catalog identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Marketing description.
    pub description: String,
    /// Unit price.
    pub price: Price,
    /// Category label (e.g. "Electronics").
    pub category: String,
    /// Image URI.
    pub image: String,
}

impl Product {
    /// Whether `needle` (already lower-cased) occurs in the name, description, or category.
    #[must_use]
    pub fn matches_query(&self, needle: &str) -> bool {
        [&self.name, &self.description, &self.category]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lamp() -> Product {
        Product {
            id: ProductId::new("1"),
            name: "Minimalist Desk Lamp".to_owned(),
            description: "Touch controls.".to_owned(),
            price: Price::from_cents(4999),
            category: "Home Office".to_owned(),
            image: "/placeholder.svg".to_owned(),
        }
    }

    #[test]
    fn test_matches_query_across_fields() {
        let product = lamp();
        assert!(product.matches_query("desk"));
        assert!(product.matches_query("touch"));
        assert!(product.matches_query("home office"));
        assert!(!product.matches_query("speaker"));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(lamp()).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["price"], 4999);
        assert_eq!(json["category"], "Home Office");
    }
}
