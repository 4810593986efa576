//! Static product catalog and search.

use emerald_core::{Price, Product, ProductId};
use serde::Deserialize;

const PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=300&width=300";

/// Number of products shown in the featured and trending rows.
pub const SHOWCASE_SIZE: usize = 4;

/// Maximum number of related products returned for a product page.
pub const MAX_RELATED: usize = 4;

const SEED: [(&str, &str, &str, i64, &str); 8] = [
    (
        "1",
        "Minimalist Desk Lamp",
        "A sleek, adjustable desk lamp with touch controls and multiple brightness levels.",
        4999,
        "Home Office",
    ),
    (
        "2",
        "Ergonomic Office Chair",
        "Comfortable office chair with lumbar support and adjustable height.",
        19999,
        "Furniture",
    ),
    (
        "3",
        "Wireless Earbuds",
        "Premium wireless earbuds with noise cancellation and long battery life.",
        12999,
        "Electronics",
    ),
    (
        "4",
        "Smart Watch",
        "Feature-rich smartwatch with health tracking and notifications.",
        24999,
        "Electronics",
    ),
    (
        "5",
        "Leather Wallet",
        "Handcrafted genuine leather wallet with RFID protection.",
        3999,
        "Accessories",
    ),
    (
        "6",
        "Stainless Steel Water Bottle",
        "Vacuum insulated water bottle that keeps drinks cold for 24 hours or hot for 12 hours.",
        2999,
        "Kitchen",
    ),
    (
        "7",
        "Bluetooth Speaker",
        "Portable Bluetooth speaker with 360° sound and waterproof design.",
        8999,
        "Electronics",
    ),
    (
        "8",
        "Ceramic Plant Pot",
        "Modern ceramic pot perfect for indoor plants and home decor.",
        1999,
        "Home Decor",
    ),
];

/// Search criteria for [`Catalog::search`].
///
/// Every criterion is optional; an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductFilter {
    /// Case-insensitive substring of name, description, or category.
    #[serde(default)]
    pub query: Option<String>,
    /// Inclusive lower price bound.
    #[serde(default)]
    pub min_price: Option<Price>,
    /// Inclusive upper price bound.
    #[serde(default)]
    pub max_price: Option<Price>,
    /// Allowed categories; empty means all.
    #[serde(default)]
    pub categories: Vec<String>,
}

impl ProductFilter {
    /// Whether `product` satisfies every criterion.
    ///
    /// `needle` is the lower-cased query, computed once per search.
    fn accepts(&self, product: &Product, needle: Option<&str>) -> bool {
        needle.is_none_or(|needle| product.matches_query(needle))
            && self.min_price.is_none_or(|min| product.price >= min)
            && self.max_price.is_none_or(|max| product.price <= max)
            && (self.categories.is_empty() || self.categories.contains(&product.category))
    }
}

/// Read-only, ordered product list.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// A catalog over `products`, in the given order.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The built-in seed catalog.
    #[must_use]
    pub fn builtin() -> Self {
        let products = SEED
            .iter()
            .map(|&(id, name, description, cents, category)| Product {
                id: ProductId::new(id),
                name: name.to_owned(),
                description: description.to_owned(),
                price: Price::from_cents(cents),
                category: category.to_owned(),
                image: PLACEHOLDER_IMAGE.to_owned(),
            })
            .collect();
        Self::new(products)
    }

    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    /// The first products of the catalog.
    #[must_use]
    pub fn featured(&self) -> &[Product] {
        self.products
            .get(..SHOWCASE_SIZE)
            .unwrap_or(&self.products)
    }

    /// The row following the featured products.
    #[must_use]
    pub fn trending(&self) -> &[Product] {
        let start = SHOWCASE_SIZE.min(self.products.len());
        let end = (SHOWCASE_SIZE * 2).min(self.products.len());
        self.products.get(start..end).unwrap_or_default()
    }

    /// Other products in the same category as `product`.
    #[must_use]
    pub fn related(&self, product: &Product) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|other| other.category == product.category && other.id != product.id)
            .take(MAX_RELATED)
            .collect()
    }

    /// Products matching `filter`, in catalog order.
    #[must_use]
    pub fn search(&self, filter: &ProductFilter) -> Vec<&Product> {
        let needle = filter
            .query
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
            .map(str::to_lowercase);

        let results: Vec<&Product> = self
            .products
            .iter()
            .filter(|product| filter.accepts(product, needle.as_deref()))
            .collect();

        tracing::debug!(
            query = needle.as_deref().unwrap_or_default(),
            results = results.len(),
            "Catalog search"
        );
        results
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
