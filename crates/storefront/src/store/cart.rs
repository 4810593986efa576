//! Cart store.

use emerald_core::{Price, Product, ProductId};
use serde::{Deserialize, Serialize};

use super::{CollectionPolicy, CollectionStore};
use crate::persistence::{CART_KEY, KeyValueStore};

/// One product in the cart with its quantity.
///
/// Carries a copy of the product fields the cart needs for display so the
/// cart renders without a catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub category: String,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// A new line for `product` with quantity 1.
    #[must_use]
    pub fn new(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            category: product.category.clone(),
            quantity: 1,
        }
    }

    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Cart behaviour: one line per product, re-adding bumps the quantity.
#[derive(Debug, Clone, Copy)]
pub struct CartPolicy;

impl CollectionPolicy for CartPolicy {
    type Entry = CartLine;

    const STORAGE_KEY: &'static str = CART_KEY;

    fn entry_id(entry: &CartLine) -> &ProductId {
        &entry.id
    }

    fn add(entries: &mut Vec<CartLine>, product: &Product) {
        add_units(entries, product, 1);
    }

    /// Clamp quantities to at least 1 and fold repeated ids into the first line.
    fn normalize(lines: &mut Vec<CartLine>) {
        let mut merged: Vec<CartLine> = Vec::with_capacity(lines.len());
        for mut line in lines.drain(..) {
            line.quantity = line.quantity.max(1);
            match merged.iter_mut().find(|kept| kept.id == line.id) {
                Some(kept) => kept.quantity = kept.quantity.saturating_add(line.quantity),
                None => merged.push(line),
            }
        }
        *lines = merged;
    }
}

fn add_units(lines: &mut Vec<CartLine>, product: &Product, units: u32) {
    match lines.iter_mut().find(|line| line.id == product.id) {
        Some(line) => line.quantity = line.quantity.saturating_add(units),
        None => lines.push(CartLine {
            quantity: units,
            ..CartLine::new(product)
        }),
    }
}

/// The shopping cart.
pub type CartStore<S> = CollectionStore<CartPolicy, S>;

impl<S: KeyValueStore> CollectionStore<CartPolicy, S> {
    /// Add `quantity` units of `product` (at least one) in a single write.
    pub fn add_quantity(&mut self, product: &Product, quantity: u32) {
        let units = quantity.max(1);
        self.mutate(|lines| add_units(lines, product, units));
    }

    /// Set the quantity of the line for `id`, clamped to at least 1.
    ///
    /// Unknown ids are ignored. A line is never removed here; use
    /// [`remove_item`](Self::remove_item) for that.
    pub fn update_item_quantity(&mut self, id: &ProductId, quantity: i64) {
        let quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
        self.mutate(|lines| {
            if let Some(line) = lines.iter_mut().find(|line| &line.id == id) {
                line.quantity = quantity;
            }
        });
    }

    /// Sum of all quantities (the header badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items()
            .iter()
            .fold(0_u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items().iter().map(CartLine::line_total).sum()
    }
}
