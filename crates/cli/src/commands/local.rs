//! Local store commands.
//!
//! Drives the cart, wishlist, and recently-viewed stores against a
//! directory of JSON files, the same way a browser drives them against
//! `localStorage`. Handy for inspecting persisted state and for trying the
//! store rules without a running server.
//!
//! # Usage
//!
//! ```bash
//! em-cli local --dir .emerald cart add 3 --quantity 2
//! em-cli local --dir .emerald cart show --promo DISCOUNT20
//! em-cli local --dir .emerald wishlist toggle 5
//! em-cli local --dir .emerald recent view 1
//! ```

use clap::Subcommand;
use serde_json::{Value, json};

use emerald_core::{Product, ProductId};
use emerald_storefront::actions;
use emerald_storefront::catalog::Catalog;
use emerald_storefront::context::ClientContext;
use emerald_storefront::notify::Notifier;
use emerald_storefront::persistence::KeyValueStore;
use emerald_storefront::pricing::{CartTotals, PromoPolicy};

/// Errors from local store commands.
#[derive(Debug, thiserror::Error)]
pub enum LocalError {
    #[error("Unknown product: {0}")]
    UnknownProduct(String),
}

#[derive(Debug, Subcommand)]
pub enum CartAction {
    /// Add a product (or increase its quantity)
    Add {
        id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity (clamped to at least 1)
    SetQuantity {
        id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove { id: String },
    /// Empty the cart
    Clear,
    /// Print lines and totals
    Show {
        #[arg(long)]
        promo: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum WishlistAction {
    /// Add the product if absent, remove it if present
    Toggle { id: String },
    /// Remove a product
    Remove { id: String },
    /// Empty the wishlist
    Clear,
    /// Print the wishlist
    Show,
}

#[derive(Debug, Subcommand)]
pub enum RecentAction {
    /// Record a product view
    View { id: String },
    /// Remove an entry
    Remove { id: String },
    /// Empty the history
    Clear,
    /// Print the history, most recent first
    Show,
}

#[derive(Debug, Subcommand)]
pub enum Collection {
    /// Shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Recently viewed products
    Recent {
        #[command(subcommand)]
        action: RecentAction,
    },
}

fn lookup<'c>(catalog: &'c Catalog, id: &str) -> Result<&'c Product, LocalError> {
    catalog
        .get(&ProductId::new(id))
        .ok_or_else(|| LocalError::UnknownProduct(id.to_owned()))
}

/// Run one command against a hydrated context and return the collection
/// it touched, as JSON.
///
/// # Errors
///
/// Returns `LocalError::UnknownProduct` when an add, toggle, or view names a
/// product missing from the catalog.
pub fn execute<S, N>(
    context: &mut ClientContext<S>,
    catalog: &Catalog,
    promo: &PromoPolicy,
    command: Collection,
    notifier: &N,
) -> Result<Value, LocalError>
where
    S: KeyValueStore,
    N: Notifier + ?Sized,
{
    match command {
        Collection::Cart { action } => {
            let mut entered = None;
            match action {
                CartAction::Add { id, quantity } => {
                    let product = lookup(catalog, &id)?;
                    actions::add_to_cart(context.cart_mut(), product, quantity, notifier);
                }
                CartAction::SetQuantity { id, quantity } => {
                    context
                        .cart_mut()
                        .update_item_quantity(&ProductId::new(id), quantity);
                }
                CartAction::Remove { id } => {
                    actions::remove_from_cart(context.cart_mut(), &ProductId::new(id), notifier);
                }
                CartAction::Clear => actions::clear_cart(context.cart_mut(), notifier),
                CartAction::Show { promo } => entered = promo,
            }

            let cart = context.cart();
            let discount = entered
                .as_deref()
                .map(|code| promo.discount_for(code, cart.subtotal()))
                .unwrap_or_default();
            Ok(json!({
                "items": cart.items(),
                "itemCount": cart.item_count(),
                "totals": CartTotals::compute(cart.items(), discount),
            }))
        }
        Collection::Wishlist { action } => {
            match action {
                WishlistAction::Toggle { id } => {
                    let product = lookup(catalog, &id)?;
                    actions::toggle_wishlist(context.wishlist_mut(), product, notifier);
                }
                WishlistAction::Remove { id } => {
                    actions::remove_from_wishlist(
                        context.wishlist_mut(),
                        &ProductId::new(id),
                        notifier,
                    );
                }
                WishlistAction::Clear => actions::clear_wishlist(context.wishlist_mut(), notifier),
                WishlistAction::Show => {}
            }
            Ok(json!({ "items": context.wishlist().items() }))
        }
        Collection::Recent { action } => {
            match action {
                RecentAction::View { id } => {
                    let product = lookup(catalog, &id)?;
                    actions::view_product(context.recently_viewed_mut(), product);
                }
                RecentAction::Remove { id } => {
                    actions::remove_recently_viewed(
                        context.recently_viewed_mut(),
                        &ProductId::new(id),
                        notifier,
                    );
                }
                RecentAction::Clear => {
                    actions::clear_recently_viewed(context.recently_viewed_mut(), notifier);
                }
                RecentAction::Show => {}
            }
            Ok(json!({ "items": context.recently_viewed().items() }))
        }
    }
}
