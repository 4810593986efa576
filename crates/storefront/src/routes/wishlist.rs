//! Wishlist route handlers.

use axum::{
    extract::{Path, State},
    response::Response,
};
use serde::Serialize;
use tracing::instrument;

use emerald_core::{Product, ProductId};

use crate::actions;
use crate::error::{AppError, Result};
use crate::middleware::{SharedSessionStorage, Shopper};
use crate::state::AppState;
use crate::store::WishlistStore;

#[derive(Debug, Serialize)]
pub struct WishlistView {
    pub items: Vec<Product>,
}

impl From<&WishlistStore<SharedSessionStorage>> for WishlistView {
    fn from(wishlist: &WishlistStore<SharedSessionStorage>) -> Self {
        Self {
            items: wishlist.items().to_vec(),
        }
    }
}

/// Result of a heart-button toggle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResult {
    pub in_wishlist: bool,
    pub items: Vec<Product>,
}

#[instrument(skip(shopper))]
pub async fn show(shopper: Shopper) -> Result<Response> {
    let view = WishlistView::from(shopper.context.wishlist());
    shopper.respond(view).await
}

/// Add the product if absent, remove it if present.
#[instrument(skip(state, shopper))]
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut shopper: Shopper,
) -> Result<Response> {
    let id = ProductId::new(id);
    let product = state
        .catalog()
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let in_wishlist =
        actions::toggle_wishlist(shopper.context.wishlist_mut(), product, &shopper.toasts);

    let result = ToggleResult {
        in_wishlist,
        items: shopper.context.wishlist().items().to_vec(),
    };
    shopper.respond(result).await
}

#[instrument(skip(shopper))]
pub async fn remove(Path(id): Path<String>, mut shopper: Shopper) -> Result<Response> {
    actions::remove_from_wishlist(
        shopper.context.wishlist_mut(),
        &ProductId::new(id),
        &shopper.toasts,
    );

    let view = WishlistView::from(shopper.context.wishlist());
    shopper.respond(view).await
}

#[instrument(skip(shopper))]
pub async fn clear(mut shopper: Shopper) -> Result<Response> {
    actions::clear_wishlist(shopper.context.wishlist_mut(), &shopper.toasts);

    let view = WishlistView::from(shopper.context.wishlist());
    shopper.respond(view).await
}
