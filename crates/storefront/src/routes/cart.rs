//! Cart route handlers.
//!
//! The cart lives in the session. Every mutation answers with the updated
//! cart and an `HX-Trigger` toast.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use emerald_core::{Price, ProductId};

use crate::actions;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{SharedSessionStorage, Shopper};
use crate::pricing::CartTotals;
use crate::state::AppState;
use crate::store::{CartLine, CartStore};

/// Largest quantity a single add-to-cart request may carry.
pub const MAX_ADD_QUANTITY: u32 = 99;

/// Add-to-cart request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Quantity update request. Values below 1 are clamped to 1.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantity {
    pub quantity: i64,
}

/// Promo code request.
#[derive(Debug, Deserialize)]
pub struct ApplyPromo {
    pub code: String,
}

/// Optional promo code on the cart view.
#[derive(Debug, Default, Deserialize)]
pub struct PromoQuery {
    pub promo: Option<String>,
}

/// Cart contents with derived totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub item_count: u32,
    pub totals: CartTotals,
    pub promo_applied: bool,
}

impl CartView {
    fn new(cart: &CartStore<SharedSessionStorage>, discount: Price) -> Self {
        Self {
            items: cart.items().to_vec(),
            item_count: cart.item_count(),
            totals: CartTotals::compute(cart.items(), discount),
            promo_applied: !discount.is_zero(),
        }
    }
}

/// Discount for an optional promo code on `cart`.
async fn promo_discount(
    state: &AppState,
    cart: &CartStore<SharedSessionStorage>,
    code: Option<&str>,
) -> Price {
    match code.filter(|code| !code.is_empty()) {
        Some(code) => state.promo().apply(code, cart.subtotal()).await,
        None => Price::ZERO,
    }
}

/// Show the cart.
#[instrument(skip(state, shopper))]
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<PromoQuery>,
    shopper: Shopper,
) -> Result<Response> {
    let cart = shopper.context.cart();
    let discount = promo_discount(&state, cart, query.promo.as_deref()).await;
    let view = CartView::new(cart, discount);
    shopper.respond(view).await
}

/// Add a product to the cart.
#[instrument(skip(state, shopper))]
pub async fn add(
    State(state): State<AppState>,
    mut shopper: Shopper,
    Json(form): Json<AddToCart>,
) -> Result<Response> {
    let id = ProductId::new(form.product_id);
    let product = state
        .catalog()
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let quantity = form.quantity.unwrap_or(1);
    if quantity > MAX_ADD_QUANTITY {
        return Err(AppError::BadRequest(format!(
            "quantity must be at most {MAX_ADD_QUANTITY}"
        )));
    }

    actions::add_to_cart(
        shopper.context.cart_mut(),
        product,
        quantity,
        &shopper.toasts,
    );
    add_breadcrumb(
        "cart",
        "Added to cart",
        &[("product_id", id.as_str()), ("quantity", &quantity.to_string())],
    );

    let view = CartView::new(shopper.context.cart(), Price::ZERO);
    shopper.respond(view).await
}

/// Set a line's quantity.
#[instrument(skip(shopper))]
pub async fn update(
    Path(id): Path<String>,
    mut shopper: Shopper,
    Json(form): Json<UpdateQuantity>,
) -> Result<Response> {
    shopper
        .context
        .cart_mut()
        .update_item_quantity(&ProductId::new(id), form.quantity);

    let view = CartView::new(shopper.context.cart(), Price::ZERO);
    shopper.respond(view).await
}

/// Remove a line.
#[instrument(skip(shopper))]
pub async fn remove(Path(id): Path<String>, mut shopper: Shopper) -> Result<Response> {
    actions::remove_from_cart(
        shopper.context.cart_mut(),
        &ProductId::new(id),
        &shopper.toasts,
    );

    let view = CartView::new(shopper.context.cart(), Price::ZERO);
    shopper.respond(view).await
}

/// Empty the cart.
#[instrument(skip(shopper))]
pub async fn clear(mut shopper: Shopper) -> Result<Response> {
    actions::clear_cart(shopper.context.cart_mut(), &shopper.toasts);

    let view = CartView::new(shopper.context.cart(), Price::ZERO);
    shopper.respond(view).await
}

/// Check a promo code against the current cart.
#[instrument(skip(state, shopper, form))]
pub async fn apply_promo(
    State(state): State<AppState>,
    shopper: Shopper,
    Json(form): Json<ApplyPromo>,
) -> Result<Response> {
    if form.code.is_empty() {
        return Err(AppError::BadRequest("promo code is required".to_string()));
    }

    let cart = shopper.context.cart();
    let discount = promo_discount(&state, cart, Some(&form.code)).await;
    let view = CartView::new(cart, discount);
    shopper.respond(view).await
}
