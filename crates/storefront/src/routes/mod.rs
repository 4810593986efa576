//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! # Catalog
//! GET    /api/products                 - Search (?q, min_price, max_price, category=a,b)
//! GET    /api/products/{id}            - Product + related; records a recently viewed entry
//! GET    /api/categories               - Distinct categories
//! GET    /api/showcase                 - Featured and trending rows
//!
//! # Cart
//! GET    /api/cart                     - Lines and totals (?promo=)
//! POST   /api/cart/items               - Add {productId, quantity?}
//! POST   /api/cart/items/{id}          - Set quantity {quantity}
//! DELETE /api/cart/items/{id}          - Remove line
//! DELETE /api/cart                     - Clear
//! POST   /api/cart/promo               - Totals with promo {code}
//!
//! # Wishlist
//! GET    /api/wishlist
//! POST   /api/wishlist/{id}/toggle
//! DELETE /api/wishlist/{id}
//! DELETE /api/wishlist
//!
//! # Recently viewed
//! GET    /api/recently-viewed
//! DELETE /api/recently-viewed/{id}
//! DELETE /api/recently-viewed
//!
//! # Auth (rate limited, see main)
//! POST   /api/auth/register
//! POST   /api/auth/login
//! POST   /api/auth/logout
//!
//! # Account (requires auth)
//! GET    /api/account
//!
//! # Health
//! GET    /health
//! GET    /health/ready
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod products;
pub mod recently_viewed;
pub mod wishlist;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route("/items/{id}", post(cart::update).delete(cart::remove))
        .route("/promo", post(cart::apply_promo))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show).delete(wishlist::clear))
        .route("/{id}", delete(wishlist::remove))
        .route("/{id}/toggle", post(wishlist::toggle))
}

/// Create the recently viewed routes router.
pub fn recently_viewed_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(recently_viewed::show).delete(recently_viewed::clear))
        .route("/{id}", delete(recently_viewed::remove))
}

/// Create the shopper API (everything except auth).
///
/// Paths are relative to `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .route("/categories", get(products::categories))
        .route("/showcase", get(products::showcase))
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/recently-viewed", recently_viewed_routes())
        .route("/account", get(account::index))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
