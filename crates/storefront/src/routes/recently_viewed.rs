//! Recently viewed route handlers.
//!
//! Entries are recorded by the product detail handler; these routes only
//! read and prune the history.

use axum::{extract::Path, response::Response};
use serde::Serialize;
use tracing::instrument;

use emerald_core::{Product, ProductId};

use crate::actions;
use crate::error::Result;
use crate::middleware::Shopper;

/// Most recent first.
#[derive(Debug, Serialize)]
pub struct HistoryView {
    pub items: Vec<Product>,
}

fn history(shopper: &Shopper) -> HistoryView {
    HistoryView {
        items: shopper.context.recently_viewed().items().to_vec(),
    }
}

#[instrument(skip(shopper))]
pub async fn show(shopper: Shopper) -> Result<Response> {
    let view = history(&shopper);
    shopper.respond(view).await
}

#[instrument(skip(shopper))]
pub async fn remove(Path(id): Path<String>, mut shopper: Shopper) -> Result<Response> {
    actions::remove_recently_viewed(
        shopper.context.recently_viewed_mut(),
        &ProductId::new(id),
        &shopper.toasts,
    );

    let view = history(&shopper);
    shopper.respond(view).await
}

#[instrument(skip(shopper))]
pub async fn clear(mut shopper: Shopper) -> Result<Response> {
    actions::clear_recently_viewed(shopper.context.recently_viewed_mut(), &shopper.toasts);

    let view = history(&shopper);
    shopper.respond(view).await
}
