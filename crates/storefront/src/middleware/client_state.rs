//! Per-request shopper state extractor.
//!
//! [`Shopper`] loads the session's collections into a hydrated
//! [`ClientContext`], lets the handler run store operations and actions
//! against it, and [`Shopper::respond`] writes the changed collections back
//! and attaches the latest notification as an `HX-Trigger` header.

use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tower_sessions::Session;

use crate::context::ClientContext;
use crate::error::AppError;
use crate::notify::{HX_TRIGGER, ToastQueue};
use crate::persistence::SessionStorage;

/// Storage handle shared by the three stores of a request.
pub type SharedSessionStorage = Arc<SessionStorage>;

/// The shopper's collections for the current request.
pub struct Shopper {
    session: Session,
    storage: SharedSessionStorage,
    /// Cart, wishlist, and recently viewed, already hydrated.
    pub context: ClientContext<SharedSessionStorage>,
    /// Notifications raised while handling the request.
    pub toasts: ToastQueue,
}

impl Shopper {
    /// Load the collections stored in `session`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store cannot be read.
    pub async fn load(session: Session) -> Result<Self, AppError> {
        let storage = Arc::new(SessionStorage::load(&session).await?);
        let context = ClientContext::hydrated(Arc::clone(&storage));
        Ok(Self {
            session,
            storage,
            context,
            toasts: ToastQueue::new(),
        })
    }

    /// Persist changes and build the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store rejects a write.
    pub async fn respond<T: Serialize>(self, body: T) -> Result<Response, AppError> {
        if self.storage.is_dirty() {
            self.storage.flush(&self.session).await?;
        }

        let mut response = Json(body).into_response();
        if let Some(trigger) = self.toasts.hx_trigger() {
            response.headers_mut().insert(HX_TRIGGER, trigger);
        }
        Ok(response)
    }
}

impl<S> FromRequestParts<S> for Shopper
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))?;

        Self::load(session).await
    }
}
