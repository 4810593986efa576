//! Account route handlers.
//!
//! These routes require authentication.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use emerald_core::{Email, UserId};

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Account overview.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: UserId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub member_since: chrono::DateTime<chrono::Utc>,
}

/// Show the signed-in user's account.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
) -> Result<Json<AccountView>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(current_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("account".to_string()))?;

    Ok(Json(AccountView {
        id: user.id,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        member_since: user.created_at,
    }))
}
