//! Authentication route handlers.
//!
//! Credentials sign-up, sign-in, and sign-out. The signed-in user lives in
//! the session under `current_user`.

use std::time::Duration;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::UserRepository;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::{AuthorizedUser, CurrentUser};
use crate::notify::{HX_TRIGGER, Notification, Notifier, ToastQueue};
use crate::services::auth::{AuthError, AuthService, Registration};
use crate::state::AppState;

const AUTH_TOAST_DURATION: Duration = Duration::from_millis(3000);

/// Sign-in form.
#[derive(Deserialize)]
pub struct SignIn {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: AuthorizedUser,
}

fn with_toast(
    status: StatusCode,
    body: impl Serialize,
    title: &str,
    description: &str,
) -> Response {
    let toasts = ToastQueue::new();
    toasts.notify(Notification::new(title, description).with_duration(AUTH_TOAST_DURATION));

    let mut response = (status, Json(body)).into_response();
    if let Some(trigger) = toasts.hx_trigger() {
        response.headers_mut().insert(HX_TRIGGER, trigger);
    }
    response
}

/// Create an account. Does not sign the user in.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Json(form): Json<Registration>,
) -> Result<Response> {
    let auth = AuthService::new(UserRepository::new(state.pool()));
    let user = auth.register(form).await?;

    tracing::info!(user_id = %user.id, "Account created");
    Ok(with_toast(
        StatusCode::CREATED,
        UserResponse {
            user: AuthorizedUser::from(user),
        },
        "Account created!",
        "You have successfully signed up.",
    ))
}

/// Sign in with email and password.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<SignIn>,
) -> Result<Response> {
    let auth = AuthService::new(UserRepository::new(state.pool()));
    let user = auth
        .authorize(&form.email, &form.password)
        .await?
        .ok_or(AppError::Auth(AuthError::InvalidCredentials))?;

    set_current_user(&session, &CurrentUser::from(&user)).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "Signed in");

    Ok(with_toast(
        StatusCode::OK,
        UserResponse { user },
        "Success!",
        "You have been signed in.",
    ))
}

/// Sign out. The shopper's cart and wishlist stay in the session.
#[instrument(skip_all)]
pub async fn logout(OptionalAuth(user): OptionalAuth, session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    if let Some(user) = user {
        tracing::info!(user_id = %user.id, "Signed out");
    }
    Ok(StatusCode::NO_CONTENT)
}
