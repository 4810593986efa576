//! Account management commands.
//!
//! # Usage
//!
//! ```bash
//! em-cli user create --first-name Ada --last-name Lovelace \
//!     --email ada@example.com --password 'correct horse battery'
//! ```
//!
//! Accounts go through the same validation and hashing as sign-up.

use emerald_core::UserId;
use emerald_storefront::db::{self, UserRepository};
use emerald_storefront::services::auth::{AuthError, AuthService, Registration};

use super::{CommandError, database_url};

/// Errors that can occur during account operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Create a storefront account.
///
/// # Returns
///
/// The ID of the created user.
///
/// # Errors
///
/// Returns `UserError` if the form is invalid, the email is taken, or the
/// database is unreachable.
pub async fn create(registration: Registration) -> Result<UserId, UserError> {
    let url = database_url()?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(&url).await?;

    let auth = AuthService::new(UserRepository::new(&pool));
    let user = auth.register(registration).await?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );
    Ok(user.id)
}
