//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use emerald_core::{Email, UserId};

use super::user::AuthorizedUser;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name.
    pub name: String,
}

impl From<&AuthorizedUser> for CurrentUser {
    fn from(user: &AuthorizedUser) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: format!("{} {}", user.first_name, user.last_name),
        }
    }
}

/// Session keys.
///
/// The client collections are stored under their own keys
/// (see [`crate::persistence::COLLECTION_KEYS`]).
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
