//! Domain models for storefront accounts and sessions.

pub mod session;
pub mod user;

pub use session::{CurrentUser, keys as session_keys};
pub use user::{AuthorizedUser, NewUser, User, UserRecord};
