//! Business logic services for storefront.
//!
//! - `auth` - Credentials registration and sign-in

pub mod auth;
