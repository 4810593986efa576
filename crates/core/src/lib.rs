//! Emerald Core - Shared types library.
//!
//! This crate provides common types used across all Emerald components:
//! - `storefront` - Client-state stores, auth, and the JSON API
//! - `cli` - Command-line tools for migrations and local store inspection
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, and emails, plus the `Product` record

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
