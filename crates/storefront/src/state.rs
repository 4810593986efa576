//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::pricing::PromoPolicy;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    catalog: Catalog,
    promo: PromoPolicy,
}

impl AppState {
    /// Create a new application state over the built-in catalog.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        Self::with_catalog(config, pool, Catalog::builtin())
    }

    /// Create a new application state with a specific catalog.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, pool: PgPool, catalog: Catalog) -> Self {
        let promo = config.promo.policy();
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog,
                promo,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the checkout promo policy.
    #[must_use]
    pub fn promo(&self) -> &PromoPolicy {
        &self.inner.promo
    }
}
