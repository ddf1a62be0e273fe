//! Server state shared across handlers.
//!
//! Distinct from [`crate::store::AppState`], which is one browser's UI
//! state. Config and catalog are read-only after startup; per-browser state
//! sits in [`Browsers`], one lock per browser.

use std::sync::Arc;
use std::time::Duration;

use crate::browsers::Browsers;
use crate::catalog::Catalog;
use crate::config::StorefrontConfig;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Server state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration, the product catalog and the browser registry.
#[derive(Clone)]
pub struct ServerState {
    inner: Arc<ServerStateInner>,
}

struct ServerStateInner {
    config: StorefrontConfig,
    catalog: Arc<Catalog>,
    browsers: Browsers,
}

impl ServerState {
    /// Create a new server state.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        let idle = Duration::from_secs(
            config
                .session_expiry_days
                .unsigned_abs()
                .saturating_mul(SECONDS_PER_DAY),
        );
        Self {
            inner: Arc::new(ServerStateInner {
                config,
                catalog: Arc::new(catalog),
                browsers: Browsers::new(idle),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.inner.catalog
    }

    /// Per-browser storage and history.
    #[must_use]
    pub fn browsers(&self) -> &Browsers {
        &self.inner.browsers
    }
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.inner.config)
            .field("products", &self.inner.catalog.len())
            .field("browsers", &self.inner.browsers)
            .finish()
    }
}
