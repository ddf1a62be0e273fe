//! Per-browser state kept on the server.
//!
//! The session cookie only carries a [`BrowserId`]. The browser's storage
//! and history mirror live here, each behind its own async mutex, so a
//! request holds the browser for the whole restore, apply and persist step
//! and concurrent requests from one browser run one after another.
//!
//! Entries are dropped after the same idle period as the session.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::app::App;
use crate::catalog::Catalog;
use crate::render::Document;
use crate::router::{History, Location};
use crate::store::MemoryStorage;

/// Identifies one browser across requests; stored in its session.
pub type BrowserId = Uuid;

/// Everything a browser would keep client-side.
#[derive(Debug, Default)]
pub struct BrowserState {
    /// Local storage, holding the app state snapshot.
    pub storage: MemoryStorage,
    /// History mirror; `None` until the first location is opened.
    pub history: Option<History>,
}

impl BrowserState {
    /// Rebuild the browser's app.
    ///
    /// A browser without a history starts with a single entry at `initial`.
    #[must_use]
    pub fn app(&self, catalog: Arc<Catalog>, initial: Location) -> App {
        let history = self
            .history
            .clone()
            .unwrap_or_else(|| History::new(initial));
        App::restore(catalog, self.storage.clone(), history)
    }

    /// Keep the app's storage and history; returns what to send the browser.
    pub fn commit(&mut self, app: App) -> (Document, Location) {
        let document = app.document();
        let location = app.location().clone();
        let (storage, history) = app.into_parts();
        self.storage = storage;
        self.history = Some(history);
        (document, location)
    }
}

/// A browser checked out for the duration of one request.
pub type BrowserGuard = OwnedMutexGuard<BrowserState>;

/// All known browsers.
#[derive(Clone)]
pub struct Browsers {
    cache: Cache<BrowserId, Arc<Mutex<BrowserState>>>,
}

impl Browsers {
    /// Registry whose entries expire after `idle` without a request.
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        let cache = Cache::builder().time_to_idle(idle).build();
        Self { cache }
    }

    /// Lock `id`'s state, creating it on first use.
    ///
    /// Waits while another request holds the same browser.
    pub async fn checkout(&self, id: BrowserId) -> BrowserGuard {
        let entry = self
            .cache
            .get_with(id, async { Arc::new(Mutex::new(BrowserState::default())) })
            .await;
        entry.lock_owned().await
    }
}

impl std::fmt::Debug for Browsers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Browsers")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use sneaker_shop_core::ProductId;

    use super::*;
    use crate::actions::Event;

    const IDLE: Duration = Duration::from_secs(60);

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::sneaker_company().unwrap())
    }

    #[tokio::test]
    async fn test_commit_is_seen_by_next_checkout() {
        let browsers = Browsers::new(IDLE);
        let id = Uuid::new_v4();
        let catalog = catalog();

        {
            let mut browser = browsers.checkout(id).await;
            let mut app = browser.app(Arc::clone(&catalog), Location::product(ProductId::new(2)));
            app.open(Location::product(ProductId::new(2)));
            app.dispatch(Event::Increment);
            browser.commit(app);
        }

        let browser = browsers.checkout(id).await;
        let app = browser.app(catalog, Location::default());
        assert_eq!(app.state().product.id, ProductId::new(2));
        assert_eq!(app.state().quantity, 1);
        assert_eq!(app.location().href(), "/product?id=2");
    }

    #[tokio::test]
    async fn test_browsers_are_isolated() {
        let browsers = Browsers::new(IDLE);
        let catalog = catalog();

        {
            let mut browser = browsers.checkout(Uuid::new_v4()).await;
            let mut app = browser.app(Arc::clone(&catalog), Location::default());
            app.dispatch(Event::Increment);
            browser.commit(app);
        }

        let browser = browsers.checkout(Uuid::new_v4()).await;
        assert!(browser.history.is_none());
        assert_eq!(browser.app(catalog, Location::default()).state().quantity, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_checkout_serializes_one_browser() {
        let browsers = Browsers::new(IDLE);
        let id = Uuid::new_v4();
        let catalog = catalog();

        let tasks: Vec<_> = (0..32)
            .map(|_| {
                let browsers = browsers.clone();
                let catalog = Arc::clone(&catalog);
                tokio::spawn(async move {
                    let mut browser = browsers.checkout(id).await;
                    let mut app = browser.app(catalog, Location::default());
                    tokio::task::yield_now().await;
                    app.dispatch(Event::Increment);
                    browser.commit(app);
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let browser = browsers.checkout(id).await;
        assert_eq!(browser.app(catalog, Location::default()).state().quantity, 32);
    }
}
