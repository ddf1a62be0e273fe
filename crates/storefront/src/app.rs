//! Application context.
//!
//! [`App`] owns everything one browser needs: the store, the router with
//! its history mirror and the rendered document. The catalog is shared
//! read-only. Handlers build an `App` from the session, apply one location
//! change or event, then take the storage and history back out with
//! [`App::into_parts`].

use std::sync::Arc;

use crate::actions::{self, Event};
use crate::catalog::Catalog;
use crate::render::{self, Document, SharedDocument};
use crate::router::{History, Location, Router};
use crate::store::{AppState, MemoryStorage, Storage, Store};

pub struct App<S: Storage = MemoryStorage> {
    catalog: Arc<Catalog>,
    store: Store<S>,
    router: Router,
    document: SharedDocument,
}

impl<S: Storage> App<S> {
    /// Fresh app with a single history entry at `/`.
    pub fn new(catalog: Arc<Catalog>, storage: S) -> Self {
        Self::restore(catalog, storage, History::default())
    }

    /// Rebuild an app from persisted storage and history, and render it.
    pub fn restore(catalog: Arc<Catalog>, storage: S, history: History) -> Self {
        let mut store = Store::restore(&catalog, storage);
        let document = SharedDocument::new();
        render::attach(&mut store, Arc::clone(&catalog), document.clone());
        Self {
            catalog,
            store,
            router: Router::new(history),
            document,
        }
    }

    /// Page load (or reload) at `location`.
    pub fn open(&mut self, location: Location) {
        self.router.open(location, &mut self.store, &self.catalog);
    }

    /// In-app link click.
    pub fn navigate_to(&mut self, href: &str) {
        self.router.navigate_to(href, &mut self.store, &self.catalog);
    }

    /// Browser history navigation to `location`.
    pub fn pop_state(&mut self, location: Location) {
        self.router.pop_state(location, &mut self.store, &self.catalog);
    }

    pub fn back(&mut self) -> bool {
        self.router.back(&mut self.store, &self.catalog)
    }

    pub fn forward(&mut self) -> bool {
        self.router.forward(&mut self.store, &self.catalog)
    }

    /// Apply a UI event. Returns `false` if it was a no-op.
    pub fn dispatch(&mut self, event: Event) -> bool {
        match actions::reduce(self.store.state(), event) {
            Some(patch) => {
                tracing::debug!(?event, "Dispatching event");
                self.store.set_state(patch);
                true
            }
            None => {
                tracing::debug!(?event, "Event changed nothing");
                false
            }
        }
    }

    pub const fn state(&self) -> &AppState {
        self.store.state()
    }

    pub const fn location(&self) -> &Location {
        self.router.location()
    }

    pub const fn history(&self) -> &History {
        self.router.history()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The last rendered output.
    pub fn document(&self) -> Document {
        self.document.snapshot()
    }

    /// Storage and history to persist for the next request.
    pub fn into_parts(self) -> (S, History) {
        (self.store.into_storage(), self.router.into_history())
    }
}
