//! Render loop.
//!
//! The store never touches markup. [`attach`] subscribes a listener that
//! rebuilds the view from each new state and swaps it into a
//! [`SharedDocument`], the server-side stand-in for the page's `#app`
//! element. Identical output leaves the document (and its revision) alone.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use askama::Template;

use crate::catalog::Catalog;
use crate::store::{AppState, Storage, Store, SubscriptionId};
use crate::views::{self, FragmentTemplate, PageTemplate};

/// Last rendered output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    /// Inner HTML of `#app`.
    pub html: String,
    /// Incremented each time the content actually changes.
    pub revision: u64,
}

impl Document {
    /// Wrap the rendered app in the full page layout.
    #[must_use]
    pub fn page(&self) -> PageTemplate {
        PageTemplate {
            title: self.title.clone(),
            app: self.html.clone(),
        }
    }

    /// Just the `#app` contents, for htmx swaps.
    #[must_use]
    pub fn fragment(&self) -> FragmentTemplate {
        FragmentTemplate {
            title: self.title.clone(),
            app: self.html.clone(),
        }
    }
}

/// Render target shared between the render listener and its owner.
#[derive(Debug, Clone, Default)]
pub struct SharedDocument(Arc<Mutex<Document>>);

impl SharedDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current document.
    #[must_use]
    pub fn snapshot(&self) -> Document {
        self.lock().clone()
    }

    /// Replace the content. Returns `false` when nothing changed.
    pub fn apply(&self, title: String, html: String) -> bool {
        let mut document = self.lock();
        if document.title == title && document.html == html {
            return false;
        }
        document.title = title;
        document.html = html;
        document.revision += 1;
        true
    }

    fn lock(&self) -> MutexGuard<'_, Document> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Render `state` to its page title and `#app` markup.
///
/// # Errors
///
/// Returns an error if a template fails to render.
pub fn render(state: &AppState, catalog: &Catalog) -> Result<(String, String), askama::Error> {
    let html = views::app(state, catalog).render()?;
    Ok((views::title(state), html))
}

/// Render `state` into `document` once.
pub fn paint(state: &AppState, catalog: &Catalog, document: &SharedDocument) {
    match render(state, catalog) {
        Ok((title, html)) => {
            if document.apply(title, html) {
                tracing::trace!(view = %state.view, "Document updated");
            }
        }
        Err(e) => tracing::error!(error = %e, view = %state.view, "Failed to render view"),
    }
}

/// Subscribe a listener that repaints `document` on every state change,
/// and paint the current state right away.
pub fn attach<S: Storage>(
    store: &mut Store<S>,
    catalog: Arc<Catalog>,
    document: SharedDocument,
) -> SubscriptionId {
    paint(store.state(), &catalog, &document);
    store.subscribe(move |state| paint(state, &catalog, &document))
}
