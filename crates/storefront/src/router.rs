//! Location-driven routing.
//!
//! The router keeps a mirror of the browser's history stack and maps the
//! current [`Location`] onto store updates:
//!
//! ```text
//! /product?id=<int>   product page (id defaults to 1, unknown ids redirect to 1)
//! /men, /women        product list filtered by tag
//! /cart, /checkout, /profile, /orders, /settings, /help, /about
//!                     reserved, recognized without a state change
//! anything else       ignored
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sneaker_shop_core::ProductId;
use url::Url;

use crate::catalog::Catalog;
use crate::store::{StatePatch, Storage, Store, ViewName};

/// Origin used to resolve relative hrefs. Only path and query are kept.
const RESOLVE_BASE: &str = "http://localhost/";

/// Oldest entries are forgotten beyond this many back entries.
const MAX_BACK_ENTRIES: usize = 50;

/// Reserved paths and the view they will eventually select.
const RESERVED: &[(&str, ViewName)] = &[
    ("/cart", ViewName::Cart),
    ("/checkout", ViewName::Checkout),
    ("/profile", ViewName::Profile),
    ("/orders", ViewName::Orders),
    ("/settings", ViewName::Settings),
    ("/help", ViewName::Help),
    ("/about", ViewName::About),
];

/// Path plus optional query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    path: String,
    query: Option<String>,
}

impl Location {
    /// Resolve an href (absolute path, relative path or full URL).
    ///
    /// # Errors
    ///
    /// Returns the URL parser error for hrefs that cannot be resolved.
    pub fn parse(href: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(RESOLVE_BASE)?.join(href)?;
        Ok(Self {
            path: url.path().to_owned(),
            query: url.query().filter(|q| !q.is_empty()).map(str::to_owned),
        })
    }

    /// `/product?id=<id>`.
    #[must_use]
    pub fn product(id: ProductId) -> Self {
        Self {
            path: "/product".to_owned(),
            query: Some(format!("id={id}")),
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// First value of query parameter `name`, percent-decoded.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    #[must_use]
    pub fn href(&self) -> String {
        self.to_string()
    }
}

impl Default for Location {
    fn default() -> Self {
        Self {
            path: "/".to_owned(),
            query: None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.query {
            Some(query) => write!(f, "{}?{query}", self.path),
            None => f.write_str(&self.path),
        }
    }
}

/// What a location means to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Product(ProductId),
    Listing(ViewName),
    Reserved(ViewName),
    Unknown,
}

impl Route {
    #[must_use]
    pub fn recognize(location: &Location) -> Self {
        match location.path() {
            "/product" => {
                let id = location
                    .param("id")
                    .and_then(|raw| raw.parse::<ProductId>().ok())
                    .unwrap_or(ProductId::DEFAULT);
                Self::Product(id)
            }
            "/men" => Self::Listing(ViewName::Men),
            "/women" => Self::Listing(ViewName::Women),
            path => RESERVED
                .iter()
                .find(|(reserved, _)| *reserved == path)
                .map_or(Self::Unknown, |(_, view)| Self::Reserved(*view)),
        }
    }
}

/// Server-side mirror of a browser tab's history stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    back: Vec<Location>,
    current: Location,
    forward: Vec<Location>,
}

impl History {
    #[must_use]
    pub const fn new(initial: Location) -> Self {
        Self {
            back: Vec::new(),
            current: initial,
            forward: Vec::new(),
        }
    }

    #[must_use]
    pub const fn current(&self) -> &Location {
        &self.current
    }

    /// Add an entry after the current one, dropping any forward entries.
    pub fn push(&mut self, location: Location) {
        let previous = std::mem::replace(&mut self.current, location);
        self.back.push(previous);
        if self.back.len() > MAX_BACK_ENTRIES {
            self.back.remove(0);
        }
        self.forward.clear();
    }

    /// Overwrite the current entry.
    pub fn replace(&mut self, location: Location) {
        self.current = location;
    }

    /// Step back. Returns `false` at the oldest entry.
    pub fn back(&mut self) -> bool {
        let Some(previous) = self.back.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, previous);
        self.forward.push(current);
        true
    }

    /// Step forward. Returns `false` at the newest entry.
    pub fn forward(&mut self) -> bool {
        let Some(next) = self.forward.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.current, next);
        self.back.push(current);
        true
    }

    /// Follow a browser-reported move to `location`.
    ///
    /// Adjacent entries are treated as back/forward steps; anything else
    /// replaces the current entry.
    pub fn restore(&mut self, location: Location) {
        if self.back.last() == Some(&location) {
            self.back();
        } else if self.forward.last() == Some(&location) {
            self.forward();
        } else if self.current != location {
            self.replace(location);
        }
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }

    /// Total number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.back.len() + 1 + self.forward.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Location::default())
    }
}

/// Maps the current history entry onto the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Router {
    history: History,
}

impl Router {
    #[must_use]
    pub const fn new(history: History) -> Self {
        Self { history }
    }

    #[must_use]
    pub const fn location(&self) -> &Location {
        self.history.current()
    }

    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn into_history(self) -> History {
        self.history
    }

    /// Apply the current location to the store.
    pub fn on_location_change<S: Storage>(&mut self, store: &mut Store<S>, catalog: &Catalog) {
        match Route::recognize(self.location()) {
            Route::Product(id) => match catalog.get(id) {
                Some(product) => store.set_state(
                    StatePatch::new()
                        .product(Arc::clone(product))
                        .selected_image(0)
                        .view(ViewName::Product),
                ),
                None if id == ProductId::DEFAULT => {
                    tracing::warn!(product_id = %id, "Default product missing from catalog");
                    store.set_state(
                        StatePatch::new()
                            .product(Arc::clone(catalog.first()))
                            .selected_image(0)
                            .view(ViewName::Product),
                    );
                }
                None => {
                    tracing::warn!(
                        product_id = %id,
                        "Product not found, redirecting to default product"
                    );
                    self.history.replace(Location::product(ProductId::DEFAULT));
                    self.on_location_change(store, catalog);
                }
            },
            Route::Listing(view) => store.set_state(StatePatch::new().view(view)),
            Route::Reserved(view) => {
                tracing::debug!(view = %view, "Reserved route, no state change");
            }
            Route::Unknown => {
                tracing::debug!(location = %self.location(), "Unrecognized location");
            }
        }
    }

    /// Push `href` and route to it immediately.
    pub fn navigate_to<S: Storage>(&mut self, href: &str, store: &mut Store<S>, catalog: &Catalog) {
        match Location::parse(href) {
            Ok(location) => {
                self.history.push(location);
                self.on_location_change(store, catalog);
            }
            Err(e) => tracing::warn!(href, error = %e, "Ignoring navigation to malformed href"),
        }
    }

    /// A page load at `location`; reloads keep the current entry.
    pub fn open<S: Storage>(&mut self, location: Location, store: &mut Store<S>, catalog: &Catalog) {
        if *self.location() != location {
            self.history.push(location);
        }
        self.on_location_change(store, catalog);
    }

    /// Browser back button.
    pub fn back<S: Storage>(&mut self, store: &mut Store<S>, catalog: &Catalog) -> bool {
        let moved = self.history.back();
        if moved {
            self.on_location_change(store, catalog);
        }
        moved
    }

    /// Browser forward button.
    pub fn forward<S: Storage>(&mut self, store: &mut Store<S>, catalog: &Catalog) -> bool {
        let moved = self.history.forward();
        if moved {
            self.on_location_change(store, catalog);
        }
        moved
    }

    /// The browser moved through its history to `location`.
    pub fn pop_state<S: Storage>(
        &mut self,
        location: Location,
        store: &mut Store<S>,
        catalog: &Catalog,
    ) {
        self.history.restore(location);
        self.on_location_change(store, catalog);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{AppState, MemoryStorage};

    fn setup() -> (Catalog, Store, Router) {
        let catalog = Catalog::sneaker_company().unwrap();
        let store = Store::new(AppState::new(&catalog), MemoryStorage::new());
        (catalog, store, Router::default())
    }

    fn loc(href: &str) -> Location {
        Location::parse(href).unwrap()
    }

    #[test]
    fn test_location_parse() {
        let location = loc("/product?id=3");
        assert_eq!(location.path(), "/product");
        assert_eq!(location.param("id").as_deref(), Some("3"));
        assert_eq!(location.href(), "/product?id=3");

        assert_eq!(loc("/men?").query(), None);
        assert_eq!(loc("men").path(), "/men");
        assert_eq!(loc("https://elsewhere.example/women?x=1").href(), "/women?x=1");
        assert_eq!(loc("/product?id=%32").param("id").as_deref(), Some("2"));
    }

    #[test]
    fn test_recognize() {
        assert_eq!(
            Route::recognize(&loc("/product?id=2")),
            Route::Product(ProductId::new(2))
        );
        assert_eq!(Route::recognize(&loc("/product")), Route::Product(ProductId::DEFAULT));
        assert_eq!(
            Route::recognize(&loc("/product?id=abc")),
            Route::Product(ProductId::DEFAULT)
        );
        assert_eq!(Route::recognize(&loc("/men")), Route::Listing(ViewName::Men));
        assert_eq!(Route::recognize(&loc("/women")), Route::Listing(ViewName::Women));
        assert_eq!(Route::recognize(&loc("/help")), Route::Reserved(ViewName::Help));
        assert_eq!(Route::recognize(&loc("/")), Route::Unknown);
        assert_eq!(Route::recognize(&loc("/men/")), Route::Unknown);
    }

    #[test]
    fn test_every_product_id_routes() {
        let (catalog, mut store, mut router) = setup();
        let ids: Vec<ProductId> = catalog.iter().map(|p| p.id).collect();

        for id in ids {
            store.set_state(StatePatch::new().selected_image(2).view(ViewName::Men));
            router.navigate_to(&format!("/product?id={id}"), &mut store, &catalog);

            assert_eq!(store.state().product.id, id);
            assert_eq!(store.state().selected_image, 0);
            assert_eq!(store.state().view, ViewName::Product);
            assert_eq!(*router.location(), Location::product(id));
        }
    }

    #[test]
    fn test_unknown_id_redirects_to_default() {
        let (catalog, mut store, mut router) = setup();
        router.navigate_to("/product?id=2", &mut store, &catalog);
        router.navigate_to("/product?id=999", &mut store, &catalog);

        assert_eq!(store.state().product.id, ProductId::DEFAULT);
        assert_eq!(router.location().href(), "/product?id=1");

        // the invalid entry was replaced, so back returns to product 2
        assert!(router.back(&mut store, &catalog));
        assert_eq!(store.state().product.id, ProductId::new(2));
    }

    #[test]
    fn test_malformed_id_is_default_product() {
        let (catalog, mut store, mut router) = setup();
        router.navigate_to("/product?id=3", &mut store, &catalog);
        router.navigate_to("/product?id=three", &mut store, &catalog);

        assert_eq!(store.state().product.id, ProductId::DEFAULT);
        // not a redirect: the location is kept as requested
        assert_eq!(router.location().href(), "/product?id=three");
    }

    #[test]
    fn test_listing_routes_only_change_view() {
        let (catalog, mut store, mut router) = setup();
        router.navigate_to("/product?id=4", &mut store, &catalog);
        store.set_state(StatePatch::new().selected_image(1));

        router.navigate_to("/women", &mut store, &catalog);
        assert_eq!(store.state().view, ViewName::Women);
        assert_eq!(store.state().product.id, ProductId::new(4));
        assert_eq!(store.state().selected_image, 1);
    }

    #[test]
    fn test_reserved_and_unknown_paths_leave_state() {
        let (catalog, mut store, mut router) = setup();
        router.navigate_to("/men", &mut store, &catalog);
        let before = store.state().clone();

        for href in ["/cart", "/checkout", "/profile", "/orders", "/settings", "/help", "/about", "/nope"] {
            router.navigate_to(href, &mut store, &catalog);
            assert_eq!(*store.state(), before, "{href} changed state");
            assert_eq!(router.location().path(), href);
        }
    }

    #[test]
    fn test_back_and_forward_rerun_routing() {
        let (catalog, mut store, mut router) = setup();
        router.navigate_to("/product?id=2", &mut store, &catalog);
        router.navigate_to("/men", &mut store, &catalog);
        router.navigate_to("/product?id=3", &mut store, &catalog);

        assert!(router.back(&mut store, &catalog));
        assert_eq!(store.state().view, ViewName::Men);
        assert!(router.back(&mut store, &catalog));
        assert_eq!(store.state().product.id, ProductId::new(2));
        assert_eq!(store.state().view, ViewName::Product);

        assert!(router.forward(&mut store, &catalog));
        assert_eq!(store.state().view, ViewName::Men);
        assert!(router.forward(&mut store, &catalog));
        assert_eq!(store.state().product.id, ProductId::new(3));
        assert!(!router.forward(&mut store, &catalog));
    }

    #[test]
    fn test_navigate_clears_forward_entries() {
        let (catalog, mut store, mut router) = setup();
        router.navigate_to("/men", &mut store, &catalog);
        router.navigate_to("/women", &mut store, &catalog);
        router.back(&mut store, &catalog);
        router.navigate_to("/product?id=4", &mut store, &catalog);

        assert!(!router.history().can_go_forward());
        assert_eq!(router.history().len(), 3);
    }

    #[test]
    fn test_pop_state_matches_adjacent_entries() {
        let (catalog, mut store, mut router) = setup();
        router.navigate_to("/men", &mut store, &catalog);
        router.navigate_to("/women", &mut store, &catalog);

        router.pop_state(loc("/men"), &mut store, &catalog);
        assert_eq!(store.state().view, ViewName::Men);
        assert!(router.history().can_go_forward());

        router.pop_state(loc("/women"), &mut store, &catalog);
        assert_eq!(store.state().view, ViewName::Women);
        assert!(!router.history().can_go_forward());
    }

    #[test]
    fn test_open_does_not_duplicate_reloads() {
        let (catalog, mut store, mut router) = setup();
        router.open(loc("/product?id=2"), &mut store, &catalog);
        router.open(loc("/product?id=2"), &mut store, &catalog);
        assert_eq!(router.history().len(), 2);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = History::default();
        for n in 0..(MAX_BACK_ENTRIES + 10) {
            history.push(loc(&format!("/product?id={n}")));
        }
        assert_eq!(history.len(), MAX_BACK_ENTRIES + 1);
    }
}
