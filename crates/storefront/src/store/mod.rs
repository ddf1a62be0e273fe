//! Application state container.
//!
//! One [`Store`] owns the [`AppState`] of a browser. Every mutation goes
//! through [`Store::set_state`], which merges a [`StatePatch`], writes the
//! snapshot to storage and then notifies subscribers in registration order.
//! The store does not validate patches; callers keep the invariants (image
//! index in range, cart lines unique).

pub mod cart;
pub mod snapshot;
pub mod storage;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Product, Tag};

pub use cart::{Cart, CartLine};
pub use snapshot::{STORAGE_KEY, SnapshotError, StateSnapshot};
pub use storage::{MemoryStorage, Storage};

/// Top-level screen selected by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewName {
    #[default]
    Product,
    Cart,
    Checkout,
    Profile,
    Orders,
    Settings,
    Help,
    About,
    Men,
    Women,
}

impl ViewName {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Cart => "cart",
            Self::Checkout => "checkout",
            Self::Profile => "profile",
            Self::Orders => "orders",
            Self::Settings => "settings",
            Self::Help => "help",
            Self::About => "about",
            Self::Men => "men",
            Self::Women => "women",
        }
    }

    /// Heading shown for the view.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::Cart => "Cart",
            Self::Checkout => "Checkout",
            Self::Profile => "Profile",
            Self::Orders => "Orders",
            Self::Settings => "Settings",
            Self::Help => "Help",
            Self::About => "About",
            Self::Men => "Men",
            Self::Women => "Women",
        }
    }

    /// Catalog tag listed by this view, if it is a product list.
    #[must_use]
    pub const fn tag(self) -> Option<Tag> {
        match self {
            Self::Men => Some(Tag::Men),
            Self::Women => Some(Tag::Women),
            _ => None,
        }
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the views render from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    /// Current product, shared with the catalog.
    pub product: Arc<Product>,
    /// Index into `product.images`.
    pub selected_image: usize,
    /// Quantity picked with the stepper, not yet in the cart.
    pub quantity: u32,
    pub cart: Cart,
    pub view: ViewName,
    pub cart_open: bool,
}

impl AppState {
    /// Initial state: first catalog product, first image, nothing picked.
    #[must_use]
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            product: Arc::clone(catalog.first()),
            selected_image: 0,
            quantity: 0,
            cart: Cart::new(),
            view: ViewName::Product,
            cart_open: false,
        }
    }
}

/// A partial update; present fields replace the current ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct StatePatch {
    pub product: Option<Arc<Product>>,
    pub selected_image: Option<usize>,
    pub quantity: Option<u32>,
    pub cart: Option<Cart>,
    pub view: Option<ViewName>,
    pub cart_open: Option<bool>,
}

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product(mut self, product: Arc<Product>) -> Self {
        self.product = Some(product);
        self
    }

    pub fn selected_image(mut self, index: usize) -> Self {
        self.selected_image = Some(index);
        self
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn cart(mut self, cart: Cart) -> Self {
        self.cart = Some(cart);
        self
    }

    pub fn view(mut self, view: ViewName) -> Self {
        self.view = Some(view);
        self
    }

    pub fn cart_open(mut self, open: bool) -> Self {
        self.cart_open = Some(open);
        self
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.product.is_none()
            && self.selected_image.is_none()
            && self.quantity.is_none()
            && self.cart.is_none()
            && self.view.is_none()
            && self.cart_open.is_none()
    }

    fn merge_into(self, state: &mut AppState) {
        if let Some(product) = self.product {
            state.product = product;
        }
        if let Some(index) = self.selected_image {
            state.selected_image = index;
        }
        if let Some(quantity) = self.quantity {
            state.quantity = quantity;
        }
        if let Some(cart) = self.cart {
            state.cart = cart;
        }
        if let Some(view) = self.view {
            state.view = view;
        }
        if let Some(open) = self.cart_open {
            state.cart_open = open;
        }
    }
}

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback run after every state change.
pub type Listener = Box<dyn FnMut(&AppState) + Send>;

/// Owned state with subscribe/notify and storage persistence.
pub struct Store<S = MemoryStorage> {
    state: AppState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    storage: S,
}

impl<S: Storage> Store<S> {
    /// Create a store around an explicit state. Nothing is persisted yet.
    pub const fn new(state: AppState, storage: S) -> Self {
        Self {
            state,
            listeners: Vec::new(),
            next_subscription: 0,
            storage,
        }
    }

    /// Create a store from the snapshot in `storage`, or defaults.
    pub fn restore(catalog: &Catalog, storage: S) -> Self {
        let state = match storage.get_item(STORAGE_KEY) {
            Some(text) => snapshot::decode(text, catalog).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding stored app state");
                AppState::new(catalog)
            }),
            None => AppState::new(catalog),
        };
        Self::new(state, storage)
    }

    /// Current state (read-only).
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Merge `patch`, persist, then notify every subscriber.
    pub fn set_state(&mut self, patch: StatePatch) {
        patch.merge_into(&mut self.state);
        self.persist();

        tracing::debug!(
            product = %self.state.product.id,
            view = %self.state.view,
            selected_image = self.state.selected_image,
            quantity = self.state.quantity,
            cart_lines = self.state.cart.len(),
            "State updated"
        );

        for (_, listener) in &mut self.listeners {
            listener(&self.state);
        }
    }

    /// Register a listener called after every [`Store::set_state`].
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&AppState) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) {
        match snapshot::encode(&self.state) {
            Ok(text) => self.storage.set_item(STORAGE_KEY, text),
            Err(e) => tracing::warn!(error = %e, "Failed to persist app state"),
        }
    }
}

impl<S> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use sneaker_shop_core::ProductId;

    use super::*;

    fn catalog() -> Catalog {
        Catalog::sneaker_company().unwrap()
    }

    #[test]
    fn test_default_state() {
        let catalog = catalog();
        let state = AppState::new(&catalog);
        assert_eq!(state.product.id, ProductId::new(1));
        assert_eq!(state.selected_image, 0);
        assert_eq!(state.quantity, 0);
        assert!(state.cart.is_empty());
        assert_eq!(state.view, ViewName::Product);
        assert!(!state.cart_open);
    }

    #[test]
    fn test_set_state_merges_only_present_fields() {
        let catalog = catalog();
        let mut store = Store::new(AppState::new(&catalog), MemoryStorage::new());

        store.set_state(StatePatch::new().quantity(3).cart_open(true));
        store.set_state(StatePatch::new().view(ViewName::Men));

        let state = store.state();
        assert_eq!(state.quantity, 3);
        assert!(state.cart_open);
        assert_eq!(state.view, ViewName::Men);
        assert_eq!(state.product.id, ProductId::new(1));
    }

    #[test]
    fn test_subscribers_notified_in_order() {
        let catalog = catalog();
        let mut store = Store::new(AppState::new(&catalog), MemoryStorage::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&seen);
        store.subscribe(move |state| first.lock().unwrap().push(("a", state.quantity)));
        let second = Arc::clone(&seen);
        store.subscribe(move |state| second.lock().unwrap().push(("b", state.quantity)));

        store.set_state(StatePatch::new().quantity(1));
        store.set_state(StatePatch::new());

        assert_eq!(
            *seen.lock().unwrap(),
            vec![("a", 1), ("b", 1), ("a", 1), ("b", 1)]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let catalog = catalog();
        let mut store = Store::new(AppState::new(&catalog), MemoryStorage::new());
        let calls = Arc::new(Mutex::new(0));

        let counter = Arc::clone(&calls);
        let id = store.subscribe(move |_| *counter.lock().unwrap() += 1);

        store.set_state(StatePatch::new().quantity(1));
        assert!(store.unsubscribe(id));
        store.set_state(StatePatch::new().quantity(2));

        assert_eq!(*calls.lock().unwrap(), 1);
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn test_set_state_persists_and_restores() {
        let catalog = catalog();
        let mut store = Store::new(AppState::new(&catalog), MemoryStorage::new());
        let bag = Arc::clone(catalog.get(ProductId::new(3)).unwrap());

        let mut cart = Cart::new();
        cart.add(&bag, 2);
        store.set_state(
            StatePatch::new()
                .product(Arc::clone(&bag))
                .selected_image(2)
                .cart(cart)
                .view(ViewName::Women),
        );
        let expected = store.state().clone();

        let storage = store.into_storage();
        assert!(storage.get_item(STORAGE_KEY).is_some());

        let restored = Store::restore(&catalog, storage);
        assert_eq!(*restored.state(), expected);
    }

    #[test]
    fn test_restore_without_snapshot_uses_defaults() {
        let catalog = catalog();
        let store = Store::restore(&catalog, MemoryStorage::new());
        assert_eq!(*store.state(), AppState::new(&catalog));
    }

    #[test]
    fn test_restore_discards_garbage() {
        let catalog = catalog();
        let mut storage = MemoryStorage::new();
        storage.set_item(STORAGE_KEY, "{not json".to_string());

        let store = Store::restore(&catalog, storage);
        assert_eq!(*store.state(), AppState::new(&catalog));
    }

    #[test]
    fn test_view_tags() {
        assert_eq!(ViewName::Men.tag(), Some(Tag::Men));
        assert_eq!(ViewName::Women.tag(), Some(Tag::Women));
        assert_eq!(ViewName::Cart.tag(), None);
        assert_eq!(ViewName::Checkout.to_string(), "checkout");
    }
}
