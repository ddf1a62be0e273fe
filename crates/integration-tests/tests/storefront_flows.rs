//! Library-level flows: catalog, store, router and render loop wired
//! together through `App`, with storage and history carried between
//! "page loads" the way the server carries them in the session.

use std::sync::{Arc, Mutex};

use sneaker_shop_core::ProductId;
use sneaker_shop_storefront::actions::Event;
use sneaker_shop_storefront::app::App;
use sneaker_shop_storefront::catalog::Catalog;
use sneaker_shop_storefront::router::{History, Location};
use sneaker_shop_storefront::store::{
    AppState, MemoryStorage, STORAGE_KEY, StatePatch, Storage, Store, ViewName,
};

fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::sneaker_company().expect("fixture catalog"))
}

fn loc(href: &str) -> Location {
    Location::parse(href).expect("valid href")
}

fn app_at(href: &str) -> App {
    let mut app = App::restore(catalog(), MemoryStorage::new(), History::new(loc(href)));
    app.open(loc(href));
    app
}

// ============================================================================
// Routing
// ============================================================================

#[test]
fn test_every_product_is_reachable() {
    let catalog = catalog();
    let mut app = app_at("/product?id=1");

    for product in catalog.iter() {
        app.dispatch(Event::NextImage);
        app.navigate_to(&product.href());

        assert_eq!(app.state().product.id, product.id);
        assert_eq!(app.state().selected_image, 0);
        assert_eq!(app.state().view, ViewName::Product);
        assert!(app.document().html.contains(&product.name));
    }
}

#[test]
fn test_unknown_product_redirects_without_history_entry() {
    let mut app = app_at("/men");
    app.navigate_to("/product?id=42");

    assert_eq!(app.location().href(), "/product?id=1");
    assert_eq!(app.state().product.id, ProductId::new(1));

    assert!(app.back());
    assert_eq!(app.location().href(), "/men");
    assert!(app.forward());
    assert_eq!(app.location().href(), "/product?id=1");
}

#[test]
fn test_malformed_id_means_default_product() {
    let mut app = app_at("/product?id=3");
    app.navigate_to("/product?id=abc");
    assert_eq!(app.state().product.id, ProductId::new(1));
    assert_eq!(app.location().href(), "/product?id=abc");
}

#[test]
fn test_reserved_and_unknown_paths_keep_state() {
    let mut app = app_at("/product?id=2");
    let before = app.state().clone();

    app.navigate_to("/checkout");
    assert_eq!(app.state(), &before);
    app.navigate_to("/nowhere");
    assert_eq!(app.state(), &before);
    assert_eq!(app.history().len(), 3);
}

#[test]
fn test_listing_then_card() {
    let mut app = app_at("/women");
    assert_eq!(app.state().view, ViewName::Women);
    assert!(app.document().html.contains("Urban Explorer Bag"));
    assert!(!app.document().html.contains("Concept Sports Car"));

    app.navigate_to("/product?id=3");
    assert_eq!(app.state().view, ViewName::Product);
    assert_eq!(app.document().title, "Urban Explorer Bag | Sneaker Company");
}

#[test]
fn test_pop_state_follows_browser() {
    let mut app = app_at("/product?id=1");
    app.navigate_to("/men");
    app.navigate_to("/product?id=4");

    app.pop_state(loc("/men"));
    assert_eq!(app.state().view, ViewName::Men);
    assert!(app.history().can_go_forward());

    app.pop_state(loc("/product?id=4"));
    assert_eq!(app.state().product.id, ProductId::new(4));
}

// ============================================================================
// Cart & Order Controls
// ============================================================================

#[test]
fn test_add_two_then_three_merges() {
    let mut app = app_at("/product?id=1");

    for _ in 0..2 {
        app.dispatch(Event::Increment);
    }
    app.dispatch(Event::AddToCart);
    for _ in 0..3 {
        app.dispatch(Event::Increment);
    }
    app.dispatch(Event::AddToCart);

    let cart = &app.state().cart;
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.line(ProductId::new(1)).map(|l| l.quantity), Some(5));
    assert_eq!(cart.total().display(), "$625.00");
    assert_eq!(app.state().quantity, 0);
}

#[test]
fn test_cart_across_products() {
    let mut app = app_at("/product?id=1");
    app.dispatch(Event::Increment);
    app.dispatch(Event::AddToCart);

    app.navigate_to("/product?id=4");
    app.dispatch(Event::Increment);
    app.dispatch(Event::Increment);
    app.dispatch(Event::AddToCart);
    app.dispatch(Event::ToggleCart);

    // 125.00 + 2 * 80.75
    assert_eq!(app.state().cart.total().display(), "$286.50");
    let html = app.document().html;
    assert!(html.contains("Tech-Ready Backpack"));
    assert!(html.contains("$286.50"));

    app.dispatch(Event::RemoveLine(ProductId::new(1)));
    let ids: Vec<i32> = app
        .state()
        .cart
        .lines()
        .iter()
        .map(|l| l.product.id.as_i32())
        .collect();
    assert_eq!(ids, vec![4]);
}

#[test]
fn test_stepper_and_gallery_edges() {
    let mut app = app_at("/product?id=1");
    assert!(!app.dispatch(Event::Decrement));
    assert!(!app.dispatch(Event::AddToCart));
    assert!(app.state().cart.is_empty());

    assert!(app.dispatch(Event::PreviousImage));
    assert_eq!(app.state().selected_image, 3);
    assert!(app.dispatch(Event::NextImage));
    assert_eq!(app.state().selected_image, 0);
    assert!(!app.dispatch(Event::SelectImage(4)));
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_reload_restores_cart_and_resets_image() {
    let catalog = catalog();
    let mut app = app_at("/product?id=1");
    app.dispatch(Event::Increment);
    app.dispatch(Event::AddToCart);
    app.dispatch(Event::SelectImage(2));

    let (storage, history) = app.into_parts();
    let mut app = App::restore(catalog, storage, history);
    assert_eq!(app.state().selected_image, 2);

    app.open(loc("/product?id=1"));
    assert_eq!(app.state().cart.total_quantity(), 1);
    assert_eq!(app.state().selected_image, 0);
    assert_eq!(app.history().len(), 1);
}

#[test]
fn test_snapshot_is_json_under_fixed_key() {
    let mut app = app_at("/product?id=2");
    app.dispatch(Event::Increment);

    let (storage, _) = app.into_parts();
    let text = storage.get_item(STORAGE_KEY).expect("snapshot written");
    let json: serde_json::Value = serde_json::from_str(text).expect("valid json");

    assert_eq!(json["version"], 1);
    assert_eq!(json["state"]["product_id"], 2);
    assert_eq!(json["state"]["quantity"], 1);
    assert_eq!(json["state"]["view"], "product");
}

#[test]
fn test_corrupt_snapshot_falls_back_to_defaults() {
    let mut storage = MemoryStorage::new();
    storage.set_item(STORAGE_KEY, "{not json".to_string());

    let app = App::restore(catalog(), storage, History::default());
    assert_eq!(app.state(), &AppState::new(&catalog()));
}

// ============================================================================
// Subscriptions
// ============================================================================

#[test]
fn test_subscribers_see_every_change_in_order() {
    let catalog = catalog();
    let mut store = Store::new(AppState::new(&catalog), MemoryStorage::new());
    let seen = Arc::new(Mutex::new(Vec::new()));

    let first = {
        let seen = Arc::clone(&seen);
        store.subscribe(move |state: &AppState| {
            seen.lock().expect("lock").push(("first", state.quantity));
        })
    };
    {
        let seen = Arc::clone(&seen);
        store.subscribe(move |state: &AppState| {
            seen.lock().expect("lock").push(("second", state.quantity));
        });
    }

    store.set_state(StatePatch::new().quantity(1));
    assert!(store.unsubscribe(first));
    store.set_state(StatePatch::new().quantity(2));

    let seen = seen.lock().expect("lock").clone();
    assert_eq!(seen, vec![("first", 1), ("second", 1), ("second", 2)]);
}
