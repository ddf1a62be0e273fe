//! Pure view functions.
//!
//! Each function maps the current [`AppState`] (and the catalog) to a
//! template struct. Nothing here touches the store; the render loop calls
//! [`app`] after every state change and renders the result.

pub mod header;
pub mod listing;
pub mod product;

use askama::Template;
use askama_web::WebTemplate;

use crate::catalog::Catalog;
use crate::store::{AppState, ViewName};

pub use header::{CartItemView, CartView, HeaderView, NavLink};
pub use listing::{ListingView, ProductCardView};
pub use product::{DiscountView, GalleryView, OrderView, ProductInfoView, ProductPageView, ThumbnailView};

/// Site name appended to every page title.
pub const SITE_NAME: &str = "Sneaker Company";

/// Contents of the `#app` element.
#[derive(Debug, Clone, Template)]
#[template(path = "app.html")]
pub struct AppView {
    pub header: HeaderView,
    pub product_page: Option<ProductPageView>,
    pub listing: Option<ListingView>,
    pub placeholder: Option<PlaceholderView>,
}

/// Stand-in body for reserved views.
#[derive(Debug, Clone)]
pub struct PlaceholderView {
    pub title: &'static str,
}

/// Full HTML document around a rendered `#app`.
#[derive(Template, WebTemplate)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub title: String,
    pub app: String,
}

/// `#app` swap for htmx; the `<title>` updates the document title.
#[derive(Template, WebTemplate)]
#[template(path = "fragment.html")]
pub struct FragmentTemplate {
    pub title: String,
    pub app: String,
}

/// Build the UI description for `state`.
#[must_use]
pub fn app(state: &AppState, catalog: &Catalog) -> AppView {
    let header = header::header(state);
    match state.view {
        ViewName::Product => AppView {
            header,
            product_page: Some(product::product_page(state)),
            listing: None,
            placeholder: None,
        },
        ViewName::Men | ViewName::Women => AppView {
            header,
            product_page: None,
            listing: Some(listing::listing(state.view, catalog)),
            placeholder: None,
        },
        view => AppView {
            header,
            product_page: None,
            listing: None,
            placeholder: Some(PlaceholderView {
                title: view.title(),
            }),
        },
    }
}

/// Document title for `state`.
#[must_use]
pub fn title(state: &AppState) -> String {
    match state.view {
        ViewName::Product => format!("{} | {SITE_NAME}", state.product.name),
        view => format!("{} | {SITE_NAME}", view.title()),
    }
}
