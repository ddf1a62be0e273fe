//! Site header: navigation, cart button and the cart dropdown.

use crate::store::{AppState, Cart, CartLine, ViewName};

/// Links shown in the header navigation.
const NAV: &[(&str, &str, ViewName)] = &[
    ("Men", "/men", ViewName::Men),
    ("Women", "/women", ViewName::Women),
    ("About", "/about", ViewName::About),
    ("Help", "/help", ViewName::Help),
];

#[derive(Debug, Clone)]
pub struct HeaderView {
    pub nav: Vec<NavLink>,
    /// Total quantity in the cart, absent when the cart is empty.
    pub cart_badge: Option<u32>,
    pub cart_open: bool,
    pub cart: CartView,
}

#[derive(Debug, Clone)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
    pub class: &'static str,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
}

/// Cart item display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: i32,
    pub name: String,
    pub thumbnail: String,
    pub price: String,
    pub quantity: u32,
    pub line_price: String,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.product.id.as_i32(),
            name: line.product.name.clone(),
            thumbnail: line.product.cover_thumbnail().to_owned(),
            price: line.product.final_price.display(),
            quantity: line.quantity,
            line_price: line.line_total().display(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            total: cart.total().display(),
            item_count: cart.total_quantity(),
        }
    }
}

#[must_use]
pub fn header(state: &AppState) -> HeaderView {
    let nav = NAV
        .iter()
        .map(|&(label, href, view)| NavLink {
            label,
            href,
            class: if view == state.view {
                "site-nav__link site-nav__link--active"
            } else {
                "site-nav__link"
            },
        })
        .collect();

    let cart = CartView::from(&state.cart);
    HeaderView {
        nav,
        cart_badge: (cart.item_count > 0).then_some(cart.item_count),
        cart_open: state.cart_open,
        cart,
    }
}
