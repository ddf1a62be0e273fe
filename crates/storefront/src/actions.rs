//! UI events and the state changes they cause.

use sneaker_shop_core::ProductId;

use crate::store::{AppState, StatePatch};

/// An interaction with the rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    ToggleCart,
    RemoveLine(ProductId),
    Increment,
    Decrement,
    AddToCart,
    PreviousImage,
    NextImage,
    SelectImage(usize),
}

/// The patch for `event`, or `None` when it changes nothing.
#[must_use]
pub fn reduce(state: &AppState, event: Event) -> Option<StatePatch> {
    match event {
        Event::ToggleCart => Some(StatePatch::new().cart_open(!state.cart_open)),
        Event::RemoveLine(id) => {
            let mut cart = state.cart.clone();
            cart.remove(id).then(|| StatePatch::new().cart(cart))
        }
        Event::Increment => Some(StatePatch::new().quantity(state.quantity.saturating_add(1))),
        Event::Decrement => (state.quantity > 0)
            .then(|| StatePatch::new().quantity(state.quantity - 1)),
        Event::AddToCart => {
            let mut cart = state.cart.clone();
            cart.add(&state.product, state.quantity)
                .then(|| StatePatch::new().cart(cart).quantity(0))
        }
        Event::PreviousImage => {
            let count = state.product.image_count();
            (count > 0).then(|| {
                StatePatch::new().selected_image((state.selected_image + count - 1) % count)
            })
        }
        Event::NextImage => {
            let count = state.product.image_count();
            (count > 0).then(|| StatePatch::new().selected_image((state.selected_image + 1) % count))
        }
        Event::SelectImage(index) => {
            (index < state.product.image_count()).then(|| StatePatch::new().selected_image(index))
        }
    }
}
