//! UI event handlers.
//!
//! Forms post here. With htmx the response is the re-rendered `#app`;
//! without JavaScript it is the whole re-rendered page.

use std::sync::Arc;

use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use sneaker_shop_core::ProductId;
use tower_sessions::Session;
use tracing::instrument;

use super::{checkout_browser, commit_app, is_htmx};
use crate::actions::Event;
use crate::error::{Result, add_breadcrumb};
use crate::router::Location;
use crate::state::ServerState;

/// Remove-line form data.
#[derive(Debug, Deserialize)]
pub struct RemoveLineForm {
    pub id: i32,
}

/// Thumbnail form data.
#[derive(Debug, Deserialize)]
pub struct SelectImageForm {
    pub index: usize,
}

/// Apply `event` to the browser's app and answer.
async fn dispatch(
    state: &ServerState,
    session: &Session,
    headers: &HeaderMap,
    event: Event,
) -> Result<Response> {
    let mut browser = checkout_browser(state, session).await?;
    let mut app = browser.app(Arc::clone(state.catalog()), Location::default());
    let changed = app.dispatch(event);
    let (document, location) = commit_app(&mut browser, app)?;

    if changed {
        let href = location.href();
        add_breadcrumb("ui", &format!("{event:?}"), Some(&[("location", href.as_str())]));
    }

    Ok(if is_htmx(headers) {
        document.fragment().into_response()
    } else {
        document.page().into_response()
    })
}

/// Open or close the cart dropdown.
#[instrument(skip(state, session, headers))]
pub async fn toggle_cart(
    State(state): State<ServerState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    dispatch(&state, &session, &headers, Event::ToggleCart).await
}

/// Add the picked quantity of the current product to the cart.
#[instrument(skip(state, session, headers))]
pub async fn add_to_cart(
    State(state): State<ServerState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    dispatch(&state, &session, &headers, Event::AddToCart).await
}

/// Remove a cart line by product id.
#[instrument(skip(state, session, headers))]
pub async fn remove_line(
    State(state): State<ServerState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveLineForm>,
) -> Result<Response> {
    let event = Event::RemoveLine(ProductId::new(form.id));
    dispatch(&state, &session, &headers, event).await
}

#[instrument(skip(state, session, headers))]
pub async fn increment(
    State(state): State<ServerState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    dispatch(&state, &session, &headers, Event::Increment).await
}

#[instrument(skip(state, session, headers))]
pub async fn decrement(
    State(state): State<ServerState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    dispatch(&state, &session, &headers, Event::Decrement).await
}

#[instrument(skip(state, session, headers))]
pub async fn previous_image(
    State(state): State<ServerState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    dispatch(&state, &session, &headers, Event::PreviousImage).await
}

#[instrument(skip(state, session, headers))]
pub async fn next_image(
    State(state): State<ServerState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    dispatch(&state, &session, &headers, Event::NextImage).await
}

/// Jump to a thumbnail; out-of-range indices are ignored.
#[instrument(skip(state, session, headers))]
pub async fn select_image(
    State(state): State<ServerState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<SelectImageForm>,
) -> Result<Response> {
    dispatch(&state, &session, &headers, Event::SelectImage(form.index)).await
}
