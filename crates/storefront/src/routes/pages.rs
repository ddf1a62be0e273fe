//! Location handler.
//!
//! Every GET outside `/events` and `/static` is a location inside the app.
//! How it is applied depends on who asked:
//!
//! - a plain browser request is a page load ([`App::open`]); if routing
//!   redirected, the browser is sent to the final location with a 303
//! - an htmx request is an in-app navigation ([`App::navigate_to`]) and
//!   gets the `#app` fragment plus the URL to push
//! - an htmx history restore is a back/forward move ([`App::pop_state`])
//!   and gets the full page
//!
//! [`App::open`]: crate::app::App::open
//! [`App::navigate_to`]: crate::app::App::navigate_to
//! [`App::pop_state`]: crate::app::App::pop_state

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, Uri},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use super::{
    HX_HISTORY_RESTORE_REQUEST, HX_PUSH_URL, checkout_browser, commit_app, has_header, is_htmx,
};
use crate::error::{AppError, Result};
use crate::router::Location;
use crate::state::ServerState;

/// How the browser arrived at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// Typed URL, bookmark, reload or a link followed without JavaScript.
    Load,
    /// htmx-driven link click.
    Navigate,
    /// Back/forward to a page htmx had to re-fetch.
    HistoryRestore,
}

impl Arrival {
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        if has_header(headers, HX_HISTORY_RESTORE_REQUEST) {
            Self::HistoryRestore
        } else if is_htmx(headers) {
            Self::Navigate
        } else {
            Self::Load
        }
    }
}

/// Route the requested location and render the result.
#[instrument(skip(state, session, headers))]
pub async fn location(
    State(state): State<ServerState>,
    session: Session,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response> {
    let href = uri.path_and_query().map_or("/", |pq| pq.as_str());
    let requested = Location::parse(href)
        .map_err(|e| AppError::BadRequest(format!("invalid location {href}: {e}")))?;
    let arrival = Arrival::from_headers(&headers);

    let mut browser = checkout_browser(&state, &session).await?;
    let mut app = browser.app(Arc::clone(state.catalog()), requested.clone());
    match arrival {
        Arrival::Load => app.open(requested.clone()),
        Arrival::Navigate => app.navigate_to(href),
        Arrival::HistoryRestore => app.pop_state(requested.clone()),
    }
    let (document, location) = commit_app(&mut browser, app)?;

    tracing::debug!(?arrival, %requested, %location, "Location applied");

    Ok(match arrival {
        Arrival::Load if location != requested => {
            Redirect::to(&location.href()).into_response()
        }
        Arrival::Load | Arrival::HistoryRestore => document.page().into_response(),
        Arrival::Navigate => (
            AppendHeaders([(HX_PUSH_URL, location.href())]),
            document.fragment(),
        )
            .into_response(),
    })
}
