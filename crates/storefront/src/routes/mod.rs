//! HTTP route handlers for storefront.
//!
//! Every handler locks the browser behind its session, rebuilds its [`App`],
//! applies one location change or UI event, and stores the storage and
//! history back before releasing the lock.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Health check
//! GET  /static/*                     - Stylesheet and images
//!
//! # Events (htmx fragment, or the full page without JS)
//! POST /events/cart/toggle           - Open/close the cart dropdown
//! POST /events/cart/add              - Add the picked quantity to the cart
//! POST /events/cart/remove           - Remove a cart line (form: id)
//! POST /events/quantity/increment    - Stepper +
//! POST /events/quantity/decrement    - Stepper -
//! POST /events/gallery/previous      - Previous image
//! POST /events/gallery/next          - Next image
//! POST /events/gallery/select        - Jump to an image (form: index)
//!
//! # Locations (everything else)
//! GET  /product?id=<id>              - Product page
//! GET  /men, /women                  - Product lists
//! GET  /cart, /checkout, ...         - Reserved views
//! ```

pub mod events;
pub mod pages;

use axum::{
    Router,
    http::HeaderMap,
    response::Redirect,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::app::App;
use crate::browsers::{BrowserGuard, BrowserId};
use crate::error::{AppError, Result};
use crate::models::keys;
use crate::render::Document;
use crate::router::Location;
use crate::state::ServerState;

/// Request header htmx sets on every request it issues.
pub const HX_REQUEST: &str = "hx-request";
/// Request header htmx sets when re-fetching a page missing from its history cache.
pub const HX_HISTORY_RESTORE_REQUEST: &str = "hx-history-restore-request";
/// Response header telling htmx which URL to push.
pub const HX_PUSH_URL: &str = "hx-push-url";

/// Create the UI event routes router.
pub fn event_routes() -> Router<ServerState> {
    Router::new()
        .route("/cart/toggle", post(events::toggle_cart))
        .route("/cart/add", post(events::add_to_cart))
        .route("/cart/remove", post(events::remove_line))
        .route("/quantity/increment", post(events::increment))
        .route("/quantity/decrement", post(events::decrement))
        .route("/gallery/previous", post(events::previous_image))
        .route("/gallery/next", post(events::next_image))
        .route("/gallery/select", post(events::select_image))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<ServerState> {
    Router::new()
        .nest("/events", event_routes())
        .route(
            "/favicon.ico",
            get(|| async { Redirect::permanent("/static/images/favicon.svg") }),
        )
        // Any other path is a location inside the app
        .fallback(get(pages::location))
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Lock the session's browser state, assigning a browser id on first visit.
///
/// The guard must be held until the response is built so requests from one
/// browser apply their changes one at a time.
async fn checkout_browser(state: &ServerState, session: &Session) -> Result<BrowserGuard> {
    let id = match session.get::<BrowserId>(keys::BROWSER_ID).await? {
        Some(id) => id,
        None => {
            let id = BrowserId::new_v4();
            session.insert(keys::BROWSER_ID, id).await?;
            tracing::debug!(browser_id = %id, "New browser");
            id
        }
    };
    Ok(state.browsers().checkout(id).await)
}

/// Store the app back into the browser; returns what to send it.
fn commit_app(browser: &mut BrowserGuard, app: App) -> Result<(Document, Location)> {
    let (document, location) = browser.commit(app);
    if document.revision == 0 {
        return Err(AppError::Internal(format!("nothing rendered for {location}")));
    }
    Ok((document, location))
}

fn has_header(headers: &HeaderMap, name: &str) -> bool {
    headers
        .get(name)
        .is_some_and(|value| value.as_bytes().eq_ignore_ascii_case(b"true"))
}

/// Whether htmx issued the request (and wants a fragment back).
fn is_htmx(headers: &HeaderMap) -> bool {
    has_header(headers, HX_REQUEST)
}
