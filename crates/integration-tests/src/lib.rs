//! Integration tests for the Sneaker Company storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sneaker-shop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_flows` - library-level flows through `App`
//! - `storefront_http` - the axum router driven in-process with `oneshot`
//!
//! [`TestClient`] plays the browser: it keeps the session cookie between
//! requests and can issue plain or htmx requests.

use std::path::PathBuf;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use tower::ServiceExt;

use sneaker_shop_storefront::build_router;
use sneaker_shop_storefront::catalog::Catalog;
use sneaker_shop_storefront::config::StorefrontConfig;
use sneaker_shop_storefront::middleware::SESSION_COOKIE_NAME;
use sneaker_shop_storefront::state::ServerState;

/// Storefront config pointing at the real static directory.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/static"),
        ..StorefrontConfig::default()
    }
}

/// A fresh router over the fixture catalog.
///
/// # Panics
///
/// Panics if the fixture catalog is invalid.
#[must_use]
pub fn test_router() -> Router {
    let catalog = Catalog::sneaker_company().expect("fixture catalog");
    build_router(ServerState::new(test_config(), catalog))
}

/// A captured response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header(header::LOCATION.as_str())
    }
}

/// One simulated browser. A clone is another tab of the same browser.
#[derive(Debug, Clone)]
pub struct TestClient {
    router: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// A browser with no cookies talking to `router`.
    #[must_use]
    pub const fn new(router: Router) -> Self {
        Self {
            router,
            cookie: None,
        }
    }

    /// A second browser sharing the same server (and session store).
    #[must_use]
    pub fn another(&self) -> Self {
        Self::new(self.router.clone())
    }

    #[must_use]
    pub fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    /// Plain page load.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::get(uri), Body::empty()).await
    }

    /// Link click handled by htmx.
    pub async fn htmx_get(&mut self, uri: &str) -> TestResponse {
        let request = Request::get(uri).header("HX-Request", "true");
        self.send(request, Body::empty()).await
    }

    /// Back/forward to a page htmx re-fetches.
    pub async fn history_restore(&mut self, uri: &str) -> TestResponse {
        let request = Request::get(uri)
            .header("HX-Request", "true")
            .header("HX-History-Restore-Request", "true");
        self.send(request, Body::empty()).await
    }

    /// Form post without JavaScript.
    pub async fn post(&mut self, uri: &str, form: &str) -> TestResponse {
        let request =
            Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(request, Body::from(form.to_owned())).await
    }

    /// Form post issued by htmx.
    pub async fn htmx_post(&mut self, uri: &str, form: &str) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("HX-Request", "true");
        self.send(request, Body::from(form.to_owned())).await
    }

    async fn send(&mut self, mut builder: axum::http::request::Builder, body: Body) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(body).expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(cookie) = session_cookie(response.headers()) {
            self.cookie = Some(cookie);
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// `name=value` of the session cookie in a `Set-Cookie` header, if any.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
        .map(str::to_owned)
}
