//! Integration tests for Emerald.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p emerald-integration-tests
//! ```
//!
//! The HTTP tests drive the storefront router in-process with an in-memory
//! session store. The database pool connects lazily and nothing here needs
//! `PostgreSQL` to be running; routes that would reach it are only
//! exercised on paths that reject the request first.
//!
//! # Test Categories
//!
//! - `client_state` - stores, context, pricing, and file-backed persistence
//! - `http_api` - JSON API, session cookies, and toast headers

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use emerald_storefront::config::StorefrontConfig;
use emerald_storefront::middleware::session_layer;
use emerald_storefront::notify::HX_TRIGGER;
use emerald_storefront::state::AppState;

/// Client address sent in `x-forwarded-for` so the rate limiters can key.
pub const CLIENT_IP: &str = "203.0.113.7";

/// Configuration for a local, plain-HTTP storefront.
///
/// # Panics
///
/// Panics if the fixed test values fail validation.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig::from_source(|key| {
        let value = match key {
            "STOREFRONT_DATABASE_URL" => "postgres://localhost/emerald_test",
            "STOREFRONT_BASE_URL" => "http://localhost:3000",
            "STOREFRONT_SESSION_SECRET" => "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%",
            _ => return None,
        };
        Some(value.to_owned())
    })
    .expect("test configuration is valid")
}

/// The storefront router over an in-memory session store.
///
/// # Panics
///
/// Panics if the lazy pool cannot parse the database URL.
#[must_use]
pub fn test_app() -> Router {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/emerald_test")
        .expect("lazy pool accepts the test url");
    let sessions = session_layer(MemoryStore::default(), &config);
    emerald_storefront::app(AppState::new(config, pool), sessions)
}

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// The `toast` object carried in `HX-Trigger`, if any.
    ///
    /// # Panics
    ///
    /// Panics if the header is present but not JSON.
    #[must_use]
    pub fn toast(&self) -> Option<Value> {
        let raw = self.headers.get(HX_TRIGGER)?.to_str().ok()?;
        let trigger: Value = serde_json::from_str(raw).expect("HX-Trigger is JSON");
        trigger.get("toast").cloned()
    }
}

/// A browser-like client that keeps the session cookie between requests.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClient {
    /// A fresh client over a fresh app.
    #[must_use]
    pub fn new() -> Self {
        Self {
            app: test_app(),
            cookie: None,
        }
    }

    /// Send a request, optionally with a JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body is not JSON.
    pub async fn send(&mut self, method: Method, uri: &str, json: Option<Value>) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", CLIENT_IP);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match json {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            self.cookie = Some(set_cookie.to_owned());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, json: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(json)).await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }
}
