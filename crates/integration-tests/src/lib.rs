//! Integration test harness for the StayBNB client.
//!
//! [`MockApi`] is an in-process `axum` server standing in for the StayBNB
//! API. Tests register canned responses per method and path, point a client
//! at it, and then inspect what the client actually sent.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p staybnb-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let mock = MockApi::start().await;
//! mock.on("GET", "/users/profile", MockResponse::json(200, json!({"id": 1})));
//!
//! let api = mock.client(Arc::new(MemoryStorage::new()));
//! api.get_profile().await?;
//! assert_eq!(mock.hits(), 1);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use staybnb_client::{ApiClient, ClientConfig, Storage};
use tokio::task::JoinHandle;

/// Mount point of the API on the mock origin.
pub const API_PREFIX: &str = "/api";

/// A canned response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl MockResponse {
    /// JSON response with the given status.
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    /// Raw body with the given status.
    #[must_use]
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_owned(),
            delay: None,
        }
    }

    /// Hold the response back for `delay` before answering.
    #[must_use]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A request as seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path below [`API_PREFIX`], e.g. `/auth/signin`.
    pub path: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// A header value as text.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The `Authorization` header.
    #[must_use]
    pub fn authorization(&self) -> Option<&str> {
        self.header(AUTHORIZATION.as_str())
    }

    /// The `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    /// The body parsed as JSON.
    #[must_use]
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// The body as lossy UTF-8, for multipart assertions.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Default)]
struct MockState {
    routes: Mutex<HashMap<(String, String), MockResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// In-process mock of the StayBNB API.
///
/// The server task is aborted when the mock is dropped.
pub struct MockApi {
    addr: SocketAddr,
    state: Arc<MockState>,
    task: JoinHandle<()>,
}

impl MockApi {
    /// Bind to an ephemeral port on 127.0.0.1 and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock API listener");
        let addr = listener
            .local_addr()
            .expect("Mock API listener has no local address");

        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state, task }
    }

    /// Origin to configure the client with, e.g. `http://127.0.0.1:41234`.
    #[must_use]
    pub fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client configuration pointing at this mock.
    ///
    /// # Panics
    ///
    /// Never in practice; the origin is always a valid URL.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&self.origin()).expect("Mock origin is a valid URL")
    }

    /// An API client pointing at this mock.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn client(&self, storage: Arc<dyn Storage>) -> ApiClient {
        self.client_with(&self.config(), storage)
    }

    /// An API client built from a customized configuration.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn client_with(&self, config: &ClientConfig, storage: Arc<dyn Storage>) -> ApiClient {
        ApiClient::new(config, storage).expect("Failed to build API client")
    }

    /// Answer `method path` (path below `/api`) with `response`.
    pub fn on(&self, method: &str, path: &str, response: MockResponse) {
        lock(&self.state.routes).insert((method.to_ascii_uppercase(), path.to_owned()), response);
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        lock(&self.state.requests).len()
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state.requests).clone()
    }

    /// The most recent request.
    #[must_use]
    pub fn last_request(&self) -> Option<RecordedRequest> {
        lock(&self.state.requests).last().cloned()
    }

    /// The `Authorization` header of the most recent request.
    #[must_use]
    pub fn last_authorization(&self) -> Option<String> {
        self.last_request()
            .and_then(|r| r.authorization().map(str::to_owned))
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn handle(State(state): State<Arc<MockState>>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX).await.unwrap_or_default();

    let full_path = parts.uri.path();
    let Some(path) = full_path.strip_prefix(API_PREFIX) else {
        return (StatusCode::NOT_FOUND, "not under /api").into_response();
    };
    let method = parts.method.as_str().to_owned();

    lock(&state.requests).push(RecordedRequest {
        method: method.clone(),
        path: path.to_owned(),
        headers: parts.headers.clone(),
        body: body.to_vec(),
    });

    let response = lock(&state.routes).get(&(method, path.to_owned())).cloned();
    let Some(response) = response else {
        return (
            StatusCode::NOT_FOUND,
            [(CONTENT_TYPE, "application/json")],
            json!({ "error": format!("no mock for {path}") }).to_string(),
        )
            .into_response();
    };

    if let Some(delay) = response.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(CONTENT_TYPE, "application/json")], response.body).into_response()
}

/// A user object as the server returns it.
#[must_use]
pub fn user_json(id: i64, name: &str, email: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "email": email,
        "skin_tone": null,
        "body_shape": null,
        "preferences": [],
        "created_at": "2024-03-05T10:00:00Z",
    })
}
