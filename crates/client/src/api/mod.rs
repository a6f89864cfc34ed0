//! StayBNB REST API client.
//!
//! Every remote call goes through [`ApiClient::request`] (JSON) or
//! [`ApiClient::upload_image`] (multipart), which together guarantee:
//!
//! - URLs are built from the configured base (`<origin>/api`)
//! - `Content-Type: application/json` is sent with JSON calls only
//! - `Authorization: Bearer <token>` is injected whenever a token is stored
//! - Caller-supplied headers win on conflict
//! - Non-success statuses become [`ApiError::Request`] with the server's
//!   message, transport failures become [`ApiError::Network`]
//!
//! Endpoint wrappers live in the submodules, one per API area.

mod analysis;
mod auth;
mod catalog;
mod users;
mod wishlist;

pub use auth::{AuthResponse, VerifyResponse};

use std::borrow::Cow;
use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use staybnb_core::ImageUpload;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, NetworkError, rejection_message};
use crate::storage::Storage;
use crate::token::TokenStore;

/// Request payload.
#[derive(Debug)]
pub enum RequestBody {
    /// JSON document, sent with `Content-Type: application/json`.
    Json(Value),
    /// Multipart form; the boundary header is set by the HTTP client.
    Multipart(Form),
}

/// Per-call options for [`ApiClient::request`].
#[derive(Debug, Default)]
pub struct RequestConfig {
    /// HTTP verb (default `GET`).
    pub method: Method,
    /// Optional payload.
    pub body: Option<RequestBody>,
    /// Extra headers; these override the defaults.
    pub headers: Vec<(String, String)>,
}

impl RequestConfig {
    /// A `GET` with no body.
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    /// A `POST` with no body yet.
    #[must_use]
    pub fn post() -> Self {
        Self::method(Method::POST)
    }

    /// A `PUT` with no body yet.
    #[must_use]
    pub fn put() -> Self {
        Self::method(Method::PUT)
    }

    /// A `DELETE` with no body.
    #[must_use]
    pub fn delete() -> Self {
        Self::method(Method::DELETE)
    }

    /// Any verb with no body.
    #[must_use]
    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Serialize `body` and attach it as JSON.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::Decode` if `body` cannot be represented as JSON.
    pub fn json_from<B: Serialize + ?Sized>(self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| NetworkError::Decode(format!("cannot encode request body: {e}")))?;
        Ok(self.json(value))
    }

    /// Attach a multipart body.
    #[must_use]
    pub fn multipart(mut self, form: Form) -> Self {
        self.body = Some(RequestBody::Multipart(form));
        self
    }

    /// Add a header, overriding any default with the same name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Client for the StayBNB REST API.
///
/// Cheap to clone; clones share the HTTP connection pool and token store.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    api_base: String,
    storage: Arc<dyn Storage>,
    tokens: TokenStore,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_base", &self.inner.api_base)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client that keeps its token and cached state in `storage`.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::Transport` if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, storage: Arc<dyn Storage>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(NetworkError::from)?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                api_base: config.api_base().to_owned(),
                tokens: TokenStore::new(Arc::clone(&storage)),
                storage,
            }),
        })
    }

    /// The token store shared by every call.
    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    /// The durable storage this client writes to.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.inner.storage
    }

    /// Full URL for an API path such as `/users/profile`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.inner.api_base)
        } else {
            format!("{}/{path}", self.inner.api_base)
        }
    }

    /// Send a request and decode the JSON response.
    ///
    /// An empty success body decodes as JSON `null`.
    ///
    /// # Errors
    ///
    /// - `ApiError::Request` if the server answers with a non-success status
    /// - `ApiError::Network` on transport failure, timeout, or an
    ///   undecodable success body
    #[instrument(skip(self, config), fields(method = %config.method))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        config: RequestConfig,
    ) -> Result<T, ApiError> {
        let RequestConfig {
            method,
            body,
            headers,
        } = config;

        let is_json = !matches!(body, Some(RequestBody::Multipart(_)));
        let headers = self.build_headers(is_json, &headers)?;

        let mut builder = self
            .inner
            .client
            .request(method, self.url(path))
            .headers(headers);
        builder = match body {
            Some(RequestBody::Json(value)) => builder.body(value.to_string()),
            Some(RequestBody::Multipart(form)) => builder.multipart(form),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "API request did not complete");
            NetworkError::from(e)
        })?;
        let status = response.status();
        let text = response.text().await.map_err(NetworkError::from)?;

        decode_response(status, &text)
    }

    /// Upload an image as multipart field `field`.
    ///
    /// The image is validated locally first; the JSON content type is
    /// omitted but the bearer token is still sent.
    ///
    /// # Errors
    ///
    /// `ApiError::Validation` for a non-image or oversized file, otherwise
    /// the same contract as [`ApiClient::request`].
    #[instrument(skip(self, upload), fields(file = %upload.file_name, bytes = upload.bytes.len()))]
    pub async fn upload_image<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &'static str,
        upload: ImageUpload,
    ) -> Result<T, ApiError> {
        upload.validate()?;

        let ImageUpload {
            file_name,
            mime_type,
            bytes,
        } = upload;
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(&mime_type)
            .map_err(|e| NetworkError::Transport(format!("invalid MIME type: {e}")))?;

        self.request(path, RequestConfig::post().multipart(Form::new().part(field, part)))
            .await
    }

    fn build_headers(
        &self,
        is_json: bool,
        extra: &[(String, String)],
    ) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();

        if is_json {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        if let Some(token) = self.inner.tokens.get_token() {
            match HeaderValue::from_str(&format!("Bearer {}", token.expose())) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("Stored token is not a valid header value, sending anonymously"),
            }
        }

        for (name, value) in extra {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| NetworkError::Transport(format!("invalid header name {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| NetworkError::Transport(format!("invalid header value: {e}")))?;
            headers.insert(name, value);
        }

        Ok(headers)
    }
}

fn decode_response<T: DeserializeOwned>(status: StatusCode, text: &str) -> Result<T, ApiError> {
    if !status.is_success() {
        let message = rejection_message(text);
        debug!(status = status.as_u16(), %message, "API request rejected");
        return Err(ApiError::Request {
            status: status.as_u16(),
            message,
        });
    }

    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| NetworkError::Decode(e.to_string()).into())
}

/// Percent-encode caller input used as a single path segment.
pub(crate) fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}
