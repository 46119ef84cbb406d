//! # API Client
//!
//! The shared HTTP layer every service sits on.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  service call (e.g. CartService::add_item)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiClient::send(method, "cart/items", query, body)                    │
//! │       │  join onto base_url                                             │
//! │       │  Authorization: Bearer <token>   (when configured)             │
//! │       │  X-Request-Id: <uuid v4>                                        │
//! │       ▼                                                                 │
//! │  reqwest ──► backend                                                    │
//! │       │                                                                 │
//! │       ├── 2xx, body   ─► decode JSON into T                             │
//! │       ├── 2xx, empty  ─► None (deletes)                                 │
//! │       └── 4xx / 5xx   ─► ClientError::from_status(status, message)      │
//! │                          message = body.message | body.error | reason   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No retries. A failed call surfaces its error once and the caller decides.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::config::StorefrontConfig;
use crate::error::{ClientError, ClientResult};

/// Header carrying a per-request id, for matching client logs to server logs.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Query parameters of a request.
pub type Query<'a> = &'a [(&'a str, String)];

/// Error body shapes the backend uses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the storefront backend.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Builds a client for `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: std::time::Duration) -> ClientResult<Self> {
        // A trailing slash makes `join` append instead of replacing the last
        // path segment.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        Ok(ApiClient {
            http,
            base_url,
            token: None,
        })
    }

    /// Builds a client from the `[api]` and `[auth]` sections.
    pub fn from_config(config: &StorefrontConfig) -> ClientResult<Self> {
        let client = Self::new(&config.api.base_url, config.api.timeout())?;
        Ok(client.with_token(config.auth.token.clone()))
    }

    /// Sets the bearer token.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Absolute URL of an endpoint path such as `/cart/items/3`.
    pub fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: Query<'_>) -> ClientResult<T> {
        self.expect_body(Method::GET, path, query, None::<&()>).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query<'_>,
        body: &B,
    ) -> ClientResult<T> {
        self.expect_body(Method::POST, path, query, Some(body)).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query<'_>,
        body: &B,
    ) -> ClientResult<T> {
        self.expect_body(Method::PUT, path, query, Some(body)).await
    }

    /// PATCH with an optional body (`/reviews/:id/helpful` has none).
    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query<'_>,
        body: Option<&B>,
    ) -> ClientResult<T> {
        self.expect_body(Method::PATCH, path, query, body).await
    }

    /// DELETE; returns the decoded body if the backend sent one.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query<'_>,
    ) -> ClientResult<Option<T>> {
        self.send(Method::DELETE, path, query, None::<&()>).await
    }

    // =========================================================================
    // Core
    // =========================================================================

    async fn expect_body<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Query<'_>,
        body: Option<&B>,
    ) -> ClientResult<T> {
        self.send(method, path, query, body)
            .await?
            .ok_or_else(|| ClientError::Decode(format!("empty response body from {path}")))
    }

    /// Sends one request. `Ok(None)` means a success status with no body.
    pub async fn send<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Query<'_>,
        body: Option<&B>,
    ) -> ClientResult<Option<T>> {
        let url = self.url(path)?;
        let request_id = Uuid::new_v4();
        debug!(%method, %url, %request_id, "API request");

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%method, path, %request_id, error = %e, "API request failed");
            ClientError::from(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(%method, path, status = status.as_u16(), bytes = bytes.len(), "API response");

        if !status.is_success() {
            let message = error_message(status, &bytes);
            warn!(%method, path, %request_id, status = status.as_u16(), %message, "API error");
            return Err(ClientError::from_status(status.as_u16(), message));
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

/// Best human-readable message for an error response.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        if let Some(message) = parsed.message.or(parsed.error).filter(|m| !m.is_empty()) {
            return message;
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if !text.is_empty() && text.len() <= 200 && !text.starts_with('<') {
        return text;
    }
    status
        .canonical_reason()
        .unwrap_or("Unexpected response")
        .to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::spawn_backend;
    use axum::http::HeaderMap;
    use axum::routing::{delete, get};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::time::Duration;

    #[test]
    fn test_url_join_keeps_base_path() {
        let client = ApiClient::new("http://localhost:8080/api", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.url("/cart/items/3").unwrap().as_str(),
            "http://localhost:8080/api/cart/items/3"
        );
        assert_eq!(
            client.url("products").unwrap().as_str(),
            "http://localhost:8080/api/products"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ApiClient::new("::nope", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, br#"{"message":"Out of stock"}"#),
            "Out of stock"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, br#"{"error":"Bad quantity"}"#),
            "Bad quantity"
        );
        assert_eq!(error_message(StatusCode::CONFLICT, b"already exists"), "already exists");
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, b"<html>proxy</html>"),
            "Bad Gateway"
        );
    }

    #[tokio::test]
    async fn test_headers_and_query() {
        async fn echo(
            headers: HeaderMap,
            axum::extract::Query(query): axum::extract::Query<Vec<(String, String)>>,
        ) -> Json<Value> {
            Json(json!({
                "auth": headers.get("authorization").and_then(|v| v.to_str().ok()),
                "requestId": headers.get(REQUEST_ID_HEADER).is_some(),
                "query": query,
            }))
        }
        let base = spawn_backend(Router::new().route("/echo", get(echo))).await;

        let client = ApiClient::new(&base, Duration::from_secs(5))
            .unwrap()
            .with_token(Some("t0k".into()));
        let body: Value = client
            .get("/echo", &[("sessionId", "user_7".to_string())])
            .await
            .unwrap();

        assert_eq!(body["auth"], "Bearer t0k");
        assert_eq!(body["requestId"], true);
        assert_eq!(body["query"], json!([["sessionId", "user_7"]]));
    }

    #[tokio::test]
    async fn test_status_errors_and_empty_bodies() {
        let router = Router::new()
            .route(
                "/missing",
                get(|| async {
                    (
                        axum::http::StatusCode::NOT_FOUND,
                        Json(json!({"message": "Product not found"})),
                    )
                }),
            )
            .route(
                "/boom",
                get(|| async { (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "") }),
            )
            .route("/gone", delete(|| async { axum::http::StatusCode::NO_CONTENT }));
        let base = spawn_backend(router).await;
        let client = ApiClient::new(&base, Duration::from_secs(5)).unwrap();

        let err = client.get::<Value>("/missing", &[]).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(ref m) if m == "Product not found"));

        let err = client.get::<Value>("/boom", &[]).await.unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 500, ref message } if message == "Internal Server Error"));
        assert!(err.is_server_error());

        let none: Option<Value> = client.delete("/gone", &[]).await.unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
        let err = client.get::<Value>("/products", &[]).await.unwrap_err();
        assert!(err.is_server_error(), "unexpected error: {err:?}");
    }
}
