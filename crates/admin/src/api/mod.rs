//! TuneNest backend API client.
//!
//! This is the single network-access layer of the dashboard. Every endpoint
//! has an explicit request/response type; JSON that does not match is turned
//! into [`ApiError::Decode`] here, so handlers only ever see typed data or a
//! typed error.
//!
//! # Authentication
//!
//! The backend authenticates admins with its own session cookie. The cookie
//! is captured from `Set-Cookie` at login ([`auth`]), kept in the dashboard's
//! server-side session, and replayed on every call as a [`BackendCookie`].

pub mod auth;
pub mod catalog;
pub mod jamendo;
pub mod notifications;
pub mod partners;
pub mod plans;
pub mod settings;
pub mod tips;

pub use auth::*;
pub use catalog::*;
pub use jamendo::*;
pub use notifications::*;
pub use partners::*;
pub use plans::*;
pub use settings::*;
pub use tips::*;

use std::sync::Arc;

use reqwest::{RequestBuilder, header};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::BackendConfig;

/// Errors that can occur when talking to the TuneNest backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connection refused, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error: {status} - {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// Session missing, expired or not an admin (401/403).
    #[error("Unauthorized: {}", .message.as_deref().unwrap_or("session rejected"))]
    Unauthorized { message: Option<String> },

    /// Resource not found (404).
    #[error("Not found: {}", .message.as_deref().unwrap_or("resource not found"))]
    NotFound { message: Option<String> },

    /// Response body did not match the expected schema.
    #[error("Unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl ApiError {
    /// Message to show the operator: the backend's own `message` when it sent
    /// one, otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        let server_message = match self {
            Self::Status { message, .. }
            | Self::Unauthorized { message }
            | Self::NotFound { message } => message.as_deref(),
            Self::Http(_) | Self::Decode { .. } => None,
        };

        server_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

/// The backend's session cookie(s), as a ready-to-send `Cookie` header value.
#[derive(Clone)]
pub struct BackendCookie(SecretString);

impl BackendCookie {
    /// Wrap a `Cookie` header value (`name=value; other=value`).
    #[must_use]
    pub fn new(header_value: impl Into<String>) -> Self {
        Self(SecretString::from(header_value.into()))
    }

    /// Build the `Cookie` header value from a response's `Set-Cookie` headers.
    ///
    /// Attributes (`Path`, `HttpOnly`, ...) are dropped; returns `None` when the
    /// response set no cookies.
    #[must_use]
    pub fn from_set_cookie(headers: &header::HeaderMap) -> Option<Self> {
        let pairs: Vec<&str> = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| value.split(';').next())
            .map(str::trim)
            .filter(|pair| pair.contains('='))
            .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(Self::new(pairs.join("; ")))
        }
    }

    /// Header value to store in the dashboard session.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for BackendCookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BackendCookie([REDACTED])")
    }
}

/// TuneNest backend API client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("tunenest-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    fn authorized(builder: RequestBuilder, cookie: Option<&BackendCookie>) -> RequestBuilder {
        match cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie.expose()),
            None => builder,
        }
    }

    /// Execute a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        cookie: Option<&BackendCookie>,
    ) -> Result<T, ApiError> {
        let builder = Self::authorized(self.inner.client.get(self.url(path)), cookie);
        let response = builder.send().await?;
        handle_response(path, response).await
    }

    /// Execute a POST request with a JSON body.
    pub(crate) async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        cookie: Option<&BackendCookie>,
    ) -> Result<T, ApiError> {
        let builder = Self::authorized(self.inner.client.post(self.url(path)).json(body), cookie);
        let response = builder.send().await?;
        handle_response(path, response).await
    }

    /// Execute a POST request without a body.
    pub(crate) async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        cookie: Option<&BackendCookie>,
    ) -> Result<T, ApiError> {
        let builder = Self::authorized(self.inner.client.post(self.url(path)), cookie);
        let response = builder.send().await?;
        handle_response(path, response).await
    }

    /// Execute a PUT request with a JSON body.
    pub(crate) async fn put<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        cookie: Option<&BackendCookie>,
    ) -> Result<T, ApiError> {
        let builder = Self::authorized(self.inner.client.put(self.url(path)).json(body), cookie);
        let response = builder.send().await?;
        handle_response(path, response).await
    }

    /// Execute a PUT request with a multipart body.
    pub(crate) async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        cookie: Option<&BackendCookie>,
    ) -> Result<T, ApiError> {
        let builder = Self::authorized(self.inner.client.put(self.url(path)).multipart(form), cookie);
        let response = builder.send().await?;
        handle_response(path, response).await
    }

    /// Execute a DELETE request, ignoring any response body.
    pub(crate) async fn delete(
        &self,
        path: &str,
        cookie: Option<&BackendCookie>,
    ) -> Result<(), ApiError> {
        let builder = Self::authorized(self.inner.client.delete(self.url(path)), cookie);
        let response = builder.send().await?;
        expect_success(response).await
    }

    /// Execute a POST request with a JSON body, ignoring any response body.
    pub(crate) async fn post_unit<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        cookie: Option<&BackendCookie>,
    ) -> Result<(), ApiError> {
        let builder = Self::authorized(self.inner.client.post(self.url(path)).json(body), cookie);
        let response = builder.send().await?;
        expect_success(response).await
    }

    /// Execute a PUT request with a JSON body, ignoring any response body.
    pub(crate) async fn put_unit<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        cookie: Option<&BackendCookie>,
    ) -> Result<(), ApiError> {
        let builder = Self::authorized(self.inner.client.put(self.url(path)).json(body), cookie);
        let response = builder.send().await?;
        expect_success(response).await
    }

    /// Raw client access for calls that need response headers.
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.client
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        self.url(path)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

/// Decode a successful response or map the failure to an [`ApiError`].
pub(crate) async fn handle_response<T: DeserializeOwned>(
    endpoint: &str,
    response: reqwest::Response,
) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(parse_error(response).await);
    }

    let bytes = response.bytes().await?;
    decode_body(endpoint, &bytes)
}

/// Require a success status and discard the body.
pub(crate) async fn expect_success(response: reqwest::Response) -> Result<(), ApiError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(parse_error(response).await)
    }
}

/// Parse a JSON body into `T`, naming the endpoint on failure.
pub(crate) fn decode_body<T: DeserializeOwned>(endpoint: &str, bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|e| ApiError::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}

/// Parse an error response, extracting the backend's `message` field.
async fn parse_error(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let message = response
        .bytes()
        .await
        .ok()
        .and_then(|body| extract_message(&body));

    match status {
        401 | 403 => ApiError::Unauthorized { message },
        404 => ApiError::NotFound { message },
        _ => ApiError::Status { status, message },
    }
}

/// Pull `message` (or `error`) out of a JSON error body.
fn extract_message(body: &[u8]) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: Option<String>,
        error: Option<String>,
    }

    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    parsed.message.or(parsed.error)
}

/// Percent-encode a value used as a single path segment.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_message() {
        let err = ApiError::Status {
            status: 409,
            message: Some("Partner already exists".to_string()),
        };
        assert_eq!(err.user_message("Failed"), "Partner already exists");
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = ApiError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Failed to load data"), "Failed to load data");

        let err = ApiError::Decode {
            endpoint: "/tips".to_string(),
            message: "missing field".to_string(),
        };
        assert_eq!(err.user_message("Failed to fetch tips"), "Failed to fetch tips");
    }

    #[test]
    fn test_user_message_ignores_blank_server_message() {
        let err = ApiError::NotFound {
            message: Some("  ".to_string()),
        };
        assert_eq!(err.user_message("Not found"), "Not found");
    }

    #[test]
    fn test_extract_message() {
        assert_eq!(
            extract_message(br#"{"success":false,"message":"Invalid token"}"#),
            Some("Invalid token".to_string())
        );
        assert_eq!(
            extract_message(br#"{"error":"boom"}"#),
            Some("boom".to_string())
        );
        assert_eq!(extract_message(b"<html>502</html>"), None);
    }

    #[test]
    fn test_decode_body_names_endpoint() {
        let err = decode_body::<Vec<String>>("/genres", br#"{"not":"a list"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Decode { ref endpoint, .. } if endpoint == "/genres"));
    }

    #[test]
    fn test_cookie_from_set_cookie() {
        let mut headers = header::HeaderMap::new();
        headers.append(
            header::SET_COOKIE,
            "adminToken=abc123; Path=/; HttpOnly".parse().unwrap(),
        );
        headers.append(header::SET_COOKIE, "theme=x; Max-Age=10".parse().unwrap());

        let cookie = BackendCookie::from_set_cookie(&headers).unwrap();
        assert_eq!(cookie.expose(), "adminToken=abc123; theme=x");
        assert_eq!(format!("{cookie:?}"), "BackendCookie([REDACTED])");
    }

    #[test]
    fn test_cookie_absent() {
        assert!(BackendCookie::from_set_cookie(&header::HeaderMap::new()).is_none());
    }

    #[test]
    fn test_segment_encoding() {
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }
}
