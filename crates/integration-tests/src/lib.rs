//! Integration tests for the TuneNest admin dashboard.
//!
//! Each test boots the full router on an ephemeral port with the backend
//! and Jamendo base URLs pointed at a [`wiremock`] server, then drives it
//! over HTTP with a cookie-keeping client that does not follow redirects.
//!
//! ```bash
//! cargo test -p tunenest-integration-tests
//! ```

#![allow(clippy::missing_panics_doc)]

use std::{collections::HashMap, net::SocketAddr};

use reqwest::{Client, Response, redirect::Policy};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use tunenest_admin::{app, config::AdminConfig, state::AppState};

/// Address nothing listens on, for "backend down" scenarios.
pub const UNREACHABLE_BACKEND: &str = "http://127.0.0.1:9";

/// A running dashboard plus the mocked backend behind it.
pub struct TestApp {
    pub address: SocketAddr,
    pub client: Client,
    pub backend: MockServer,
}

impl TestApp {
    /// Boot the dashboard against a fresh mock backend.
    pub async fn spawn() -> Self {
        let backend = MockServer::start().await;
        let uri = backend.uri();
        Self::boot(backend, &uri).await
    }

    /// Boot the dashboard against a backend that refuses connections.
    pub async fn spawn_unreachable() -> Self {
        let backend = MockServer::start().await;
        Self::boot(backend, UNREACHABLE_BACKEND).await
    }

    async fn boot(backend: MockServer, backend_url: &str) -> Self {
        let vars: HashMap<&str, String> = HashMap::from([
            ("ADMIN_BASE_URL", "http://127.0.0.1".to_string()),
            ("TUNENEST_API_BASE_URL", backend_url.to_string()),
            ("TUNENEST_API_TIMEOUT_SECS", "2".to_string()),
            ("JAMENDO_BASE_URL", backend_url.to_string()),
            ("ADMIN_SHOW_SAMPLE_DATA", "false".to_string()),
        ]);
        let config = AdminConfig::from_lookup(&|key| vars.get(key).cloned())
            .expect("test configuration is valid");
        let state = AppState::new(config).expect("application state builds");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let address = listener.local_addr().expect("listener has an address");
        tokio::spawn(async move {
            axum::serve(listener, app(state))
                .await
                .expect("test server runs");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("HTTP client builds");

        Self {
            address,
            client,
            backend,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.address)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request completes")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request completes")
    }

    /// Answer every session check with a valid admin identity.
    pub async fn accept_admin_session(&self) {
        Mock::given(method("GET"))
            .and(path("/admin/protected-dashboard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_check("admin")))
            .mount(&self.backend)
            .await;
    }

    /// Answer every session check with 401.
    pub async fn reject_sessions(&self) {
        Mock::given(method("GET"))
            .and(path("/admin/protected-dashboard"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthorized"})))
            .mount(&self.backend)
            .await;
    }

    /// Serve `body` for `GET endpoint`.
    pub async fn serve_json(&self, endpoint: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.backend)
            .await;
    }
}

/// Body of a successful session check for an account with `role`.
#[must_use]
pub fn session_check(role: &str) -> Value {
    json!({
        "message": "Welcome Admin",
        "admin": {
            "_id": "a1",
            "name": "Asha",
            "email": "asha@tunenest.app",
            "role": role,
        }
    })
}

/// `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
}
