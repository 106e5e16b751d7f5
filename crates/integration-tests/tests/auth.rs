//! Session gating and login.

use reqwest::StatusCode;
use serde_json::json;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{header, method, path},
};

use tunenest_integration_tests::{TestApp, location, session_check};

#[tokio::test]
async fn test_rejected_session_redirects_to_login() {
    let app = TestApp::spawn().await;
    app.reject_sessions().await;

    let response = app.get("/dashboard").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn test_unreachable_backend_redirects_to_login() {
    let app = TestApp::spawn_unreachable().await;

    let response = app.get("/users").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn test_api_routes_answer_unauthorized() {
    let app = TestApp::spawn().await;
    app.reject_sessions().await;

    let response = app.post_form("/api/preferences/dark-mode", &[]).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_admin_login_is_refused() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/admin/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_check("listener")))
        .mount(&app.backend)
        .await;

    let response = app
        .post_form("/login", &[("email", "fan@example.in"), ("password", "secret")])
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("body");
    assert!(body.contains("Access denied. Only admins can access the dashboard."));
    assert!(body.contains("fan@example.in"));
}

#[tokio::test]
async fn test_rejected_credentials_show_backend_message() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/admin/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&app.backend)
        .await;

    let response = app
        .post_form("/login", &[("email", "asha@tunenest.app"), ("password", "wrong")])
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("body");
    assert!(body.contains("Invalid credentials"));
}

#[tokio::test]
async fn test_login_replays_backend_cookie() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/admin/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "token=abc123; Path=/; HttpOnly")
                .set_body_json(session_check("admin")),
        )
        .mount(&app.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/protected-dashboard"))
        .and(header("cookie", "token=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_check("admin")))
        .mount(&app.backend)
        .await;

    let response = app
        .post_form("/login", &[("email", "asha@tunenest.app"), ("password", "secret")])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard"));

    let settings = app.get("/settings").await;
    assert_eq!(settings.status(), StatusCode::OK);
    let body = settings.text().await.expect("body");
    assert!(body.contains("Login successful!"));
    assert!(body.contains("Welcome Admin"));
}
