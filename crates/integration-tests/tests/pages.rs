//! Page rendering against live and failing backend reads.

use reqwest::StatusCode;
use serde_json::json;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{method, path},
};

use tunenest_integration_tests::{TestApp, location};

async fn serve_overview(app: &TestApp) {
    app.serve_json("/genres", json!([{"name": "Pop", "totalSongs": 12}])).await;
    app.serve_json("/playlists/all", json!([{}, {}])).await;
    app.serve_json("/albums", json!({"albums": [{}]})).await;
    app.serve_json("/artist", json!([{}, {}, {}, {}])).await;
    app.serve_json(
        "/user",
        json!([{"_id": "u1", "name": "Meera"}, {"_id": "u2"}, {"_id": "u3"}]),
    )
    .await;
    app.serve_json("/tracks/", json!({"results": [{"name": "Song"}]})).await;
    app.serve_json("/user/growth", json!([{"month": "Jan", "users": 40}])).await;
    app.serve_json("/tips", json!({"tips": []})).await;
}

fn tip(id: &str, user: &str, artist: &str, amount: u32) -> serde_json::Value {
    json!({
        "_id": id,
        "user": {"name": user, "email": format!("{}@example.in", user.to_lowercase())},
        "artist": {"name": artist},
        "amount": amount,
        "date": "2024-06-01T09:00:00Z",
        "razorpay_payment_id": "pay_123",
    })
}

#[tokio::test]
async fn test_dashboard_shows_live_counts() {
    let app = TestApp::spawn().await;
    app.accept_admin_session().await;
    serve_overview(&app).await;

    let response = app.get("/dashboard").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("body");
    assert!(body.contains("Total Users"));
    assert!(body.contains(r#"<div class="stat-card-value">3</div>"#));
    assert!(body.contains(r#"<div class="stat-card-value">4</div>"#));
    assert!(!body.contains("Sample data"));
}

#[tokio::test]
async fn test_dashboard_failure_shows_no_stats() {
    let app = TestApp::spawn().await;
    app.accept_admin_session().await;
    serve_overview(&app).await;
    Mock::given(method("GET"))
        .and(path("/albums"))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(1)
        .mount(&app.backend)
        .await;

    let response = app.get("/dashboard").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("body");
    assert!(body.contains("Failed to load data"));
    assert!(!body.contains("Total Users"));
}

#[tokio::test]
async fn test_tips_search_filters_rows() {
    let app = TestApp::spawn().await;
    app.accept_admin_session().await;
    app.serve_json(
        "/tips",
        json!({"tips": [tip("t1", "Meera", "Arijit", 50), tip("t2", "Kabir", "Shreya", 120)]}),
    )
    .await;

    let response = app.get("/tips?q=arijit").await;

    let body = response.text().await.expect("body");
    assert!(body.contains("Arijit"));
    assert!(!body.contains("Shreya"));
    assert!(body.contains("Showing 1 of 2 tips"));
    assert!(body.contains(r#"name="return_to" value="/tips?q=arijit""#));
}

#[tokio::test]
async fn test_dark_mode_toggle_persists_and_returns() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form("/preferences/dark-mode", &[("return_to", "/users?q=ravi")])
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/users?q=ravi"));
    let preference_set = response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|cookie| cookie.starts_with("tunenest_dark_mode=true"));
    assert!(preference_set);

    let login = app.get("/login").await;
    let body = login.text().await.expect("body");
    assert!(body.contains(r#"<html lang="en" class="dark">"#));
}

#[tokio::test]
async fn test_dark_mode_toggle_rejects_foreign_return_target() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form("/preferences/dark-mode", &[("return_to", "https://evil.example")])
        .await;

    assert_eq!(location(&response), Some("/dashboard"));
}

#[tokio::test]
async fn test_dark_mode_toggle_rejects_header_breaking_return_target() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form("/preferences/dark-mode", &[("return_to", "/users\nX-Injected: 1")])
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard"));
    assert!(response.headers().get("x-injected").is_none());
}
