//! Form validation happens before any backend write.

use reqwest::StatusCode;
use serde_json::json;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{body_partial_json, method, path},
};

use tunenest_integration_tests::{TestApp, location};

fn partner_form(phone: &str) -> Vec<(&'static str, String)> {
    vec![
        ("name", "Ravi Kumar".to_string()),
        ("email", "ravi@example.in".to_string()),
        ("phone", phone.to_string()),
        ("serviceName", "Ravi Electricals".to_string()),
        ("serviceType", "Electrician".to_string()),
        ("experience", "5".to_string()),
        ("charges", "400".to_string()),
        ("serviceArea", "Pune, Mumbai".to_string()),
    ]
}

async fn post_partner(app: &TestApp, phone: &str) -> reqwest::Response {
    app.client
        .post(app.url("/users"))
        .form(&partner_form(phone))
        .send()
        .await
        .expect("POST request completes")
}

#[tokio::test]
async fn test_plan_without_features_is_not_submitted() {
    let app = TestApp::spawn().await;
    app.accept_admin_session().await;
    app.serve_json("/subscriptions/plans", json!([])).await;
    Mock::given(method("POST"))
        .and(path("/subscriptions/plans"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.backend)
        .await;

    let response = app
        .post_form(
            "/subscriptions/plans",
            &[
                ("name", "Premium"),
                ("price", "119"),
                ("interval", "monthly"),
                ("interval_count", "1"),
                ("type", "premium"),
                ("features", "  \n \n"),
            ],
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("body");
    assert!(body.contains("Please fill all required fields"));
    // The submitted name survives the re-render.
    assert!(body.contains(r#"value="Premium""#));
}

#[tokio::test]
async fn test_partner_phone_needs_ten_digits() {
    let app = TestApp::spawn().await;
    app.accept_admin_session().await;
    app.serve_json("/partner", json!({"data": {"partners": []}})).await;
    Mock::given(method("POST"))
        .and(path("/partner/register"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.backend)
        .await;

    let response = post_partner(&app, "987654321").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("body");
    assert!(body.contains("Please enter a valid 10-digit phone number"));
    assert!(body.contains(r#"value="Ravi Kumar""#));
}

#[tokio::test]
async fn test_partner_registration_flashes_outcome() {
    let app = TestApp::spawn().await;
    app.accept_admin_session().await;
    app.serve_json("/partner", json!({"data": {"partners": []}})).await;
    Mock::given(method("POST"))
        .and(path("/partner/register"))
        .and(body_partial_json(json!({"email": "ravi@example.in", "charges": 400})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"success": true, "data": {"emailSent": true}})),
        )
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = post_partner(&app, "9876543210").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/users"));

    let list = app.get("/users").await;
    let body = list.text().await.expect("body");
    assert!(body.contains("Partner registered successfully! Login credentials have been sent via email."));
}

#[tokio::test]
async fn test_duplicate_partner_gets_recovery_hint() {
    let app = TestApp::spawn().await;
    app.accept_admin_session().await;
    app.serve_json("/partner", json!({"data": {"partners": []}})).await;
    Mock::given(method("POST"))
        .and(path("/partner/register"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"success": false, "message": "Partner already exists"})),
        )
        .mount(&app.backend)
        .await;

    let response = post_partner(&app, "9876543210").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.expect("body");
    assert!(body.contains("Please use a different email or phone number."));
}
