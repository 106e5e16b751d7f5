//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                            - Health check
//! GET  /                                  - Redirect to /dashboard
//!
//! # Auth (backend session cookie)
//! GET  /login                             - Login page
//! POST /login                             - Log in at the backend
//! POST /logout                            - Log out and clear the session
//!
//! # Preferences
//! POST /preferences/dark-mode             - Toggle dark mode, redirect back
//! POST /api/preferences/dark-mode         - Toggle dark mode (JSON)
//!
//! # Dashboard
//! GET  /dashboard                         - Overview stats and charts
//!
//! # Users
//! GET  /users                             - Partners (?q=, ?view=, ?edit=, ?new=1)
//! POST /users                             - Register partner
//! POST /users/{id}                        - Update partner
//! POST /users/{id}/delete                 - Delete partner
//! POST /users/{id}/resend-email           - Resend credentials email
//! POST /users/{id}/reset-password         - Reset partner password
//! GET  /users/listeners                   - End users (?q=)
//!
//! # Subscriptions
//! GET  /subscriptions                     - Plans, subscribers, analytics (?tab=)
//! POST /subscriptions/plans               - Create plan
//! POST /subscriptions/plans/{id}          - Update plan
//! POST /subscriptions/plans/{id}/delete   - Delete plan
//!
//! # Moderation and payments
//! GET  /reports                           - Reports (?q=, ?status=, ?type=)
//! POST /reports/{id}/status               - Change report status
//! POST /reports/{id}/delete               - Remove report
//! GET  /tips                              - Tips (?q=)
//!
//! # Notifications
//! GET  /send-notifications                - Compose form and history
//! POST /send-notifications                - Dispatch notification
//!
//! # Analytics
//! GET  /analytics                         - Platform analytics (?range=, ?tab=)
//!
//! # Settings
//! GET  /settings                          - Branding and password recovery
//! POST /settings/branding                 - Update name and logo (multipart)
//! POST /settings/forgot-password          - Email a reset link
//! GET  /settings/reset-password/{token}   - New password form
//! POST /settings/reset-password/{token}   - Set new password
//! ```
//!
//! Every mutation redirects back to its list page, which re-fetches the
//! list. Outcomes are reported with flash messages.

pub mod analytics;
pub mod api;
pub mod auth;
pub mod dashboard;
pub mod notifications;
pub mod reports;
pub mod settings;
pub mod subscriptions;
pub mod tips;
pub mod users;

use askama::Template;
use axum::{
    Router,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use tower_sessions::Session;

use crate::{
    error::AppError,
    models::{Flash, push_flash},
    state::AppState,
};

/// Build the dashboard router (everything except health and static files).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .merge(auth::router())
        .merge(api::router())
        .merge(dashboard::router())
        .merge(users::router())
        .merge(subscriptions::router())
        .merge(reports::router())
        .merge(tips::router())
        .merge(notifications::router())
        .merge(analytics::router())
        .merge(settings::router())
}

/// Render a template; failures become an opaque 500.
pub(crate) fn render(template: &impl Template) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => AppError::Internal(format!("template render: {e}")).into_response(),
    }
}

/// Queue a toast and redirect.
pub(crate) async fn redirect_with(session: &Session, flash: Flash, to: &str) -> Response {
    push_flash(session, flash).await;
    Redirect::to(to).into_response()
}

/// Restrict a post-action redirect target to a local path.
///
/// Only visible ASCII is accepted so the target is always a valid
/// `Location` header value.
pub(crate) fn local_path(candidate: Option<&str>, fallback: &'static str) -> String {
    candidate
        .filter(|path| {
            path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && path.bytes().all(|b| b.is_ascii_graphic())
        })
        .map_or_else(|| fallback.to_string(), String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_path_rejects_other_origins() {
        assert_eq!(local_path(Some("/users?q=ravi"), "/dashboard"), "/users?q=ravi");
        assert_eq!(local_path(Some("//evil.example"), "/dashboard"), "/dashboard");
        assert_eq!(
            local_path(Some("https://evil.example"), "/dashboard"),
            "/dashboard"
        );
        assert_eq!(local_path(Some("/\\evil.example"), "/dashboard"), "/dashboard");
        assert_eq!(local_path(None, "/settings"), "/settings");
    }

    #[test]
    fn test_local_path_rejects_header_breaking_characters() {
        assert_eq!(local_path(Some("/users\nX: 1"), "/dashboard"), "/dashboard");
        assert_eq!(local_path(Some("/users\r\n"), "/dashboard"), "/dashboard");
        assert_eq!(local_path(Some("/users?q=a b"), "/dashboard"), "/dashboard");
        assert_eq!(local_path(Some("/users?q=ravi%20k"), "/dashboard"), "/users?q=ravi%20k");
    }
}
