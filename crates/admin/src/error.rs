//! Unified error handling for admin.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Handler-level error for responses that are not rendered pages.
///
/// Page handlers report failures as toasts; this type covers the JSON
/// endpoints, auth rejections under `/api/` and template failures.
#[derive(Debug, Error)]
pub enum AppError {
    /// No valid admin session.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized(reason) => {
                tracing::debug!(%reason, "Rejected API request");
                (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
            }
            Self::Internal(_) => {
                let event_id = sentry::capture_error(&self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Admin request error"
                );
                // Details stay in the logs
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Set the Sentry user context for the signed-in admin.
pub fn set_sentry_user(admin_id: Option<&str>, email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: admin_id.map(String::from),
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
