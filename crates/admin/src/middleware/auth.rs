//! Authentication extractor for admin.
//!
//! Every dashboard request re-validates the backend session: the extractor
//! issues exactly one `check_session` call and hands the outcome to
//! [`authorize`]. Any failure (401, network error, undecodable body or a
//! non-admin role) sends the browser to the login page. There is no retry.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    api::{ApiError, BackendCookie, SessionCheck},
    error::{AppError, clear_sentry_user, set_sentry_user},
    models::{AdminSession, session_keys},
    state::AppState,
};

/// Extractor that requires a valid admin session at the backend.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(admin: RequireAdminSession) -> impl IntoResponse {
///     format!("Hello, {}!", admin.admin.name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAdminSession {
    /// The verified admin identity.
    pub admin: AdminSession,
    /// Greeting returned by the session check (e.g. "Welcome Admin").
    pub greeting: Option<String>,
    /// Backend cookie to replay on follow-up API calls.
    pub cookie: Option<BackendCookie>,
}

/// A session check that passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorized {
    pub admin: AdminSession,
    pub greeting: Option<String>,
}

/// Why a session check did not authorize the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No session, an expired one, or the backend could not be reached.
    Unauthenticated,
    /// Valid session for an account without the admin role.
    NotAdmin,
}

/// Decide whether a session check outcome grants dashboard access.
///
/// Network failures are treated the same as an unauthenticated session.
///
/// # Errors
///
/// Returns the reason access is refused.
pub fn authorize(outcome: Result<SessionCheck, ApiError>) -> Result<Authorized, AuthFailure> {
    let check = outcome.map_err(|_| AuthFailure::Unauthenticated)?;

    if !check.admin.role.is_admin() {
        return Err(AuthFailure::NotAdmin);
    }

    Ok(Authorized {
        admin: AdminSession::from(&check.admin),
        greeting: check.message,
    })
}

/// Error returned when admin authentication is required but missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl AdminAuthRejection {
    fn for_path(path: &str) -> Self {
        if path.starts_with("/api/") {
            Self::Unauthorized
        } else {
            Self::RedirectToLogin
        }
    }
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Unauthorized => {
                AppError::Unauthorized("admin session required".to_string()).into_response()
            }
        }
    }
}

impl FromRequestParts<AppState> for RequireAdminSession {
    type Rejection = AdminAuthRejection;

    #[instrument(skip_all, fields(path = %parts.uri.path()))]
    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let rejection = AdminAuthRejection::for_path(parts.uri.path());

        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(rejection)?;

        let cookie = backend_cookie(&session).await;
        let outcome = state.api().check_session(cookie.as_ref()).await;

        match authorize(outcome) {
            Ok(Authorized { admin, greeting }) => {
                if let Err(e) = session.insert(session_keys::CURRENT_ADMIN, &admin).await {
                    tracing::warn!("Failed to cache admin identity: {e}");
                }
                set_sentry_user(admin.admin_id.as_ref().map(|id| id.as_str()), &admin.email);

                Ok(Self {
                    admin,
                    greeting,
                    cookie,
                })
            }
            Err(failure) => {
                tracing::info!(?failure, "Session check refused dashboard access");
                clear_admin_session(&session).await;
                Err(rejection)
            }
        }
    }
}

/// Read the stored backend cookie, if any.
pub async fn backend_cookie(session: &Session) -> Option<BackendCookie> {
    session
        .get::<String>(session_keys::BACKEND_COOKIE)
        .await
        .ok()
        .flatten()
        .map(BackendCookie::new)
}

/// Store the backend cookie captured at login.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn set_backend_cookie(
    session: &Session,
    cookie: &BackendCookie,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::BACKEND_COOKIE, cookie.expose())
        .await
}

/// Forget the admin identity and backend cookie.
pub async fn clear_admin_session(session: &Session) {
    for key in [session_keys::CURRENT_ADMIN, session_keys::BACKEND_COOKIE] {
        if let Err(e) = session.remove_value(key).await {
            tracing::warn!("Failed to clear session key {key}: {e}");
        }
    }
    clear_sentry_user();
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tunenest_core::AdminRole;

    use super::*;
    use crate::api::AdminIdentity;

    fn check(role: AdminRole) -> SessionCheck {
        SessionCheck {
            message: Some("Welcome Admin".to_string()),
            admin: AdminIdentity {
                id: Some("a1".into()),
                name: "Asha".to_string(),
                email: "asha@tunenest.app".to_string(),
                role,
            },
        }
    }

    #[test]
    fn test_admin_role_is_authorized() {
        let authorized = authorize(Ok(check(AdminRole::Admin))).unwrap();
        assert_eq!(authorized.admin.name, "Asha");
        assert_eq!(authorized.greeting.as_deref(), Some("Welcome Admin"));
    }

    #[test]
    fn test_non_admin_role_is_refused() {
        assert_eq!(
            authorize(Ok(check(AdminRole::Other))),
            Err(AuthFailure::NotAdmin)
        );
    }

    #[test]
    fn test_any_api_error_is_unauthenticated() {
        let errors = [
            ApiError::Unauthorized { message: None },
            ApiError::Status {
                status: 503,
                message: None,
            },
            ApiError::Decode {
                endpoint: "/admin/protected-dashboard".to_string(),
                message: "missing field `admin`".to_string(),
            },
        ];

        for error in errors {
            assert_eq!(authorize(Err(error)), Err(AuthFailure::Unauthenticated));
        }
    }

    #[test]
    fn test_rejection_depends_on_path() {
        assert_eq!(
            AdminAuthRejection::for_path("/dashboard"),
            AdminAuthRejection::RedirectToLogin
        );
        assert_eq!(
            AdminAuthRejection::for_path("/api/preferences/dark-mode"),
            AdminAuthRejection::Unauthorized
        );

        let response = AdminAuthRejection::RedirectToLogin.into_response();
        assert_eq!(response.headers()["location"], "/login");
    }

    #[tokio::test]
    async fn test_clear_admin_session_removes_cookie() {
        use std::sync::Arc;
        use tower_sessions::MemoryStore;

        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        set_backend_cookie(&session, &BackendCookie::new("connect.sid=abc"))
            .await
            .unwrap();
        assert!(backend_cookie(&session).await.is_some());

        clear_admin_session(&session).await;
        assert!(backend_cookie(&session).await.is_none());
    }
}
