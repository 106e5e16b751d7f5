//! Authentication route handlers for admin.
//!
//! The backend owns accounts and sessions. Login forwards the credentials,
//! keeps the backend's session cookie in the server-side session and only
//! lets accounts with the admin role through.

use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    api::{ApiError, LoggedIn},
    filters,
    layout::preferences,
    middleware::{backend_cookie, clear_admin_session, set_backend_cookie},
    models::{Flash, UiPreferences, push_flash, take_flashes},
    state::AppState,
};

use super::{redirect_with, render};

/// Shown when a non-admin account logs in.
pub const ACCESS_DENIED: &str = "Access denied. Only admins can access the dashboard.";

const LOGIN_FAILED: &str = "Login failed. Please try again.";

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginPageTemplate {
    prefs: UiPreferences,
    flashes: Vec<Flash>,
    email: String,
}

/// Login form.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
}

/// Render the login page.
///
/// GET /login
#[instrument(skip_all)]
async fn login_page(session: Session, headers: HeaderMap) -> Response {
    let template = LoginPageTemplate {
        prefs: preferences(&headers),
        flashes: take_flashes(&session).await,
        email: String::new(),
    };
    render(&template)
}

/// Log in at the backend.
///
/// POST /login
#[instrument(skip_all, fields(email = %form.email.trim()))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let email = form.email.trim().to_string();
    let retry = |message: &str| LoginPageTemplate {
        prefs: preferences(&headers),
        flashes: vec![Flash::error(message)],
        email: email.clone(),
    };

    if email.is_empty() || form.password.is_empty() {
        return render(&retry("Please enter your email and password."));
    }

    let password = SecretString::from(form.password);
    let LoggedIn { response, cookie } = match state.api().login(&email, &password).await {
        Ok(logged_in) => logged_in,
        Err(e) => {
            tracing::info!("Login rejected: {e}");
            return render(&retry(&login_error_message(&e)));
        }
    };

    if !response.admin.role.is_admin() {
        tracing::warn!(role = %response.admin.role, "Non-admin account attempted dashboard login");
        return render(&retry(ACCESS_DENIED));
    }

    // Fresh session id on privilege change
    if let Err(e) = session.cycle_id().await {
        tracing::error!("Failed to cycle session id: {e}");
        return render(&retry(LOGIN_FAILED));
    }

    if let Some(cookie) = &cookie {
        if let Err(e) = set_backend_cookie(&session, cookie).await {
            tracing::error!("Failed to store backend session: {e}");
            return render(&retry(LOGIN_FAILED));
        }
    } else {
        tracing::warn!("Backend login set no session cookie");
    }

    tracing::info!(admin = %response.admin.email, "Admin logged in");
    redirect_with(&session, Flash::success("Login successful!"), "/dashboard").await
}

fn login_error_message(error: &ApiError) -> String {
    error.user_message(LOGIN_FAILED)
}

/// Log out at the backend and clear the session.
///
/// Local state is cleared even when the backend call fails.
///
/// POST /logout
#[instrument(skip_all)]
async fn logout(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cookie = backend_cookie(&session).await;
    if let Err(e) = state.api().logout(cookie.as_ref()).await {
        tracing::warn!("Failed to logout: {e}");
    }

    clear_admin_session(&session).await;
    push_flash(&session, Flash::success("Logged out successfully")).await;
    Redirect::to("/login")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_prefers_backend_message() {
        let err = ApiError::Unauthorized {
            message: Some("Invalid credentials".to_string()),
        };
        assert_eq!(login_error_message(&err), "Invalid credentials");

        let err = ApiError::Status {
            status: 502,
            message: None,
        };
        assert_eq!(login_error_message(&err), LOGIN_FAILED);
    }
}
