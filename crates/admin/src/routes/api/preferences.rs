//! Dark-mode preference handlers.
//!
//! The toggle reads the current preference from the request, flips it and
//! persists the result in the durable preference cookie.

use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError, middleware::RequireAdminSession, models::UiPreferences, routes::local_path,
    state::AppState,
};

/// Build the preferences router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/preferences/dark-mode", post(toggle_dark_mode))
        .route("/api/preferences/dark-mode", post(toggle_dark_mode_json))
}

/// Form posted by the header toggle button.
#[derive(Debug, Default, Deserialize)]
pub struct ToggleForm {
    #[serde(default)]
    pub return_to: Option<String>,
}

/// Response for the JSON toggle.
#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub dark_mode: bool,
}

fn toggle(
    headers: &HeaderMap,
    secure: bool,
) -> Result<(UiPreferences, header::HeaderValue), AppError> {
    let prefs = UiPreferences::load(headers).toggled();
    let cookie = prefs
        .save(secure)
        .map_err(|e| AppError::Internal(format!("preference cookie: {e}")))?;
    Ok((prefs, cookie))
}

/// Toggle dark mode and go back to the page the form was posted from.
///
/// POST /preferences/dark-mode
async fn toggle_dark_mode(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ToggleForm>,
) -> Response {
    let target = local_path(form.return_to.as_deref(), "/dashboard");
    match toggle(&headers, state.config().is_secure()) {
        Ok((prefs, cookie)) => {
            tracing::debug!(dark_mode = prefs.dark_mode, "Toggled dark mode");
            ([(header::SET_COOKIE, cookie)], Redirect::to(&target)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

/// Toggle dark mode for script-driven toggles.
///
/// POST /api/preferences/dark-mode
///
/// # Errors
///
/// Returns 500 if the cookie cannot be encoded.
async fn toggle_dark_mode_json(
    _admin: RequireAdminSession,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let (prefs, cookie) = toggle(&headers, state.config().is_secure())?;
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(PreferencesResponse {
            dark_mode: prefs.dark_mode,
        }),
    ))
}
