//! JSON API route handlers for admin.
//!
//! Paths under `/api/` answer `401` instead of redirecting to the login page.

pub mod preferences;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new().merge(preferences::router())
}
