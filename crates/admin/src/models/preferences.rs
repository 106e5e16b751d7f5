//! Per-browser UI preferences.
//!
//! The dark-mode flag lives in a long-lived cookie so it survives logout and
//! new sessions. When the cookie is absent the browser's
//! `Sec-CH-Prefers-Color-Scheme` client hint decides the initial value.

use axum::http::{HeaderMap, HeaderValue, header};
use serde::{Deserialize, Serialize};
use tower_sessions::cookie::{Cookie, SameSite, time::Duration};

/// Cookie holding the JSON-encoded dark-mode flag.
pub const DARK_MODE_COOKIE: &str = "tunenest_dark_mode";

/// Client hint carrying the operating system's color scheme.
pub const COLOR_SCHEME_HINT: &str = "sec-ch-prefers-color-scheme";

const PREFERENCE_MAX_AGE_DAYS: i64 = 365;

/// UI preferences injected into every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UiPreferences {
    pub dark_mode: bool,
}

impl UiPreferences {
    /// Load preferences from request headers.
    ///
    /// Order: stored cookie, then system preference hint, then light mode.
    #[must_use]
    pub fn load(headers: &HeaderMap) -> Self {
        stored_preference(headers)
            .or_else(|| system_preference(headers))
            .unwrap_or_default()
    }

    /// Parse the stored cookie value (`true` / `false`).
    #[must_use]
    pub fn from_cookie_value(value: &str) -> Option<Self> {
        serde_json::from_str::<bool>(value.trim())
            .ok()
            .map(|dark_mode| Self { dark_mode })
    }

    /// The same preferences with dark mode flipped.
    #[must_use]
    pub const fn toggled(self) -> Self {
        Self {
            dark_mode: !self.dark_mode,
        }
    }

    /// Durable cookie persisting these preferences.
    #[must_use]
    pub fn to_cookie(self, secure: bool) -> Cookie<'static> {
        Cookie::build((DARK_MODE_COOKIE, self.dark_mode.to_string()))
            .path("/")
            .max_age(Duration::days(PREFERENCE_MAX_AGE_DAYS))
            .same_site(SameSite::Lax)
            .http_only(true)
            .secure(secure)
            .build()
    }

    /// `Set-Cookie` header value persisting these preferences.
    ///
    /// # Errors
    ///
    /// Returns an error if the cookie cannot be encoded as a header value.
    pub fn save(self, secure: bool) -> Result<HeaderValue, header::InvalidHeaderValue> {
        HeaderValue::from_str(&self.to_cookie(secure).to_string())
    }

    /// Class applied to the document root.
    #[must_use]
    pub const fn root_class(self) -> &'static str {
        if self.dark_mode { "dark" } else { "" }
    }
}

fn stored_preference(headers: &HeaderMap) -> Option<UiPreferences> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == DARK_MODE_COOKIE)
        .and_then(|cookie| UiPreferences::from_cookie_value(cookie.value()))
}

fn system_preference(headers: &HeaderMap) -> Option<UiPreferences> {
    let hint = headers.get(COLOR_SCHEME_HINT)?.to_str().ok()?;
    match hint.trim().trim_matches('"') {
        "dark" => Some(UiPreferences { dark_mode: true }),
        "light" => Some(UiPreferences { dark_mode: false }),
        _ => None,
    }
}
