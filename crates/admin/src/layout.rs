//! Dashboard shell: navigation, branding and the layout context every view
//! template receives.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use tower_sessions::Session;

use crate::{
    api::{BackendCookie, PlatformSettings},
    middleware::{AdminAuthRejection, RequireAdminSession},
    models::{AdminSession, Flash, UiPreferences, take_flashes},
    state::AppState,
};

/// An entry of the sidebar menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    /// Phosphor icon class.
    pub icon: &'static str,
    pub route: &'static str,
    /// Collapsible submenu. No entry uses one yet.
    pub children: Vec<NavItem>,
    pub active: bool,
}

impl NavItem {
    const fn new(label: &'static str, icon: &'static str, route: &'static str) -> Self {
        Self {
            label,
            icon,
            route,
            children: Vec::new(),
            active: false,
        }
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// The sidebar menu, in display order.
#[must_use]
pub fn menu() -> Vec<NavItem> {
    vec![
        NavItem::new("Dashboard", "ph-squares-four", "/dashboard"),
        NavItem::new("Users", "ph-users", "/users"),
        NavItem::new("Tips", "ph-gift", "/tips"),
        NavItem::new("Send Notifications", "ph-bell", "/send-notifications"),
        NavItem::new("Subscriptions", "ph-crown", "/subscriptions"),
        NavItem::new("Analytics", "ph-chart-line-up", "/analytics"),
        NavItem::new("Reports", "ph-flag", "/reports"),
        NavItem::new("Settings", "ph-gear", "/settings"),
    ]
}

/// Whether `route` is `path` or a whole-segment prefix of it.
fn route_matches(route: &str, path: &str) -> bool {
    path == route
        || path
            .strip_prefix(route)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// The menu with the item for `current_path` marked active.
///
/// The longest matching route wins, so at most one item is active.
#[must_use]
pub fn navigation(current_path: &str) -> Vec<NavItem> {
    let mut items = menu();
    let active = items
        .iter()
        .enumerate()
        .filter(|(_, item)| route_matches(item.route, current_path))
        .max_by_key(|(_, item)| item.route.len())
        .map(|(index, _)| index);

    if let Some(item) = active.and_then(|index| items.get_mut(index)) {
        item.active = true;
    }
    items
}

/// Platform name and logo shown in the sidebar header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Branding {
    pub name: String,
    pub logo: Option<String>,
}

impl Branding {
    /// Name with the product default when the backend has none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "TuneNest"
        } else {
            &self.name
        }
    }
}

impl From<PlatformSettings> for Branding {
    fn from(settings: PlatformSettings) -> Self {
        Self {
            name: settings.apk_name.unwrap_or_default(),
            logo: settings.logo.filter(|logo| !logo.trim().is_empty()),
        }
    }
}

/// Fetch branding; a failure leaves it empty.
pub async fn load_branding(state: &AppState, cookie: Option<&BackendCookie>) -> Branding {
    match state.api().platform_settings(cookie).await {
        Ok(settings) => settings.map(Branding::from).unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Failed to load branding: {e}");
            Branding::default()
        }
    }
}

/// Context injected into every dashboard template.
#[derive(Debug, Clone)]
pub struct LayoutContext {
    pub admin: AdminSession,
    /// Greeting from the session check.
    pub greeting: Option<String>,
    pub prefs: UiPreferences,
    pub nav: Vec<NavItem>,
    pub branding: Branding,
    pub flashes: Vec<Flash>,
    /// Path and query of this page, where header forms send the admin back.
    pub return_to: String,
}

impl LayoutContext {
    /// Heading greeting, falling back to the admin's name.
    #[must_use]
    pub fn greeting(&self) -> String {
        self.greeting
            .clone()
            .filter(|g| !g.trim().is_empty())
            .unwrap_or_else(|| format!("Welcome {}", self.admin.name))
    }

    /// Class for `<html>`.
    #[must_use]
    pub const fn root_class(&self) -> &'static str {
        self.prefs.root_class()
    }

    /// Add a toast to this render.
    pub fn flash(&mut self, flash: Flash) {
        self.flashes.push(flash);
    }
}

/// Extractor for dashboard pages: a verified admin plus the shell context.
pub struct Shell {
    pub layout: LayoutContext,
    pub session: Session,
    pub cookie: Option<BackendCookie>,
}

impl FromRequestParts<AppState> for Shell {
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAdminSession {
            admin,
            greeting,
            cookie,
        } = RequireAdminSession::from_request_parts(parts, state).await?;

        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AdminAuthRejection::RedirectToLogin)?;

        let return_to = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path().to_string(), ToString::to_string);
        let branding = load_branding(state, cookie.as_ref()).await;
        let flashes = take_flashes(&session).await;

        Ok(Self {
            layout: LayoutContext {
                admin,
                greeting,
                prefs: UiPreferences::load(&parts.headers),
                nav: navigation(parts.uri.path()),
                branding,
                flashes,
                return_to,
            },
            session,
            cookie,
        })
    }
}

/// Preferences for pages rendered outside the shell (login).
#[must_use]
pub fn preferences(headers: &HeaderMap) -> UiPreferences {
    UiPreferences::load(headers)
}
