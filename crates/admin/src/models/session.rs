//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use tunenest_core::{AdminId, AdminRole};

use crate::api::AdminIdentity;

/// Session-stored admin identity.
///
/// Refreshed from the backend session check on every dashboard request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminSession {
    /// Backend id, when the backend reports one.
    pub admin_id: Option<AdminId>,
    /// Admin's display name.
    pub name: String,
    /// Admin's email address.
    pub email: String,
    /// Role reported by the backend.
    pub role: AdminRole,
}

impl From<&AdminIdentity> for AdminSession {
    fn from(identity: &AdminIdentity) -> Self {
        Self {
            admin_id: identity.id.clone(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            role: identity.role,
        }
    }
}

impl AdminSession {
    /// First letter of the name (or email) for the avatar bubble.
    #[must_use]
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .chain(self.email.chars())
            .find(|c| c.is_alphanumeric())
            .map_or_else(|| "A".to_string(), |c| c.to_uppercase().collect())
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the backend's session cookie header value.
    pub const BACKEND_COOKIE: &str = "backend_cookie";

    /// Key for queued one-shot toast messages.
    pub const FLASHES: &str = "flashes";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(name: &str, email: &str) -> AdminSession {
        AdminSession {
            admin_id: None,
            name: name.to_string(),
            email: email.to_string(),
            role: AdminRole::Admin,
        }
    }

    #[test]
    fn test_initial() {
        assert_eq!(session("asha", "").initial(), "A");
        assert_eq!(session("", "ravi@tunenest.app").initial(), "R");
        assert_eq!(session("", "").initial(), "A");
    }
}
