//! Admin login, logout and session check.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use tunenest_core::{AdminId, AdminRole};

use super::{ApiClient, ApiError, BackendCookie, expect_success, handle_response};

const LOGIN_PATH: &str = "/admin/login";
const LOGOUT_PATH: &str = "/admin/logout";
const SESSION_CHECK_PATH: &str = "/admin/protected-dashboard";

/// Identity the backend reports for a logged-in account.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminIdentity {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<AdminId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: AdminRole,
}

/// Response of `GET /admin/protected-dashboard`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionCheck {
    /// Greeting shown in the header (e.g. "Welcome Admin").
    #[serde(default)]
    pub message: Option<String>,
    pub admin: AdminIdentity,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Response of `POST /admin/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub admin: AdminIdentity,
}

/// A successful login: the identity plus the backend cookie to replay.
#[derive(Debug, Clone)]
pub struct LoggedIn {
    pub response: LoginResponse,
    pub cookie: Option<BackendCookie>,
}

impl ApiClient {
    /// Log in with email and password.
    ///
    /// Role checking is left to the caller; a non-admin account still logs in
    /// successfully at the backend.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for bad credentials, or any transport
    /// or decode error.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoggedIn, ApiError> {
        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };

        let response = self
            .http()
            .post(self.endpoint(LOGIN_PATH))
            .json(&body)
            .send()
            .await?;

        let cookie = BackendCookie::from_set_cookie(response.headers());
        let response: LoginResponse = handle_response(LOGIN_PATH, response).await?;

        Ok(LoggedIn { response, cookie })
    }

    /// End the backend session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the request.
    #[instrument(skip(self, cookie))]
    pub async fn logout(&self, cookie: Option<&BackendCookie>) -> Result<(), ApiError> {
        let mut builder = self.http().get(self.endpoint(LOGOUT_PATH));
        if let Some(cookie) = cookie {
            builder = builder.header(reqwest::header::COOKIE, cookie.expose());
        }
        let response = builder.send().await?;
        expect_success(response).await
    }

    /// Verify the session is still valid and fetch the admin identity.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when the session is missing or expired.
    #[instrument(skip(self, cookie))]
    pub async fn check_session(
        &self,
        cookie: Option<&BackendCookie>,
    ) -> Result<SessionCheck, ApiError> {
        self.get(SESSION_CHECK_PATH, cookie).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_check_decodes() {
        let check: SessionCheck = serde_json::from_str(
            r#"{"message":"Welcome Admin","admin":{"_id":"a1","name":"Asha","email":"asha@tunenest.app","role":"admin"}}"#,
        )
        .unwrap();
        assert_eq!(check.message.as_deref(), Some("Welcome Admin"));
        assert_eq!(check.admin.name, "Asha");
        assert!(check.admin.role.is_admin());
    }

    #[test]
    fn test_session_check_without_role_is_rejected() {
        let result: Result<SessionCheck, _> =
            serde_json::from_str(r#"{"admin":{"name":"Asha"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_admin_role_decodes_as_other() {
        let login: LoginResponse =
            serde_json::from_str(r#"{"admin":{"role":"user","email":"l@x.io"}}"#).unwrap();
        assert_eq!(login.admin.role, AdminRole::Other);
    }
}
