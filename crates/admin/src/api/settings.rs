//! Platform branding and admin password recovery.

use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ApiClient, ApiError, BackendCookie, segment};

const SETTINGS_PATH: &str = "/admin/setting/details";
const UPDATE_SETTINGS_PATH: &str = "/admin/update-settings";

/// Branding fields shown in the navigation shell.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PlatformSettings {
    #[serde(rename = "apkName", default)]
    pub apk_name: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

/// Response of `PUT /admin/update-settings`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSettingsResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub admin: Option<PlatformSettings>,
}

/// Logo image forwarded from the settings form.
#[derive(Debug, Clone)]
pub struct LogoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Generic `{success, message}` acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `GET /admin/verify-reset-token/{token}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenVerification {
    #[serde(default)]
    pub valid: bool,
}

#[derive(Serialize)]
struct ForgotPasswordRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct ResetPasswordRequest<'a> {
    password: &'a str,
}

impl ApiClient {
    /// Fetch branding. The backend returns a list; only the first entry is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a list.
    #[instrument(skip(self, cookie))]
    pub async fn platform_settings(
        &self,
        cookie: Option<&BackendCookie>,
    ) -> Result<Option<PlatformSettings>, ApiError> {
        let settings: Vec<PlatformSettings> = self.get(SETTINGS_PATH, cookie).await?;
        Ok(settings.into_iter().next())
    }

    /// Update platform name and optionally the logo.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload is rejected.
    #[instrument(skip(self, logo, cookie), fields(has_logo = logo.is_some()))]
    pub async fn update_settings(
        &self,
        apk_name: &str,
        logo: Option<LogoUpload>,
        cookie: Option<&BackendCookie>,
    ) -> Result<UpdateSettingsResponse, ApiError> {
        let mut form = Form::new().text("apkName", apk_name.to_string());

        if let Some(logo) = logo {
            let part = Part::bytes(logo.bytes)
                .file_name(logo.file_name)
                .mime_str(&logo.content_type)?;
            form = form.part("logo", part);
        }

        self.put_multipart(UPDATE_SETTINGS_PATH, form, cookie).await
    }

    /// Ask the backend to email a password-reset link.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, cookie))]
    pub async fn forgot_password(
        &self,
        email: &str,
        cookie: Option<&BackendCookie>,
    ) -> Result<ActionResponse, ApiError> {
        self.post(
            "/admin/forgot-password",
            &ForgotPasswordRequest { email },
            cookie,
        )
        .await
    }

    /// Check whether a reset token is still valid.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn verify_reset_token(&self, token: &str) -> Result<TokenVerification, ApiError> {
        let path = format!("/admin/verify-reset-token/{}", segment(token));
        self.get(&path, None).await
    }

    /// Set a new password using a reset token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        token: &str,
        password: &SecretString,
    ) -> Result<ActionResponse, ApiError> {
        let path = format!("/admin/reset-password/{}", segment(token));
        let body = ResetPasswordRequest {
            password: password.expose_secret(),
        };
        self.post(&path, &body, None).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_list_decodes() {
        let settings: Vec<PlatformSettings> =
            serde_json::from_str(r#"[{"apkName":"TuneNest","logo":"https://cdn/logo.png","_id":"x"}]"#)
                .unwrap();
        assert_eq!(settings[0].apk_name.as_deref(), Some("TuneNest"));
    }

    #[test]
    fn test_update_response_without_admin() {
        let response: UpdateSettingsResponse =
            serde_json::from_str(r#"{"message":"Updated"}"#).unwrap();
        assert!(response.admin.is_none());
    }
}
