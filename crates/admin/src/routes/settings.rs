//! Platform settings routes.
//!
//! Branding (platform name and logo) is edited here, and the admin password
//! is recovered through an emailed reset link that lands on
//! `/settings/reset-password/{token}`.

use askama::Template;
use axum::{
    Form, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    response::Response,
    routing::{get, post},
};
use tracing::instrument;

use crate::{
    api::LogoUpload,
    filters,
    layout::{Branding, LayoutContext, Shell},
    models::Flash,
    state::AppState,
    views::{
        FormValues,
        validation::{forgot_password_email, logo_content_type, new_password},
    },
};

use super::{redirect_with, render};

/// Largest accepted logo upload.
const MAX_LOGO_BYTES: usize = 5 * 1024 * 1024;

/// The reset form shown once a token has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetForm {
    pub action: String,
    pub error: Option<String>,
}

impl ResetForm {
    fn new(token: &str) -> Self {
        Self {
            action: format!("/settings/reset-password/{}", urlencoding::encode(token)),
            error: None,
        }
    }
}

/// Settings page template.
#[derive(Template)]
#[template(path = "settings/index.html")]
struct SettingsTemplate {
    layout: LayoutContext,
    branding: Branding,
    admin_email: String,
    reset: Option<ResetForm>,
}

/// Parsed branding form.
#[derive(Debug, Clone)]
pub struct BrandingForm {
    pub apk_name: String,
    pub logo: Option<LogoUpload>,
}

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/settings", get(index))
        .route(
            "/settings/branding",
            post(save_branding).layer(DefaultBodyLimit::max(MAX_LOGO_BYTES)),
        )
        .route("/settings/forgot-password", post(forgot_password))
        .route(
            "/settings/reset-password/{token}",
            get(reset_page).post(reset_password),
        )
}

fn page(layout: LayoutContext, reset: Option<ResetForm>) -> Response {
    let template = SettingsTemplate {
        branding: layout.branding.clone(),
        admin_email: layout.admin.email.clone(),
        layout,
        reset,
    };
    render(&template)
}

/// Read the `apkName` field and the optional `logo` file.
///
/// An empty file input is treated as "keep the current logo".
///
/// # Errors
///
/// Returns a message for malformed bodies and non-image logos.
pub async fn read_branding_form(mut multipart: Multipart) -> Result<BrandingForm, String> {
    let mut apk_name = String::new();
    let mut logo = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("Invalid branding upload: {e}");
        "Invalid upload".to_string()
    })? {
        let name = field.name().map(String::from);
        match name.as_deref() {
            Some("apkName") => {
                apk_name = field.text().await.map_err(|_| "Invalid platform name")?;
            }
            Some("logo") => {
                let file_name = field.file_name().unwrap_or("logo.png").to_string();
                let content_type = field.content_type().map(String::from);
                let bytes = field.bytes().await.map_err(|e| {
                    tracing::warn!("Failed to read logo upload: {e}");
                    "Logo upload failed"
                })?;
                if bytes.is_empty() {
                    continue;
                }
                let content_type =
                    logo_content_type(content_type.as_deref()).map_err(|e| e.0)?;
                logo = Some(LogoUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok(BrandingForm {
        apk_name: apk_name.trim().to_string(),
        logo,
    })
}

/// Settings page.
///
/// GET /settings
#[instrument(skip_all)]
async fn index(Shell { layout, .. }: Shell) -> Response {
    page(layout, None)
}

/// Save platform name and logo.
///
/// POST /settings/branding
#[instrument(skip_all)]
async fn save_branding(
    Shell {
        session, cookie, ..
    }: Shell,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Response {
    let form = match read_branding_form(multipart).await {
        Ok(form) => form,
        Err(message) => return redirect_with(&session, Flash::error(message), "/settings").await,
    };

    let flash = match state
        .api()
        .update_settings(&form.apk_name, form.logo, cookie.as_ref())
        .await
    {
        Ok(_) => {
            tracing::info!(apk_name = %form.apk_name, "Branding updated");
            Flash::success("Settings saved successfully!")
        }
        Err(e) => {
            tracing::error!("Error saving settings: {e}");
            Flash::error(e.user_message("Failed to save settings"))
        }
    };
    redirect_with(&session, flash, "/settings").await
}

/// Email a reset link.
///
/// POST /settings/forgot-password
#[instrument(skip_all)]
async fn forgot_password(
    Shell {
        session, cookie, ..
    }: Shell,
    State(state): State<AppState>,
    Form(values): Form<FormValues>,
) -> Response {
    let email = match forgot_password_email(&values) {
        Ok(email) => email,
        Err(e) => return redirect_with(&session, Flash::error(e.0), "/settings").await,
    };

    let flash = match state.api().forgot_password(&email, cookie.as_ref()).await {
        Ok(response) if response.success => Flash::success(
            "Password reset link sent to your email. Please check your inbox.",
        ),
        Ok(response) => Flash::error(
            response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Failed to send reset link".to_string()),
        ),
        Err(e) => {
            tracing::error!("Forgot password error: {e}");
            Flash::error(e.user_message("Failed to send reset link"))
        }
    };
    redirect_with(&session, flash, "/settings").await
}

/// Verify the token before offering the reset form.
///
/// GET /settings/reset-password/{token}
#[instrument(skip_all)]
async fn reset_page(
    Shell {
        mut layout,
        session,
        ..
    }: Shell,
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Response {
    match state.api().verify_reset_token(&token).await {
        Ok(verification) if verification.valid => {
            layout.flash(Flash::success(
                "Token verified. You can now reset your password.",
            ));
            page(layout, Some(ResetForm::new(&token)))
        }
        Ok(_) => redirect_with(&session, Flash::error("Invalid or expired token"), "/settings").await,
        Err(e) => {
            tracing::error!("Token verification error: {e}");
            redirect_with(&session, Flash::error("Failed to verify token"), "/settings").await
        }
    }
}

/// Set a new password.
///
/// POST /settings/reset-password/{token}
#[instrument(skip_all)]
async fn reset_password(
    Shell {
        layout, session, ..
    }: Shell,
    State(state): State<AppState>,
    Path(token): Path<String>,
    Form(values): Form<FormValues>,
) -> Response {
    let retry = |layout: LayoutContext, error: String| {
        page(
            layout,
            Some(ResetForm {
                error: Some(error),
                ..ResetForm::new(&token)
            }),
        )
    };

    let password = match new_password(&values) {
        Ok(password) => password,
        Err(e) => return retry(layout, e.0),
    };

    match state.api().reset_password(&token, &password).await {
        Ok(response) if response.success => {
            tracing::info!("Admin password reset");
            redirect_with(
                &session,
                Flash::success("Password updated successfully"),
                "/settings",
            )
            .await
        }
        Ok(response) => retry(
            layout,
            response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Failed to reset password".to_string()),
        ),
        Err(e) => {
            tracing::error!("Reset password error: {e}");
            retry(layout, e.user_message("Failed to reset password"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_form_action_encodes_token() {
        let form = ResetForm::new("abc/def");
        assert_eq!(form.action, "/settings/reset-password/abc%2Fdef");
        assert!(form.error.is_none());
    }
}
