//! Partner and listener route handlers.
//!
//! Partners are registered, edited and deleted here; the backend emails
//! them login credentials. Listeners are the app's end users and are
//! read-only. Both lists render through `resource_list.html`.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::Response,
    routing::{get, post},
};
use futures::future::join_all;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use tunenest_core::PartnerId;

use crate::{
    api::{ApiError, BackendCookie, PartnerMutation},
    components::modal::Modal,
    filters,
    layout::{LayoutContext, Shell},
    middleware::RequireAdminSession,
    models::Flash,
    state::AppState,
    views::{
        FormValues, FormView, ListView, LoadState, ViewState,
        resource::{PartnerRow, ViewTab, find_partner, listeners, partners, user_tabs},
        validation::partner_form_values,
    },
};

use super::{redirect_with, render};

const PARTNER_FORM: &str = "partner-form";
const PARTNER_DETAIL: &str = "partner-detail";

/// A labelled value in the partner detail modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

/// Read-only partner details.
#[derive(Debug, Clone)]
pub struct PartnerDetail {
    pub modal: Modal,
    pub fields: Vec<DetailField>,
}

impl PartnerDetail {
    /// Details of one partner, shown open.
    #[must_use]
    pub fn new(row: &PartnerRow) -> Self {
        let partner = &row.partner;
        let optional = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        let fields = [
            ("Email", Some(partner.email.clone())),
            ("Phone", Some(partner.phone.clone())),
            ("Service name", Some(partner.service_name.clone())),
            ("Service type", Some(partner.service_type.clone())),
            ("Experience", partner.experience.map(|y| format!("{y} yrs"))),
            ("Charges", partner.charges.map(|c| format!("₹{c}"))),
            (
                "Service areas",
                Some(partner.service_area.join(", ")),
            ),
            ("PAN number", partner.pan_number.clone()),
            ("Aadhaar number", partner.aadhar_number.clone()),
            ("Address", partner.address.as_ref().map(|a| a.display())),
            ("Notes", partner.notes.clone()),
            (
                "Credentials email",
                Some(
                    match row.email_sent {
                        Some(true) => "Sent",
                        Some(false) => "Not sent",
                        None => "Unknown",
                    }
                    .to_string(),
                ),
            ),
        ];

        Self {
            modal: Modal::new(PARTNER_DETAIL, &partner.name).opened(),
            fields: fields
                .into_iter()
                .filter_map(|(label, value)| optional(value).map(|value| DetailField { label, value }))
                .collect(),
        }
    }
}

/// Generic list page: partners or listeners.
#[derive(Template)]
#[template(path = "resource_list.html")]
struct ResourceListTemplate {
    layout: LayoutContext,
    tabs: Vec<ViewTab>,
    list: ListView,
    form: Option<FormView>,
    detail: Option<PartnerDetail>,
}

/// Partners query string.
#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    #[serde(default)]
    q: String,
    view: Option<PartnerId>,
    edit: Option<PartnerId>,
    new: Option<String>,
}

/// Listeners query string.
#[derive(Debug, Default, Deserialize)]
pub struct ListenersQuery {
    #[serde(default)]
    q: String,
}

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(index).post(create))
        .route("/users/listeners", get(listener_index))
        .route("/users/{id}", post(update))
        .route("/users/{id}/delete", post(delete))
        .route("/users/{id}/resend-email", post(resend_email))
        .route("/users/{id}/reset-password", post(reset_password))
}

/// Fetch partners, then each partner's email status concurrently.
///
/// A failed status lookup leaves that row's status unknown.
///
/// # Errors
///
/// Returns an error if the partner list cannot be fetched.
pub async fn load_partners(
    state: &AppState,
    cookie: Option<&BackendCookie>,
) -> Result<Vec<PartnerRow>, ApiError> {
    let partners = state.api().partners(cookie).await?;
    let statuses = join_all(
        partners
            .iter()
            .map(|partner| state.api().partner_email_status(&partner.id, cookie)),
    )
    .await;

    Ok(partners
        .into_iter()
        .zip(statuses)
        .map(|(partner, status)| PartnerRow {
            email_sent: match status {
                Ok(status) => Some(status.sent),
                Err(e) => {
                    tracing::warn!(partner = %partner.id, "Failed to fetch email status: {e}");
                    None
                }
            },
            partner,
        })
        .collect())
}

async fn fetch_partners(
    state: &AppState,
    cookie: Option<&BackendCookie>,
) -> LoadState<Vec<PartnerRow>> {
    ViewState::resolve(async {
        load_partners(state, cookie).await.map_err(|e| {
            tracing::error!("Error fetching partners: {e}");
            e.user_message("Failed to fetch partners")
        })
    })
    .await
}

fn register_form(values: &FormValues) -> Option<FormView> {
    partners().form_view(
        Modal::new(PARTNER_FORM, "Register Partner"),
        "/users".to_string(),
        "Register Partner",
        values,
    )
}

fn edit_form(id: &PartnerId, values: &FormValues) -> Option<FormView> {
    partners().form_view(
        Modal::new(PARTNER_FORM, "Edit Partner").opened(),
        format!("/users/{}", urlencoding::encode(id.as_str())),
        "Update Partner",
        values,
    )
}

fn partners_page(
    mut layout: LayoutContext,
    rows: &LoadState<Vec<PartnerRow>>,
    search: &str,
    form: Option<FormView>,
    detail: Option<PartnerDetail>,
) -> Response {
    if let Some(message) = rows.error() {
        layout.flash(Flash::error(message));
    }

    let template = ResourceListTemplate {
        layout,
        tabs: user_tabs("/users"),
        list: partners().list_view(rows, search),
        form,
        detail,
    };
    render(&template)
}

/// Re-render the partner list with the form open and its values kept.
async fn reopen_form(
    layout: LayoutContext,
    state: &AppState,
    cookie: Option<&BackendCookie>,
    form: Option<FormView>,
    error: String,
) -> Response {
    let rows = fetch_partners(state, cookie).await;
    let form = form.map(|form| FormView {
        modal: form.modal.reopen_with(error),
        ..form
    });
    partners_page(layout, &rows, "", form, None)
}

/// Message for a failed partner mutation.
///
/// Duplicate email or phone rejections get a hint on how to recover.
#[must_use]
pub fn mutation_error(action: &str, error: &ApiError, fallback: &str) -> String {
    let message = error.user_message(fallback);
    if message.to_lowercase().contains("already exists") {
        format!("{action} failed: {message}. Please use a different email or phone number.")
    } else {
        message
    }
}

/// Toast after a successful registration.
#[must_use]
pub fn registered_message(outcome: &PartnerMutation) -> &'static str {
    if outcome.email_sent() {
        "Partner registered successfully! Login credentials have been sent via email."
    } else {
        "Partner registered successfully! (Note: Email notification may not have been sent)"
    }
}

/// Treat a 2xx response with `success: false` as a rejection.
fn accepted(outcome: PartnerMutation) -> Result<PartnerMutation, ApiError> {
    if outcome.success {
        Ok(outcome)
    } else {
        Err(ApiError::Status {
            status: 200,
            message: outcome.message,
        })
    }
}

/// Partner list.
///
/// GET /users
#[instrument(skip_all)]
async fn index(
    Shell { layout, cookie, .. }: Shell,
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
) -> Response {
    let rows = fetch_partners(&state, cookie.as_ref()).await;
    let loaded = rows.loaded().map(Vec::as_slice).unwrap_or_default();

    let editing = query
        .edit
        .as_ref()
        .and_then(|id| find_partner(loaded, id).map(|row| (id, row)));
    let form = match editing {
        Some((id, row)) => edit_form(id, &partner_form_values(&row.partner)),
        None => {
            let form = register_form(&FormValues::default());
            if query.new.is_some() {
                form.map(|form| FormView {
                    modal: form.modal.opened(),
                    ..form
                })
            } else {
                form
            }
        }
    };
    let detail = query
        .view
        .as_ref()
        .and_then(|id| find_partner(loaded, id))
        .map(PartnerDetail::new);

    partners_page(layout, &rows, &query.q, form, detail)
}

/// Register a partner.
///
/// POST /users
#[instrument(skip_all)]
async fn create(
    Shell {
        layout,
        session,
        cookie,
    }: Shell,
    State(state): State<AppState>,
    Form(values): Form<FormValues>,
) -> Response {
    let input = match partners().validate(&values) {
        Ok(input) => input,
        Err(e) => {
            return reopen_form(layout, &state, cookie.as_ref(), register_form(&values), e.0).await;
        }
    };

    let outcome = state
        .api()
        .register_partner(&input, cookie.as_ref())
        .await
        .and_then(accepted);
    match outcome {
        Ok(outcome) => {
            tracing::info!(email = %input.email, "Partner registered");
            redirect_with(&session, Flash::success(registered_message(&outcome)), "/users").await
        }
        Err(e) => {
            tracing::error!("Error registering partner: {e}");
            let message = mutation_error(
                "Registration",
                &e,
                "Failed to register partner. Please try again.",
            );
            reopen_form(layout, &state, cookie.as_ref(), register_form(&values), message).await
        }
    }
}

/// Update a partner.
///
/// POST /users/{id}
#[instrument(skip_all, fields(partner = %id))]
async fn update(
    Shell {
        layout,
        session,
        cookie,
    }: Shell,
    State(state): State<AppState>,
    Path(id): Path<PartnerId>,
    Form(values): Form<FormValues>,
) -> Response {
    let input = match partners().validate(&values) {
        Ok(input) => input,
        Err(e) => {
            return reopen_form(layout, &state, cookie.as_ref(), edit_form(&id, &values), e.0).await;
        }
    };

    let outcome = state
        .api()
        .update_partner(&id, &input, cookie.as_ref())
        .await
        .and_then(accepted);
    match outcome {
        Ok(outcome) => {
            let message = outcome
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Partner updated successfully!".to_string());
            redirect_with(&session, Flash::success(message), "/users").await
        }
        Err(e) => {
            tracing::error!("Error updating partner: {e}");
            let message = mutation_error("Update", &e, "Failed to update partner. Please try again.");
            reopen_form(layout, &state, cookie.as_ref(), edit_form(&id, &values), message).await
        }
    }
}

/// Delete a partner.
///
/// POST /users/{id}/delete
#[instrument(skip_all, fields(partner = %id))]
async fn delete(
    admin: RequireAdminSession,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<PartnerId>,
) -> Response {
    let flash = match state.api().delete_partner(&id, admin.cookie.as_ref()).await {
        Ok(()) => Flash::success("Partner deleted successfully!"),
        Err(e) => {
            tracing::error!("Error deleting partner: {e}");
            Flash::error(e.user_message("Failed to delete partner."))
        }
    };
    redirect_with(&session, flash, "/users").await
}

/// Re-send the welcome email with login credentials.
///
/// POST /users/{id}/resend-email
#[instrument(skip_all, fields(partner = %id))]
async fn resend_email(
    admin: RequireAdminSession,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<PartnerId>,
) -> Response {
    let outcome = state
        .api()
        .resend_partner_email(&id, admin.cookie.as_ref())
        .await
        .and_then(accepted);
    let flash = match outcome {
        Ok(_) => Flash::success("Welcome email resent successfully"),
        Err(e) => {
            tracing::error!("Error resending email: {e}");
            Flash::error(e.user_message("Failed to resend email. Please try again."))
        }
    };
    redirect_with(&session, flash, "/users").await
}

/// Generate new credentials and email them.
///
/// POST /users/{id}/reset-password
#[instrument(skip_all, fields(partner = %id))]
async fn reset_password(
    admin: RequireAdminSession,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<PartnerId>,
) -> Response {
    let outcome = state
        .api()
        .reset_partner_password(&id, admin.cookie.as_ref())
        .await
        .and_then(accepted);
    let flash = match outcome {
        Ok(_) => Flash::success("Password reset successfully. New credentials have been sent."),
        Err(e) => {
            tracing::error!("Error resetting password: {e}");
            Flash::error(e.user_message("Failed to reset password. Please try again."))
        }
    };
    redirect_with(&session, flash, "/users").await
}

/// Listener list.
///
/// GET /users/listeners
#[instrument(skip_all)]
async fn listener_index(
    Shell {
        mut layout, cookie, ..
    }: Shell,
    State(state): State<AppState>,
    Query(query): Query<ListenersQuery>,
) -> Response {
    let users = ViewState::resolve(async {
        state.api().users(cookie.as_ref()).await.map_err(|e| {
            tracing::error!("Error fetching users: {e}");
            e.user_message("Failed to fetch users")
        })
    })
    .await;
    if let Some(message) = users.error() {
        layout.flash(Flash::error(message));
    }

    let template = ResourceListTemplate {
        layout,
        tabs: user_tabs("/users/listeners"),
        list: listeners().list_view(&users, &query.q),
        form: None,
        detail: None,
    };
    render(&template)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(value: serde_json::Value, email_sent: Option<bool>) -> PartnerRow {
        PartnerRow {
            partner: serde_json::from_value(value).unwrap(),
            email_sent,
        }
    }

    #[test]
    fn test_duplicate_rejection_gets_hint() {
        let err = ApiError::Status {
            status: 409,
            message: Some("Partner with this email already exists".to_string()),
        };
        assert_eq!(
            mutation_error("Registration", &err, "fallback"),
            "Registration failed: Partner with this email already exists. Please use a different email or phone number."
        );

        let err = ApiError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(
            mutation_error("Update", &err, "Failed to update partner. Please try again."),
            "Failed to update partner. Please try again."
        );
    }

    #[test]
    fn test_registered_message_reflects_email_delivery() {
        let sent: PartnerMutation =
            serde_json::from_str(r#"{"success":true,"data":{"emailSent":true}}"#).unwrap();
        assert!(registered_message(&sent).contains("have been sent via email"));

        let unsent: PartnerMutation = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(registered_message(&unsent).contains("may not have been sent"));
    }

    #[test]
    fn test_unsuccessful_acknowledgement_is_an_error() {
        let outcome = PartnerMutation {
            success: false,
            message: Some("Invalid service type".to_string()),
            data: None,
        };
        let err = accepted(outcome).unwrap_err();
        assert_eq!(err.user_message("fallback"), "Invalid service type");
    }

    #[test]
    fn test_detail_skips_blank_fields() {
        let detail = PartnerDetail::new(&row(
            serde_json::json!({
                "_id": "p1",
                "name": "Ravi Kumar",
                "email": "ravi@example.in",
                "phone": "9876543210",
                "serviceName": "Ravi Electricals",
                "serviceType": "Electrician",
                "experience": 5,
                "serviceArea": ["Pune", "Mumbai"],
                "notes": "  ",
            }),
            None,
        ));

        assert_eq!(detail.modal.title, "Ravi Kumar");
        assert!(detail.modal.open);
        let labels: Vec<_> = detail.fields.iter().map(|f| f.label).collect();
        assert!(!labels.contains(&"Notes"));
        assert!(!labels.contains(&"Charges"));
        assert!(detail.fields.contains(&DetailField {
            label: "Service areas",
            value: "Pune, Mumbai".to_string(),
        }));
        assert!(detail.fields.contains(&DetailField {
            label: "Credentials email",
            value: "Unknown".to_string(),
        }));
    }

    #[test]
    fn test_edit_form_is_open_and_prefilled() {
        let partner = row(
            serde_json::json!({"_id": "p 1", "name": "Ravi", "phone": "9876543210"}),
            Some(true),
        );
        let form = edit_form(&partner.partner.id, &partner_form_values(&partner.partner)).unwrap();
        assert!(form.modal.open);
        assert_eq!(form.action, "/users/p%201");
        let name = form.fields.iter().find(|f| f.field.name == "name").unwrap();
        assert_eq!(name.value, "Ravi");
    }
}
