//! Push notification route handlers.

use askama::Template;
use axum::{Form, Router, extract::State, response::Response, routing::get};
use tracing::instrument;

use tunenest_core::{Audience, NotificationKind};

use crate::{
    api::{ApiError, BackendCookie, EndUser, NotificationRecord},
    components::{
        badge::{Badge, Tone},
        data_table::FilterOption,
        stat_card::StatCard,
    },
    filters,
    filters::format_short_date,
    layout::{LayoutContext, Shell},
    models::Flash,
    state::AppState,
    views::{FormValues, LoadState, ViewState, validation::notification_input},
};

use super::{redirect_with, render};

/// Everything the page reads.
#[derive(Debug, Clone, Default)]
pub struct NotificationData {
    pub users: Vec<EndUser>,
    pub history: Vec<NotificationRecord>,
}

/// A sent notification, ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub title: String,
    pub body: String,
    pub badge: Badge,
    pub audience: &'static str,
    pub sent: Option<String>,
}

impl From<&NotificationRecord> for HistoryEntry {
    fn from(record: &NotificationRecord) -> Self {
        Self {
            title: record.title.clone(),
            body: record.body.clone(),
            badge: record.known_kind().map_or_else(
                || Badge::new(record.kind.as_str(), Tone::Neutral),
                Badge::notification_kind,
            ),
            audience: record.audience().label(),
            sent: record.created_at.as_deref().map(format_short_date),
        }
    }
}

/// Total, urgent and promotion counters.
#[must_use]
pub fn notification_stats(history: &[NotificationRecord]) -> Vec<StatCard> {
    let count = |kind: NotificationKind| {
        history
            .iter()
            .filter(|record| record.known_kind() == Some(kind))
            .count()
    };

    vec![
        StatCard::new("Total Notifications", history.len().to_string(), "ph-bell"),
        StatCard::new(
            "Urgent Notifications",
            count(NotificationKind::Urgent).to_string(),
            "ph-warning-circle",
        ),
        StatCard::new(
            "Promotions",
            count(NotificationKind::Promotion).to_string(),
            "ph-gift",
        ),
    ]
}

/// Options of the recipient select.
#[must_use]
pub fn recipient_options(users: &[EndUser]) -> Vec<FilterOption> {
    users
        .iter()
        .map(|user| {
            let label = match user.email.as_deref() {
                Some(email) if !email.is_empty() => format!("{} ({email})", user.display_name()),
                _ => user.display_name().to_string(),
            };
            FilterOption::new(user.id.as_str(), &label)
        })
        .collect()
}

/// Notifications page template.
#[derive(Template)]
#[template(path = "notifications/index.html")]
struct NotificationsTemplate {
    layout: LayoutContext,
    values: FormValues,
    error: Option<String>,
    kinds: Vec<FilterOption>,
    audiences: Vec<FilterOption>,
    recipients: Vec<FilterOption>,
    stats: Vec<StatCard>,
    history: Vec<HistoryEntry>,
    loaded: bool,
}

/// Build the notifications router.
pub fn router() -> Router<AppState> {
    Router::new().route("/send-notifications", get(index).post(send))
}

/// Read recipients and history together; either failing fails both.
///
/// # Errors
///
/// Returns the first failure.
pub async fn load_notification_data(
    state: &AppState,
    cookie: Option<&BackendCookie>,
) -> Result<NotificationData, ApiError> {
    let (users, history) = tokio::try_join!(
        state.api().users(cookie),
        state.api().notifications(cookie),
    )?;
    Ok(NotificationData { users, history })
}

async fn fetch(state: &AppState, cookie: Option<&BackendCookie>) -> LoadState<NotificationData> {
    ViewState::resolve(async {
        load_notification_data(state, cookie).await.map_err(|e| {
            tracing::error!("Error fetching notification data: {e}");
            "Failed to load data".to_string()
        })
    })
    .await
}

fn default_values() -> FormValues {
    FormValues::default()
        .with("type", NotificationKind::default().as_str())
        .with("audience", Audience::default().as_str())
}

fn page(
    mut layout: LayoutContext,
    data: &LoadState<NotificationData>,
    values: FormValues,
    error: Option<String>,
) -> Response {
    if let Some(message) = data.error() {
        layout.flash(Flash::error(message));
    }
    let loaded = data.loaded().cloned().unwrap_or_default();

    let template = NotificationsTemplate {
        layout,
        values,
        error,
        kinds: NotificationKind::ALL
            .iter()
            .map(|k| FilterOption::new(k.as_str(), k.label()))
            .collect(),
        audiences: Audience::ALL
            .iter()
            .map(|a| FilterOption::new(a.as_str(), a.label()))
            .collect(),
        recipients: recipient_options(&loaded.users),
        stats: notification_stats(&loaded.history),
        history: loaded.history.iter().map(HistoryEntry::from).collect(),
        loaded: data.loaded().is_some(),
    };
    render(&template)
}

/// Compose form and history.
///
/// GET /send-notifications
#[instrument(skip_all)]
async fn index(Shell { layout, cookie, .. }: Shell, State(state): State<AppState>) -> Response {
    let data = fetch(&state, cookie.as_ref()).await;
    page(layout, &data, default_values(), None)
}

/// Dispatch a notification.
///
/// POST /send-notifications
#[instrument(skip_all)]
async fn send(
    Shell {
        layout,
        session,
        cookie,
    }: Shell,
    State(state): State<AppState>,
    Form(values): Form<FormValues>,
) -> Response {
    let error = match notification_input(&values) {
        Ok(input) => match state.api().send_notification(&input, cookie.as_ref()).await {
            Ok(()) => {
                tracing::info!(audience = %input.user_id, "Notification sent");
                return redirect_with(
                    &session,
                    Flash::success("Notification sent successfully!"),
                    "/send-notifications",
                )
                .await;
            }
            Err(e) => {
                tracing::error!("Error sending notification: {e}");
                e.user_message("Failed to send notification.")
            }
        },
        Err(e) => e.0,
    };

    let data = fetch(&state, cookie.as_ref()).await;
    page(layout, &data, values, Some(error))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn history() -> Vec<NotificationRecord> {
        serde_json::from_value(serde_json::json!([
            {"_id": "n1", "title": "Sale", "body": "50% off", "type": "promotion", "userId": "all"},
            {"_id": "n2", "title": "Outage", "body": "Down", "type": "urgent", "userId": "premium"},
            {"_id": "n3", "title": "Hi", "body": "Hello", "type": "urgent", "userId": "u1",
             "createdAt": "2024-06-01T10:00:00Z"},
            {"_id": "n4", "title": "Old", "body": "Legacy", "type": "digest"},
        ]))
        .unwrap()
    }

    #[test]
    fn test_counters() {
        let stats = notification_stats(&history());
        let values: Vec<_> = stats.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, ["4", "2", "1"]);
    }

    #[test]
    fn test_history_entry() {
        let history = history();
        let entry = HistoryEntry::from(&history[2]);
        assert_eq!(entry.audience, "Specific User");
        assert_eq!(entry.sent.as_deref(), Some("01 Jun 2024"));
        assert_eq!(entry.badge, Badge::notification_kind(NotificationKind::Urgent));

        let unknown = HistoryEntry::from(&history[3]);
        assert_eq!(unknown.badge.label, "digest");
        assert_eq!(unknown.audience, "All Users");
    }

    #[test]
    fn test_recipient_options() {
        let users: Vec<EndUser> = serde_json::from_value(serde_json::json!([
            {"_id": "u1", "name": "Asha", "email": "asha@example.in"},
            {"_id": "u2", "name": "Dev"},
        ]))
        .unwrap();
        let options = recipient_options(&users);
        assert_eq!(options[0].value, "u1");
        assert_eq!(options[0].label, "Asha (asha@example.in)");
        assert_eq!(options[1].label, "Dev");
    }
}
