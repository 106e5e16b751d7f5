//! Push notification dispatch and history.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use tunenest_core::{Audience, NotificationId, NotificationKind};

use super::{ApiClient, ApiError, BackendCookie};

const NOTIFICATIONS_PATH: &str = "/save/token";

/// Body for `POST /save/token`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NotificationInput {
    pub title: String,
    pub body: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// `"all"`, `"premium"` or a specific user id.
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// A previously sent notification.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<NotificationId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Category as sent; unknown values are shown verbatim.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl NotificationRecord {
    /// Known category, if the stored type is one of ours.
    #[must_use]
    pub fn known_kind(&self) -> Option<NotificationKind> {
        NotificationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == self.kind)
    }

    /// Audience derived from the target user id.
    #[must_use]
    pub fn audience(&self) -> Audience {
        match self.user_id.as_deref() {
            None | Some("all") => Audience::All,
            Some("premium") => Audience::Premium,
            Some(_) => Audience::Specific,
        }
    }
}

impl ApiClient {
    /// Notification history.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    #[instrument(skip(self, cookie))]
    pub async fn notifications(
        &self,
        cookie: Option<&BackendCookie>,
    ) -> Result<Vec<NotificationRecord>, ApiError> {
        self.get(NOTIFICATIONS_PATH, cookie).await
    }

    /// Dispatch a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the notification.
    #[instrument(skip(self, input, cookie), fields(kind = input.kind.as_str()))]
    pub async fn send_notification(
        &self,
        input: &NotificationInput,
        cookie: Option<&BackendCookie>,
    ) -> Result<(), ApiError> {
        self.post_unit(NOTIFICATIONS_PATH, input, cookie).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_input_wire_format() {
        let input = NotificationInput {
            title: "New album".to_string(),
            body: "Out now".to_string(),
            kind: NotificationKind::Promotion,
            user_id: "premium".to_string(),
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"title":"New album","body":"Out now","type":"promotion","userId":"premium"})
        );
    }

    #[test]
    fn test_record_audience() {
        let record: NotificationRecord =
            serde_json::from_str(r#"{"title":"a","type":"urgent","userId":"u42"}"#).unwrap();
        assert_eq!(record.audience(), Audience::Specific);
        assert_eq!(record.known_kind(), Some(NotificationKind::Urgent));

        let record: NotificationRecord =
            serde_json::from_str(r#"{"title":"b","type":"weird"}"#).unwrap();
        assert_eq!(record.audience(), Audience::All);
        assert_eq!(record.known_kind(), None);
    }
}
