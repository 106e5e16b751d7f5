//! Status and category enums shared by the dashboard views.

use serde::{Deserialize, Serialize};

/// Role reported by the backend for an authenticated account.
///
/// Only [`AdminRole::Admin`] may use the dashboard; any other role string the
/// backend sends decodes to [`AdminRole::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access to the dashboard.
    Admin,
    /// Any non-admin account (listeners, partners, artists).
    #[serde(other)]
    Other,
}

impl AdminRole {
    /// Whether this role may open dashboard routes.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Moderation state of a content report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ReportStatus {
    #[default]
    Pending,
    Resolved,
    Rejected,
}

impl ReportStatus {
    /// Every status, in display order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Resolved, Self::Rejected];

    /// Display label (also the form value).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Resolved => "Resolved",
            Self::Rejected => "Rejected",
        }
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("invalid report status: {s}"))
    }
}

/// What a content report points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    Song,
    User,
}

impl ReportKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 2] = [Self::Song, Self::User];

    /// Display label (also the form value).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Song => "Song",
            Self::User => "User",
        }
    }
}

impl std::str::FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("invalid report type: {s}"))
    }
}

/// Category of a push notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Info,
    Alert,
    Promotion,
    Update,
    Urgent,
}

impl NotificationKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 5] = [
        Self::Info,
        Self::Alert,
        Self::Promotion,
        Self::Update,
        Self::Urgent,
    ];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Alert => "alert",
            Self::Promotion => "promotion",
            Self::Update => "update",
            Self::Urgent => "urgent",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "Information",
            Self::Alert => "Alert",
            Self::Promotion => "Promotion",
            Self::Update => "Update",
            Self::Urgent => "Urgent",
        }
    }
}

/// Who receives a push notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    #[default]
    All,
    Premium,
    Specific,
}

impl Audience {
    /// Every audience, in display order.
    pub const ALL: [Self; 3] = [Self::All, Self::Premium, Self::Specific];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Premium => "premium",
            Self::Specific => "specific",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Users",
            Self::Premium => "Premium Users",
            Self::Specific => "Specific User",
        }
    }
}

/// Billing interval of a subscription plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanInterval {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl PlanInterval {
    /// Every interval, in display order.
    pub const ALL: [Self; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Yearly];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }
}

impl std::str::FromStr for PlanInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|interval| interval.as_str() == s)
            .ok_or_else(|| format!("invalid plan interval: {s}"))
    }
}

/// Audience tier a subscription plan is sold to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Student,
    #[default]
    Individual,
    Duo,
    Family,
}

impl PlanTier {
    /// Every tier, in display order.
    pub const ALL: [Self; 4] = [Self::Student, Self::Individual, Self::Duo, Self::Family];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Individual => "individual",
            Self::Duo => "duo",
            Self::Family => "family",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Individual => "Individual",
            Self::Duo => "Duo",
            Self::Family => "Family",
        }
    }
}

impl std::str::FromStr for PlanTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| format!("invalid plan type: {s}"))
    }
}

/// Lifecycle state of a subscription plan.
///
/// The backend only distinguishes `"archived"`; every other value is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Archived,
    #[default]
    #[serde(other)]
    Active,
}

/// Payment rail a tip was paid through, derived from its payment id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    Razorpay,
    Upi,
    Other,
}

impl PaymentMethod {
    /// Classify a gateway payment id (`pay_...` or `upi_...`).
    #[must_use]
    pub fn from_payment_id(payment_id: &str) -> Self {
        if payment_id.starts_with("pay_") {
            Self::Razorpay
        } else if payment_id.starts_with("upi_") {
            Self::Upi
        } else {
            Self::Other
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Razorpay => "Razorpay",
            Self::Upi => "UPI",
            Self::Other => "Other",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_is_other() {
        let role: AdminRole = serde_json::from_str("\"listener\"").unwrap();
        assert_eq!(role, AdminRole::Other);
        assert!(!role.is_admin());

        let role: AdminRole = serde_json::from_str("\"admin\"").unwrap();
        assert!(role.is_admin());
    }

    #[test]
    fn test_plan_status_only_archived_is_special() {
        let status: PlanStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(status, PlanStatus::Archived);
        let status: PlanStatus = serde_json::from_str("\"draft\"").unwrap();
        assert_eq!(status, PlanStatus::Active);
    }

    #[test]
    fn test_report_status_from_str_case_insensitive() {
        assert_eq!("resolved".parse::<ReportStatus>().unwrap(), ReportStatus::Resolved);
        assert!("closed".parse::<ReportStatus>().is_err());
    }

    #[test]
    fn test_payment_method_prefixes() {
        assert_eq!(
            PaymentMethod::from_payment_id("pay_NkX81"),
            PaymentMethod::Razorpay
        );
        assert_eq!(PaymentMethod::from_payment_id("upi_77aa"), PaymentMethod::Upi);
        assert_eq!(PaymentMethod::from_payment_id("cash"), PaymentMethod::Other);
        assert_eq!(PaymentMethod::from_payment_id(""), PaymentMethod::Other);
    }

    #[test]
    fn test_notification_kind_wire_values() {
        assert_eq!(
            serde_json::to_string(&NotificationKind::Promotion).unwrap(),
            "\"promotion\""
        );
        assert_eq!(NotificationKind::Info.label(), "Information");
    }

    #[test]
    fn test_plan_tier_parse() {
        assert_eq!("duo".parse::<PlanTier>().unwrap(), PlanTier::Duo);
        assert!("recurring".parse::<PlanTier>().is_err());
    }
}
