//! Status badges.

use tunenest_core::{NotificationKind, PaymentMethod, PlanStatus, ReportKind, ReportStatus};

/// Color family of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Success,
    Warning,
    Danger,
    Info,
    Accent,
    Cyan,
}

impl Tone {
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Neutral => "badge-neutral",
            Self::Success => "badge-success",
            Self::Warning => "badge-warning",
            Self::Danger => "badge-danger",
            Self::Info => "badge-info",
            Self::Accent => "badge-accent",
            Self::Cyan => "badge-cyan",
        }
    }
}

/// A small colored label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub tone: Tone,
    /// Leading glyph.
    pub icon: Option<&'static str>,
}

impl Badge {
    #[must_use]
    pub fn new(label: impl Into<String>, tone: Tone) -> Self {
        Self {
            label: label.into(),
            tone,
            icon: None,
        }
    }

    #[must_use]
    pub const fn icon(mut self, icon: &'static str) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Partner service type; unknown types get a neutral person badge.
    #[must_use]
    pub fn service_type(service_type: &str) -> Self {
        let (tone, icon) = match service_type {
            "Electrician" => (Tone::Warning, "⚡"),
            "Plumber" => (Tone::Info, "🔧"),
            "Ac Technician" => (Tone::Cyan, "❄️"),
            "Painter" => (Tone::Accent, "🎨"),
            "Other" => (Tone::Neutral, "🔧"),
            _ => (Tone::Neutral, "👤"),
        };
        Self::new(service_type, tone).icon(icon)
    }

    /// Credential email state; `None` means the status lookup failed.
    #[must_use]
    pub fn email_status(sent: Option<bool>) -> Self {
        match sent {
            Some(true) => Self::new("Sent", Tone::Success),
            Some(false) => Self::new("Not sent", Tone::Danger),
            None => Self::new("Error", Tone::Neutral).icon("⚠"),
        }
    }

    #[must_use]
    pub fn report_status(status: ReportStatus) -> Self {
        let tone = match status {
            ReportStatus::Pending => Tone::Warning,
            ReportStatus::Resolved => Tone::Success,
            ReportStatus::Rejected => Tone::Danger,
        };
        Self::new(status.label(), tone)
    }

    #[must_use]
    pub fn report_kind(kind: ReportKind) -> Self {
        match kind {
            ReportKind::Song => Self::new(kind.label(), Tone::Accent).icon("♪"),
            ReportKind::User => Self::new(kind.label(), Tone::Info).icon("👤"),
        }
    }

    #[must_use]
    pub fn payment_method(method: PaymentMethod) -> Self {
        let tone = match method {
            PaymentMethod::Razorpay => Tone::Info,
            PaymentMethod::Upi => Tone::Accent,
            PaymentMethod::Other => Tone::Neutral,
        };
        Self::new(method.label(), tone)
    }

    #[must_use]
    pub fn notification_kind(kind: NotificationKind) -> Self {
        let tone = match kind {
            NotificationKind::Info => Tone::Info,
            NotificationKind::Alert => Tone::Warning,
            NotificationKind::Promotion => Tone::Accent,
            NotificationKind::Update => Tone::Success,
            NotificationKind::Urgent => Tone::Danger,
        };
        Self::new(kind.label(), tone)
    }

    #[must_use]
    pub fn plan_status(status: PlanStatus) -> Self {
        match status {
            PlanStatus::Active => Self::new("Active", Tone::Success),
            PlanStatus::Archived => Self::new("Archived", Tone::Neutral),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_type_badges() {
        assert_eq!(Badge::service_type("Electrician").icon, Some("⚡"));
        assert_eq!(Badge::service_type("Ac Technician").tone, Tone::Cyan);

        let unknown = Badge::service_type("Carpenter");
        assert_eq!(unknown.label, "Carpenter");
        assert_eq!(unknown.icon, Some("👤"));
    }

    #[test]
    fn test_email_status_badge() {
        assert_eq!(Badge::email_status(Some(true)).label, "Sent");
        assert_eq!(Badge::email_status(Some(false)).label, "Not sent");
        assert_eq!(Badge::email_status(None).label, "Error");
    }
}
