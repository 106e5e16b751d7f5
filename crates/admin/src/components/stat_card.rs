//! Stat card shown in the dashboard and analytics grids.

/// Direction of the change line under a stat value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trend {
    #[default]
    Up,
    Down,
}

impl Trend {
    /// CSS modifier for the change line.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Up => "trend-up",
            Self::Down => "trend-down",
        }
    }
}

/// A single metric card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    /// Change line (e.g. "+12% from last month").
    pub change: Option<String>,
    /// Phosphor icon class.
    pub icon: &'static str,
    pub trend: Trend,
    /// Placeholder value, rendered with a "Sample data" tag.
    pub sample: bool,
}

impl StatCard {
    #[must_use]
    pub fn new(title: &str, value: impl Into<String>, icon: &'static str) -> Self {
        Self {
            title: title.to_string(),
            value: value.into(),
            change: None,
            icon,
            trend: Trend::Up,
            sample: false,
        }
    }

    #[must_use]
    pub fn change(mut self, change: &str, trend: Trend) -> Self {
        self.change = Some(change.to_string());
        self.trend = trend;
        self
    }

    /// Mark as placeholder data.
    #[must_use]
    pub const fn sample(mut self) -> Self {
        self.sample = true;
        self
    }
}
