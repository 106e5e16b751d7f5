//! Analytics route handler.
//!
//! The backend has no analytics endpoints; every chart here is sample data.
//! The range and tab selectors are echoed back so the page keeps its state.

use askama::Template;
use axum::{
    Router,
    extract::{Query, State},
    response::Response,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    components::data_table::FilterOption,
    filters,
    layout::{LayoutContext, Shell},
    sample_data::AnalyticsSamples,
    state::AppState,
};

use super::render;

/// Reporting window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeRange {
    Week,
    Month,
    Quarter,
    #[default]
    HalfYear,
    Year,
}

impl TimeRange {
    pub const ALL: [Self; 5] = [
        Self::Week,
        Self::Month,
        Self::Quarter,
        Self::HalfYear,
        Self::Year,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Week => "7d",
            Self::Month => "30d",
            Self::Quarter => "3m",
            Self::HalfYear => "6m",
            Self::Year => "12m",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Week => "Last 7 days",
            Self::Month => "Last 30 days",
            Self::Quarter => "Last 3 months",
            Self::HalfYear => "Last 6 months",
            Self::Year => "Last 12 months",
        }
    }
}

/// Section of the analytics page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnalyticsTab {
    #[default]
    Overview,
    Users,
    Content,
}

impl AnalyticsTab {
    pub const ALL: [Self; 3] = [Self::Overview, Self::Users, Self::Content];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Users => "users",
            Self::Content => "content",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Users => "User Analytics",
            Self::Content => "Content Analytics",
        }
    }
}

/// Look up a selector value by its wire form; unknown values give the default.
fn parse<T: Copy + Default>(raw: Option<&str>, all: &[T], as_str: fn(T) -> &'static str) -> T {
    all.iter()
        .copied()
        .find(|value| Some(as_str(*value)) == raw)
        .unwrap_or_default()
}

/// Analytics page template.
#[derive(Template)]
#[template(path = "analytics.html")]
struct AnalyticsTemplate {
    layout: LayoutContext,
    ranges: Vec<FilterOption>,
    range: &'static str,
    tabs: Vec<FilterOption>,
    tab: &'static str,
    samples: Option<AnalyticsSamples>,
}

/// Analytics query string.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    range: Option<String>,
    tab: Option<String>,
}

/// Build the analytics router.
pub fn router() -> Router<AppState> {
    Router::new().route("/analytics", get(analytics))
}

/// Analytics page.
///
/// GET /analytics
#[instrument(skip_all)]
async fn analytics(
    Shell { layout, .. }: Shell,
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Response {
    let range = parse(query.range.as_deref(), &TimeRange::ALL, TimeRange::as_str);
    let tab = parse(query.tab.as_deref(), &AnalyticsTab::ALL, AnalyticsTab::as_str);

    let template = AnalyticsTemplate {
        layout,
        ranges: TimeRange::ALL
            .iter()
            .map(|r| FilterOption::new(r.as_str(), r.label()))
            .collect(),
        range: range.as_str(),
        tabs: AnalyticsTab::ALL
            .iter()
            .map(|t| FilterOption::new(t.as_str(), t.label()))
            .collect(),
        tab: tab.as_str(),
        samples: state.sample_data().analytics(),
    };
    render(&template)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_default_on_unknown_values() {
        assert_eq!(
            parse(Some("30d"), &TimeRange::ALL, TimeRange::as_str),
            TimeRange::Month
        );
        assert_eq!(
            parse(Some("5y"), &TimeRange::ALL, TimeRange::as_str),
            TimeRange::HalfYear
        );
        assert_eq!(
            parse(None, &AnalyticsTab::ALL, AnalyticsTab::as_str),
            AnalyticsTab::Overview
        );
        assert_eq!(
            parse(Some("content"), &AnalyticsTab::ALL, AnalyticsTab::as_str),
            AnalyticsTab::Content
        );
    }
}
