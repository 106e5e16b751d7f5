//! Chart data types for the client-side chart renderer.
//!
//! Handlers build [`Chart`]s from `{category, value}` tuples; templates embed
//! them as JSON in a `data-chart` attribute that `static/js/charts.js` turns
//! into SVG. Nothing here computes more than display formatting.

use serde::Serialize;

/// Palette of the main dashboard charts.
pub const DASHBOARD_COLORS: [&str; 7] = [
    "#8884d8", "#82ca9d", "#ffc658", "#ff8042", "#8dd1e1", "#d0ed57", "#a4de6c",
];

/// Palette of the analytics view.
pub const ANALYTICS_COLORS: [&str; 5] = ["#1DB954", "#191414", "#B3B3B3", "#535353", "#4B917D"];

/// Brand green used for single-series charts.
pub const BRAND_GREEN: &str = "#1DB954";

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Area,
    Bar,
    Pie,
    Radar,
    Line,
}

/// One `{category, value}` tuple.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub category: String,
    pub value: f64,
}

impl ChartPoint {
    #[must_use]
    pub fn new(category: impl Into<String>, value: f64) -> Self {
        Self {
            category: category.into(),
            value,
        }
    }
}

/// A named series with its drawing style and colors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub name: String,
    pub points: Vec<ChartPoint>,
    /// One color per series, or one per slice for pie charts.
    pub palette: Vec<&'static str>,
}

impl ChartSeries {
    /// Create a series drawn in the brand color.
    #[must_use]
    pub fn new(kind: ChartKind, name: &str, points: Vec<ChartPoint>) -> Self {
        Self {
            kind,
            name: name.to_string(),
            points,
            palette: vec![BRAND_GREEN],
        }
    }

    /// Replace the palette.
    #[must_use]
    pub fn palette(mut self, colors: &[&'static str]) -> Self {
        self.palette = colors.to_vec();
        self
    }

    /// Sum of every point's value.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }
}

/// A chart: one or more series sharing the category axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    /// DOM id of the chart container.
    pub id: String,
    pub title: String,
    pub series: Vec<ChartSeries>,
    /// Prefix for tooltip values (e.g. `$`).
    pub value_prefix: &'static str,
}

impl Chart {
    #[must_use]
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            series: vec![],
            value_prefix: "",
        }
    }

    /// Add a series.
    #[must_use]
    pub fn series(mut self, series: ChartSeries) -> Self {
        self.series.push(series);
        self
    }

    #[must_use]
    pub const fn value_prefix(mut self, prefix: &'static str) -> Self {
        self.value_prefix = prefix;
        self
    }

    /// Whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    /// JSON payload for the renderer.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize chart {}: {e}", self.id);
            "null".to_string()
        })
    }
}

/// Abbreviate a count: `1_500_000` → `1.5M`, `2_300` → `2.3K`, `999` → `999`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1_500_000), "1.5M");
        assert_eq!(format_number(45_000_000), "45.0M");
        assert_eq!(format_number(2_300), "2.3K");
        assert_eq!(format_number(1_000), "1.0K");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(0), "0");
    }

    #[test]
    fn test_palette_replaces_brand_color() {
        let series = ChartSeries::new(ChartKind::Pie, "Genres", vec![]);
        assert_eq!(series.palette, [BRAND_GREEN]);

        let series = series.palette(&DASHBOARD_COLORS);
        assert_eq!(series.palette.len(), DASHBOARD_COLORS.len());
        assert_eq!(series.palette.first(), Some(&"#8884d8"));
    }

    #[test]
    fn test_chart_json_shape() {
        let chart = Chart::new("growth", "User Growth").series(ChartSeries::new(
            ChartKind::Line,
            "Users",
            vec![ChartPoint::new("Jan", 1200.0)],
        ));
        let json = chart.to_json();
        assert!(json.contains(r#""kind":"line""#));
        assert!(json.contains(r#""category":"Jan""#));
        assert!(!chart.is_empty());
        assert!(Chart::new("empty", "Empty").is_empty());
    }
}
