//! Placeholder datasets.
//!
//! Several screens show figures the backend cannot serve yet (revenue, top
//! artists, platform analytics, subscriber lists, the moderation queue).
//! They all live here and are only reachable through [`SampleData`], which
//! is switched by `ADMIN_SHOW_SAMPLE_DATA`. Templates label every section fed
//! from this module as sample data.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use tunenest_core::{ReportId, ReportKind, ReportStatus};

use crate::components::charts::{
    ANALYTICS_COLORS, BRAND_GREEN, Chart, ChartKind, ChartPoint, ChartSeries, format_number,
};
use crate::components::stat_card::{StatCard, Trend};
use crate::config::AdminConfig;
use crate::models::Report;

/// Gate for every placeholder dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleData {
    enabled: bool,
}

impl SampleData {
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    #[must_use]
    pub const fn from_config(config: &AdminConfig) -> Self {
        Self::new(config.show_sample_data)
    }

    #[must_use]
    pub const fn enabled(self) -> bool {
        self.enabled
    }

    /// Revenue chart, top artists and audience cards of the dashboard.
    #[must_use]
    pub fn dashboard(self) -> Option<DashboardSamples> {
        self.enabled.then(dashboard)
    }

    /// Every chart of the Analytics view.
    #[must_use]
    pub fn analytics(self) -> Option<AnalyticsSamples> {
        self.enabled.then(analytics)
    }

    /// Subscriber list of the Subscriptions view.
    #[must_use]
    pub fn subscribers(self) -> Option<Vec<Subscriber>> {
        self.enabled.then(subscribers)
    }

    /// Seed of the moderation queue; empty when disabled.
    #[must_use]
    pub fn reports(self) -> Vec<Report> {
        if self.enabled { reports() } else { vec![] }
    }
}

/// An artist ranked by streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopArtist {
    pub name: &'static str,
    pub streams: u64,
}

impl TopArtist {
    #[must_use]
    pub fn streams_display(&self) -> String {
        format_number(self.streams)
    }
}

/// A song ranked by plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopSong {
    pub title: &'static str,
    pub artist: &'static str,
    pub plays: u64,
}

impl TopSong {
    #[must_use]
    pub fn plays_display(&self) -> String {
        format_number(self.plays)
    }
}

/// Sample sections of the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardSamples {
    /// "Free User" and "Premium User" cards.
    pub cards: Vec<StatCard>,
    pub revenue: Chart,
    pub top_artists: Vec<TopArtist>,
}

/// Sample sections of the Analytics view.
#[derive(Debug, Clone)]
pub struct AnalyticsSamples {
    pub stats: Vec<StatCard>,
    pub user_growth: Chart,
    pub revenue: Chart,
    pub genres: Chart,
    pub demographics: Chart,
    pub listening_habits: Chart,
    pub top_songs: Vec<TopSong>,
}

/// A subscriber row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub id: u32,
    pub name: &'static str,
    pub email: &'static str,
    pub plan: &'static str,
    pub active: bool,
    pub joined: NaiveDate,
}

impl Subscriber {
    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        if self.active { "active" } else { "canceled" }
    }
}

const MONTHS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];

fn monthly(values: [u32; 6]) -> Vec<ChartPoint> {
    MONTHS
        .iter()
        .zip(values)
        .map(|(month, value)| ChartPoint::new(*month, f64::from(value)))
        .collect()
}

fn categorical(values: &[(&str, u32)]) -> Vec<ChartPoint> {
    values
        .iter()
        .map(|(category, value)| ChartPoint::new(*category, f64::from(*value)))
        .collect()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn dashboard() -> DashboardSamples {
    DashboardSamples {
        cards: vec![
            StatCard::new("Free Users", "82M", "ph-star")
                .change("+8% from last quarter", Trend::Up)
                .sample(),
            StatCard::new("Premium Users", "$5.2B", "ph-currency-dollar")
                .change("+15% YoY growth", Trend::Up)
                .sample(),
        ],
        revenue: Chart::new("dashboard-revenue", "Revenue")
            .value_prefix("$")
            .series(ChartSeries::new(
                ChartKind::Bar,
                "Revenue",
                monthly([
                    2_000_000, 2_500_000, 3_000_000, 3_500_000, 4_000_000, 5_000_000,
                ]),
            )),
        top_artists: vec![
            TopArtist {
                name: "The Weeknd",
                streams: 45_000_000,
            },
            TopArtist {
                name: "Drake",
                streams: 42_000_000,
            },
            TopArtist {
                name: "Taylor Swift",
                streams: 38_000_000,
            },
            TopArtist {
                name: "Dua Lipa",
                streams: 35_000_000,
            },
            TopArtist {
                name: "Ed Sheeran",
                streams: 32_000_000,
            },
        ],
    }
}

fn analytics() -> AnalyticsSamples {
    AnalyticsSamples {
        stats: vec![
            StatCard::new("Total Users", "6.3M", "ph-users")
                .change("+12%", Trend::Up)
                .sample(),
            StatCard::new("Premium Users", "4.2M", "ph-star")
                .change("+18%", Trend::Up)
                .sample(),
            StatCard::new("Monthly Revenue", "$5.9M", "ph-currency-dollar")
                .change("+15%", Trend::Up)
                .sample(),
            StatCard::new("Avg. Session", "32 min", "ph-clock")
                .change("+5%", Trend::Up)
                .sample(),
        ],
        user_growth: Chart::new("analytics-growth", "User Growth")
            .series(
                ChartSeries::new(
                    ChartKind::Area,
                    "Total",
                    monthly([1200, 2100, 3200, 4300, 5100, 6300]),
                )
                .palette(&[BRAND_GREEN]),
            )
            .series(
                ChartSeries::new(
                    ChartKind::Area,
                    "Premium",
                    monthly([800, 1300, 2000, 2800, 3500, 4200]),
                )
                .palette(&["#4B917D"]),
            )
            .series(
                ChartSeries::new(
                    ChartKind::Area,
                    "Free",
                    monthly([400, 800, 1200, 1500, 1600, 2100]),
                )
                .palette(&["#B3B3B3"]),
            ),
        revenue: Chart::new("analytics-revenue", "Revenue Breakdown")
            .value_prefix("$")
            .series(
                ChartSeries::new(
                    ChartKind::Bar,
                    "Subscriptions",
                    monthly([1800, 3100, 3500, 4200, 4500, 5100]),
                )
                .palette(&[BRAND_GREEN]),
            )
            .series(
                ChartSeries::new(
                    ChartKind::Bar,
                    "Ads",
                    monthly([200, 400, 500, 600, 700, 800]),
                )
                .palette(&["#535353"]),
            ),
        genres: Chart::new("analytics-genres", "Genre Distribution").series(
            ChartSeries::new(
                ChartKind::Pie,
                "Plays",
                categorical(&[
                    ("Pop", 4000),
                    ("Hip-Hop", 3000),
                    ("Lo-fi", 2000),
                    ("Rock", 1500),
                    ("Electronic", 1200),
                ]),
            )
            .palette(&ANALYTICS_COLORS),
        ),
        demographics: Chart::new("analytics-demographics", "User Demographics").series(
            ChartSeries::new(
                ChartKind::Pie,
                "Users (%)",
                categorical(&[
                    ("USA", 45),
                    ("UK", 15),
                    ("Germany", 10),
                    ("France", 8),
                    ("Other", 22),
                ]),
            )
            .palette(&ANALYTICS_COLORS),
        ),
        listening_habits: Chart::new("analytics-habits", "Listening Habits").series(
            ChartSeries::new(
                ChartKind::Radar,
                "Plays",
                categorical(&[
                    ("12AM", 800),
                    ("3AM", 400),
                    ("6AM", 1200),
                    ("9AM", 2500),
                    ("12PM", 3800),
                    ("3PM", 4200),
                    ("6PM", 5000),
                    ("9PM", 6500),
                ]),
            ),
        ),
        top_songs: vec![
            TopSong {
                title: "Blinding Lights",
                artist: "The Weeknd",
                plays: 4_200_000,
            },
            TopSong {
                title: "Save Your Tears",
                artist: "The Weeknd",
                plays: 3_800_000,
            },
            TopSong {
                title: "Stay",
                artist: "The Kid LAROI, Justin Bieber",
                plays: 3_500_000,
            },
            TopSong {
                title: "good 4 u",
                artist: "Olivia Rodrigo",
                plays: 3_200_000,
            },
            TopSong {
                title: "Levitating",
                artist: "Dua Lipa",
                plays: 3_000_000,
            },
        ],
    }
}

fn subscribers() -> Vec<Subscriber> {
    vec![
        Subscriber {
            id: 1,
            name: "John Doe",
            email: "john@example.com",
            plan: "Premium",
            active: true,
            joined: date(2023, 5, 15),
        },
        Subscriber {
            id: 2,
            name: "Jane Smith",
            email: "jane@example.com",
            plan: "Basic",
            active: true,
            joined: date(2023, 6, 20),
        },
        Subscriber {
            id: 3,
            name: "Bob Johnson",
            email: "bob@example.com",
            plan: "Family",
            active: false,
            joined: date(2023, 4, 10),
        },
        Subscriber {
            id: 4,
            name: "Alice Brown",
            email: "alice@example.com",
            plan: "Premium",
            active: true,
            joined: date(2023, 7, 5),
        },
    ]
}

fn reports() -> Vec<Report> {
    let report = |id: &str,
                  kind: ReportKind,
                  title: &str,
                  artist: Option<&str>,
                  reported_by: &str,
                  reason: &str,
                  status: ReportStatus,
                  date: NaiveDate| Report {
        id: ReportId::new(id),
        kind,
        title: title.to_string(),
        artist: artist.map(String::from),
        reported_by: reported_by.to_string(),
        reason: reason.to_string(),
        status,
        date,
    };

    vec![
        report(
            "1",
            ReportKind::Song,
            "Fake Love",
            Some("BTS"),
            "user123",
            "Inappropriate lyrics",
            ReportStatus::Pending,
            date(2023, 5, 15),
        ),
        report(
            "2",
            ReportKind::User,
            "artist_spam01",
            None,
            "user456",
            "Spamming uploads",
            ReportStatus::Pending,
            date(2023, 5, 14),
        ),
        report(
            "3",
            ReportKind::Song,
            "Stolen Track",
            Some("Unknown"),
            "user789",
            "Copyright violation",
            ReportStatus::Pending,
            date(2023, 5, 10),
        ),
        report(
            "4",
            ReportKind::User,
            "troll_account",
            None,
            "moderator01",
            "Hate speech in comments",
            ReportStatus::Resolved,
            date(2023, 5, 8),
        ),
        report(
            "5",
            ReportKind::Song,
            "Explicit Content",
            Some("Explicit Artist"),
            "user101",
            "Graphic content",
            ReportStatus::Rejected,
            date(2023, 5, 5),
        ),
    ]
}

/// Subscription estimates derived from live plans.
///
/// These multiply real plan data by fixed factors, so they are sample
/// figures even though their inputs are live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionEstimates {
    pub total_subscribers: u64,
    pub monthly_revenue: Decimal,
}

impl SampleData {
    /// Estimated subscribers (1000 per active plan) and revenue (each active
    /// plan's amount times 1000).
    #[must_use]
    pub fn subscription_estimates(self, active_amounts: &[Decimal]) -> Option<SubscriptionEstimates> {
        self.enabled.then(|| SubscriptionEstimates {
            total_subscribers: active_amounts.len() as u64 * 1000,
            monthly_revenue: active_amounts.iter().copied().sum::<Decimal>() * Decimal::from(1000),
        })
    }
}

impl SubscriptionEstimates {
    /// Revenue in millions with one decimal (e.g. `$1.2M`).
    #[must_use]
    pub fn revenue_display(&self) -> String {
        let millions = (self.monthly_revenue / Decimal::from(1_000_000))
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
        format!("${millions:.1}M")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_hides_everything() {
        let samples = SampleData::new(false);
        assert!(samples.dashboard().is_none());
        assert!(samples.analytics().is_none());
        assert!(samples.subscribers().is_none());
        assert!(samples.reports().is_empty());
        assert!(samples.subscription_estimates(&[Decimal::ONE]).is_none());
    }

    #[test]
    fn test_enabled_datasets() {
        let samples = SampleData::new(true);
        let dashboard = samples.dashboard().unwrap();
        assert_eq!(dashboard.top_artists[0].streams_display(), "45.0M");
        assert!(dashboard.cards.iter().all(|c| c.sample));

        let analytics = samples.analytics().unwrap();
        assert_eq!(analytics.genres.series[0].total() as u32, 11_700);
        assert_eq!(analytics.demographics.series[0].total() as u32, 100);
        assert_eq!(samples.reports().len(), 5);
        assert_eq!(samples.subscribers().unwrap().len(), 4);
    }

    #[test]
    fn test_subscription_estimates() {
        let estimates = SampleData::new(true)
            .subscription_estimates(&[Decimal::from(199), Decimal::from(99)])
            .unwrap();
        assert_eq!(estimates.total_subscribers, 2000);
        assert_eq!(estimates.monthly_revenue, Decimal::from(298_000));
        assert_eq!(estimates.revenue_display(), "$0.3M");
    }

    #[test]
    fn test_revenue_display_rounds_half_up() {
        let display = |revenue: u64| SubscriptionEstimates {
            total_subscribers: 0,
            monthly_revenue: Decimal::from(revenue),
        }
        .revenue_display();
        assert_eq!(display(1_250_000), "$1.3M");
        assert_eq!(display(1_249_999), "$1.2M");
        assert_eq!(display(2_000_000), "$2.0M");
        assert_eq!(display(0), "$0.0M");
    }
}
