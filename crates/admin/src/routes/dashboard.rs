//! Dashboard route handler.
//!
//! The overview needs eight reads. They run concurrently and are committed
//! all-or-nothing: if any one fails, no stat value is shown and a single
//! "Failed to load data" toast is raised. The genre distribution chart is a
//! separate read whose failure is only logged.

use askama::Template;
use axum::{Router, extract::State, response::Response, routing::get};
use tracing::instrument;

use crate::{
    api::{ApiError, BackendCookie, EndUser, Genre, GrowthPoint, JamendoTrack, Tip},
    components::{
        charts::{BRAND_GREEN, Chart, ChartKind, ChartPoint, ChartSeries, DASHBOARD_COLORS},
        data_table::{DataTableConfig, TableRow, tips_table_config},
        stat_card::StatCard,
    },
    filters,
    layout::{LayoutContext, Shell},
    models::Flash,
    sample_data::DashboardSamples,
    state::AppState,
    views::{LoadState, ViewState},
};

use super::{render, tips::tip_row};

/// Toast raised when the overview cannot be loaded.
pub const LOAD_FAILED: &str = "Failed to load data";

/// Everything the eight overview reads return.
#[derive(Debug, Clone)]
pub struct Overview {
    pub genres: Vec<Genre>,
    pub playlists: usize,
    pub albums: usize,
    pub artists: usize,
    pub users: Vec<EndUser>,
    pub tracks: Vec<JamendoTrack>,
    pub growth: Vec<GrowthPoint>,
    pub tips: Vec<Tip>,
}

/// Issue the eight overview reads concurrently.
///
/// # Errors
///
/// Returns the first failure; the other results are dropped.
pub async fn load_overview(
    state: &AppState,
    cookie: Option<&BackendCookie>,
) -> Result<Overview, ApiError> {
    let api = state.api();
    let (genres, playlists, albums, artists, users, tracks, growth, tips) = tokio::try_join!(
        api.genres(cookie),
        api.playlist_count(cookie),
        api.album_count(cookie),
        api.artist_count(cookie),
        api.users(cookie),
        state.jamendo().sample_tracks(),
        api.user_growth(cookie),
        api.tips(cookie),
    )?;

    Ok(Overview {
        genres,
        playlists,
        albums,
        artists,
        users,
        tracks,
        growth,
        tips,
    })
}

/// Stat cards for a loaded overview; none unless every read succeeded.
#[must_use]
pub fn stat_cards(overview: &LoadState<Overview>) -> Vec<StatCard> {
    let Some(overview) = overview.loaded() else {
        return vec![];
    };

    vec![
        StatCard::new("Total Users", overview.users.len().to_string(), "ph-users"),
        StatCard::new("Total Tracks", overview.tracks.len().to_string(), "ph-music-notes"),
        StatCard::new("Total Albums", overview.albums.to_string(), "ph-vinyl-record"),
        StatCard::new("Total Genres", overview.genres.len().to_string(), "ph-playlist"),
        StatCard::new("Total Playlists", overview.playlists.to_string(), "ph-queue"),
        StatCard::new("Total Artists", overview.artists.to_string(), "ph-microphone-stage"),
        StatCard::new("Total Tips", overview.tips.len().to_string(), "ph-gift"),
    ]
}

/// Monthly sign-ups as a line chart.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn growth_chart(growth: &[GrowthPoint]) -> Chart {
    Chart::new("user-growth", "User Growth").series(
        ChartSeries::new(
            ChartKind::Line,
            "Users",
            growth
                .iter()
                .map(|point| ChartPoint::new(point.month.as_str(), point.users as f64))
                .collect(),
        )
        .palette(&[BRAND_GREEN]),
    )
}

/// Songs per genre; genres without a count weigh 1.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn genre_chart(genres: &[Genre]) -> Chart {
    Chart::new("genre-distribution", "Genre Distribution").series(
        ChartSeries::new(
            ChartKind::Pie,
            "Songs",
            genres
                .iter()
                .map(|genre| {
                    ChartPoint::new(genre.name.as_str(), genre.total_songs.unwrap_or(1) as f64)
                })
                .collect(),
        )
        .palette(&DASHBOARD_COLORS),
    )
}

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    layout: LayoutContext,
    stats: Vec<StatCard>,
    growth: Option<Chart>,
    genres: Option<Chart>,
    tips_table: DataTableConfig,
    recent_tips: Vec<TableRow>,
    samples: Option<DashboardSamples>,
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

/// Dashboard page handler.
///
/// GET /dashboard
#[instrument(skip_all)]
async fn dashboard(
    Shell {
        mut layout, cookie, ..
    }: Shell,
    State(state): State<AppState>,
) -> Response {
    let mut view = ViewState::new();
    let ticket = view.begin();

    let (overview, genres) = tokio::join!(
        load_overview(&state, cookie.as_ref()),
        state.api().genres(cookie.as_ref()),
    );

    view.commit(
        ticket,
        overview.map_err(|e| {
            tracing::error!("Error fetching dashboard data: {e}");
            LOAD_FAILED.to_string()
        }),
    );
    let overview = view.into_state();
    if let Some(message) = overview.error() {
        layout.flash(Flash::error(message));
    }

    let genres = match genres {
        Ok(genres) => Some(genre_chart(&genres)),
        Err(e) => {
            tracing::warn!("Error fetching genres: {e}");
            None
        }
    };

    let template = DashboardTemplate {
        stats: stat_cards(&overview),
        growth: overview.loaded().map(|o| growth_chart(&o.growth)),
        genres,
        tips_table: tips_table_config(),
        recent_tips: overview
            .loaded()
            .map(|o| o.tips.iter().map(tip_row).collect())
            .unwrap_or_default(),
        samples: state.sample_data().dashboard(),
        layout,
    };
    render(&template)
}
