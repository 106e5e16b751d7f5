//! Content moderation route handlers.

use std::str::FromStr;

use askama::Template;
use axum::{
    Router,
    extract::{Path, Query, State},
    response::Response,
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use tunenest_core::{ReportId, ReportKind, ReportStatus};

use crate::{
    components::{
        badge::Badge,
        data_table::{DataTableConfig, RowAction, TableCell, TableRow, reports_table_config},
    },
    filters,
    layout::{LayoutContext, Shell},
    middleware::RequireAdminSession,
    models::{Flash, Report, ReportFilter},
    state::AppState,
    views::filter_records,
};

use super::{redirect_with, render};

/// Filter value meaning "no filter".
const ALL: &str = "All";

/// A select value other than "All" or blank.
fn selected(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty() && *v != ALL)
}

/// Build the filter from the query's select values.
///
/// Empty, "All" and unknown values mean no filter.
#[must_use]
pub fn report_filter(status: Option<&str>, kind: Option<&str>) -> ReportFilter {
    ReportFilter {
        status: selected(status).and_then(|s| ReportStatus::from_str(s).ok()),
        kind: selected(kind).and_then(|k| ReportKind::from_str(k).ok()),
    }
}

/// Table row for a report.
#[must_use]
pub fn report_row(report: &Report) -> TableRow {
    let base = format!("/reports/{}", urlencoding::encode(report.id.as_str()));
    let status_action = |label: &str, icon, status: ReportStatus| {
        RowAction::post(label, icon, format!("{base}/status?status={}", status.label()))
    };

    let mut actions = vec![];
    if report.status != ReportStatus::Resolved {
        actions.push(status_action("Mark Resolved", "ph-check", ReportStatus::Resolved));
    }
    if report.status != ReportStatus::Rejected {
        actions.push(status_action("Reject Report", "ph-warning", ReportStatus::Rejected));
    }
    actions.push(
        RowAction::post("Delete Report", "ph-trash", format!("{base}/delete"))
            .confirm(format!("Delete the report on \"{}\"?", report.title))
            .destructive(),
    );

    TableRow {
        id: report.id.as_str().to_string(),
        cells: vec![
            TableCell::Badge(Badge::report_kind(report.kind)),
            TableCell::Stacked {
                primary: report.title.clone(),
                secondary: report
                    .artist
                    .as_ref()
                    .map(|artist| format!("by {artist}"))
                    .unwrap_or_default(),
            },
            TableCell::text(report.reported_by.as_str()),
            TableCell::text(report.reason.as_str()),
            TableCell::Badge(Badge::report_status(report.status)),
            TableCell::text(report.date.format("%Y-%m-%d").to_string()),
        ],
        actions,
    }
}

/// Reports matching the search term and both filters.
#[must_use]
pub fn visible_reports<'a>(reports: &'a [Report], search: &str, filter: ReportFilter) -> Vec<&'a Report> {
    filter_records(reports, search)
        .into_iter()
        .filter(|report| filter.matches(report))
        .collect()
}

/// Reports page template.
#[derive(Template)]
#[template(path = "reports/index.html")]
struct ReportsTemplate {
    layout: LayoutContext,
    table: DataTableConfig,
    rows: Vec<TableRow>,
    search: String,
    status: String,
    kind: String,
    pending: usize,
    /// The queue is seeded from sample data.
    sample: bool,
}

/// Reports query string.
#[derive(Debug, Default, Deserialize)]
pub struct ReportsQuery {
    #[serde(default)]
    q: String,
    status: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Target status of a status change.
#[derive(Debug, Deserialize)]
pub struct StatusChange {
    status: String,
}

/// Build the reports router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports", get(index))
        .route("/reports/{id}/status", post(set_status))
        .route("/reports/{id}/delete", post(delete))
}

/// Moderation queue.
///
/// GET /reports
#[instrument(skip_all)]
async fn index(
    Shell { layout, .. }: Shell,
    State(state): State<AppState>,
    Query(query): Query<ReportsQuery>,
) -> Response {
    let filter = report_filter(query.status.as_deref(), query.kind.as_deref());

    let (rows, pending) = {
        let queue = state.reports().read().await;
        let rows = visible_reports(queue.all(), &query.q, filter)
            .into_iter()
            .map(report_row)
            .collect::<Vec<_>>();
        (rows, queue.pending_count())
    };

    let template = ReportsTemplate {
        layout,
        table: reports_table_config(),
        rows,
        search: query.q,
        status: filter.status.map_or(ALL, ReportStatus::label).to_string(),
        kind: filter.kind.map_or(ALL, ReportKind::label).to_string(),
        pending,
        sample: state.sample_data().enabled(),
    };
    render(&template)
}

/// Move a report to Resolved or Rejected.
///
/// POST /reports/{id}/status
#[instrument(skip_all, fields(report = %id))]
async fn set_status(
    _admin: RequireAdminSession,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ReportId>,
    Query(change): Query<StatusChange>,
) -> Response {
    let Ok(status) = ReportStatus::from_str(&change.status) else {
        return redirect_with(&session, Flash::error("Unknown report status"), "/reports").await;
    };

    let updated = state.reports().write().await.set_status(&id, status);
    let flash = if updated {
        tracing::info!(status = status.label(), "Report status changed");
        Flash::success(format!("Report marked as {}", status.label()))
    } else {
        Flash::error("Report not found")
    };
    redirect_with(&session, flash, "/reports").await
}

/// Remove a report from the queue.
///
/// POST /reports/{id}/delete
#[instrument(skip_all, fields(report = %id))]
async fn delete(
    _admin: RequireAdminSession,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ReportId>,
) -> Response {
    let removed = state.reports().write().await.remove(&id);
    let flash = if removed {
        Flash::success("Report deleted")
    } else {
        Flash::error("Report not found")
    };
    redirect_with(&session, flash, "/reports").await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::sample_data::SampleData;

    #[test]
    fn test_all_and_unknown_mean_no_filter() {
        assert_eq!(report_filter(Some("All"), Some("All")), ReportFilter::default());
        assert_eq!(report_filter(None, Some("")), ReportFilter::default());
        assert_eq!(report_filter(Some("Bogus"), None), ReportFilter::default());

        let filter = report_filter(Some("pending"), Some("Song"));
        assert_eq!(filter.status, Some(ReportStatus::Pending));
        assert_eq!(filter.kind, Some(ReportKind::Song));
    }

    #[test]
    fn test_search_and_filters_combine() {
        let reports = SampleData::new(true).reports();

        let all = visible_reports(&reports, "", ReportFilter::default());
        assert_eq!(all.len(), reports.len());

        let bts = visible_reports(&reports, "bts", ReportFilter::default());
        assert!(bts.iter().all(|r| r.artist.as_deref() == Some("BTS")));

        let users = visible_reports(&reports, "", report_filter(None, Some("User")));
        assert!(users.iter().all(|r| r.kind == ReportKind::User));
    }

    #[test]
    fn test_row_actions_skip_current_status() {
        let mut report = SampleData::new(true).reports().remove(0);
        report.status = ReportStatus::Resolved;

        let row = report_row(&report);
        let labels: Vec<_> = row.actions.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, ["Reject Report", "Delete Report"]);
        assert!(row.actions[0].href.ends_with("/status?status=Rejected"));
    }
}
