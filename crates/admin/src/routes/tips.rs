//! Tips route handler.

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
    api::Tip,
    components::{
        badge::Badge,
        data_table::{DataTableConfig, TableCell, TableRow, tips_table_config},
    },
    filters,
    filters::format_short_date,
    layout::{LayoutContext, Shell},
    models::Flash,
    state::AppState,
    views::{LoadState, Searchable, ViewState, filter_records},
};

use super::render;

/// A tip with its searchable amount text.
#[derive(Debug, Clone)]
pub struct TipEntry {
    pub tip: Tip,
    amount: String,
}

impl From<Tip> for TipEntry {
    fn from(tip: Tip) -> Self {
        Self {
            amount: tip.amount.normalize().to_string(),
            tip,
        }
    }
}

impl Searchable for TipEntry {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.tip.user_name(), self.tip.artist_name(), &self.amount]
    }
}

/// Table row for a tip; shared with the dashboard's recent tips.
#[must_use]
pub fn tip_row(tip: &Tip) -> TableRow {
    let user_email = tip
        .user
        .as_ref()
        .and_then(|u| u.email.clone())
        .unwrap_or_default();

    TableRow {
        id: tip.id.as_str().to_string(),
        cells: vec![
            TableCell::Stacked {
                primary: tip.user_name().to_string(),
                secondary: user_email,
            },
            TableCell::text(tip.artist_name()),
            TableCell::text(tip.price().display()),
            TableCell::optional(tip.date.as_deref().map(format_short_date).as_deref()),
            TableCell::Badge(Badge::payment_method(tip.payment_method())),
        ],
        actions: vec![],
    }
}

/// "Showing X of Y tips" while searching, otherwise the total.
#[must_use]
pub fn tips_summary(shown: usize, total: usize, search: &str) -> String {
    if search.trim().is_empty() {
        format!("Total tips: {total}")
    } else {
        format!("Showing {shown} of {total} tips")
    }
}

/// Tips page template.
#[derive(Template)]
#[template(path = "tips/index.html")]
struct TipsTemplate {
    layout: LayoutContext,
    table: DataTableConfig,
    rows: Vec<TableRow>,
    search: String,
    summary: String,
    loaded: bool,
}

/// Tips query string.
#[derive(Debug, Default, Deserialize)]
pub struct TipsQuery {
    #[serde(default)]
    q: String,
}

/// Build the tips router.
pub fn router() -> Router<AppState> {
    Router::new().route("/tips", get(index))
}

/// Tips list.
///
/// GET /tips
#[instrument(skip_all)]
async fn index(
    Shell {
        mut layout, cookie, ..
    }: Shell,
    State(state): State<AppState>,
    Query(query): Query<TipsQuery>,
) -> Response {
    let tips = ViewState::resolve(async {
        state
            .api()
            .tips(cookie.as_ref())
            .await
            .map(|tips| tips.into_iter().map(TipEntry::from).collect::<Vec<_>>())
            .map_err(|e| {
                tracing::error!("Failed to fetch tips: {e}");
                e.user_message("Failed to fetch tips")
            })
    })
    .await;
    if let LoadState::Failed(message) = &tips {
        layout.flash(Flash::error(message.clone()));
    }

    let entries = tips.loaded().map(Vec::as_slice).unwrap_or_default();
    let rows: Vec<TableRow> = filter_records(entries, &query.q)
        .into_iter()
        .map(|entry| tip_row(&entry.tip))
        .collect();

    let template = TipsTemplate {
        summary: tips_summary(rows.len(), entries.len(), &query.q),
        layout,
        table: tips_table_config(),
        rows,
        search: query.q,
        loaded: tips.loaded().is_some(),
    };
    render(&template)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tip(id: &str, user: &str, artist: &str, amount: u32) -> TipEntry {
        let tip: Tip = serde_json::from_value(serde_json::json!({
            "_id": id,
            "user": {"name": user, "email": format!("{}@x.in", user.to_lowercase())},
            "artist": {"name": artist},
            "amount": amount,
            "date": "2024-06-01T09:00:00Z",
            "razorpay_payment_id": "upi_123",
        }))
        .unwrap();
        TipEntry::from(tip)
    }

    #[test]
    fn test_search_matches_amount_and_names() {
        let tips = vec![tip("t1", "Meera", "Arijit", 50), tip("t2", "Kabir", "Shreya", 120)];
        assert_eq!(filter_records(&tips, "120").len(), 1);
        assert_eq!(filter_records(&tips, "arijit")[0].tip.id.as_str(), "t1");
        assert_eq!(filter_records(&tips, "KABIR")[0].tip.id.as_str(), "t2");
    }

    #[test]
    fn test_tip_row_cells() {
        let row = tip_row(&tip("t1", "Meera", "Arijit", 50).tip);
        assert_eq!(row.cells[2], TableCell::text("₹50.00"));
        assert_eq!(row.cells[3], TableCell::text("01 Jun 2024"));
        assert_eq!(
            row.cells[4],
            TableCell::Badge(Badge::payment_method(tunenest_core::PaymentMethod::Upi))
        );
    }

    #[test]
    fn test_summary() {
        assert_eq!(tips_summary(2, 2, ""), "Total tips: 2");
        assert_eq!(tips_summary(1, 5, "arijit"), "Showing 1 of 5 tips");
    }
}
