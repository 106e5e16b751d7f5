//! Subscription route handlers.
//!
//! Plans are live backend data. The subscriber list and the revenue
//! estimates are sample figures and only appear when sample data is enabled.

use std::str::FromStr;

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::Response,
    routing::{get, post},
};
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use tunenest_core::{PlanId, PlanInterval, PlanTier};

use crate::{
    api::{ApiError, BackendCookie, Plan},
    components::{
        badge::Badge,
        charts::{ANALYTICS_COLORS, Chart, ChartKind, ChartPoint, ChartSeries, format_number},
        data_table::{
            DataTableConfig, FilterOption, RowAction, TableCell, TableRow, plans_table_config,
        },
        modal::Modal,
        stat_card::StatCard,
    },
    filters,
    layout::{LayoutContext, Shell},
    middleware::RequireAdminSession,
    models::Flash,
    sample_data::{SampleData, Subscriber, SubscriptionEstimates},
    state::AppState,
    views::{
        FormValues, LoadState, ViewState,
        resource::ViewTab,
        validation::{new_plan_form_values, plan_form_values, plan_input},
    },
};

use super::{redirect_with, render};

const PLAN_FORM: &str = "plan-form";

/// Tabs of the subscriptions page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubscriptionTab {
    #[default]
    Plans,
    Analytics,
    Subscribers,
}

impl SubscriptionTab {
    pub const ALL: [Self; 3] = [Self::Plans, Self::Analytics, Self::Subscribers];

    /// Tab from the query string; unknown values fall back to plans.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        Self::ALL
            .into_iter()
            .find(|tab| Some(tab.as_str()) == raw)
            .unwrap_or_default()
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plans => "plans",
            Self::Analytics => "analytics",
            Self::Subscribers => "subscribers",
        }
    }

    const fn href(self) -> &'static str {
        match self {
            Self::Plans => "/subscriptions?tab=plans",
            Self::Analytics => "/subscriptions?tab=analytics",
            Self::Subscribers => "/subscriptions?tab=subscribers",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Plans => "Plans",
            Self::Analytics => "Analytics",
            Self::Subscribers => "Subscribers",
        }
    }

    fn tabs(self) -> Vec<ViewTab> {
        Self::ALL
            .into_iter()
            .map(|tab| ViewTab {
                label: tab.label(),
                href: tab.href(),
                active: tab == self,
            })
            .collect()
    }
}

/// Create or edit form for a plan.
#[derive(Debug, Clone)]
pub struct PlanForm {
    pub modal: Modal,
    pub action: String,
    pub submit_label: &'static str,
    pub values: FormValues,
    pub intervals: Vec<FilterOption>,
    pub tiers: Vec<FilterOption>,
}

impl PlanForm {
    fn new(modal: Modal, action: String, submit_label: &'static str, values: FormValues) -> Self {
        Self {
            modal,
            action,
            submit_label,
            values,
            intervals: PlanInterval::ALL
                .iter()
                .map(|i| FilterOption::new(i.as_str(), i.label()))
                .collect(),
            tiers: PlanTier::ALL
                .iter()
                .map(|t| FilterOption::new(t.as_str(), t.label()))
                .collect(),
        }
    }

    /// The "Create Plan" form, closed until its button is clicked.
    #[must_use]
    pub fn create(values: FormValues) -> Self {
        Self::new(
            Modal::new(PLAN_FORM, "Create New Plan"),
            "/subscriptions/plans".to_string(),
            "Create Plan",
            values,
        )
    }

    /// Edit form for an existing plan, shown open.
    #[must_use]
    pub fn edit(id: &PlanId, values: FormValues) -> Self {
        Self::new(
            Modal::new(PLAN_FORM, "Edit Plan").opened(),
            format!("/subscriptions/plans/{}", urlencoding::encode(id.as_str())),
            "Update Plan",
            values,
        )
    }

    /// Feature lines of the textarea.
    #[must_use]
    pub fn features(&self) -> &str {
        self.values.get("features")
    }

    #[must_use]
    pub fn has_trial(&self) -> bool {
        self.values.checked("have_trial")
    }

    fn reopen_with(self, error: String) -> Self {
        Self {
            modal: self.modal.reopen_with(error),
            ..self
        }
    }
}

/// "Monthly", or "Every 3 months" for multi-period plans.
#[must_use]
pub fn billing_label(interval: PlanInterval, count: u32) -> String {
    if count <= 1 {
        return interval.label().to_string();
    }
    let unit = match interval {
        PlanInterval::Daily => "days",
        PlanInterval::Weekly => "weeks",
        PlanInterval::Monthly => "months",
        PlanInterval::Yearly => "years",
    };
    format!("Every {count} {unit}")
}

/// Table row for a plan.
#[must_use]
pub fn plan_row(plan: &Plan) -> TableRow {
    let id = urlencoding::encode(plan.id.as_str()).into_owned();
    let tier = PlanTier::from_str(&plan.plan_type)
        .map_or_else(|_| plan.plan_type.clone(), |tier| tier.label().to_string());

    TableRow {
        id: plan.id.as_str().to_string(),
        cells: vec![
            TableCell::Stacked {
                primary: plan.name.clone(),
                secondary: plan.features.join(" · "),
            },
            TableCell::text(plan.price().display()),
            TableCell::text(billing_label(plan.interval, plan.interval_count)),
            TableCell::optional(Some(&tier)),
            if plan.have_trial {
                TableCell::text(format!("{} days", plan.trial_days))
            } else {
                TableCell::Empty
            },
            TableCell::Badge(Badge::plan_status(plan.status)),
        ],
        actions: vec![
            RowAction::link(
                "Edit",
                "ph-pencil-simple",
                format!("/subscriptions?tab=plans&edit={id}"),
            ),
            RowAction::post("Delete", "ph-trash", format!("/subscriptions/plans/{id}/delete"))
                .confirm("Are you sure you want to delete this plan?")
                .destructive(),
        ],
    }
}

/// Plans split into active and archived.
#[must_use]
pub fn split_plans(plans: &[Plan]) -> (Vec<&Plan>, Vec<&Plan>) {
    plans.iter().partition(|plan| !plan.is_archived())
}

/// Price of each active plan.
#[must_use]
pub fn price_chart(active: &[&Plan]) -> Chart {
    Chart::new("plan-prices", "Plan Pricing")
        .series(
            ChartSeries::new(
                ChartKind::Bar,
                "Price",
                active
                    .iter()
                    .map(|plan| {
                        ChartPoint::new(plan.name.as_str(), plan.amount.to_f64().unwrap_or_default())
                    })
                    .collect(),
            )
            .palette(&ANALYTICS_COLORS),
        )
        .value_prefix("₹")
}

/// Live plan counts, followed by the sample estimates when enabled.
#[must_use]
pub fn analytics_cards(
    active: usize,
    archived: usize,
    estimates: Option<&SubscriptionEstimates>,
) -> Vec<StatCard> {
    let mut cards = vec![
        StatCard::new("Active Plans", active.to_string(), "ph-crown"),
        StatCard::new("Archived Plans", archived.to_string(), "ph-archive"),
    ];
    if let Some(estimates) = estimates {
        cards.push(
            StatCard::new(
                "Total Subscribers",
                format_number(estimates.total_subscribers),
                "ph-users",
            )
            .sample(),
        );
        cards.push(
            StatCard::new(
                "Monthly Revenue",
                estimates.revenue_display(),
                "ph-currency-inr",
            )
            .sample(),
        );
    }
    cards
}

/// Subscriptions page template.
#[derive(Template)]
#[template(path = "subscriptions/index.html")]
struct SubscriptionsTemplate {
    layout: LayoutContext,
    tabs: Vec<ViewTab>,
    tab: &'static str,
    table: DataTableConfig,
    loaded: bool,
    active_plans: Vec<TableRow>,
    archived_plans: Vec<TableRow>,
    form: PlanForm,
    stats: Vec<StatCard>,
    price_chart: Option<Chart>,
    subscribers: Option<Vec<Subscriber>>,
}

/// Subscriptions query string.
#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionsQuery {
    tab: Option<String>,
    edit: Option<PlanId>,
    new: Option<String>,
}

/// Build the subscriptions router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subscriptions", get(index))
        .route("/subscriptions/plans", post(create))
        .route("/subscriptions/plans/{id}", post(update))
        .route("/subscriptions/plans/{id}/delete", post(delete))
}

async fn fetch_plans(state: &AppState, cookie: Option<&BackendCookie>) -> LoadState<Vec<Plan>> {
    ViewState::resolve(async {
        state.api().plans(cookie).await.map_err(|e| {
            tracing::error!("Error fetching plans: {e}");
            e.user_message("Failed to fetch plans")
        })
    })
    .await
}

fn plans_page(
    mut layout: LayoutContext,
    samples: SampleData,
    plans: &LoadState<Vec<Plan>>,
    tab: SubscriptionTab,
    form: PlanForm,
) -> Response {
    if let Some(message) = plans.error() {
        layout.flash(Flash::error(message));
    }

    let (active, archived) = split_plans(plans.loaded().map(Vec::as_slice).unwrap_or_default());
    let amounts: Vec<_> = active.iter().map(|plan| plan.amount).collect();
    let estimates = samples.subscription_estimates(&amounts);

    let template = SubscriptionsTemplate {
        layout,
        tabs: tab.tabs(),
        tab: tab.as_str(),
        table: plans_table_config(),
        loaded: plans.loaded().is_some(),
        active_plans: active.iter().copied().map(plan_row).collect(),
        archived_plans: archived.iter().copied().map(plan_row).collect(),
        form,
        stats: analytics_cards(active.len(), archived.len(), estimates.as_ref()),
        price_chart: (!active.is_empty()).then(|| price_chart(&active)),
        subscribers: samples.subscribers(),
    };
    render(&template)
}

/// Subscriptions page.
///
/// GET /subscriptions
#[instrument(skip_all)]
async fn index(
    Shell { layout, cookie, .. }: Shell,
    State(state): State<AppState>,
    Query(query): Query<SubscriptionsQuery>,
) -> Response {
    let plans = fetch_plans(&state, cookie.as_ref()).await;

    let editing = query.edit.as_ref().and_then(|id| {
        plans
            .loaded()
            .and_then(|plans| plans.iter().find(|plan| &plan.id == id))
    });
    let form = match editing {
        Some(plan) => PlanForm::edit(&plan.id, plan_form_values(plan)),
        None => {
            let form = PlanForm::create(new_plan_form_values());
            if query.new.is_some() {
                PlanForm {
                    modal: form.modal.clone().opened(),
                    ..form
                }
            } else {
                form
            }
        }
    };

    plans_page(
        layout,
        state.sample_data(),
        &plans,
        SubscriptionTab::parse(query.tab.as_deref()),
        form,
    )
}

/// Re-render the plans tab with the form open.
async fn reopen(
    layout: LayoutContext,
    state: &AppState,
    cookie: Option<&BackendCookie>,
    form: PlanForm,
    error: String,
) -> Response {
    let plans = fetch_plans(state, cookie).await;
    plans_page(
        layout,
        state.sample_data(),
        &plans,
        SubscriptionTab::Plans,
        form.reopen_with(error),
    )
}

/// Create a plan.
///
/// POST /subscriptions/plans
#[instrument(skip_all)]
async fn create(
    Shell {
        layout,
        session,
        cookie,
    }: Shell,
    State(state): State<AppState>,
    Form(values): Form<FormValues>,
) -> Response {
    let input = match plan_input(&values) {
        Ok(input) => input,
        Err(e) => {
            return reopen(layout, &state, cookie.as_ref(), PlanForm::create(values), e.0).await;
        }
    };

    match state.api().create_plan(&input, cookie.as_ref()).await {
        Ok(_) => {
            tracing::info!(plan = %input.name, "Plan created");
            redirect_with(
                &session,
                Flash::success("Plan created successfully"),
                "/subscriptions",
            )
            .await
        }
        Err(e) => {
            tracing::error!("Error creating plan: {e}");
            let message = e.user_message("Failed to create plan");
            reopen(layout, &state, cookie.as_ref(), PlanForm::create(values), message).await
        }
    }
}

/// Update a plan.
///
/// POST /subscriptions/plans/{id}
#[instrument(skip_all, fields(plan = %id))]
async fn update(
    Shell {
        layout,
        session,
        cookie,
    }: Shell,
    State(state): State<AppState>,
    Path(id): Path<PlanId>,
    Form(values): Form<FormValues>,
) -> Response {
    let input = match plan_input(&values) {
        Ok(input) => input,
        Err(e) => {
            return reopen(layout, &state, cookie.as_ref(), PlanForm::edit(&id, values), e.0).await;
        }
    };

    match state.api().update_plan(&id, &input, cookie.as_ref()).await {
        Ok(_) => {
            redirect_with(
                &session,
                Flash::success("Plan updated successfully"),
                "/subscriptions",
            )
            .await
        }
        Err(e) => {
            tracing::error!("Error updating plan: {e}");
            let message = e.user_message("Failed to update plan");
            reopen(layout, &state, cookie.as_ref(), PlanForm::edit(&id, values), message).await
        }
    }
}

/// Delete a plan.
///
/// POST /subscriptions/plans/{id}/delete
#[instrument(skip_all, fields(plan = %id))]
async fn delete(
    admin: RequireAdminSession,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<PlanId>,
) -> Response {
    let flash = match state.api().delete_plan(&id, admin.cookie.as_ref()).await {
        Ok(()) => Flash::success("Plan deleted successfully"),
        Err(e) => {
            tracing::error!("Error deleting plan: {e}");
            Flash::error(delete_error(&e))
        }
    };
    redirect_with(&session, flash, "/subscriptions").await
}

fn delete_error(error: &ApiError) -> String {
    error.user_message("Failed to delete plan")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn plan(id: &str, amount: f64, status: &str) -> Plan {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "name": format!("Plan {id}"),
            "amount": amount,
            "interval": "monthly",
            "interval_count": 1,
            "type": "duo",
            "features": ["Ad-free", "Offline"],
            "status": status,
        }))
        .unwrap()
    }

    #[test]
    fn test_tab_parse_defaults_to_plans() {
        assert_eq!(SubscriptionTab::parse(Some("analytics")), SubscriptionTab::Analytics);
        assert_eq!(SubscriptionTab::parse(Some("bogus")), SubscriptionTab::Plans);
        assert_eq!(SubscriptionTab::parse(None), SubscriptionTab::Plans);

        let tabs = SubscriptionTab::Subscribers.tabs();
        assert_eq!(tabs.iter().filter(|t| t.active).count(), 1);
        assert!(tabs[2].active);
    }

    #[test]
    fn test_split_active_and_archived() {
        let plans = vec![plan("a", 99.0, "active"), plan("b", 49.0, "archived")];
        let (active, archived) = split_plans(&plans);
        assert_eq!(active.len(), 1);
        assert_eq!(archived[0].id.as_str(), "b");
    }

    #[test]
    fn test_billing_label() {
        assert_eq!(billing_label(PlanInterval::Monthly, 1), "Monthly");
        assert_eq!(billing_label(PlanInterval::Monthly, 3), "Every 3 months");
        assert_eq!(billing_label(PlanInterval::Yearly, 0), "Yearly");
    }

    #[test]
    fn test_plan_row() {
        let row = plan_row(&plan("a", 119.0, "active"));
        assert_eq!(row.cells[1], TableCell::text("₹119.00"));
        assert_eq!(row.cells[3], TableCell::text("Duo"));
        assert_eq!(row.cells[4], TableCell::Empty);
        assert!(row.actions[1].is_post());
    }

    #[test]
    fn test_estimates_only_with_sample_data() {
        let cards = analytics_cards(2, 1, None);
        assert_eq!(cards.len(), 2);
        assert!(cards.iter().all(|c| !c.sample));

        let estimates = SampleData::new(true)
            .subscription_estimates(&[rust_decimal::Decimal::from(99)])
            .unwrap();
        let cards = analytics_cards(1, 0, Some(&estimates));
        assert_eq!(cards.len(), 4);
        assert!(cards[2].sample && cards[3].sample);
    }

    #[test]
    fn test_edit_form_is_open_with_values() {
        let plan = plan("p 1", 99.0, "active");
        let form = PlanForm::edit(&plan.id, plan_form_values(&plan));
        assert!(form.modal.open);
        assert_eq!(form.action, "/subscriptions/plans/p%201");
        assert_eq!(form.features(), "Ad-free\nOffline");
        assert_eq!(form.intervals.len(), PlanInterval::ALL.len());
    }

    #[test]
    fn test_delete_error_prefers_server_message() {
        let err = ApiError::Status {
            status: 409,
            message: Some("Plan has active subscribers".to_string()),
        };
        assert_eq!(delete_error(&err), "Plan has active subscribers");
    }
}
