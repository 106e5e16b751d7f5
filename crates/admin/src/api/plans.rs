//! Subscription plan CRUD.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use tunenest_core::{PlanId, PlanInterval, PlanStatus, Price};

use super::{ApiClient, ApiError, BackendCookie, segment};

const PLANS_PATH: &str = "/subscriptions/plans";

/// A subscription plan.
#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    #[serde(rename = "_id")]
    pub id: PlanId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default)]
    pub interval: PlanInterval,
    #[serde(default = "default_interval_count")]
    pub interval_count: u32,
    /// Audience tier (`student`, `individual`, `duo`, `family`); kept as sent.
    #[serde(rename = "type", default)]
    pub plan_type: String,
    #[serde(default)]
    pub have_trial: bool,
    #[serde(default)]
    pub trial_days: u32,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub status: PlanStatus,
}

const fn default_interval_count() -> u32 {
    1
}

impl Plan {
    /// Amount in rupees.
    #[must_use]
    pub const fn price(&self) -> Price {
        Price::inr(self.amount)
    }

    #[must_use]
    pub fn is_archived(&self) -> bool {
        self.status == PlanStatus::Archived
    }
}

/// Body for plan creation and update.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanInput {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub interval: PlanInterval,
    pub interval_count: u32,
    #[serde(rename = "type")]
    pub plan_type: String,
    pub have_trial: bool,
    pub trial_days: u32,
    pub features: Vec<String>,
}

impl ApiClient {
    /// List all plans (active and archived).
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    #[instrument(skip(self, cookie))]
    pub async fn plans(&self, cookie: Option<&BackendCookie>) -> Result<Vec<Plan>, ApiError> {
        self.get(PLANS_PATH, cookie).await
    }

    /// Create a plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the plan.
    #[instrument(skip(self, input, cookie), fields(name = %input.name))]
    pub async fn create_plan(
        &self,
        input: &PlanInput,
        cookie: Option<&BackendCookie>,
    ) -> Result<(), ApiError> {
        self.post_unit(PLANS_PATH, input, cookie).await
    }

    /// Update a plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, input, cookie))]
    pub async fn update_plan(
        &self,
        id: &PlanId,
        input: &PlanInput,
        cookie: Option<&BackendCookie>,
    ) -> Result<(), ApiError> {
        let path = format!("{PLANS_PATH}/{}", segment(id.as_str()));
        self.put_unit(&path, input, cookie).await
    }

    /// Delete a plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    #[instrument(skip(self, cookie))]
    pub async fn delete_plan(
        &self,
        id: &PlanId,
        cookie: Option<&BackendCookie>,
    ) -> Result<(), ApiError> {
        let path = format!("{PLANS_PATH}/{}", segment(id.as_str()));
        self.delete(&path, cookie).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_decodes_with_defaults() {
        let plan: Plan = serde_json::from_str(
            r#"{"_id":"pl1","name":"Premium","amount":199,"interval":"monthly","features":["Ad-free"]}"#,
        )
        .unwrap();
        assert_eq!(plan.interval_count, 1);
        assert_eq!(plan.price().display(), "₹199.00");
        assert!(!plan.is_archived());
    }

    #[test]
    fn test_archived_plan() {
        let plan: Plan = serde_json::from_str(
            r#"{"_id":"pl2","name":"Old","amount":49.5,"status":"archived"}"#,
        )
        .unwrap();
        assert!(plan.is_archived());
        assert_eq!(plan.price().display(), "₹49.50");
    }

    #[test]
    fn test_plan_input_wire_names() {
        let input = PlanInput {
            name: "Duo".to_string(),
            amount: Decimal::new(14900, 2),
            interval: PlanInterval::Monthly,
            interval_count: 1,
            plan_type: "duo".to_string(),
            have_trial: true,
            trial_days: 7,
            features: vec!["2 accounts".to_string()],
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["type"], "duo");
        assert_eq!(json["amount"], 149.0);
        assert_eq!(json["have_trial"], true);
        assert_eq!(json["interval"], "monthly");
    }
}
