//! Synchronous form validation.
//!
//! Every mutating form is checked here before any request is built; a
//! [`ValidationError`] means nothing is sent to the backend.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

use tunenest_core::{Audience, Email, NotificationKind, PhoneNumber, PlanInterval, PlanTier};

use crate::api::{NotificationInput, Partner, PartnerInput, Plan, PlanInput};

/// A form failed validation. The message is shown to the operator as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Raw submitted form fields, kept to refill the form after a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FormValues(HashMap<String, String>);

impl FormValues {
    /// Field value, or `""` when absent.
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map_or("", String::as_str)
    }

    /// Trimmed field value.
    #[must_use]
    pub fn trimmed(&self, name: &str) -> &str {
        self.get(name).trim()
    }

    /// Whether a checkbox was ticked.
    #[must_use]
    pub fn checked(&self, name: &str) -> bool {
        matches!(self.get(name), "on" | "true" | "1")
    }

    /// Set a field (used to prefill edit forms).
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }
}

impl<const N: usize> From<[(&str, &str); N]> for FormValues {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// Partner form fields that must be non-blank, with their labels.
pub const PARTNER_REQUIRED_FIELDS: [(&str, &str); 5] = [
    ("name", "Name"),
    ("email", "Email"),
    ("phone", "Phone"),
    ("serviceName", "Service name"),
    ("serviceType", "Service type"),
];

/// Validate the partner register/edit form.
///
/// # Errors
///
/// Returns the first failed check: a blank required field, a malformed
/// email, or a phone number that is not exactly 10 digits.
pub fn partner_input(form: &FormValues) -> Result<PartnerInput, ValidationError> {
    for (field, label) in PARTNER_REQUIRED_FIELDS {
        if form.trimmed(field).is_empty() {
            return Err(ValidationError::new(format!("{label} is required")));
        }
    }

    let email = Email::parse(form.trimmed("email"))
        .map_err(|_| ValidationError::new("Please enter a valid email address"))?;
    PhoneNumber::parse(form.trimmed("phone"))
        .map_err(|_| ValidationError::new("Please enter a valid 10-digit phone number"))?;

    Ok(PartnerInput {
        name: form.trimmed("name").to_string(),
        email: email.as_str().to_string(),
        // Sent as typed; only the digit count is enforced
        phone: form.trimmed("phone").to_string(),
        service_name: form.trimmed("serviceName").to_string(),
        service_type: form.trimmed("serviceType").to_string(),
        experience: form.trimmed("experience").parse().unwrap_or(0),
        service_area: split_list(form.get("serviceArea"), ','),
        charges: form.trimmed("charges").parse().unwrap_or(0),
        pan_number: form.trimmed("panNumber").to_string(),
        aadhar_number: form.trimmed("aadharNumber").to_string(),
        address: form.trimmed("address").to_string(),
        notes: form.trimmed("notes").to_string(),
    })
}

/// Edit-form values for an existing partner.
#[must_use]
pub fn partner_form_values(partner: &Partner) -> FormValues {
    FormValues::default()
        .with("name", partner.name.as_str())
        .with("email", partner.email.as_str())
        .with("phone", partner.phone.as_str())
        .with("serviceName", partner.service_name.as_str())
        .with("serviceType", partner.service_type.as_str())
        .with(
            "experience",
            partner.experience.map(|e| e.to_string()).unwrap_or_default(),
        )
        .with("serviceArea", partner.service_area.join(", "))
        .with(
            "charges",
            partner.charges.map(|c| c.to_string()).unwrap_or_default(),
        )
        .with(
            "panNumber",
            partner.pan_number.clone().unwrap_or_default(),
        )
        .with(
            "aadharNumber",
            partner.aadhar_number.clone().unwrap_or_default(),
        )
        .with(
            "address",
            partner
                .address
                .as_ref()
                .map(crate::api::PartnerAddress::display)
                .unwrap_or_default(),
        )
        .with("notes", partner.notes.clone().unwrap_or_default())
}

const PLAN_REQUIRED: &str = "Please fill all required fields";

/// Validate the plan create/edit form. Features are one per line.
///
/// # Errors
///
/// Returns an error when the name is blank, the price is missing, not a
/// number or negative, or no non-blank feature was given.
pub fn plan_input(form: &FormValues) -> Result<PlanInput, ValidationError> {
    let name = form.trimmed("name");
    let price = form.trimmed("price");
    let features = split_list(form.get("features"), '\n');

    if name.is_empty() || price.is_empty() || features.is_empty() {
        return Err(ValidationError::new(PLAN_REQUIRED));
    }

    let amount = Decimal::from_str(price)
        .ok()
        .filter(|amount| !amount.is_sign_negative())
        .ok_or_else(|| ValidationError::new("Price must be a non-negative number"))?;

    let have_trial = form.checked("have_trial");

    Ok(PlanInput {
        name: name.to_string(),
        amount,
        interval: form.trimmed("interval").parse().unwrap_or_default(),
        interval_count: form
            .trimmed("interval_count")
            .parse()
            .ok()
            .filter(|count| *count > 0)
            .unwrap_or(1),
        plan_type: PlanTier::from_str(form.trimmed("type"))
            .unwrap_or_default()
            .as_str()
            .to_string(),
        have_trial,
        trial_days: if have_trial {
            form.trimmed("trial_days").parse().unwrap_or(0)
        } else {
            0
        },
        features,
    })
}

/// Edit-form values for an existing plan.
#[must_use]
pub fn plan_form_values(plan: &Plan) -> FormValues {
    let mut values = FormValues::default()
        .with("name", plan.name.as_str())
        .with("price", plan.amount.normalize().to_string())
        .with("interval", plan.interval.as_str())
        .with("interval_count", plan.interval_count.to_string())
        .with("type", plan.plan_type.as_str())
        .with("trial_days", plan.trial_days.to_string())
        .with("features", plan.features.join("\n"));
    if plan.have_trial {
        values.set("have_trial", "on");
    }
    values
}

/// Default values of the "Create Plan" form.
#[must_use]
pub fn new_plan_form_values() -> FormValues {
    FormValues::default()
        .with("interval", PlanInterval::default().as_str())
        .with("interval_count", "1")
        .with("type", PlanTier::default().as_str())
        .with("trial_days", "0")
}

/// Validate the send-notification form.
///
/// # Errors
///
/// Returns an error when title or message is blank, or a specific audience
/// has no user selected.
pub fn notification_input(form: &FormValues) -> Result<NotificationInput, ValidationError> {
    let title = form.trimmed("title");
    let body = form.trimmed("body");
    if title.is_empty() || body.is_empty() {
        return Err(ValidationError::new(
            "Please fill in both title and message.",
        ));
    }

    let kind = NotificationKind::ALL
        .into_iter()
        .find(|kind| kind.as_str() == form.trimmed("type"))
        .unwrap_or_default();
    let audience = Audience::ALL
        .into_iter()
        .find(|audience| audience.as_str() == form.trimmed("audience"))
        .unwrap_or_default();

    let user_id = match audience {
        Audience::Specific => {
            let user = form.trimmed("user_id");
            if user.is_empty() {
                return Err(ValidationError::new(
                    "Please select a user for specific notification.",
                ));
            }
            user.to_string()
        }
        Audience::All | Audience::Premium => audience.as_str().to_string(),
    };

    Ok(NotificationInput {
        title: title.to_string(),
        body: body.to_string(),
        kind,
        user_id,
    })
}

/// Validate the forgot-password form.
///
/// # Errors
///
/// Returns an error when the email is blank.
pub fn forgot_password_email(form: &FormValues) -> Result<String, ValidationError> {
    let email = form.trimmed("email");
    if email.is_empty() {
        return Err(ValidationError::new("Email is required"));
    }
    Ok(email.to_string())
}

/// Validate the new-password form.
///
/// # Errors
///
/// Returns an error when either field is empty or they differ.
pub fn new_password(form: &FormValues) -> Result<SecretString, ValidationError> {
    let password = form.get("password");
    let confirm = form.get("confirm_password");
    if password.is_empty() || confirm.is_empty() {
        return Err(ValidationError::new("Both password fields are required"));
    }
    if password != confirm {
        return Err(ValidationError::new("Passwords do not match"));
    }
    Ok(SecretString::from(password.to_string()))
}

/// Check an uploaded logo's content type.
///
/// # Errors
///
/// Returns an error for anything that is not an image.
pub fn logo_content_type(content_type: Option<&str>) -> Result<String, ValidationError> {
    match content_type {
        Some(ct) if ct.starts_with("image/") => Ok(ct.to_string()),
        _ => Err(ValidationError::new("Logo must be an image file")),
    }
}

fn split_list(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
