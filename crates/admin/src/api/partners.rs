//! Service-partner registration and lifecycle.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use tunenest_core::PartnerId;

use super::{ApiClient, ApiError, BackendCookie, segment};

/// A registered service partner.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    #[serde(rename = "_id")]
    pub id: PartnerId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub experience: Option<u32>,
    #[serde(default)]
    pub service_area: Vec<String>,
    #[serde(default)]
    pub charges: Option<u64>,
    #[serde(default)]
    pub pan_number: Option<String>,
    #[serde(default)]
    pub aadhar_number: Option<String>,
    #[serde(default)]
    pub address: Option<PartnerAddress>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Partner address: free text from this dashboard, or the structured form
/// the partner app submits.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PartnerAddress {
    Text(String),
    Structured {
        #[serde(default)]
        street: Option<String>,
        #[serde(default)]
        city: Option<String>,
        #[serde(default)]
        state: Option<String>,
        #[serde(default)]
        pincode: Option<String>,
    },
}

impl PartnerAddress {
    /// Single-line form used to prefill the edit form.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Structured {
                street,
                city,
                state,
                pincode,
            } => [street, city, state, pincode]
                .into_iter()
                .map(|part| part.as_deref().unwrap_or_default())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Body for partner registration and update.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PartnerInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service_name: String,
    pub service_type: String,
    pub experience: u32,
    pub service_area: Vec<String>,
    pub charges: u64,
    pub pan_number: String,
    pub aadhar_number: String,
    pub address: String,
    pub notes: String,
}

/// Acknowledgement returned by partner mutations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartnerMutation {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<PartnerMutationData>,
}

impl PartnerMutation {
    /// Whether the backend reports that credentials were emailed.
    #[must_use]
    pub fn email_sent(&self) -> bool {
        self.data
            .as_ref()
            .and_then(|data| data.email_sent)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerMutationData {
    #[serde(default)]
    pub email_sent: Option<bool>,
}

/// Credential email delivery state for a partner.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmailStatus {
    #[serde(default)]
    pub sent: bool,
    #[serde(default)]
    pub last_login: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
struct PartnersEnvelope {
    #[serde(default)]
    data: Option<PartnersData>,
}

#[derive(Deserialize)]
struct PartnersData {
    #[serde(default)]
    partners: Vec<Partner>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailStatusEnvelope {
    data: EmailStatusData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailStatusData {
    email_status: EmailStatus,
}

impl ApiClient {
    /// List all partners.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    #[instrument(skip(self, cookie))]
    pub async fn partners(&self, cookie: Option<&BackendCookie>) -> Result<Vec<Partner>, ApiError> {
        let envelope: PartnersEnvelope = self.get("/partner", cookie).await?;
        Ok(envelope.data.map(|d| d.partners).unwrap_or_default())
    }

    /// Register a partner; the backend emails login credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the registration.
    #[instrument(skip(self, input, cookie), fields(email = %input.email))]
    pub async fn register_partner(
        &self,
        input: &PartnerInput,
        cookie: Option<&BackendCookie>,
    ) -> Result<PartnerMutation, ApiError> {
        self.post("/partner/register", input, cookie).await
    }

    /// Update a partner.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, input, cookie))]
    pub async fn update_partner(
        &self,
        id: &PartnerId,
        input: &PartnerInput,
        cookie: Option<&BackendCookie>,
    ) -> Result<PartnerMutation, ApiError> {
        let path = format!("/partner/{}", segment(id.as_str()));
        self.put(&path, input, cookie).await
    }

    /// Delete a partner.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    #[instrument(skip(self, cookie))]
    pub async fn delete_partner(
        &self,
        id: &PartnerId,
        cookie: Option<&BackendCookie>,
    ) -> Result<(), ApiError> {
        let path = format!("/partner/{}", segment(id.as_str()));
        self.delete(&path, cookie).await
    }

    /// Re-send the credentials email.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the request.
    #[instrument(skip(self, cookie))]
    pub async fn resend_partner_email(
        &self,
        id: &PartnerId,
        cookie: Option<&BackendCookie>,
    ) -> Result<PartnerMutation, ApiError> {
        let path = format!("/partner/{}/resend-email", segment(id.as_str()));
        self.post_empty(&path, cookie).await
    }

    /// Generate a new password and email it to the partner.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the request.
    #[instrument(skip(self, cookie))]
    pub async fn reset_partner_password(
        &self,
        id: &PartnerId,
        cookie: Option<&BackendCookie>,
    ) -> Result<PartnerMutation, ApiError> {
        let path = format!("/partner/{}/reset-password", segment(id.as_str()));
        self.post_empty(&path, cookie).await
    }

    /// Credential email state for one partner.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    #[instrument(skip(self, cookie))]
    pub async fn partner_email_status(
        &self,
        id: &PartnerId,
        cookie: Option<&BackendCookie>,
    ) -> Result<EmailStatus, ApiError> {
        let path = format!("/partner/{}/email-status", segment(id.as_str()));
        let envelope: EmailStatusEnvelope = self.get(&path, cookie).await?;
        Ok(envelope.data.email_status)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_partners_envelope() {
        let envelope: PartnersEnvelope = serde_json::from_str(
            r#"{"success":true,"data":{"partners":[{"_id":"p1","name":"Ravi","email":"ravi@fix.in","phone":"9876543210","serviceName":"Ravi Electricals","serviceType":"Electrician","serviceArea":["Pune","Mumbai"],"experience":5}]}}"#,
        )
        .unwrap();
        let partners = envelope.data.unwrap().partners;
        assert_eq!(partners[0].service_area, vec!["Pune", "Mumbai"]);
        assert_eq!(partners[0].experience, Some(5));
        assert_eq!(partners[0].charges, None);
    }

    #[test]
    fn test_structured_address_is_flattened() {
        let partner: Partner = serde_json::from_str(
            r#"{"_id":"p2","address":{"street":"MG Road","city":"Pune","pincode":"411001"}}"#,
        )
        .unwrap();
        assert_eq!(
            partner.address.unwrap().display(),
            "MG Road, Pune, , 411001"
        );

        let partner: Partner =
            serde_json::from_str(r#"{"_id":"p3","address":"12 Park Street"}"#).unwrap();
        assert_eq!(partner.address.unwrap().display(), "12 Park Street");
    }

    #[test]
    fn test_partner_input_is_camel_case() {
        let input = PartnerInput {
            name: "Ravi".to_string(),
            email: "ravi@fix.in".to_string(),
            phone: "9876543210".to_string(),
            service_name: "Ravi Electricals".to_string(),
            service_type: "Electrician".to_string(),
            experience: 0,
            service_area: vec![],
            charges: 0,
            pan_number: String::new(),
            aadhar_number: String::new(),
            address: String::new(),
            notes: String::new(),
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["serviceName"], "Ravi Electricals");
        assert_eq!(json["aadharNumber"], "");
        assert_eq!(json["serviceArea"], serde_json::json!([]));
    }

    #[test]
    fn test_mutation_email_sent() {
        let mutation: PartnerMutation =
            serde_json::from_str(r#"{"success":true,"data":{"emailSent":true}}"#).unwrap();
        assert!(mutation.email_sent());
        assert!(!PartnerMutation::default().email_sent());
    }

    #[test]
    fn test_email_status_envelope() {
        let envelope: EmailStatusEnvelope = serde_json::from_str(
            r#"{"data":{"emailStatus":{"sent":true,"lastLogin":"2024-05-01T10:00:00Z","isActive":true}}}"#,
        )
        .unwrap();
        assert!(envelope.data.email_status.sent);
        assert_eq!(envelope.data.email_status.is_active, Some(true));
    }
}
