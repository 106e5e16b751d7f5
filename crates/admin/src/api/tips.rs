//! Tips paid by listeners to artists.

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use tunenest_core::{PaymentMethod, Price, TipId};

use super::{ApiClient, ApiError, BackendCookie};

/// User or artist attached to a tip.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TipParty {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// A tip.
#[derive(Debug, Clone, Deserialize)]
pub struct Tip {
    #[serde(rename = "_id")]
    pub id: TipId,
    #[serde(default)]
    pub user: Option<TipParty>,
    #[serde(default)]
    pub artist: Option<TipParty>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
}

impl Tip {
    #[must_use]
    pub fn user_name(&self) -> &str {
        self.user
            .as_ref()
            .and_then(|u| u.name.as_deref())
            .unwrap_or("Unknown")
    }

    #[must_use]
    pub fn artist_name(&self) -> &str {
        self.artist
            .as_ref()
            .and_then(|a| a.name.as_deref())
            .unwrap_or("Unknown")
    }

    #[must_use]
    pub const fn price(&self) -> Price {
        Price::inr(self.amount)
    }

    #[must_use]
    pub fn payment_method(&self) -> PaymentMethod {
        PaymentMethod::from_payment_id(self.razorpay_payment_id.as_deref().unwrap_or(""))
    }
}

#[derive(Deserialize)]
struct TipsEnvelope {
    #[serde(default)]
    tips: Vec<Tip>,
}

impl ApiClient {
    /// List all tips.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    #[instrument(skip(self, cookie))]
    pub async fn tips(&self, cookie: Option<&BackendCookie>) -> Result<Vec<Tip>, ApiError> {
        let envelope: TipsEnvelope = self.get("/tips", cookie).await?;
        Ok(envelope.tips)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tip_decodes() {
        let envelope: TipsEnvelope = serde_json::from_str(
            r#"{"success":true,"tips":[{"_id":"t1","user":{"name":"Meera","email":"m@x.in"},"artist":{"name":"Arijit"},"amount":50,"date":"2024-06-01","razorpay_payment_id":"pay_Q1"}]}"#,
        )
        .unwrap();
        let tip = &envelope.tips[0];
        assert_eq!(tip.user_name(), "Meera");
        assert_eq!(tip.artist_name(), "Arijit");
        assert_eq!(tip.payment_method(), PaymentMethod::Razorpay);
        assert_eq!(tip.price().display(), "₹50.00");
    }

    #[test]
    fn test_tip_missing_parties() {
        let tip: Tip = serde_json::from_str(r#"{"_id":"t2","amount":10}"#).unwrap();
        assert_eq!(tip.user_name(), "Unknown");
        assert_eq!(tip.payment_method(), PaymentMethod::Other);
    }
}
