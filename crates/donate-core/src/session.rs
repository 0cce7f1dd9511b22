//! # Checkout Session Types
//!
//! The provider-neutral session request we build from a donation, and the
//! result a provider hands back.

use crate::donation::PaymentRequest;
use crate::strategy::CheckoutUrls;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata key carrying the donor's name
pub const DONOR_NAME_KEY: &str = "donor_name";

/// Metadata key carrying the static source tag
pub const SOURCE_KEY: &str = "source";

/// Default value of the source tag
pub const DEFAULT_SOURCE_TAG: &str = "donation-page";

/// Everything a provider needs to open a one-time hosted checkout.
///
/// Built deterministically: the same donation, label and URLs always produce
/// an equal value. Provider-side identifiers (idempotency keys, session ids)
/// are added by the provider, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    /// Lowercase currency code
    pub currency: String,

    /// Amount in the smallest currency unit
    pub unit_amount: i64,

    /// Line item name shown on the hosted page
    pub product_name: String,

    /// Donor email, prefilled on the hosted page
    pub customer_email: String,

    /// Metadata attached to the session (ordered for stable encoding)
    pub metadata: BTreeMap<String, String>,

    /// Where the provider sends the donor after paying
    pub success_url: String,

    /// Where the provider sends the donor after cancelling
    pub cancel_url: String,
}

impl SessionRequest {
    pub fn from_donation(
        donation: &PaymentRequest,
        product_name: impl Into<String>,
        urls: &CheckoutUrls,
        source_tag: &str,
    ) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert(
            DONOR_NAME_KEY.to_string(),
            donation.name.clone().unwrap_or_default(),
        );
        metadata.insert(SOURCE_KEY.to_string(), source_tag.to_string());

        Self {
            currency: donation.currency.clone(),
            unit_amount: donation.minor_units(),
            product_name: product_name.into(),
            customer_email: donation.email.clone(),
            metadata,
            success_url: urls.success_url_with_session(),
            cancel_url: urls.cancel_url(),
        }
    }

    pub fn donor_name(&self) -> Option<&str> {
        self.metadata
            .get(DONOR_NAME_KEY)
            .map(String::as_str)
            .filter(|n| !n.is_empty())
    }
}

/// A checkout session opened by a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResult {
    /// Provider's session ID
    pub session_id: String,

    /// URL to redirect the donor to, passed through untouched
    pub url: String,

    /// When the hosted page stops accepting payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionResult {
    pub fn new(session_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            url: url.into(),
            expires_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::donation::to_minor_units;

    fn donation(name: Option<&str>, amount: f64) -> PaymentRequest {
        PaymentRequest {
            name: name.map(String::from),
            email: "donor@example.org".to_string(),
            amount,
            currency: "inr".to_string(),
            unit_amount: to_minor_units(amount).unwrap(),
        }
    }

    #[test]
    fn test_from_donation() {
        let urls = CheckoutUrls::new("https://give.example.org");
        let request = SessionRequest::from_donation(
            &donation(Some("Meera"), 500.0),
            "Help Kids — ACME",
            &urls,
            DEFAULT_SOURCE_TAG,
        );

        assert_eq!(request.unit_amount, 50000);
        assert_eq!(request.currency, "inr");
        assert_eq!(request.product_name, "Help Kids — ACME");
        assert_eq!(request.customer_email, "donor@example.org");
        assert_eq!(request.donor_name(), Some("Meera"));
        assert_eq!(request.metadata.get(SOURCE_KEY).map(String::as_str), Some("donation-page"));
        assert_eq!(
            request.success_url,
            "https://give.example.org/success.html?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(request.cancel_url, "https://give.example.org/cancel.html");
    }

    #[test]
    fn test_anonymous_donor() {
        let urls = CheckoutUrls::default();
        let request =
            SessionRequest::from_donation(&donation(None, 1.0), "Donation", &urls, "x");

        assert_eq!(request.donor_name(), None);
        assert_eq!(request.metadata.get(DONOR_NAME_KEY).map(String::as_str), Some(""));
    }

    #[test]
    fn test_identical_inputs_identical_requests() {
        let urls = CheckoutUrls::new("https://give.example.org");
        let a = SessionRequest::from_donation(&donation(Some("A"), 12.5), "Donation", &urls, "web");
        let b = SessionRequest::from_donation(&donation(Some("A"), 12.5), "Donation", &urls, "web");

        assert_eq!(a, b);
    }
}
