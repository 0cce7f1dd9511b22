//! # Stripe Checkout Sessions
//!
//! Implementation of the Stripe Checkout Sessions API for one-time donations.

use crate::config::StripeConfig;
use async_trait::async_trait;
use chrono::DateTime;
use donate_core::{CheckoutError, CheckoutProvider, CheckoutResult, SessionRequest, SessionResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Stripe Checkout Session provider
///
/// Uses Stripe's hosted checkout page, so card data never touches this service.
pub struct StripeCheckoutProvider {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckoutProvider {
    /// Create a new Stripe checkout provider
    pub fn new(config: StripeConfig) -> CheckoutResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| CheckoutError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Build form data for the Stripe API (single one-time line item)
    fn form_params(request: &SessionRequest) -> Vec<(String, String)> {
        let mut form_params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            (
                "line_items[0][price_data][currency]".to_string(),
                request.currency.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]".to_string(),
                request.unit_amount.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                request.product_name.clone(),
            ),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            ("customer_email".to_string(), request.customer_email.clone()),
            ("success_url".to_string(), request.success_url.clone()),
            ("cancel_url".to_string(), request.cancel_url.clone()),
        ];

        for (key, value) in &request.metadata {
            form_params.push((format!("metadata[{}]", key), value.clone()));
        }

        form_params
    }
}

#[async_trait]
impl CheckoutProvider for StripeCheckoutProvider {
    #[instrument(skip(self, request), fields(currency = %request.currency, unit_amount = request.unit_amount))]
    async fn create_session(&self, request: &SessionRequest) -> CheckoutResult<SessionResult> {
        let form_params = Self::form_params(request);
        let idempotency_key = Uuid::new_v4().to_string();

        debug!(
            "Creating Stripe checkout session: product={}, idempotency_key={}",
            request.product_name, idempotency_key
        );

        let response = self
            .client
            .post(self.config.sessions_url())
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", &idempotency_key)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            // Parse Stripe error
            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                let err = error_response.error;
                let message = match err.code {
                    Some(code) => format!("{} ({})", err.message, code),
                    None => err.message,
                };
                return Err(CheckoutError::Provider {
                    provider: "stripe".to_string(),
                    message,
                });
            }

            return Err(CheckoutError::Provider {
                provider: "stripe".to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let session: StripeCheckoutSessionResponse = serde_json::from_str(&body).map_err(|e| {
            CheckoutError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })?;

        let url = session.url.ok_or_else(|| CheckoutError::Provider {
            provider: "stripe".to_string(),
            message: format!("Session {} has no redirect URL", session.id),
        })?;

        info!("Created Stripe checkout session: id={}", session.id);

        Ok(SessionResult {
            session_id: session.id,
            url,
            expires_at: session
                .expires_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        })
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn session_request() -> SessionRequest {
        let mut metadata = BTreeMap::new();
        metadata.insert("donor_name".to_string(), "Meera".to_string());
        metadata.insert("source".to_string(), "donation-page".to_string());

        SessionRequest {
            currency: "inr".to_string(),
            unit_amount: 50000,
            product_name: "Help Kids — ACME".to_string(),
            customer_email: "meera@example.org".to_string(),
            metadata,
            success_url: "https://give.example.org/success.html?session_id={CHECKOUT_SESSION_ID}"
                .to_string(),
            cancel_url: "https://give.example.org/cancel.html".to_string(),
        }
    }

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_form_params() {
        let params = StripeCheckoutProvider::form_params(&session_request());

        assert_eq!(param(&params, "mode"), Some("payment"));
        assert_eq!(param(&params, "line_items[0][price_data][currency]"), Some("inr"));
        assert_eq!(param(&params, "line_items[0][price_data][unit_amount]"), Some("50000"));
        assert_eq!(
            param(&params, "line_items[0][price_data][product_data][name]"),
            Some("Help Kids — ACME")
        );
        assert_eq!(param(&params, "line_items[0][quantity]"), Some("1"));
        assert_eq!(param(&params, "customer_email"), Some("meera@example.org"));
        assert_eq!(param(&params, "metadata[donor_name]"), Some("Meera"));
        assert_eq!(param(&params, "metadata[source]"), Some("donation-page"));
    }

    #[test]
    fn test_form_params_are_deterministic() {
        assert_eq!(
            StripeCheckoutProvider::form_params(&session_request()),
            StripeCheckoutProvider::form_params(&session_request())
        );
    }

    #[test]
    fn test_session_response_without_url() {
        let parsed: StripeCheckoutSessionResponse =
            serde_json::from_str(r#"{"id":"cs_test_1","object":"checkout.session"}"#).unwrap();
        assert!(parsed.url.is_none());
    }
}
