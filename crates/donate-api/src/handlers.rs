//! # Request Handlers
//!
//! Axum request handlers for the donation checkout API.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use donate_core::{CheckoutError, CheckoutUrls, PaymentRequest, SessionRequest};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create checkout session response
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutSessionResponse {
    /// Hosted checkout URL (redirect the donor here)
    pub url: String,
}

/// Error wrapper rendered as a plain-text body.
///
/// Only [`CheckoutError::public_message`] reaches the client.
#[derive(Debug)]
pub struct ApiError(pub CheckoutError);

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = self.0.public_message();

        if matches!(self.0, CheckoutError::MethodNotAllowed) {
            return (status, [(header::ALLOW, "POST")], body).into_response();
        }

        (status, body).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "donate-checkout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Any method other than POST on the checkout route
pub async fn method_not_allowed() -> ApiError {
    ApiError(CheckoutError::MethodNotAllowed)
}

/// Create a hosted checkout session for a donation
#[instrument(skip_all)]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CheckoutSessionResponse>, ApiError> {
    let donation = PaymentRequest::from_json(&body, state.config.default_currency.as_deref())
        .map_err(|e| {
            debug!("Rejected donation request: {}", e);
            e
        })?;

    let label = state.campaign.product_label().await;
    let urls = state.config.checkout_urls(request_origin(&headers));

    let session_request =
        SessionRequest::from_donation(&donation, label, &urls, &state.config.source_tag);

    info!(
        "Creating checkout: provider={}, amount={} {}, product={}, origin={}",
        state.provider.provider_name(),
        session_request.unit_amount,
        session_request.currency,
        session_request.product_name,
        urls.base_url
    );

    let session = state
        .provider
        .create_session(&session_request)
        .await
        .map_err(|e| {
            error!("Failed to create checkout session: {}", e);
            e
        })?;

    info!("Created checkout session: {}", session.session_id);

    Ok(Json(CheckoutSessionResponse { url: session.url }))
}

/// Origin of the request as the donor's browser sees it
pub fn request_origin(headers: &HeaderMap) -> CheckoutUrls {
    let get = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    CheckoutUrls::from_forwarded(
        get("x-forwarded-proto"),
        get("x-forwarded-host"),
        get(header::HOST.as_str()),
    )
}

/// Checkout success page
pub async fn checkout_success(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let session_id = params
        .get("session_id")
        .map(|s| html_escape(s))
        .unwrap_or_else(|| "unknown".to_string());

    Html(format!(r#"
<!DOCTYPE html>
<html>
<head><title>Thank You</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%);">
    <div style="background: white; padding: 60px; border-radius: 16px; text-align: center;">
        <h1>Thank you for your donation!</h1>
        <p>Reference: <code>{}</code></p>
        <p style="color: #666;">A receipt will be emailed to you shortly.</p>
    </div>
</body>
</html>
"#, session_id))
}

/// Checkout cancel page
pub async fn checkout_cancel() -> impl IntoResponse {
    Html(r#"
<!DOCTYPE html>
<html>
<head><title>Donation Cancelled</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%);">
    <div style="background: white; padding: 60px; border-radius: 16px; text-align: center;">
        <h1>Donation Cancelled</h1>
        <p style="color: #666;">No charges were made.</p>
    </div>
</body>
</html>
"#)
}

fn html_escape(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '&' => "&amp;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            c => c.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_api_error_status() {
        let response = ApiError(CheckoutError::bad_request("Invalid amount")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError(CheckoutError::MethodNotAllowed).into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");

        let response = ApiError(CheckoutError::Network("reset".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_request_origin() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("app.internal:8080"));
        assert_eq!(request_origin(&headers).base_url, "https://app.internal:8080");

        headers.insert("x-forwarded-host", HeaderValue::from_static("give.example.org"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        assert_eq!(request_origin(&headers).base_url, "https://give.example.org");

        assert_eq!(
            request_origin(&HeaderMap::new()).base_url,
            donate_core::DEFAULT_ORIGIN
        );
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("cs_test_123"), "cs_test_123");
    }
}
