//! # Checkout Provider Trait
//!
//! Strategy trait for the payment provider that hosts the checkout page.
//! The HTTP layer only ever sees `dyn CheckoutProvider`, so a real provider
//! and a test double are interchangeable.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  CheckoutProvider (trait)                   │
//! │  ├── create_session()                                       │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                  ┌─────────┴─────────┐
//!          ┌───────┴───────┐   ┌───────┴───────┐
//!          │StripeCheckout │   │  test doubles │
//!          │   Provider    │   │               │
//!          └───────────────┘   └───────────────┘
//! ```

use crate::error::CheckoutResult;
use crate::session::{SessionRequest, SessionResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Origin used when the request carries no host information at all
pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";

/// A payment provider able to open hosted checkout sessions.
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Create a checkout session and return its redirect URL.
    ///
    /// Any failure (network, provider rejection, undecodable response) is an
    /// error; the caller decides what, if anything, to show the donor.
    async fn create_session(&self, request: &SessionRequest) -> CheckoutResult<SessionResult>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared provider (dynamic dispatch)
pub type BoxedCheckoutProvider = Arc<dyn CheckoutProvider>;

/// Absolute redirect URLs derived from the request origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUrls {
    /// Scheme and host (e.g., "https://give.example.org")
    pub base_url: String,
    /// Success page path (e.g., "/success.html")
    pub success_path: String,
    /// Cancel page path (e.g., "/cancel.html")
    pub cancel_path: String,
}

impl CheckoutUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            success_path: "/success.html".to_string(),
            cancel_path: "/cancel.html".to_string(),
        }
    }

    /// Derive the origin from proxy headers.
    ///
    /// `X-Forwarded-Host` wins over `Host`; only the first entry of a
    /// comma-separated forwarded list is used. With no host at all the
    /// local default applies.
    pub fn from_forwarded(
        forwarded_proto: Option<&str>,
        forwarded_host: Option<&str>,
        host: Option<&str>,
    ) -> Self {
        let host = first_value(forwarded_host).or_else(|| first_value(host));

        match host {
            Some(host) => {
                let proto = first_value(forwarded_proto).unwrap_or("https");
                Self::new(format!("{}://{}", proto, host))
            }
            None => Self::new(DEFAULT_ORIGIN),
        }
    }

    /// Builder: override the landing page paths
    pub fn with_paths(mut self, success_path: impl Into<String>, cancel_path: impl Into<String>) -> Self {
        self.success_path = success_path.into();
        self.cancel_path = cancel_path.into();
        self
    }

    pub fn success_url(&self) -> String {
        format!("{}{}", self.base_url, self.success_path)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}{}", self.base_url, self.cancel_path)
    }

    /// Success URL with Stripe's session id placeholder appended
    pub fn success_url_with_session(&self) -> String {
        let url = self.success_url();
        if url.contains('?') {
            format!("{}&session_id={{CHECKOUT_SESSION_ID}}", url)
        } else {
            format!("{}?session_id={{CHECKOUT_SESSION_ID}}", url)
        }
    }
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self::new(DEFAULT_ORIGIN)
    }
}

fn first_value(header: Option<&str>) -> Option<&str> {
    header
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
