//! # Stripe Configuration
//!
//! Configuration management for the Stripe integration.
//! The secret key is loaded from the environment and never logged.

use donate_core::CheckoutError;
use std::env;
use std::fmt;

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
const DEFAULT_API_VERSION: &str = "2024-12-18.acacia";

/// Stripe API configuration
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_..., sk_live_... or a restricted rk_... key)
    pub secret_key: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// API version
    pub api_version: String,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `STRIPE_SECRET_KEY`
    ///
    /// Optional:
    /// - `STRIPE_API_BASE` (defaults to the public Stripe API)
    pub fn from_env() -> Result<Self, CheckoutError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CheckoutError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup("STRIPE_SECRET_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| CheckoutError::Configuration("STRIPE_SECRET_KEY not set".to_string()))?;

        if !is_secret_key(&secret_key) {
            return Err(CheckoutError::Configuration(
                "STRIPE_SECRET_KEY must start with sk_test_, sk_live_, rk_test_ or rk_live_"
                    .to_string(),
            ));
        }

        let mut config = Self::new(secret_key);
        if let Some(base) = lookup("STRIPE_API_BASE").filter(|b| !b.trim().is_empty()) {
            config = config.with_api_base_url(base.trim());
        }

        Ok(config)
    }

    /// Create config with an explicit key (for testing)
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.contains("_test_")
    }

    /// Check if using live keys
    pub fn is_live_mode(&self) -> bool {
        self.secret_key.contains("_live_")
    }

    /// `"live"`, `"test"` or `"unknown"`, for startup logs
    pub fn mode(&self) -> &'static str {
        if self.is_live_mode() {
            "live"
        } else if self.is_test_mode() {
            "test"
        } else {
            "unknown"
        }
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.secret_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.api_base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Checkout Sessions endpoint
    pub fn sessions_url(&self) -> String {
        format!("{}/v1/checkout/sessions", self.api_base_url)
    }
}

fn is_secret_key(key: &str) -> bool {
    ["sk_test_", "sk_live_", "rk_test_", "rk_live_"]
        .iter()
        .any(|prefix| key.starts_with(prefix))
}

// Manual impl so the key never ends up in logs.
impl fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"[redacted]")
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .finish()
    }
}
