//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the checkout provider, the campaign descriptor source and configuration.
//! Everything is injected at construction so tests can swap in doubles.

use donate_core::{
    BoxedCheckoutProvider, CampaignSource, CheckoutUrls, FileCampaignSource, DEFAULT_SOURCE_TAG,
};
use donate_stripe::StripeCheckoutProvider;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Deployment-wide currency used when a request names none
    pub default_currency: Option<String>,
    /// Path of the optional campaign descriptor
    pub campaign_config_path: String,
    /// Path of the success landing page on the request origin
    pub success_path: String,
    /// Path of the cancel landing page on the request origin
    pub cancel_path: String,
    /// Static tag stored in session metadata
    pub source_tag: String,
}

impl AppConfig {
    /// Load from environment variables
    ///
    /// `.env` is loaded once by the binary before this runs.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            host: non_empty("HOST").unwrap_or(defaults.host),
            port: non_empty("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            environment: non_empty("ENVIRONMENT").unwrap_or(defaults.environment),
            default_currency: non_empty("DEFAULT_CURRENCY").map(|c| c.trim().to_lowercase()),
            campaign_config_path: non_empty("CAMPAIGN_CONFIG_PATH")
                .unwrap_or(defaults.campaign_config_path),
            success_path: non_empty("SUCCESS_PATH").unwrap_or(defaults.success_path),
            cancel_path: non_empty("CANCEL_PATH").unwrap_or(defaults.cancel_path),
            source_tag: non_empty("DONATION_SOURCE").unwrap_or(defaults.source_tag),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Redirect URLs for a request arriving from `origin`
    pub fn checkout_urls(&self, origin: CheckoutUrls) -> CheckoutUrls {
        origin.with_paths(&self.success_path, &self.cancel_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            default_currency: None,
            campaign_config_path: "config/campaign.json".to_string(),
            success_path: "/success.html".to_string(),
            cancel_path: "/cancel.html".to_string(),
            source_tag: DEFAULT_SOURCE_TAG.to_string(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment provider that opens checkout sessions
    pub provider: BoxedCheckoutProvider,
    /// Campaign descriptor, re-read on every request
    pub campaign: Arc<dyn CampaignSource>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create state from the environment with the Stripe provider
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let stripe = StripeCheckoutProvider::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;
        tracing::info!("Stripe mode: {}", stripe.config().mode());

        let campaign = FileCampaignSource::new(&config.campaign_config_path);

        Ok(Self::with_parts(Arc::new(stripe), Arc::new(campaign), config))
    }

    /// Assemble state from explicit parts
    pub fn with_parts(
        provider: BoxedCheckoutProvider,
        campaign: Arc<dyn CampaignSource>,
        config: AppConfig,
    ) -> Self {
        Self {
            provider,
            campaign,
            config,
        }
    }
}
