//! # Donate Checkout
//!
//! Turns a donation form submission into a hosted Stripe Checkout page.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export DEFAULT_CURRENCY=inr                      # optional
//! export CAMPAIGN_CONFIG_PATH=config/campaign.json # optional
//!
//! # Run the server
//! donate-checkout
//! ```

use donate_api::{routes, state::AppState, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    telemetry::init();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment provider: {}", state.provider.provider_name());
    info!(
        "Default currency: {}",
        state.config.default_currency.as_deref().unwrap_or(donate_core::FALLBACK_CURRENCY)
    );
    info!("Campaign descriptor: {}", state.config.campaign_config_path);

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("Donate checkout starting on http://{}", addr);

    if !is_prod {
        info!("Checkout: POST http://{}/api/create-checkout-session", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
