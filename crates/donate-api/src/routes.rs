//! # Routes
//!
//! Axum router configuration for the donation checkout API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Checkout:
///   - POST /api/create-checkout-session - Create a hosted checkout session
///   - POST /api/v1/checkout - Same handler, versioned path
///   - any other method on either path - 405
///
/// - Static pages (redirect targets):
///   - GET /success.html - Success page
///   - GET /cancel.html - Cancel page
///
/// - Health:
///   - GET /health, GET /
pub fn create_router(state: AppState) -> Router {
    // The donation form may be served from a different origin than this API
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let checkout = post(handlers::create_checkout_session).fallback(handlers::method_not_allowed);

    let api_routes = Router::new()
        .route("/create-checkout-session", checkout.clone())
        .route("/v1/checkout", checkout);

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // Landing pages
        .route("/success.html", get(handlers::checkout_success))
        .route("/cancel.html", get(handlers::checkout_cancel))
        // API
        .nest("/api", api_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
