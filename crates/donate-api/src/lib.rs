//! # donate-api
//!
//! HTTP API layer for the donation checkout service.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The checkout-session endpoint behind the donation form
//! - Landing pages for the provider's success/cancel redirects
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/create-checkout-session` | Create checkout session |
//! | POST | `/api/v1/checkout` | Create checkout session (versioned alias) |
//! | GET | `/success.html` | Success page |
//! | GET | `/cancel.html` | Cancel page |

pub mod handlers;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
