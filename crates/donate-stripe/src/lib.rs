//! # donate-stripe
//!
//! Stripe Checkout provider for the donation checkout service.
//!
//! `StripeCheckoutProvider` opens a one-time hosted Checkout Session per
//! donation:
//! - single dynamic line item (`price_data`, quantity 1)
//! - donor email prefill
//! - donor name and source tag as session metadata
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use donate_stripe::StripeCheckoutProvider;
//! use donate_core::CheckoutProvider;
//!
//! // Create provider from environment
//! let provider = StripeCheckoutProvider::from_env()?;
//!
//! // Create checkout session
//! let session = provider.create_session(&session_request).await?;
//!
//! // Redirect the donor to session.url
//! ```

pub mod checkout;
pub mod config;

// Re-exports
pub use checkout::StripeCheckoutProvider;
pub use config::StripeConfig;
