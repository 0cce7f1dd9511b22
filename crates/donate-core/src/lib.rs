//! # donate-core
//!
//! Core types and traits for the donation checkout service.
//!
//! This crate provides:
//! - `PaymentRequest` parsing and validation of the donation form
//! - `CampaignSource` for the optional campaign descriptor
//! - `SessionRequest` and `SessionResult` for the checkout call
//! - `CheckoutProvider` trait for implementing payment providers
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use donate_core::{CampaignSource, CheckoutUrls, PaymentRequest, SessionRequest};
//!
//! let donation = PaymentRequest::from_json(body, Some("inr"))?;
//! let label = campaign.product_label().await;
//! let urls = CheckoutUrls::from_forwarded(proto, forwarded_host, host);
//!
//! let request = SessionRequest::from_donation(&donation, label, &urls, "donation-page");
//! let session = provider.create_session(&request).await?;
//!
//! // Redirect the donor to session.url
//! ```

pub mod campaign;
pub mod donation;
pub mod error;
pub mod session;
pub mod strategy;

// Re-exports for convenience
pub use campaign::{
    CampaignConfig, CampaignError, CampaignSource, FileCampaignSource, StaticCampaignSource,
    DEFAULT_PRODUCT_LABEL,
};
pub use donation::{resolve_currency, to_minor_units, PaymentRequest, FALLBACK_CURRENCY};
pub use error::{CheckoutError, CheckoutResult, GENERIC_FAILURE_MESSAGE};
pub use session::{SessionRequest, SessionResult, DEFAULT_SOURCE_TAG};
pub use strategy::{BoxedCheckoutProvider, CheckoutProvider, CheckoutUrls, DEFAULT_ORIGIN};
