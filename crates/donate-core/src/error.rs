//! # Checkout Error Types
//!
//! Typed error handling for the donation checkout flow.
//! Every fallible checkout operation returns `Result<T, CheckoutError>`.

use thiserror::Error;

/// Message returned to callers whenever the failure is on our side or the provider's.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to create checkout session";

/// Core error type for checkout operations
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Request used a method other than POST
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// Invalid request data (reason is safe to show to the caller)
    #[error("{0}")]
    BadRequest(String),

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    Provider { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    Network(String),

    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider response could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CheckoutError {
    pub fn bad_request(reason: impl Into<String>) -> Self {
        CheckoutError::BadRequest(reason.into())
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::MethodNotAllowed => 405,
            CheckoutError::BadRequest(_) => 400,
            CheckoutError::Provider { .. }
            | CheckoutError::Network(_)
            | CheckoutError::Configuration(_)
            | CheckoutError::Serialization(_) => 500,
        }
    }

    /// Returns true if the caller is at fault
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Text that may leave the process.
    ///
    /// Server-side failures collapse to [`GENERIC_FAILURE_MESSAGE`]; the
    /// detailed `Display` form is for logs only.
    pub fn public_message(&self) -> String {
        if self.is_client_error() {
            self.to_string()
        } else {
            GENERIC_FAILURE_MESSAGE.to_string()
        }
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(CheckoutError::MethodNotAllowed.status_code(), 405);
        assert_eq!(CheckoutError::bad_request("Invalid amount").status_code(), 400);
        assert_eq!(
            CheckoutError::Provider {
                provider: "stripe".into(),
                message: "card_declined".into()
            }
            .status_code(),
            500
        );
        assert_eq!(CheckoutError::Network("timeout".into()).status_code(), 500);
    }

    #[test]
    fn test_public_message_hides_provider_detail() {
        let err = CheckoutError::Provider {
            provider: "stripe".into(),
            message: "Invalid API Key provided: sk_test_****1234".into(),
        };
        assert_eq!(err.public_message(), GENERIC_FAILURE_MESSAGE);
        assert!(err.to_string().contains("sk_test_"));
    }

    #[test]
    fn test_public_message_keeps_validation_reason() {
        let err = CheckoutError::bad_request("Email is required");
        assert_eq!(err.public_message(), "Email is required");
    }
}
