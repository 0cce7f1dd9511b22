//! # Donation Requests
//!
//! Parsing and validation of the inbound donation form.
//! The body is decoded loosely (as a `serde_json::Value`) so that a form
//! posting `"amount": "25"` behaves the same as `"amount": 25`.

use crate::error::{CheckoutError, CheckoutResult};
use serde::Serialize;
use serde_json::{Map, Value};

/// Currency used when neither the request nor the deployment names one
pub const FALLBACK_CURRENCY: &str = "inr";

/// A validated donation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRequest {
    /// Donor display name (absent when blank)
    pub name: Option<String>,
    /// Donor email, trimmed and non-empty
    pub email: String,
    /// Amount in major currency units, finite and positive
    pub amount: f64,
    /// Lowercase currency code
    pub currency: String,
    /// `amount` in the smallest currency unit
    #[serde(skip)]
    pub(crate) unit_amount: i64,
}

impl PaymentRequest {
    /// Decode and validate a raw JSON body.
    ///
    /// `default_currency` is the deployment default; `"inr"` applies when it is
    /// unset or blank.
    pub fn from_json(body: &[u8], default_currency: Option<&str>) -> CheckoutResult<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|_| CheckoutError::bad_request("Invalid JSON body"))?;
        let fields = value
            .as_object()
            .ok_or_else(|| CheckoutError::bad_request("Invalid JSON body"))?;

        Self::from_fields(fields, default_currency)
    }

    fn from_fields(fields: &Map<String, Value>, default_currency: Option<&str>) -> CheckoutResult<Self> {
        let name = string_field(fields, "name").filter(|n| !n.is_empty());
        let email = string_field(fields, "email").unwrap_or_default();
        let amount = coerce_amount(fields.get("amount"));
        let currency = resolve_currency(
            fields.get("currency").and_then(Value::as_str),
            default_currency,
        );

        if email.is_empty() {
            return Err(CheckoutError::bad_request("Email is required"));
        }

        if !amount.is_finite() || amount <= 0.0 {
            return Err(CheckoutError::bad_request("Invalid amount"));
        }

        let unit_amount =
            to_minor_units(amount).ok_or_else(|| CheckoutError::bad_request("Invalid amount"))?;

        Ok(Self {
            name,
            email,
            amount,
            currency,
            unit_amount,
        })
    }

    /// Amount in the smallest currency unit
    pub fn minor_units(&self) -> i64 {
        self.unit_amount
    }
}

/// Convert a major-unit amount to minor units, rounding half away from zero.
///
/// Rounding here keeps values such as `10.99` from landing on `1098`.
/// Returns `None` when the result does not fit in an `i64`.
pub fn to_minor_units(amount: f64) -> Option<i64> {
    let minor = (amount * 100.0).round();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if !minor.is_finite() || minor >= i64::MAX as f64 || minor < i64::MIN as f64 {
        return None;
    }
    Some(minor as i64)
}

/// Pick the request currency, then the deployment default, then `"inr"`.
pub fn resolve_currency(requested: Option<&str>, default_currency: Option<&str>) -> String {
    [requested, default_currency]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|c| !c.is_empty())
        .unwrap_or(FALLBACK_CURRENCY)
        .to_lowercase()
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
}

/// Loose numeric coercion for the `amount` field.
///
/// Numbers pass through, numeric strings are parsed, `null` and blank strings
/// become zero, and everything else (including a missing field) is NaN.
fn coerce_amount(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse().unwrap_or(f64::NAN)
            }
        }
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(_) | None => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> CheckoutResult<PaymentRequest> {
        PaymentRequest::from_json(body.as_bytes(), None)
    }

    fn reason(result: CheckoutResult<PaymentRequest>) -> String {
        match result {
            Err(CheckoutError::BadRequest(reason)) => reason,
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_request_defaults() {
        let req = parse(r#"{ "email": "a@b.com", "amount": 25 }"#).unwrap();

        assert_eq!(req.email, "a@b.com");
        assert_eq!(req.amount, 25.0);
        assert_eq!(req.currency, "inr");
        assert_eq!(req.name, None);
        assert_eq!(req.minor_units(), 2500);
    }

    #[test]
    fn test_fields_are_trimmed_and_lowercased() {
        let req = parse(
            r#"{ "name": "  Asha  ", "email": "  asha@example.org ", "amount": "12.5", "currency": " USD " }"#,
        )
        .unwrap();

        assert_eq!(req.name.as_deref(), Some("Asha"));
        assert_eq!(req.email, "asha@example.org");
        assert_eq!(req.currency, "usd");
        assert_eq!(req.minor_units(), 1250);
    }

    #[test]
    fn test_default_currency_from_deployment() {
        let body = br#"{ "email": "a@b.com", "amount": 5 }"#;
        let req = PaymentRequest::from_json(body, Some("EUR")).unwrap();
        assert_eq!(req.currency, "eur");

        let req = PaymentRequest::from_json(body, Some("  ")).unwrap();
        assert_eq!(req.currency, "inr");
    }

    #[test]
    fn test_invalid_json() {
        assert_eq!(reason(parse("{not json")), "Invalid JSON body");
        assert_eq!(reason(parse("")), "Invalid JSON body");
        assert_eq!(reason(parse("[1, 2]")), "Invalid JSON body");
    }

    #[test]
    fn test_email_required() {
        assert_eq!(reason(parse(r#"{ "amount": 10 }"#)), "Email is required");
        assert_eq!(reason(parse(r#"{ "email": "   ", "amount": 10 }"#)), "Email is required");
        assert_eq!(reason(parse(r#"{ "email": 42, "amount": 10 }"#)), "Email is required");
    }

    #[test]
    fn test_email_checked_before_amount() {
        assert_eq!(reason(parse(r#"{ "email": "", "amount": -1 }"#)), "Email is required");
    }

    #[test]
    fn test_invalid_amounts() {
        for amount in ["0", "-5", "\"abc\"", "null", "\"\"", "{}", "[]", "-0.001"] {
            let body = format!(r#"{{ "email": "a@b.com", "amount": {} }}"#, amount);
            assert_eq!(reason(parse(&body)), "Invalid amount", "amount = {}", amount);
        }
        assert_eq!(reason(parse(r#"{ "email": "a@b.com" }"#)), "Invalid amount");
        assert_eq!(
            reason(parse(r#"{ "email": "a@b.com", "amount": "Infinity" }"#)),
            "Invalid amount"
        );
    }

    #[test]
    fn test_out_of_range_amounts() {
        for amount in ["1e400", "-1e400", "1e20", "\"1e20\"", "92233720368547758.08"] {
            let body = format!(r#"{{ "email": "a@b.com", "amount": {} }}"#, amount);
            assert_eq!(reason(parse(&body)), "Invalid amount", "amount = {}", amount);
        }

        let req = parse(r#"{ "email": "a@b.com", "amount": 1e15 }"#).unwrap();
        assert_eq!(req.minor_units(), 100_000_000_000_000_000);
    }

    #[test]
    fn test_minor_unit_rounding() {
        assert_eq!(to_minor_units(500.0), Some(50000));
        assert_eq!(to_minor_units(10.99), Some(1099));
        assert_eq!(to_minor_units(12.505), Some(1251));
        assert_eq!(to_minor_units(0.1 + 0.2), Some(30));
    }

    #[test]
    fn test_minor_units_out_of_range() {
        assert_eq!(to_minor_units(1e17), None);
        assert_eq!(to_minor_units(-1e17), None);
        assert_eq!(to_minor_units(f64::INFINITY), None);
        assert_eq!(to_minor_units(f64::NAN), None);
    }

    #[test]
    fn test_identical_bodies_parse_identically() {
        let body = r#"{ "name": "Ravi", "email": "ravi@example.in", "amount": 100 }"#;
        assert_eq!(parse(body).unwrap(), parse(body).unwrap());
    }
}
