//! Server-side rules for inbound quote payloads.
//!
//! Every rule runs independently so the client receives the complete list of
//! problems in a single round trip.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::domain::QuoteRequest;

pub const NAME_REQUIRED: &str = "Name is required.";
pub const PHONE_REQUIRED: &str = "Phone is required.";
pub const EMAIL_REQUIRED: &str = "Email is required.";
pub const PICKUP_REQUIRED: &str = "Pickup location is required.";
pub const DELIVERY_REQUIRED: &str = "Delivery location is required.";
pub const FREIGHT_TYPE_REQUIRED: &str = "At least one freight type is required.";
pub const EMAIL_INVALID: &str = "Email format is invalid.";
pub const PHONE_INVALID: &str = "Phone number format is invalid.";

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@\x{FEFF}]+@[^\s@\x{FEFF}]+\.[^\s@\x{FEFF}]+$").expect("email pattern")
    })
}

// NZ numbers: leading zero then 7 to 10 digits.
fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^0[0-9]{7,10}$").expect("phone pattern"))
}

/// Ordered, non-empty list of human-readable validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    /// The message surfaced as the response's `error` field.
    pub fn primary(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or_default()
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, message: &str) -> bool {
        self.0.iter().any(|entry| entry == message)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a decoded JSON payload into a normalized [`QuoteRequest`].
///
/// Non-object payloads (`null`, arrays, scalars) are treated as an empty
/// object, so they fail every required-field rule.
pub fn validate(payload: &Value) -> Result<QuoteRequest, ValidationErrors> {
    let empty = Map::new();
    let fields = payload.as_object().unwrap_or(&empty);
    let mut errors = Vec::new();

    let name = required_text(fields, "name");
    if name.is_none() {
        errors.push(NAME_REQUIRED.to_string());
    }
    let phone = required_text(fields, "phone");
    if phone.is_none() {
        errors.push(PHONE_REQUIRED.to_string());
    }
    let email = required_text(fields, "email");
    if email.is_none() {
        errors.push(EMAIL_REQUIRED.to_string());
    }
    let pickup = required_text(fields, "pickup");
    if pickup.is_none() {
        errors.push(PICKUP_REQUIRED.to_string());
    }
    let delivery = required_text(fields, "delivery");
    if delivery.is_none() {
        errors.push(DELIVERY_REQUIRED.to_string());
    }
    let freight_type = freight_types(fields);
    if freight_type.is_none() {
        errors.push(FREIGHT_TYPE_REQUIRED.to_string());
    }

    // Format checks see the raw value, so whitespace-only input fails both
    // the required rule and the format rule.
    if let Some(raw) = raw_text(fields, "email") {
        if !email_pattern().is_match(raw) {
            errors.push(EMAIL_INVALID.to_string());
        }
    }
    if let Some(raw) = raw_text(fields, "phone") {
        let digits: String = raw.chars().filter(|c| !is_blank(*c)).collect();
        if !phone_pattern().is_match(&digits) {
            errors.push(PHONE_INVALID.to_string());
        }
    }

    match (name, phone, email, pickup, delivery, freight_type) {
        (Some(name), Some(phone), Some(email), Some(pickup), Some(delivery), Some(freight_type))
            if errors.is_empty() =>
        {
            Ok(QuoteRequest {
                name: name.to_string(),
                phone: phone.to_string(),
                email: email.to_string(),
                company: required_text(fields, "company").map(str::to_string),
                pickup: pickup.to_string(),
                delivery: delivery.to_string(),
                freight_type,
            })
        }
        _ => Err(ValidationErrors(errors)),
    }
}

/// A string value that is not empty before trimming.
fn raw_text<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

/// A string value with content after trimming, returned trimmed.
fn required_text<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(|value| value.trim_matches(is_blank))
        .filter(|value| !value.is_empty())
}

// Unicode whitespace plus the byte-order mark, which browsers also strip.
fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

fn freight_types(fields: &Map<String, Value>) -> Option<Vec<String>> {
    let entries = fields.get("freightType")?.as_array()?;
    if entries.is_empty() {
        return None;
    }

    entries
        .iter()
        .map(|entry| {
            entry
                .as_str()
                .filter(|value| !value.trim_matches(is_blank).is_empty())
                .map(str::to_string)
        })
        .collect()
}
