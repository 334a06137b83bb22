use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// A validated freight quote submission.
///
/// Text fields are trimmed; `company` is absent when blank. Freight types keep
/// the order and spelling the client sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub pickup: String,
    pub delivery: String,
    pub freight_type: Vec<String>,
}

impl QuoteRequest {
    pub fn freight_summary(&self) -> String {
        self.freight_type.join(", ")
    }
}

/// Server-assigned metadata captured when a request arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionContext {
    pub ip_address: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionContext {
    pub fn new(ip_address: Option<String>, submitted_at: DateTime<Utc>) -> Self {
        Self {
            ip_address,
            submitted_at,
        }
    }

    pub fn now(ip_address: Option<String>) -> Self {
        Self::new(ip_address, Utc::now())
    }

    /// ISO-8601 in UTC with millisecond precision, e.g. `2025-03-01T09:30:00.000Z`.
    pub fn submitted_at_iso(&self) -> String {
        self.submitted_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
