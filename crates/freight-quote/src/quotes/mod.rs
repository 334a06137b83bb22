//! Freight quote intake: validation, best-effort storage, and notification.

pub mod domain;
pub mod notify;
pub mod router;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{QuoteRequest, SubmissionContext};
pub use notify::{
    EmailNotifier, EmailProvider, NotificationError, NotificationMessage, ProviderKind,
    QuoteNotifier,
};
pub use router::{client_ip, quote_router, QUOTE_PATH};
pub use service::{IntakeError, PersistenceOutcome, QuoteIntakeService, SubmissionReceipt};
pub use store::{QuoteRecord, QuoteStore, SqliteQuoteStore, StoreError, QUOTES_SCHEMA};
pub use validation::{validate, ValidationErrors};
