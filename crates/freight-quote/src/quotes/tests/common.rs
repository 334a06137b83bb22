use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use crate::quotes::domain::{QuoteRequest, SubmissionContext};
use crate::quotes::notify::{NotificationError, QuoteNotifier};
use crate::quotes::store::{QuoteRecord, QuoteStore, StoreError};
use crate::quotes::{quote_router, QuoteIntakeService};

pub(super) fn valid_payload() -> Value {
    json!({
        "name": "Jo Smith",
        "phone": "021 555 123",
        "email": "jo@example.com",
        "pickup": "Auckland",
        "delivery": "Wellington",
        "freightType": ["Frozen", "Chilled"],
    })
}

pub(super) fn without(field: &str) -> Value {
    let mut payload = valid_payload();
    payload
        .as_object_mut()
        .expect("payload is an object")
        .remove(field);
    payload
}

pub(super) fn submitted_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn context() -> SubmissionContext {
    SubmissionContext::new(Some("203.0.113.7".to_string()), submitted_at())
}

pub(super) fn quote_request() -> QuoteRequest {
    QuoteRequest {
        name: "Jo Smith".to_string(),
        phone: "021 555 123".to_string(),
        email: "jo@example.com".to_string(),
        company: Some("Polar Logistics".to_string()),
        pickup: "Auckland".to_string(),
        delivery: "Wellington".to_string(),
        freight_type: vec!["Frozen".to_string(), "Chilled".to_string()],
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    records: Arc<Mutex<Vec<QuoteRecord>>>,
}

impl MemoryStore {
    pub(super) fn records(&self) -> Vec<QuoteRecord> {
        self.records.lock().expect("store mutex poisoned").clone()
    }
}

#[async_trait]
impl QuoteStore for MemoryStore {
    async fn insert(&self, record: &QuoteRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .expect("store mutex poisoned")
            .push(record.clone());
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct UnavailableStore {
    attempts: Mutex<usize>,
}

impl UnavailableStore {
    pub(super) fn attempts(&self) -> usize {
        *self.attempts.lock().expect("attempt mutex poisoned")
    }
}

#[async_trait]
impl QuoteStore for UnavailableStore {
    async fn insert(&self, _record: &QuoteRecord) -> Result<(), StoreError> {
        *self.attempts.lock().expect("attempt mutex poisoned") += 1;
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    sent: Arc<Mutex<Vec<QuoteRequest>>>,
}

impl MemoryNotifier {
    pub(super) fn sent(&self) -> Vec<QuoteRequest> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }
}

#[async_trait]
impl QuoteNotifier for MemoryNotifier {
    async fn notify(
        &self,
        request: &QuoteRequest,
        _context: &SubmissionContext,
    ) -> Result<(), NotificationError> {
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push(request.clone());
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct FailingNotifier {
    attempts: Mutex<usize>,
}

impl FailingNotifier {
    pub(super) fn attempts(&self) -> usize {
        *self.attempts.lock().expect("attempt mutex poisoned")
    }
}

#[async_trait]
impl QuoteNotifier for FailingNotifier {
    async fn notify(
        &self,
        _request: &QuoteRequest,
        _context: &SubmissionContext,
    ) -> Result<(), NotificationError> {
        *self.attempts.lock().expect("attempt mutex poisoned") += 1;
        Err(NotificationError::Provider {
            provider: "Resend",
            status: 502,
            body: "upstream unavailable".to_string(),
        })
    }
}

pub(super) fn build_service() -> (
    QuoteIntakeService<MemoryStore, MemoryNotifier>,
    Arc<MemoryStore>,
    Arc<MemoryNotifier>,
) {
    let store = Arc::new(MemoryStore::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = QuoteIntakeService::new(Some(store.clone()), notifier.clone());
    (service, store, notifier)
}

pub(super) fn router_with_service<S, N>(service: QuoteIntakeService<S, N>) -> axum::Router
where
    S: QuoteStore + 'static,
    N: QuoteNotifier + 'static,
{
    quote_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_cors_headers(response: &Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
}

pub(super) fn assert_bad_request(response: &Response) {
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_cors_headers(response);
}
