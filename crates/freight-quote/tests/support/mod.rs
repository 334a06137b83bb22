#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use freight_quote::config::NotificationConfig;
use serde_json::{json, Value};

/// One request observed by the fake Resend API.
#[derive(Debug, Clone)]
pub struct CapturedEmail {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct FakeResendState {
    status: StatusCode,
    captured: Arc<Mutex<Vec<CapturedEmail>>>,
}

/// Local stand-in for `https://api.resend.com`.
pub struct FakeResend {
    pub addr: SocketAddr,
    captured: Arc<Mutex<Vec<CapturedEmail>>>,
}

impl FakeResend {
    pub async fn start(status: StatusCode) -> Self {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let state = FakeResendState {
            status,
            captured: captured.clone(),
        };
        let app = Router::new()
            .route("/emails", post(receive_email))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake resend");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake resend serves");
        });

        Self { addr, captured }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn emails(&self) -> Vec<CapturedEmail> {
        self.captured.lock().expect("capture mutex poisoned").clone()
    }

    pub fn notification_config(&self) -> NotificationConfig {
        NotificationConfig {
            provider: "resend".to_string(),
            from: Some("quotes@coldfreight.example".to_string()),
            to: Some("ops@coldfreight.example".to_string()),
            api_key: Some("re_test_key".to_string()),
            resend_api_url: self.base_url(),
            debug_errors: false,
        }
    }
}

async fn receive_email(
    State(state): State<FakeResendState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state
        .captured
        .lock()
        .expect("capture mutex poisoned")
        .push(CapturedEmail {
            authorization,
            body,
        });

    let payload = if state.status.is_success() {
        json!({ "id": "email_123" })
    } else {
        json!({ "name": "validation_error", "message": "domain not verified" })
    };
    (state.status, Json(payload))
}

pub fn reference_payload() -> Value {
    json!({
        "name": "Jo Smith",
        "phone": "021 555 123",
        "email": "jo@example.com",
        "pickup": "Auckland",
        "delivery": "Wellington",
        "freightType": ["Frozen", "Chilled"],
    })
}
