use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::debug;

use super::domain::SubmissionContext;
use super::notify::QuoteNotifier;
use super::service::{IntakeError, QuoteIntakeService};
use super::store::QuoteStore;

pub const QUOTE_PATH: &str = "/api/quote";

pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed. Use POST.";
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON body.";
pub const NOTIFICATION_FAILED_MESSAGE: &str =
    "Failed to send notification email. Please try again later.";
pub const ACCEPTED_MESSAGE: &str = "Quote request received successfully.";

/// Router exposing the quote intake endpoint.
pub fn quote_router<S, N>(service: Arc<QuoteIntakeService<S, N>>) -> Router
where
    S: QuoteStore + 'static,
    N: QuoteNotifier + 'static,
{
    Router::new()
        .route(QUOTE_PATH, any(quote_handler::<S, N>))
        .with_state(service)
}

pub(crate) async fn quote_handler<S, N>(
    State(service): State<Arc<QuoteIntakeService<S, N>>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    S: QuoteStore + 'static,
    N: QuoteNotifier + 'static,
{
    if method == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors(response.headers_mut());
        return response;
    }

    if method != Method::POST {
        return json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            json!({ "success": false, "error": METHOD_NOT_ALLOWED_MESSAGE }),
        );
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            debug!(error = %err, "quote body is not valid JSON");
            return json_response(
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": INVALID_JSON_MESSAGE }),
            );
        }
    };

    let context = SubmissionContext::now(client_ip(&headers));

    match service.submit(&payload, context).await {
        Ok(_) => json_response(
            StatusCode::OK,
            json!({ "success": true, "message": ACCEPTED_MESSAGE }),
        ),
        Err(IntakeError::Rejected(errors)) => json_response(
            StatusCode::BAD_REQUEST,
            json!({
                "success": false,
                "error": errors.primary(),
                "errors": errors.messages(),
            }),
        ),
        Err(IntakeError::Notification(err)) => {
            let mut payload = json!({
                "success": false,
                "error": NOTIFICATION_FAILED_MESSAGE,
            });
            if service.exposes_error_details() {
                payload["details"] = Value::String(err.to_string());
            }
            json_response(StatusCode::INTERNAL_SERVER_ERROR, payload)
        }
    }
}

/// Best-effort client address from proxy headers, most trusted first.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    header_text(headers, "cf-connecting-ip")
        .or_else(|| {
            header_text(headers, "x-forwarded-for")
                .and_then(|value| value.split(',').next())
                .map(str::trim)
                .filter(|value| !value.is_empty())
        })
        .or_else(|| header_text(headers, "x-real-ip"))
        .map(str::to_string)
}

fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn json_response(status: StatusCode, payload: Value) -> Response {
    let mut response = (status, Json(payload)).into_response();
    apply_cors(response.headers_mut());
    response
}

fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
}
