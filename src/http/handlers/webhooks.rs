use crate::domain::error::ReconcileError;
use crate::domain::event::WebhookPayload;
use crate::service::reconciler::ReconcileOutcome;
use crate::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Accepted signature header names. Older gateway versions sent
/// `x-event-signature`; newer ones send `x-event-checksum`.
const SIGNATURE_HEADERS: [&str; 2] = ["x-event-signature", "x-event-checksum"];

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub async fn wompi_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    // Shape check first: a body that does not fit the typed payload is
    // rejected before any signature work.
    let payload = match serde_json::from_str::<WebhookPayload>(&body) {
        Ok(payload) => payload,
        Err(err) => return error_response(&ReconcileError::MalformedPayload(err.to_string())),
    };

    let Some(signature) = signature_header(&headers) else {
        return error_response(&ReconcileError::MissingSignature);
    };

    match state.reconciler.reconcile(&payload, signature).await {
        Ok(outcome) => (StatusCode::OK, outcome_body(outcome)).into_response(),
        Err(err) => error_response(&err),
    }
}

fn signature_header(headers: &HeaderMap) -> Option<&str> {
    SIGNATURE_HEADERS
        .iter()
        .find_map(|name| headers.get(*name).and_then(|v| v.to_str().ok()))
}

pub fn outcome_body(outcome: ReconcileOutcome) -> &'static str {
    match outcome {
        ReconcileOutcome::Updated => "Updated",
        ReconcileOutcome::AlreadyProcessed => "Already Processed",
        ReconcileOutcome::LockContended => "Processing in parallel",
    }
}

/// Status-code contract with the gateway: 2xx/4xx stop redelivery, 5xx
/// triggers it. Amount mismatches and store failures are deliberately 5xx.
pub fn status_for(err: &ReconcileError) -> StatusCode {
    match err {
        ReconcileError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
        ReconcileError::MissingSignature | ReconcileError::InvalidSignature => {
            StatusCode::UNAUTHORIZED
        }
        ReconcileError::OrderNotFound { .. } => StatusCode::NOT_FOUND,
        ReconcileError::AmountMismatch { .. } | ReconcileError::Store(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(err: &ReconcileError) -> Response {
    let status = status_for(err);
    if status.is_server_error() {
        tracing::error!("webhook reconciliation failed: {err:#}");
    } else {
        tracing::warn!("webhook rejected: {err}");
    }
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
        .into_response()
}
