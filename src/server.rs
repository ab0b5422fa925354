//! HTTP ingestion endpoint for pub/sub deliveries.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::error::HandlerError;
use crate::pipeline::envelope::decode_envelope;
use crate::pipeline::processor::EventHandler;

/// Build the router serving `POST /events` and `GET /health`.
pub fn event_routes(handler: Arc<EventHandler>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", post(receive_events))
        .with_state(handler)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "mail-event-handler"
    }))
}

// ── Events ──────────────────────────────────────────────────────────────

async fn receive_events(
    State(handler): State<Arc<EventHandler>>,
    body: String,
) -> impl IntoResponse {
    let delivery_id = Uuid::new_v4();
    let span = info_span!("delivery", %delivery_id);

    async move {
        let envelope = match decode_envelope(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "error": e.to_string() })),
                );
            }
        };

        match handler.handle_envelope(&envelope).await {
            Ok(summary) => {
                info!(
                    records = summary.records,
                    rejected = summary.rejected.len(),
                    failures = summary.failures.len(),
                    "Delivery processed"
                );
                // Malformed records cannot succeed on redelivery.
                let status = if summary.rejected.is_empty() {
                    StatusCode::OK
                } else {
                    StatusCode::BAD_REQUEST
                };
                (status, Json(serde_json::json!(summary)))
            }
            Err(e) => {
                let status = match e {
                    HandlerError::Decode(_) => StatusCode::BAD_REQUEST,
                    HandlerError::Audit(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, Json(serde_json::json!({ "error": e.to_string() })))
            }
        }
    }
    .instrument(span)
    .await
}
