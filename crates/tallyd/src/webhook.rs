//! Webhook receiver for hosting-platform lifecycle events
//!
//! Fully external to the counter core: every delivery is logged and
//! acknowledged, nothing is mutated. Malformed bodies are the only failure
//! and surface as HTTP 500 with a generic error payload.

use axum::{
    Json,
    body::Bytes,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use tally_api::{VerificationStatus, WebhookAck, WebhookEvent, WebhookKind};
use tracing::{debug, error, info};

/// Handle an inbound lifecycle notification.
pub async fn receive(body: Bytes) -> Response {
    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            error!(error = %e, "Webhook error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(WebhookAck::failure("Failed to process webhook")),
            )
                .into_response();
        }
    };

    debug!(payload = %String::from_utf8_lossy(&body), "Webhook received");

    match event.kind {
        WebhookKind::FrameAdded => info!(data = ?event.data, "Frame added to user"),
        WebhookKind::FrameRemoved => info!(data = ?event.data, "Frame removed from user"),
        WebhookKind::NotificationsEnabled => {
            info!(data = ?event.data, "Notifications enabled for user");
        }
        WebhookKind::NotificationsDisabled => {
            info!(data = ?event.data, "Notifications disabled for user");
        }
        WebhookKind::Other => {
            info!(payload = %String::from_utf8_lossy(&body), "Unknown webhook type");
        }
    }

    (
        StatusCode::OK,
        Json(WebhookAck::ok("Webhook processed successfully")),
    )
        .into_response()
}

/// Handle verification requests: echo a `hub.challenge` query parameter
/// verbatim as plaintext when present, else report static status.
pub async fn verify(Query(params): Query<HashMap<String, String>>) -> Response {
    if let Some(challenge) = params.get("hub.challenge") {
        return challenge.clone().into_response();
    }

    Json(VerificationStatus::active()).into_response()
}
