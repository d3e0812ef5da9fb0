//! Webhook payloads and acknowledgements
//!
//! The hosting platform posts lifecycle notifications with a `type`
//! discriminator; unknown types are accepted and logged like any other.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Application name reported by the verification endpoint
pub const APP_NAME: &str = "Tally Counter";

/// Lifecycle event kinds the hosting platform sends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookKind {
    FrameAdded,
    FrameRemoved,
    NotificationsEnabled,
    NotificationsDisabled,
    #[serde(other)]
    Other,
}

/// Inbound webhook notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub kind: WebhookKind,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Acknowledgement returned for every webhook delivery.
///
/// Success carries `message`, failure carries `error`; the other field is
/// omitted from the JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAck {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Local>,
}

impl WebhookAck {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
            timestamp: tally_util::now(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            timestamp: tally_util::now(),
        }
    }
}

/// Status body for the verification endpoint when no challenge is present
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationStatus {
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub app: String,
}

impl VerificationStatus {
    pub fn active() -> Self {
        Self {
            message: "Webhook endpoint is active".to_string(),
            timestamp: tally_util::now(),
            app: APP_NAME.to_string(),
        }
    }
}
