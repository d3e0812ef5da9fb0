//! Shared types for the counter state store

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tally_util::HistoryId;

/// Kind of mutation recorded in the history log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterAction {
    Increment,
    Decrement,
    Reset,
    Set,
}

/// Immutable record of one accepted mutation.
///
/// Field names match the persisted JSON blob (`previousValue`, `newValue`),
/// so the stored shape and the wire shape are the same.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: HistoryId,
    pub action: CounterAction,
    pub previous_value: i64,
    pub new_value: i64,
    pub timestamp: DateTime<Local>,
}

impl HistoryEntry {
    pub fn new(action: CounterAction, previous_value: i64, new_value: i64) -> Self {
        Self {
            id: HistoryId::new(),
            action,
            previous_value,
            new_value,
            timestamp: tally_util::now(),
        }
    }
}

/// Read snapshot of the counter state for consumers.
///
/// `history` is most-recent-first; its length is the sole gate for an
/// undo affordance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterSnapshot {
    pub count: i64,
    pub history: Vec<HistoryEntry>,
    pub max_count: i64,
    pub min_count: i64,
}

/// Statistics derived from the current state and history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterStats {
    pub current_value: i64,
    /// Number of retained history entries
    pub total_actions: usize,
    pub increments: usize,
    pub decrements: usize,
    /// Largest value observed across the current value and retained history
    pub max_value: i64,
    /// Smallest value observed across the current value and retained history
    pub min_value: i64,
    pub last_action: Option<HistoryEntry>,
    /// Human-readable age of the last action, e.g. "5m ago"
    pub last_action_age: Option<String>,
}

/// Request body for the explicit set operation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SetCountRequest {
    pub value: i64,
}

/// Health status for the service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub live: bool,
    pub store_ok: bool,
}
