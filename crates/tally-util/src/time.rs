//! Time utilities for tally
//!
//! Wall-clock reads go through [`now`] so every timestamp in the system
//! comes from the same place, and history ages render through
//! [`format_time_ago`].

use chrono::{DateTime, Local};

/// Get the current local time.
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Format how long ago `then` was, relative to `now`, in coarse
/// human-readable units.
pub fn format_time_ago_at(then: &DateTime<Local>, now: &DateTime<Local>) -> String {
    let elapsed = now.signed_duration_since(then);
    let secs = elapsed.num_seconds().max(0);

    if secs < 60 {
        "just now".to_string()
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86400)
    }
}

/// Format how long ago `then` was, relative to the current time.
pub fn format_time_ago(then: &DateTime<Local>) -> String {
    format_time_ago_at(then, &now())
}
