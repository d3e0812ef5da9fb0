//! Shared utilities for tally
//!
//! This crate provides:
//! - ID types (HistoryId)
//! - Time utilities (wall-clock reads, human-readable ages)
//! - Default paths for config and data directories

mod ids;
mod paths;
mod time;

pub use ids::*;
pub use paths::*;
pub use time::*;
