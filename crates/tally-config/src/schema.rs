//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Counter bounds
    #[serde(default)]
    pub counter: RawCounterConfig,

    /// Service settings
    #[serde(default)]
    pub service: RawServiceConfig,
}

/// Counter bounds settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawCounterConfig {
    /// Inclusive ceiling for the counter value
    pub max_count: Option<i64>,

    /// Inclusive floor for the counter value
    pub min_count: Option<i64>,
}

/// Service-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawServiceConfig {
    /// TCP address the HTTP service listens on (default: 127.0.0.1:3000)
    pub bind_addr: Option<String>,

    /// Data directory for the store
    pub data_dir: Option<PathBuf>,
}
