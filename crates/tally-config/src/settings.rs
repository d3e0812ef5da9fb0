//! Resolved configuration

use crate::schema::RawConfig;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default inclusive ceiling for the counter value
pub const DEFAULT_MAX_COUNT: i64 = 999_999;

/// Default inclusive floor for the counter value
pub const DEFAULT_MIN_COUNT: i64 = -999_999;

/// Default listen address for the HTTP service
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Fully resolved configuration with defaults applied
#[derive(Debug, Clone)]
pub struct Settings {
    pub counter: CounterLimits,
    pub service: ServiceSettings,
}

/// Inclusive bounds for the counter value, fixed for the store's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterLimits {
    pub max_count: i64,
    pub min_count: i64,
}

impl Default for CounterLimits {
    fn default() -> Self {
        Self {
            max_count: DEFAULT_MAX_COUNT,
            min_count: DEFAULT_MIN_COUNT,
        }
    }
}

/// Service settings
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            // DEFAULT_BIND_ADDR is a literal that always parses
            bind_addr: DEFAULT_BIND_ADDR.parse().unwrap(),
            data_dir: tally_util::data_dir_without_env(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            counter: CounterLimits::default(),
            service: ServiceSettings::default(),
        }
    }
}

impl Settings {
    /// Convert a validated raw config, applying defaults for absent fields.
    pub fn from_raw(raw: RawConfig) -> Self {
        let defaults = ServiceSettings::default();

        Self {
            counter: CounterLimits {
                max_count: raw.counter.max_count.unwrap_or(DEFAULT_MAX_COUNT),
                min_count: raw.counter.min_count.unwrap_or(DEFAULT_MIN_COUNT),
            },
            service: ServiceSettings {
                // Validation guarantees the address parses
                bind_addr: raw
                    .service
                    .bind_addr
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.bind_addr),
                data_dir: raw.service.data_dir.unwrap_or(defaults.data_dir),
            },
        }
    }
}
