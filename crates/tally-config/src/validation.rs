//! Configuration validation

use crate::schema::RawConfig;
use crate::settings::{DEFAULT_MAX_COUNT, DEFAULT_MIN_COUNT};
use std::net::SocketAddr;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Counter bounds invalid: max_count {max_count} must be greater than min_count {min_count}")]
    InvalidBounds { max_count: i64, min_count: i64 },

    #[error("Counter bounds [{min_count}, {max_count}] must include 0, the initial and reset value")]
    BoundsExcludeZero { max_count: i64, min_count: i64 },

    #[error("Invalid bind address '{value}': {message}")]
    InvalidBindAddr { value: String, message: String },
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let max_count = config.counter.max_count.unwrap_or(DEFAULT_MAX_COUNT);
    let min_count = config.counter.min_count.unwrap_or(DEFAULT_MIN_COUNT);

    if max_count <= min_count {
        errors.push(ValidationError::InvalidBounds {
            max_count,
            min_count,
        });
    } else if min_count > 0 || max_count < 0 {
        errors.push(ValidationError::BoundsExcludeZero {
            max_count,
            min_count,
        });
    }

    if let Some(addr) = &config.service.bind_addr
        && let Err(e) = addr.parse::<SocketAddr>()
    {
        errors.push(ValidationError::InvalidBindAddr {
            value: addr.clone(),
            message: e.to_string(),
        });
    }

    errors
}
