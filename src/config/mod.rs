//! Configuration module for Vigil.
//!
//! Provides YAML-based endpoint loading and validation, plus the fixed
//! monitor loop settings:
//! - Endpoint descriptors (url, method, headers, body)
//! - Cycle interval, request timeout, latency threshold, probe concurrency

mod endpoint;
mod monitor;
mod validation;

pub use endpoint::{EndpointDescriptor, EndpointsConfig, HttpMethod};
pub use monitor::MonitorConfig;
pub use validation::{ConfigError, expand_env_vars};

// Re-export constants
pub use monitor::{
    DEFAULT_CONCURRENCY, DEFAULT_CYCLE_INTERVAL, DEFAULT_LATENCY_THRESHOLD,
    DEFAULT_REQUEST_TIMEOUT,
};
