//! Monitor loop settings.

use std::time::Duration;

use super::validation::ConfigError;

// =============================================================================
// Constants
// =============================================================================

/// Nominal period between cycle starts (15 seconds).
pub const DEFAULT_CYCLE_INTERVAL: Duration = Duration::from_secs(15);

/// Per-request timeout covering connect and transfer (500 milliseconds).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(500);

/// Maximum round-trip latency still classified as UP (500 milliseconds).
pub const DEFAULT_LATENCY_THRESHOLD: Duration = Duration::from_millis(500);

/// Maximum probes in flight within one cycle.
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Settings for the cycle scheduler and health checker.
///
/// The binary always runs with [`MonitorConfig::default`]; the builder
/// methods exist for embedding and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Target period from cycle start to cycle start.
    pub cycle_interval: Duration,
    /// Request timeout for a single probe.
    pub request_timeout: Duration,
    /// Latency above which a 2xx response is still DOWN.
    pub latency_threshold: Duration,
    /// Probes run concurrently within a cycle (1 = strictly sequential).
    pub concurrency: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            cycle_interval: DEFAULT_CYCLE_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            latency_threshold: DEFAULT_LATENCY_THRESHOLD,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl MonitorConfig {
    pub fn with_cycle_interval(mut self, interval: Duration) -> Self {
        self.cycle_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_latency_threshold(mut self, threshold: Duration) -> Self {
        self.latency_threshold = threshold;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns `ConfigError::Validation` if any duration is zero or concurrency is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_interval.is_zero() {
            return Err(ConfigError::validation("cycle_interval must be non-zero"));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::validation("request_timeout must be non-zero"));
        }
        if self.latency_threshold.is_zero() {
            return Err(ConfigError::validation("latency_threshold must be non-zero"));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::validation("concurrency must be positive"));
        }
        Ok(())
    }
}
