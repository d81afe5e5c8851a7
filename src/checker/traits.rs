//! Core checker traits and result types.

use std::time::Duration;

use thiserror::Error;

use crate::config::EndpointDescriptor;

/// Errors raised while constructing a checker.
///
/// Probing itself has no error channel; see [`HealthCheck`].
#[derive(Debug, Error)]
pub enum CheckerError {
    /// The HTTP client could not be built (TLS backend, resolver, ...).
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Two-valued classification of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Health {
    Up,
    Down,
}

impl Health {
    pub fn is_up(self) -> bool {
        matches!(self, Self::Up)
    }
}

impl std::fmt::Display for Health {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => f.write_str("UP"),
            Self::Down => f.write_str("DOWN"),
        }
    }
}

/// Why a probe was classified DOWN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// Request did not complete within the request timeout.
    Timeout,
    /// Connection, DNS, TLS or protocol failure.
    Transport(String),
    /// Response status outside `[200, 300)`.
    BadStatus(u16),
    /// 2xx response slower than the latency threshold.
    Slow(Duration),
}

impl std::fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => f.write_str("timed out"),
            Self::Transport(e) => write!(f, "transport error: {}", e),
            Self::BadStatus(status) => write!(f, "unexpected status {}", status),
            Self::Slow(latency) => write!(f, "slow response ({}ms)", latency.as_millis()),
        }
    }
}

/// Full result of one probe, including the diagnostic cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub health: Health,
    /// Response status, when a response was received.
    pub status: Option<u16>,
    /// Wall-clock time from request start to response completion.
    pub latency: Duration,
    /// Failure cause; `None` iff `health` is UP.
    pub failure: Option<ProbeFailure>,
}

impl ProbeOutcome {
    pub fn up(status: u16, latency: Duration) -> Self {
        Self {
            health: Health::Up,
            status: Some(status),
            latency,
            failure: None,
        }
    }

    pub fn down(failure: ProbeFailure, status: Option<u16>, latency: Duration) -> Self {
        Self {
            health: Health::Down,
            status,
            latency,
            failure: Some(failure),
        }
    }
}

/// Classify a completed response.
///
/// UP iff `status` is in `[200, 300)` and `latency <= threshold`. A bad
/// status is reported before slowness when both apply.
pub fn classify(status: u16, latency: Duration, threshold: Duration) -> ProbeOutcome {
    if !(200..300).contains(&status) {
        ProbeOutcome::down(ProbeFailure::BadStatus(status), Some(status), latency)
    } else if latency > threshold {
        ProbeOutcome::down(ProbeFailure::Slow(latency), Some(status), latency)
    } else {
        ProbeOutcome::up(status, latency)
    }
}

/// Health check seam used by the scheduler.
///
/// # Error Handling Philosophy
///
/// Implementations never fail. Unreachable targets, timeouts, bad statuses
/// and slow responses are all valid observations and come back as
/// [`Health::Down`] with the cause in [`ProbeOutcome::failure`]. One bad
/// endpoint must never stop monitoring of the others.
#[async_trait::async_trait]
pub trait HealthCheck: Send + Sync + 'static {
    /// Issue exactly one request for `endpoint` and classify it.
    async fn probe(&self, endpoint: &EndpointDescriptor) -> ProbeOutcome;

    /// Classify `endpoint`, discarding diagnostics.
    async fn check(&self, endpoint: &EndpointDescriptor) -> Health {
        self.probe(endpoint).await.health
    }
}

#[async_trait::async_trait]
impl<T: HealthCheck + ?Sized> HealthCheck for std::sync::Arc<T> {
    async fn probe(&self, endpoint: &EndpointDescriptor) -> ProbeOutcome {
        (**self).probe(endpoint).await
    }
}
