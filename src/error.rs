//! Top-level error type for running a monitor.

use thiserror::Error;

use crate::checker::CheckerError;
use crate::config::ConfigError;

/// Errors that stop the monitor.
///
/// Probe failures are not represented here; they are absorbed into DOWN
/// results by the checker.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Endpoint file missing, unparseable or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP client could not be constructed.
    #[error(transparent)]
    Checker(#[from] CheckerError),

    /// The report could not be written.
    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}
