//! Vigil - HTTP Availability Monitor
//!
//! This crate provides the monitoring loop behind the `vigil` binary. It
//! can be embedded in other Rust programs, or run standalone against a
//! YAML endpoint file.
//!
//! # Architecture
//!
//! - **Config**: Endpoint descriptors loaded from YAML, monitor settings
//! - **Domain**: URL to bare-host aggregation key
//! - **Checker**: One bounded-latency HTTP probe, classified UP or DOWN
//! - **Aggregator**: Cumulative per-domain availability counters
//! - **Scheduler**: Fixed-period cycles with drift correction and cancellation
//!
//! # Example
//!
//! ```rust,no_run
//! use vigil::{EndpointsConfig, HttpChecker, MonitorConfig, Scheduler};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let endpoints = EndpointsConfig::load("endpoints.yaml")?;
//!     let config = MonitorConfig::default();
//!     let checker = HttpChecker::new(&config)?;
//!
//!     let mut scheduler = Scheduler::new(endpoints.into_endpoints(), checker, config);
//!     let token = CancellationToken::new();
//!     scheduler.run(&token, &mut std::io::stdout()).await?;
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod checker;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod scheduler;

pub use aggregator::{Aggregator, DomainAvailability, DomainStats};
pub use checker::{
    CheckerError, Health, HealthCheck, HttpChecker, ProbeFailure, ProbeOutcome, classify,
};
pub use config::{ConfigError, EndpointDescriptor, EndpointsConfig, HttpMethod, MonitorConfig};
pub use domain::extract_domain;
pub use error::MonitorError;
pub use scheduler::{Report, Scheduler, SchedulerState, next_delay};
