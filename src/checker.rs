//! Health Checker Layer
//!
//! Probes endpoints and collapses every outcome to UP or DOWN. The cause of
//! a DOWN result is kept in [`ProbeOutcome`] for logging only.
//!
//! # Architecture
//!
//! - [`HealthCheck`]: Seam the scheduler probes through
//! - [`HttpChecker`]: One bounded-latency HTTP request per call
//! - [`classify`]: Status and latency policy
//!
//! # Example
//!
//! ```rust,no_run
//! use vigil::{EndpointDescriptor, Health, HealthCheck, HttpChecker, MonitorConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let checker = HttpChecker::new(&MonitorConfig::default())?;
//! let endpoint = EndpointDescriptor::new("https://example.com/health");
//! if checker.check(&endpoint).await == Health::Up {
//!     println!("healthy");
//! }
//! # Ok(())
//! # }
//! ```

mod http;
mod traits;

pub use http::HttpChecker;
pub use traits::{CheckerError, Health, HealthCheck, ProbeFailure, ProbeOutcome, classify};
