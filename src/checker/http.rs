//! HTTP endpoint health checker.
//!
//! Issues one request per call and classifies it as UP or DOWN from the
//! response status and the measured round-trip latency.

use std::time::Duration;

use reqwest::Client;
use tokio::time::{Instant, timeout};

use crate::checker::{CheckerError, HealthCheck, ProbeFailure, ProbeOutcome, classify};
use crate::config::{EndpointDescriptor, MonitorConfig};

/// HTTP health checker backed by a shared connection pool.
#[derive(Clone)]
pub struct HttpChecker {
    client: Client,
    request_timeout: Duration,
    latency_threshold: Duration,
}

impl HttpChecker {
    /// Create a checker using the timeout and latency threshold from `config`.
    ///
    /// # Errors
    /// Returns `CheckerError::Client` if the HTTP client cannot be built.
    pub fn new(config: &MonitorConfig) -> Result<Self, CheckerError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("vigil/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            request_timeout: config.request_timeout,
            latency_threshold: config.latency_threshold,
        })
    }

    fn build_request(&self, endpoint: &EndpointDescriptor) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .request(endpoint.method.to_reqwest(), &endpoint.url);

        for (key, value) in &endpoint.headers {
            request = request.header(key.as_str(), value.as_str());
        }

        // Keeps a configured content-type; only fills it in when absent.
        if let Some(body) = &endpoint.body {
            request = request.json(body);
        }

        request
    }
}

impl std::fmt::Debug for HttpChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpChecker")
            .field("request_timeout", &self.request_timeout)
            .field("latency_threshold", &self.latency_threshold)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl HealthCheck for HttpChecker {
    async fn probe(&self, endpoint: &EndpointDescriptor) -> ProbeOutcome {
        let request = self.build_request(endpoint);

        let start = Instant::now();
        let result = timeout(self.request_timeout, async {
            let response = request.send().await?;
            let status = response.status().as_u16();
            // Drain the body so latency covers the full transfer.
            response.bytes().await?;
            Ok::<u16, reqwest::Error>(status)
        })
        .await;
        let elapsed = start.elapsed();

        let outcome = match result {
            Ok(Ok(status)) => classify(status, elapsed, self.latency_threshold),
            Ok(Err(e)) if e.is_timeout() => ProbeOutcome::down(ProbeFailure::Timeout, None, elapsed),
            Ok(Err(e)) => ProbeOutcome::down(ProbeFailure::Transport(e.to_string()), None, elapsed),
            Err(_) => ProbeOutcome::down(ProbeFailure::Timeout, None, elapsed),
        };

        match &outcome.failure {
            None => tracing::debug!(
                endpoint = %endpoint.label(),
                url = %endpoint.url,
                method = %endpoint.method,
                latency_ms = elapsed.as_millis() as u64,
                status = outcome.status,
                "Probe UP"
            ),
            Some(failure) => tracing::warn!(
                endpoint = %endpoint.label(),
                url = %endpoint.url,
                method = %endpoint.method,
                latency_ms = elapsed.as_millis() as u64,
                status = outcome.status,
                cause = %failure,
                "Probe DOWN"
            ),
        }

        outcome
    }
}
