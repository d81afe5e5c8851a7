//! Cycle scheduler.
//!
//! Drives rounds of "probe every endpoint, record, report, sleep to the
//! next boundary" until cancelled. The period is measured from cycle start
//! to cycle start; an over-long cycle is followed immediately by the next
//! one, with no catch-up for drift carried over from earlier cycles.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::aggregator::{Aggregator, DomainAvailability};
use crate::checker::{Health, HealthCheck};
use crate::config::{EndpointDescriptor, MonitorConfig};
use crate::domain::extract_domain;
use crate::error::MonitorError;

/// Separator printed after each cycle's domain lines.
pub const CYCLE_SEPARATOR: &str = "---";

/// Final line printed when monitoring is cancelled.
pub const STOPPED_NOTICE: &str = "Monitoring stopped by user.";

/// Scheduler lifecycle. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Stopped,
}

/// Availability of every known domain after one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// 1-based cycle number.
    pub cycle: u64,
    pub domains: Vec<DomainAvailability>,
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for domain in &self.domains {
            writeln!(f, "{}", domain)?;
        }
        f.write_str(CYCLE_SEPARATOR)
    }
}

/// Time to sleep after a cycle that took `elapsed`.
///
/// Zero when probing alone used up the whole interval.
pub fn next_delay(elapsed: Duration, interval: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}

/// Runs monitoring cycles over a fixed endpoint list.
pub struct Scheduler<C> {
    endpoints: Vec<EndpointDescriptor>,
    checker: C,
    aggregator: Arc<Aggregator>,
    config: MonitorConfig,
    state: SchedulerState,
    cycles: u64,
}

impl<C: HealthCheck> Scheduler<C> {
    /// Create a scheduler with a fresh aggregator.
    pub fn new(endpoints: Vec<EndpointDescriptor>, checker: C, config: MonitorConfig) -> Self {
        Self::with_aggregator(endpoints, checker, config, Arc::new(Aggregator::new()))
    }

    /// Create a scheduler recording into an existing aggregator.
    pub fn with_aggregator(
        endpoints: Vec<EndpointDescriptor>,
        checker: C,
        config: MonitorConfig,
        aggregator: Arc<Aggregator>,
    ) -> Self {
        Self {
            endpoints,
            checker,
            aggregator,
            config,
            state: SchedulerState::Running,
            cycles: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Number of cycles that completed and reported.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn aggregator(&self) -> &Arc<Aggregator> {
        &self.aggregator
    }

    /// Probe every endpoint once, record the results and build the report.
    ///
    /// Returns `None` without recording anything if `token` is cancelled
    /// before all probes of the cycle have finished.
    pub async fn run_cycle(&mut self, token: &CancellationToken) -> Option<Report> {
        let results = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            results = self.probe_all() => Some(results),
        };
        let results = results?;

        // Recorded after the barrier, in configured order.
        let up = results.iter().filter(|(_, health)| health.is_up()).count();
        for (domain, health) in &results {
            self.aggregator.record(domain, *health);
        }

        self.cycles += 1;
        tracing::debug!(
            cycle = self.cycles,
            endpoints = results.len(),
            up,
            down = results.len() - up,
            "Cycle probes recorded"
        );

        Some(Report {
            cycle: self.cycles,
            domains: self.aggregator.snapshot(),
        })
    }

    /// Run cycles until `token` is cancelled, writing each report to `out`.
    ///
    /// Writes [`STOPPED_NOTICE`] on cancellation and returns the number of
    /// completed cycles.
    ///
    /// # Errors
    /// Returns `MonitorError::Output` if `out` cannot be written.
    pub async fn run<W: Write>(
        &mut self,
        token: &CancellationToken,
        out: &mut W,
    ) -> Result<u64, MonitorError> {
        tracing::info!(
            endpoints = self.endpoints.len(),
            interval_ms = self.config.cycle_interval.as_millis() as u64,
            concurrency = self.config.concurrency,
            "Monitoring started"
        );

        while self.state == SchedulerState::Running {
            let cycle_start = Instant::now();

            let Some(report) = self.run_cycle(token).await else {
                self.stop();
                break;
            };
            writeln!(out, "{}", report)?;
            out.flush()?;

            let elapsed = cycle_start.elapsed();
            let delay = next_delay(elapsed, self.config.cycle_interval);
            if delay.is_zero() {
                tracing::warn!(
                    cycle = report.cycle,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Cycle overran interval, starting next cycle immediately"
                );
            } else {
                tracing::debug!(
                    cycle = report.cycle,
                    elapsed_ms = elapsed.as_millis() as u64,
                    sleep_ms = delay.as_millis() as u64,
                    "Cycle complete"
                );
            }

            tokio::select! {
                biased;
                _ = token.cancelled() => self.stop(),
                _ = tokio::time::sleep(delay) => {}
            }
        }

        writeln!(out, "{}", STOPPED_NOTICE)?;
        out.flush()?;
        Ok(self.cycles)
    }

    fn stop(&mut self) {
        if self.state == SchedulerState::Running {
            tracing::info!(cycles = self.cycles, "Monitoring stopped");
        }
        self.state = SchedulerState::Stopped;
    }

    async fn probe_all(&self) -> Vec<(String, Health)> {
        let checker = &self.checker;
        stream::iter(&self.endpoints)
            .map(|endpoint| async move {
                let domain = extract_domain(&endpoint.url);
                let health = checker.check(endpoint).await;
                (domain, health)
            })
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await
    }
}

impl<C> std::fmt::Debug for Scheduler<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("endpoints", &self.endpoints.len())
            .field("config", &self.config)
            .field("state", &self.state)
            .field("cycles", &self.cycles)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::DomainStats;
    use crate::checker::{ProbeFailure, ProbeOutcome};
    use parking_lot::Mutex;
    use std::collections::{HashMap, VecDeque};

    /// Checker replaying scripted results per URL after a fixed delay.
    #[derive(Default)]
    struct ScriptedChecker {
        script: Mutex<HashMap<String, VecDeque<Health>>>,
        delay: Duration,
        calls: Mutex<Vec<(String, Instant)>>,
    }

    impl ScriptedChecker {
        fn new(delay: Duration) -> Self {
            Self {
                delay,
                ..Self::default()
            }
        }

        fn script(self, url: &str, results: &[Health]) -> Self {
            self.script
                .lock()
                .insert(url.to_string(), results.iter().copied().collect());
            self
        }
    }

    #[async_trait::async_trait]
    impl HealthCheck for ScriptedChecker {
        async fn probe(&self, endpoint: &EndpointDescriptor) -> ProbeOutcome {
            self.calls.lock().push((endpoint.url.clone(), Instant::now()));
            tokio::time::sleep(self.delay).await;
            let health = self
                .script
                .lock()
                .get_mut(&endpoint.url)
                .and_then(VecDeque::pop_front)
                .unwrap_or(Health::Up);
            match health {
                Health::Up => ProbeOutcome::up(200, self.delay),
                Health::Down => ProbeOutcome::down(ProbeFailure::BadStatus(503), Some(503), self.delay),
            }
        }
    }

    fn endpoints(urls: &[&str]) -> Vec<EndpointDescriptor> {
        urls.iter().map(|u| EndpointDescriptor::new(*u)).collect()
    }

    fn sequential() -> MonitorConfig {
        MonitorConfig::default().with_concurrency(1)
    }

    #[test]
    fn test_next_delay() {
        let interval = Duration::from_secs(15);
        assert_eq!(next_delay(Duration::from_secs(2), interval), Duration::from_secs(13));
        assert_eq!(next_delay(Duration::from_secs(15), interval), Duration::ZERO);
        assert_eq!(next_delay(Duration::from_secs(16), interval), Duration::ZERO);
        assert_eq!(next_delay(Duration::ZERO, interval), interval);
    }

    #[test]
    fn test_report_display() {
        let report = Report {
            cycle: 1,
            domains: vec![
                DomainAvailability {
                    domain: "fetch.com".to_string(),
                    percent: 33,
                },
                DomainAvailability {
                    domain: "www.fetchrewards.com".to_string(),
                    percent: 100,
                },
            ],
        };
        assert_eq!(
            report.to_string(),
            "fetch.com has 33% availability percentage\n\
             www.fetchrewards.com has 100% availability percentage\n\
             ---"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_cycle_scenario() {
        use Health::{Down, Up};

        let checker = ScriptedChecker::new(Duration::from_millis(100))
            .script("https://svc.test/a", &[Up, Up])
            .script("https://svc.test:8443/b", &[Up, Down]);
        let mut scheduler = Scheduler::new(
            endpoints(&["https://svc.test/a", "https://svc.test:8443/b"]),
            checker,
            sequential(),
        );
        let token = CancellationToken::new();

        let first = scheduler.run_cycle(&token).await.unwrap();
        assert_eq!(first.to_string(), "svc.test has 100% availability percentage\n---");

        let second = scheduler.run_cycle(&token).await.unwrap();
        assert_eq!(second.cycle, 2);
        assert_eq!(second.to_string(), "svc.test has 75% availability percentage\n---");
        assert_eq!(
            scheduler.aggregator().stats("svc.test"),
            Some(DomainStats { up: 3, total: 4 })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleeps_to_next_boundary() {
        let checker = Arc::new(ScriptedChecker::new(Duration::from_secs(2)));
        let mut scheduler = Scheduler::new(
            endpoints(&["https://a.test/"]),
            Arc::clone(&checker),
            sequential(),
        );

        let token = CancellationToken::new();
        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(40)).await;
            cancel.cancel();
        });

        let mut out = Vec::new();
        let cycles = scheduler.run(&token, &mut out).await.unwrap();
        assert_eq!(cycles, 3);

        let starts: Vec<Instant> = checker.calls.lock().iter().map(|(_, t)| *t).collect();
        assert_eq!(starts.len(), 3);
        for pair in starts.windows(2) {
            let period = pair[1] - pair[0];
            assert!(
                period >= Duration::from_secs(15) && period < Duration::from_millis(15_050),
                "unexpected period {:?}",
                period
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlong_cycle_starts_next_immediately() {
        let checker = Arc::new(ScriptedChecker::new(Duration::from_secs(16)));
        let mut scheduler = Scheduler::new(
            endpoints(&["https://a.test/"]),
            Arc::clone(&checker),
            sequential(),
        );

        let token = CancellationToken::new();
        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(40)).await;
            cancel.cancel();
        });

        let mut out = Vec::new();
        scheduler.run(&token, &mut out).await.unwrap();

        let starts: Vec<Instant> = checker.calls.lock().iter().map(|(_, t)| *t).collect();
        assert!(starts.len() >= 2);
        let period = starts[1] - starts[0];
        assert!(
            period >= Duration::from_secs(16) && period < Duration::from_millis(16_050),
            "unexpected period {:?}",
            period
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_output_and_stop_notice() {
        use Health::{Down, Up};

        let checker = ScriptedChecker::new(Duration::from_millis(100))
            .script("https://svc.test/a", &[Up, Up])
            .script("https://svc.test/b", &[Up, Down])
            .script("https://other.test/", &[Down, Down]);
        let mut scheduler = Scheduler::new(
            endpoints(&["https://svc.test/a", "https://svc.test/b", "https://other.test/"]),
            checker,
            sequential(),
        );

        let token = CancellationToken::new();
        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(20)).await;
            cancel.cancel();
        });

        let mut out = Vec::new();
        let cycles = scheduler.run(&token, &mut out).await.unwrap();
        assert_eq!(cycles, 2);
        assert_eq!(scheduler.state(), SchedulerState::Stopped);

        let output = String::from_utf8(out).unwrap();
        assert_eq!(
            output,
            "svc.test has 100% availability percentage\n\
             other.test has 0% availability percentage\n\
             ---\n\
             svc.test has 75% availability percentage\n\
             other.test has 0% availability percentage\n\
             ---\n\
             Monitoring stopped by user.\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_probes_records_nothing() {
        let mut scheduler = Scheduler::new(
            endpoints(&["https://a.test/", "https://b.test/"]),
            ScriptedChecker::new(Duration::from_secs(10)),
            MonitorConfig::default(),
        );

        let token = CancellationToken::new();
        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            cancel.cancel();
        });

        let started = Instant::now();
        let mut out = Vec::new();
        let cycles = scheduler.run(&token, &mut out).await.unwrap();

        assert_eq!(cycles, 0);
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(scheduler.aggregator().domain_count(), 0);
        assert_eq!(String::from_utf8(out).unwrap(), "Monitoring stopped by user.\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_keeps_previous_statistics() {
        let aggregator = Arc::new(Aggregator::new());
        let mut scheduler = Scheduler::with_aggregator(
            endpoints(&["https://a.test/"]),
            ScriptedChecker::new(Duration::from_secs(1))
                .script("https://a.test/", &[Health::Up, Health::Down]),
            sequential(),
            Arc::clone(&aggregator),
        );

        let token = CancellationToken::new();
        let cancel = token.clone();
        tokio::spawn(async move {
            // Lands in the middle of the second cycle's probe.
            tokio::time::sleep(Duration::from_millis(15_500)).await;
            cancel.cancel();
        });

        let mut out = Vec::new();
        scheduler.run(&token, &mut out).await.unwrap();

        assert_eq!(
            aggregator.stats("a.test"),
            Some(DomainStats { up: 1, total: 1 })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_parallel_probes_share_one_cycle_window() {
        let checker = Arc::new(ScriptedChecker::new(Duration::from_secs(1)));
        let urls: Vec<String> = (0..8).map(|i| format!("https://n{}.test/", i)).collect();
        let url_refs: Vec<&str> = urls.iter().map(String::as_str).collect();
        let mut scheduler = Scheduler::new(
            endpoints(&url_refs),
            Arc::clone(&checker),
            MonitorConfig::default().with_concurrency(8),
        );

        let started = Instant::now();
        let report = scheduler.run_cycle(&CancellationToken::new()).await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(checker.calls.lock().len(), 8);
        // Snapshot follows configured order regardless of completion order.
        let domains: Vec<_> = report.domains.iter().map(|d| d.domain.as_str()).collect();
        assert_eq!(domains, vec![
            "n0.test", "n1.test", "n2.test", "n3.test", "n4.test", "n5.test", "n6.test",
            "n7.test"
        ]);
    }
}
