//! Cumulative per-domain availability counters.
//!
//! Entries are created on the first probe of a domain, in the same call
//! that counts that probe, so a domain with `total == 0` never exists.
//! Nothing is ever reset or removed for the lifetime of the aggregator.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::checker::Health;

/// Counters for one domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomainStats {
    /// Probes classified UP.
    pub up: u64,
    /// Probes attempted.
    pub total: u64,
}

impl DomainStats {
    /// Availability as `floor(100 * up / total)`.
    ///
    /// Returns 0 for an empty entry, which the aggregator never exposes.
    pub fn availability(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        // u128 keeps 100 * up from overflowing on very long runs.
        (u128::from(self.up) * 100 / u128::from(self.total)) as u64
    }
}

/// One line of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainAvailability {
    pub domain: String,
    pub percent: u64,
}

impl std::fmt::Display for DomainAvailability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} has {}% availability percentage",
            self.domain, self.percent
        )
    }
}

#[derive(Debug, Default)]
struct Inner {
    index: HashMap<String, usize>,
    entries: Vec<(String, DomainStats)>,
}

/// Thread-safe availability aggregator.
///
/// Snapshot order is insertion order: the order in which domains were first
/// recorded.
#[derive(Debug, Default)]
pub struct Aggregator {
    inner: Mutex<Inner>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one probe of `domain`.
    pub fn record(&self, domain: &str, health: Health) {
        let mut inner = self.inner.lock();
        let Inner { index, entries } = &mut *inner;

        let slot = match index.get(domain) {
            Some(&i) => i,
            None => {
                entries.push((domain.to_string(), DomainStats::default()));
                index.insert(domain.to_string(), entries.len() - 1);
                entries.len() - 1
            }
        };

        let stats = &mut entries[slot].1;
        stats.total += 1;
        if health.is_up() {
            stats.up += 1;
        }
    }

    /// Current availability of every known domain.
    pub fn snapshot(&self) -> Vec<DomainAvailability> {
        self.inner
            .lock()
            .entries
            .iter()
            .map(|(domain, stats)| DomainAvailability {
                domain: domain.clone(),
                percent: stats.availability(),
            })
            .collect()
    }

    /// Raw counters for `domain`, if it has been probed.
    pub fn stats(&self, domain: &str) -> Option<DomainStats> {
        let inner = self.inner.lock();
        inner.index.get(domain).map(|&i| inner.entries[i].1)
    }

    /// Number of distinct domains recorded.
    pub fn domain_count(&self) -> usize {
        self.inner.lock().entries.len()
    }
}
