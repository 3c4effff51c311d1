// src/report/summary.rs
use super::Reporter;
use crate::health::{CheckResult, TransportError};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
struct Counts {
    passes: AtomicU64,
    fails: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckTally {
    pub label: String,
    pub passes: u64,
    pub fails: u64,
}

/// In-memory tally of check results per label.
#[derive(Debug, Default)]
pub struct Summary {
    checks: DashMap<String, Counts>,
    errors: AtomicU64,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty() && self.errors() == 0
    }

    pub fn reset(&self) {
        self.checks.clear();
        self.errors.store(0, Ordering::Relaxed);
    }

    /// Sorted by label so output is stable.
    pub fn snapshot(&self) -> Vec<CheckTally> {
        let mut tallies: Vec<CheckTally> = self
            .checks
            .iter()
            .map(|entry| CheckTally {
                label: entry.key().clone(),
                passes: entry.value().passes.load(Ordering::Relaxed),
                fails: entry.value().fails.load(Ordering::Relaxed),
            })
            .collect();
        tallies.sort_by(|a, b| a.label.cmp(&b.label));
        tallies
    }
}

impl Reporter for Summary {
    fn record_check(&self, result: &CheckResult) {
        // Avoid allocating the label on the hot path once it is known
        if let Some(counts) = self.checks.get(&result.label) {
            bump(&counts, result.pass);
            return;
        }
        let counts = self.checks.entry(result.label.clone()).or_default();
        bump(&counts, result.pass);
    }

    fn record_error(&self, _error: &TransportError) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }
}

fn bump(counts: &Counts, pass: bool) {
    if pass {
        counts.passes.fetch_add(1, Ordering::Relaxed);
    } else {
        counts.fails.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(label: &str, pass: bool) -> CheckResult {
        CheckResult { label: label.to_string(), pass }
    }

    #[test]
    fn test_tallies_per_label() {
        let summary = Summary::new();
        assert!(summary.is_empty());

        summary.record_check(&result("is status 200", true));
        summary.record_check(&result("is status 200", true));
        summary.record_check(&result("is status 200", false));
        summary.record_check(&result("has body", true));

        assert_eq!(
            summary.snapshot(),
            vec![
                CheckTally { label: "has body".into(), passes: 1, fails: 0 },
                CheckTally { label: "is status 200".into(), passes: 2, fails: 1 },
            ]
        );
    }

    #[test]
    fn test_errors_are_counted_separately() {
        let summary = Summary::new();
        summary.record_error(&TransportError::Request {
            url: "http://gw:8080/api/rate".into(),
            message: "boom".into(),
        });

        assert_eq!(summary.errors(), 1);
        assert!(summary.snapshot().is_empty());
        assert!(!summary.is_empty());

        summary.reset();
        assert!(summary.is_empty());
    }
}
