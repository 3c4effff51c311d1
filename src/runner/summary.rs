// src/runner/summary.rs
use crate::report::CheckTally;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub iterations: u64,
    pub configured_iterations: u64,
    pub passed: u64,
    pub failed: u64,
    pub errored: u64,
    pub checks: Vec<CheckTally>,
}

impl RunSummary {
    /// Every configured iteration ran and none failed or errored. An
    /// interrupted run never counts as a success.
    pub fn is_success(&self) -> bool {
        self.iterations == self.configured_iterations
            && self.iterations > 0
            && self.failed == 0
            && self.errored == 0
    }

    pub fn log(&self) {
        for check in &self.checks {
            if check.fails == 0 {
                info!("✓ {} ({} passed)", check.label, check.passes);
            } else {
                warn!(
                    "✗ {} ({} passed, {} failed)",
                    check.label, check.passes, check.fails
                );
            }
        }

        info!(
            run_id = %self.run_id,
            "{}/{} iterations in {} ms: {} passed, {} failed, {} errored",
            self.iterations,
            self.configured_iterations,
            self.duration_ms,
            self.passed,
            self.failed,
            self.errored
        );
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
