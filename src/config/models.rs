// src/config/models.rs
use crate::health::{Target, DEFAULT_TIMEOUT};
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub target: Target,
    pub expected_status: ExpectedStatus,
    pub http: HttpConfig,
    pub run: RunConfig,
    pub metrics: MetricsConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ExpectedStatus(pub u16);

impl Default for ExpectedStatus {
    fn default() -> Self {
        Self(200)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    pub vus: usize,
    pub iterations: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            vus: 1,
            iterations: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub port: u16,
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 9102,
            path: "/metrics".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Where to write the JSON run summary, if anywhere.
    pub summary_path: Option<PathBuf>,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (100..=599).contains(&self.expected_status.0),
            "expected_status must be a valid HTTP status code, got {}",
            self.expected_status.0
        );
        ensure!(self.http.timeout_secs > 0, "http.timeout_secs must be greater than 0");
        ensure!(self.run.vus > 0, "run.vus must be at least 1");
        ensure!(self.run.iterations > 0, "run.iterations must be at least 1");

        if self.metrics.enabled {
            ensure!(
                self.metrics.path.starts_with('/'),
                "metrics.path must start with '/', got {:?}",
                self.metrics.path
            );
        }

        if self.run.vus as u64 > self.run.iterations {
            tracing::warn!(
                "run.vus ({}) exceeds run.iterations ({}); only {} VUs will be started",
                self.run.vus,
                self.run.iterations,
                self.run.iterations
            );
        }

        Ok(())
    }
}
