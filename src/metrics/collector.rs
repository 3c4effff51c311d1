// src/metrics/collector.rs
use crate::health::{CheckResult, HttpResponse, TransportError};
use crate::report::Reporter;
use anyhow::{Context, Result};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    /// Prometheus text exposition of everything registered.
    pub fn gather(&self) -> Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .context("Failed to encode metrics")?;
        Ok(buffer)
    }
}

pub struct MetricsCollector {
    pub checks_total: IntCounterVec,
    pub http_req_duration_seconds: HistogramVec,
    pub transport_errors_total: IntCounterVec,
    pub vus: IntGauge,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let checks_total = IntCounterVec::new(
            Opts::new("smoke_checks_total", "Check results by label and outcome"),
            &["check", "result"],
        )?;
        registry.register(Box::new(checks_total.clone()))?;

        let http_req_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "smoke_http_req_duration_seconds",
                "Duration of completed HTTP exchanges in seconds",
            ),
            &["status"],
        )?;
        registry.register(Box::new(http_req_duration_seconds.clone()))?;

        let transport_errors_total = IntCounterVec::new(
            Opts::new(
                "smoke_transport_errors_total",
                "HTTP exchanges that failed before a response arrived",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(transport_errors_total.clone()))?;

        let vus = IntGauge::new("smoke_vus", "Configured number of virtual users")?;
        registry.register(Box::new(vus.clone()))?;

        Ok(Self {
            checks_total,
            http_req_duration_seconds,
            transport_errors_total,
            vus,
        })
    }

    pub fn set_vus(&self, vus: usize) {
        self.vus.set(vus as i64);
    }
}

impl Reporter for MetricsCollector {
    fn record_check(&self, result: &CheckResult) {
        let outcome = if result.pass { "pass" } else { "fail" };
        self.checks_total
            .with_label_values(&[result.label.as_str(), outcome])
            .inc();
    }

    fn record_response(&self, response: &HttpResponse) {
        let status = response.status.as_u16().to_string();
        self.http_req_duration_seconds
            .with_label_values(&[status.as_str()])
            .observe(response.elapsed.as_secs_f64());
    }

    fn record_error(&self, error: &TransportError) {
        self.transport_errors_total
            .with_label_values(&[error.kind()])
            .inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::time::Duration;

    #[test]
    fn test_reporter_feeds_prometheus() {
        let registry = MetricsRegistry::new().unwrap();
        let metrics = registry.collector();

        metrics.record_check(&CheckResult { label: "is status 200".into(), pass: true });
        metrics.record_check(&CheckResult { label: "is status 200".into(), pass: false });
        metrics.record_response(&HttpResponse {
            status: StatusCode::OK,
            body_len: 2,
            elapsed: Duration::from_millis(15),
        });
        metrics.record_error(&TransportError::Timeout {
            url: "http://gw:8080/api/rate".into(),
            timeout: Duration::from_secs(1),
        });
        metrics.set_vus(3);

        assert_eq!(
            metrics.checks_total.with_label_values(&["is status 200", "pass"]).get(),
            1
        );
        assert_eq!(metrics.transport_errors_total.with_label_values(&["timeout"]).get(), 1);

        let text = String::from_utf8(registry.gather().unwrap()).unwrap();
        assert!(text.contains("smoke_checks_total"));
        assert!(text.contains("smoke_http_req_duration_seconds_count{status=\"200\"} 1"));
        assert!(text.contains("smoke_vus 3"));
    }
}
