// src/health/health_check.rs
use super::check::{Check, CheckResult};
use super::client::HttpClient;
use super::error::TransportError;
use super::target::Target;
use crate::report::Reporter;
use std::sync::Arc;
use tracing::{debug, warn};

/// One GET, one check, one reported result.
///
/// Stateless apart from its collaborators, so a single instance can be shared
/// by any number of concurrent callers.
pub struct HealthCheck<C> {
    client: C,
    check: Check,
    reporter: Arc<dyn Reporter>,
}

impl<C: HttpClient> HealthCheck<C> {
    pub fn new(client: C, check: Check, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            client,
            check,
            reporter,
        }
    }

    pub fn check(&self) -> &Check {
        &self.check
    }

    /// Transport failures are returned to the caller untouched and nothing is
    /// reported for them; only a completed exchange yields a `CheckResult`.
    pub async fn run(&self, target: &Target) -> Result<CheckResult, TransportError> {
        let response = self.client.get(target).await?;
        let result = self.check.evaluate(&response);

        self.reporter.record_response(&response);
        self.reporter.record_check(&result);

        if result.pass {
            debug!(url = %target, check = %result.label, "check passed");
        } else {
            warn!(
                url = %target,
                check = %result.label,
                status = response.status.as_u16(),
                "check failed"
            );
        }

        Ok(result)
    }
}
