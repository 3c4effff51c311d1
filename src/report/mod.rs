// src/report/mod.rs
mod summary;

pub use summary::{CheckTally, Summary};

use crate::health::{CheckResult, HttpResponse, TransportError};
use std::sync::Arc;

/// Collects the outcome of every check. Implementations must be cheap and
/// non-blocking; they are called from every VU.
pub trait Reporter: Send + Sync {
    fn record_check(&self, result: &CheckResult);

    fn record_response(&self, _response: &HttpResponse) {}

    fn record_error(&self, _error: &TransportError) {}
}

/// Fan-out to several reporters.
impl Reporter for Vec<Arc<dyn Reporter>> {
    fn record_check(&self, result: &CheckResult) {
        for reporter in self {
            reporter.record_check(result);
        }
    }

    fn record_response(&self, response: &HttpResponse) {
        for reporter in self {
            reporter.record_response(response);
        }
    }

    fn record_error(&self, error: &TransportError) {
        for reporter in self {
            reporter.record_error(error);
        }
    }
}
