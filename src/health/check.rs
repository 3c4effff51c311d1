// src/health/check.rs
use super::client::HttpResponse;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

type Predicate = dyn Fn(&HttpResponse) -> bool + Send + Sync;

/// Outcome of evaluating one check against one response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub label: String,
    pub pass: bool,
}

/// A named predicate over a response. Cheap to clone; compose with [`Check::and`].
#[derive(Clone)]
pub struct Check {
    label: String,
    predicate: Arc<Predicate>,
}

impl Check {
    pub fn new<F>(label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&HttpResponse) -> bool + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// `"is status <code>"`
    pub fn status_is(code: u16) -> Self {
        Self::new(format!("is status {}", code), move |response| {
            response.status.as_u16() == code
        })
    }

    pub fn and(self, other: Check) -> Self {
        let label = format!("{} and {}", self.label, other.label);
        let (left, right) = (self.predicate, other.predicate);
        Self {
            label,
            predicate: Arc::new(move |response| left(response) && right(response)),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn evaluate(&self, response: &HttpResponse) -> CheckResult {
        CheckResult {
            label: self.label.clone(),
            pass: (self.predicate)(response),
        }
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check").field("label", &self.label).finish()
    }
}
