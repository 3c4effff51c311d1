// src/health/mod.rs
mod check;
mod client;
mod error;
mod health_check;
mod target;

pub use check::{Check, CheckResult};
pub use client::{HttpClient, HttpResponse, ReqwestClient, DEFAULT_TIMEOUT};
pub use error::{TargetError, TransportError};
pub use health_check::HealthCheck;
pub use target::{Target, DEFAULT_TARGET};
