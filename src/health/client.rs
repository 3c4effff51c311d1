// src/health/client.rs
use super::error::TransportError;
use super::target::Target;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// What the check gets to see of an HTTP exchange.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body_len: usize,
    pub elapsed: Duration,
}

impl HttpResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            body_len: 0,
            elapsed: Duration::ZERO,
        }
    }
}

/// Capability to perform a single GET against a target.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, target: &Target) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<C: HttpClient + ?Sized> HttpClient for std::sync::Arc<C> {
    async fn get(&self, target: &Target) -> Result<HttpResponse, TransportError> {
        (**self).get(target).await
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
    timeout: Duration,
}

impl ReqwestClient {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, target: &Target) -> Result<HttpResponse, TransportError> {
        let start = Instant::now();
        let to_transport = |e: reqwest::Error| TransportError::from_reqwest(target.as_str(), self.timeout, e);

        let response = self
            .client
            .get(target.url().clone())
            .send()
            .await
            .map_err(to_transport)?;

        let status = response.status();
        // Drain the body so the exchange is complete before we judge it
        let body = response.bytes().await.map_err(to_transport)?;
        let elapsed = start.elapsed();

        debug!(
            url = %target,
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "GET completed"
        );

        Ok(HttpResponse {
            status,
            body_len: body.len(),
            elapsed,
        })
    }
}
