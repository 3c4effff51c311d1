// src/server/handler.rs
use crate::metrics::MetricsRegistry;
use futures::future::{ready, Ready};
use hyper::{Body, Request, Response, StatusCode};
use std::sync::Arc;
use tower::Service;

/// Serves the Prometheus text format on one path, 404 everywhere else.
#[derive(Clone)]
pub struct MetricsHandler {
    registry: Arc<MetricsRegistry>,
    path: Arc<str>,
}

impl MetricsHandler {
    pub fn new(registry: Arc<MetricsRegistry>, path: &str) -> Self {
        Self {
            registry,
            path: Arc::from(path),
        }
    }

    fn respond(&self, req: &Request<Body>) -> Result<Response<Body>, hyper::http::Error> {
        if req.uri().path() != &*self.path {
            return Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Body::from("Not Found"));
        }

        match self.registry.gather() {
            Ok(metrics) => Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", "text/plain; version=0.0.4")
                .body(Body::from(metrics)),
            Err(e) => {
                tracing::error!(%e, "failed to gather metrics");
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(Body::empty())
            }
        }
    }
}

impl Service<Request<Body>> for MetricsHandler {
    type Response = Response<Body>;
    type Error = hyper::http::Error;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        ready(self.respond(&req))
    }
}
