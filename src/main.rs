// src/main.rs
use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use rate_smoke_check::{
    config::{self, Config},
    health::{Check, HealthCheck, ReqwestClient},
    metrics::MetricsRegistry,
    report::{Reporter, Summary},
    runner::{RunOptions, Runner},
    server::{listener::bind_tcp, MetricsHandler, ServerBuilder},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rate_smoke_check=debug".parse()?)
                .add_directive("hyper=info".parse()?),
        )
        .init();

    // Load configuration, falling back to built-in defaults
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            config::load_config(&path).await?
        }
        None => {
            info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    // Metrics are always collected; the exporter is optional
    let metrics_registry = Arc::new(MetricsRegistry::new()?);
    let metrics = metrics_registry.collector();
    metrics.set_vus(config.run.vus);

    let (exporter_tx, exporter_rx) = watch::channel(false);
    let exporter = if config.metrics.enabled {
        let addr: SocketAddr = ([0, 0, 0, 0], config.metrics.port).into();
        let listener = bind_tcp(addr).await?;
        info!(
            "Metrics server listening on http://{}{}",
            addr, config.metrics.path
        );
        let handler = MetricsHandler::new(metrics_registry.clone(), &config.metrics.path);
        Some(tokio::spawn(
            ServerBuilder::new(listener)
                .with_handler(handler)
                .serve(exporter_rx),
        ))
    } else {
        None
    };

    let summary = Arc::new(Summary::new());
    let reporters: Vec<Arc<dyn Reporter>> = vec![summary.clone() as Arc<dyn Reporter>, metrics];
    let reporter: Arc<dyn Reporter> = Arc::new(reporters);

    let client = ReqwestClient::new(config.http.timeout()).context("Failed to create HTTP client")?;
    let check = Check::status_is(config.expected_status.0);
    let health_check = Arc::new(HealthCheck::new(client, check, reporter.clone()));

    let options = RunOptions {
        vus: config.run.vus,
        iterations: config.run.iterations,
    };
    let runner = Runner::new(health_check, config.target.clone(), options, reporter, summary);
    let run_summary = runner.run(shutdown_rx).await;
    run_summary.log();

    if let Some(path) = &config.report.summary_path {
        tokio::fs::write(path, run_summary.to_json()?)
            .await
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        info!("Summary written to {}", path.display());
    }

    if let Some(handle) = exporter {
        let _ = exporter_tx.send(true);
        match handle.await {
            Ok(Err(e)) => error!("Metrics server error: {}", e),
            Err(e) => error!("Metrics server task failed: {}", e),
            Ok(Ok(())) => {}
        }
    }

    if !run_summary.is_success() {
        bail!(
            "smoke check against {} did not pass: {}/{} iterations ran, {} failed, {} errored",
            run_summary.target,
            run_summary.iterations,
            run_summary.configured_iterations,
            run_summary.failed,
            run_summary.errored
        );
    }

    Ok(())
}

// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, finishing in-flight iterations");
}
