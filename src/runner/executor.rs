// src/runner/executor.rs
use super::summary::RunSummary;
use crate::health::{HealthCheck, HttpClient, Target};
use crate::report::{Reporter, Summary};
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, error, info, warn, Instrument};
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub vus: usize,
    pub iterations: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            vus: 1,
            iterations: 1,
        }
    }
}

impl RunOptions {
    /// VUs actually spawned. More VUs than iterations would only idle.
    pub fn workers(&self) -> usize {
        let iterations = usize::try_from(self.iterations).unwrap_or(usize::MAX);
        self.vus.min(iterations)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterationOutcome {
    Passed,
    Failed,
    Errored(String),
}

#[derive(Debug, Default)]
struct Outcomes {
    passed: AtomicU64,
    failed: AtomicU64,
    errored: AtomicU64,
}

/// Runs the health check a fixed number of times, shared between `vus`
/// concurrent workers. No ramping, no retries.
pub struct Runner<C> {
    health_check: Arc<HealthCheck<C>>,
    target: Target,
    options: RunOptions,
    reporter: Arc<dyn Reporter>,
    summary: Arc<Summary>,
}

impl<C: HttpClient + 'static> Runner<C> {
    /// `summary` must also be reachable from the health check's reporter for
    /// per-check tallies to show up in the [`RunSummary`].
    pub fn new(
        health_check: Arc<HealthCheck<C>>,
        target: Target,
        options: RunOptions,
        reporter: Arc<dyn Reporter>,
        summary: Arc<Summary>,
    ) -> Self {
        Self {
            health_check,
            target,
            options,
            reporter,
            summary,
        }
    }

    pub async fn run(&self, shutdown: watch::Receiver<bool>) -> RunSummary {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("run", %run_id);
        self.run_inner(run_id, shutdown).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid, shutdown: watch::Receiver<bool>) -> RunSummary {
        let started_at = Utc::now();
        let start = Instant::now();
        let next = Arc::new(AtomicU64::new(0));
        let outcomes = Arc::new(Outcomes::default());
        // Tallies are per run
        self.summary.reset();

        info!(
            url = %self.target,
            vus = self.options.vus,
            iterations = self.options.iterations,
            "Starting smoke check"
        );

        let vus = self.options.workers();
        let mut tasks = Vec::with_capacity(vus);
        for vu in 0..vus {
            let worker = Worker {
                vu,
                health_check: self.health_check.clone(),
                target: self.target.clone(),
                iterations: self.options.iterations,
                next: next.clone(),
                outcomes: outcomes.clone(),
                reporter: self.reporter.clone(),
                shutdown: shutdown.clone(),
            };
            tasks.push(tokio::spawn(worker.run().in_current_span()));
        }

        for result in futures::future::join_all(tasks).await {
            if let Err(e) = result {
                error!("VU task join error: {}", e);
            }
        }

        let passed = outcomes.passed.load(Ordering::Relaxed);
        let failed = outcomes.failed.load(Ordering::Relaxed);
        let errored = outcomes.errored.load(Ordering::Relaxed);

        RunSummary {
            run_id,
            target: self.target.to_string(),
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
            iterations: passed + failed + errored,
            configured_iterations: self.options.iterations,
            passed,
            failed,
            errored,
            checks: self.summary.snapshot(),
        }
    }
}

struct Worker<C> {
    vu: usize,
    health_check: Arc<HealthCheck<C>>,
    target: Target,
    iterations: u64,
    next: Arc<AtomicU64>,
    outcomes: Arc<Outcomes>,
    reporter: Arc<dyn Reporter>,
    shutdown: watch::Receiver<bool>,
}

impl<C: HttpClient> Worker<C> {
    async fn run(self) {
        loop {
            if *self.shutdown.borrow() {
                debug!(vu = self.vu, "shutdown requested, VU stopping");
                break;
            }

            let iteration = self.next.fetch_add(1, Ordering::SeqCst);
            if iteration >= self.iterations {
                break;
            }

            let outcome = self.iterate().await;
            debug!(vu = self.vu, iteration, ?outcome, "iteration finished");
        }
    }

    async fn iterate(&self) -> IterationOutcome {
        match self.health_check.run(&self.target).await {
            Ok(result) if result.pass => {
                self.outcomes.passed.fetch_add(1, Ordering::Relaxed);
                IterationOutcome::Passed
            }
            Ok(_) => {
                self.outcomes.failed.fetch_add(1, Ordering::Relaxed);
                IterationOutcome::Failed
            }
            Err(e) => {
                warn!(vu = self.vu, "iteration errored: {}", e);
                self.reporter.record_error(&e);
                self.outcomes.errored.fetch_add(1, Ordering::Relaxed);
                IterationOutcome::Errored(e.to_string())
            }
        }
    }
}
