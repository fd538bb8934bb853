// src/controller/pool.rs

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, trace, warn};

use crate::control::{Event, RunContext, RunnerFactory};

use super::running::RunningSet;

/// Idle time after which running jobs get a heartbeat.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Runs jobs on a fixed number of workers and merges their events.
///
/// Every worker obtains one runner from the factory and drains it; the
/// runners share a job queue, so at most `max_workers` jobs execute at any
/// time. A worker whose runner cannot be constructed reports the failure
/// and stops, which leaves the pool one worker short for the rest of the
/// run.
pub struct Controller {
    max_workers: usize,
    heartbeat_interval: Duration,
    factory: Arc<dyn RunnerFactory>,
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("max_workers", &self.max_workers)
            .field("heartbeat_interval", &self.heartbeat_interval)
            .finish_non_exhaustive()
    }
}

impl Controller {
    pub fn new(factory: impl RunnerFactory + 'static) -> Self {
        Self {
            max_workers: 1,
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            factory: Arc::new(factory),
        }
    }

    /// Number of concurrent workers. Values below 1 are raised to 1.
    pub fn with_max_workers(mut self, n: usize) -> Self {
        self.max_workers = n.max(1);
        self
    }

    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Start all workers and return the merged event stream.
    ///
    /// The stream closes after every worker has finished and all of their
    /// events have been delivered.
    pub fn run(&self, ctx: RunContext) -> mpsc::Receiver<Event> {
        info!(max_workers = self.max_workers, "controller started");

        let (results_tx, results_rx) = mpsc::channel::<Event>(self.max_workers);
        for worker in 0..self.max_workers {
            let factory = Arc::clone(&self.factory);
            let results = results_tx.clone();
            let ctx = ctx.clone();
            tokio::spawn(async move {
                run_worker(worker, factory, ctx, results).await;
            });
        }
        // The results channel closes once the last worker drops its sender.
        drop(results_tx);

        let (out_tx, out_rx) = mpsc::channel::<Event>(self.max_workers);
        let interval = self.heartbeat_interval;
        tokio::spawn(async move {
            merge(results_rx, out_tx, interval).await;
        });

        out_rx
    }
}

async fn run_worker(
    worker: usize,
    factory: Arc<dyn RunnerFactory>,
    ctx: RunContext,
    results: mpsc::Sender<Event>,
) {
    let runner = match factory.create() {
        Ok(runner) => runner,
        Err(err) => {
            warn!(worker, error = %err, "could not create runner; worker stops");
            let _ = results.send(Event::error(err)).await;
            return;
        }
    };

    debug!(worker, "worker started");
    let mut events = runner.run(ctx);
    while let Some(event) = events.recv().await {
        if results.send(event).await.is_err() {
            debug!(worker, "results channel closed; worker stops early");
            return;
        }
    }
    debug!(worker, "worker finished");
}

/// Forward events in arrival order, annotating them on the way, and emit
/// heartbeats whenever nothing arrived for a full `interval`.
async fn merge(
    mut results: mpsc::Receiver<Event>,
    out: mpsc::Sender<Event>,
    interval: Duration,
) {
    let mut running = RunningSet::new();
    let idle = sleep(interval);
    tokio::pin!(idle);

    loop {
        tokio::select! {
            res = results.recv() => {
                let Some(mut event) = res else {
                    break;
                };
                idle.as_mut().reset(Instant::now() + interval);
                running.observe(&mut event);
                if out.send(event).await.is_err() {
                    debug!("event receiver dropped; stopping merge");
                    return;
                }
            }
            () = &mut idle => {
                trace!(jobs = running.len(), "idle; emitting heartbeats");
                for heartbeat in running.heartbeats() {
                    if out.send(heartbeat).await.is_err() {
                        return;
                    }
                }
                idle.as_mut().reset(Instant::now() + interval);
            }
        }
    }

    info!("all workers finished; closing event stream");
}
