use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use k3run::control::{Event, JobQueue, RunContext, Runner, RunnerFactory, Verdict, EVENT_BUFFER};
use tokio::sync::mpsc;
use tracing::debug;

/// What a fake job does: run for `hold`, then stop with `verdict`.
#[derive(Debug, Clone, Copy)]
pub struct Script {
    pub hold: Duration,
    pub verdict: Verdict,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            hold: Duration::ZERO,
            verdict: Verdict::Pass,
        }
    }
}

/// Tracks how many fake jobs run at the same time.
#[derive(Debug, Default)]
pub struct Concurrency {
    current: AtomicUsize,
    peak: AtomicUsize,
    total: AtomicUsize,
}

impl Concurrency {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.total.fetch_add(1, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    /// Highest number of simultaneously running jobs seen.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Number of jobs started.
    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

/// A runner that never spawns processes.
///
/// For every job it emits a start, waits for the job's script and emits a
/// stop. A job whose context ends first gets an error instead of a stop.
pub struct FakeRunner {
    jobs: JobQueue,
    scripts: Arc<HashMap<String, Script>>,
    concurrency: Arc<Concurrency>,
}

impl Runner for FakeRunner {
    fn run(self: Box<Self>, ctx: RunContext) -> mpsc::Receiver<Event> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        tokio::spawn(async move {
            while let Some(job) = self.jobs.next().await {
                let script = self.scripts.get(&job.name).copied().unwrap_or_default();
                self.concurrency.enter();
                let _ = tx.send(Event::start(job.clone(), job.name.clone())).await;

                let finished = tokio::select! {
                    () = tokio::time::sleep(script.hold) => true,
                    () = ctx.done() => false,
                };
                self.concurrency.exit();
                debug!(job = %job.id, finished, "fake job done");

                let event = if finished {
                    Event::stop(job.clone(), job.name.clone(), script.verdict)
                } else {
                    Event::job_error(job.clone(), anyhow!("cancelled"))
                };
                if tx.send(event).await.is_err() {
                    return;
                }
            }
        });
        rx
    }
}

/// Factory for [`FakeRunner`]s sharing one queue.
pub struct FakeFactory {
    jobs: JobQueue,
    scripts: Arc<HashMap<String, Script>>,
    concurrency: Arc<Concurrency>,
    failures: AtomicUsize,
}

impl FakeFactory {
    pub fn new(jobs: JobQueue) -> Self {
        Self {
            jobs,
            scripts: Arc::new(HashMap::new()),
            concurrency: Arc::new(Concurrency::default()),
            failures: AtomicUsize::new(0),
        }
    }

    pub fn with_script(mut self, name: &str, script: Script) -> Self {
        Arc::make_mut(&mut self.scripts).insert(name.to_string(), script);
        self
    }

    /// Let the first `n` calls to `create` fail.
    pub fn failing(self, n: usize) -> Self {
        self.failures.store(n, Ordering::SeqCst);
        self
    }

    pub fn concurrency(&self) -> Arc<Concurrency> {
        Arc::clone(&self.concurrency)
    }
}

impl RunnerFactory for FakeFactory {
    fn create(&self) -> anyhow::Result<Box<dyn Runner>> {
        let remaining = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if remaining.is_ok() {
            return Err(anyhow!("fake runner construction failed"));
        }
        Ok(Box::new(FakeRunner {
            jobs: self.jobs.clone(),
            scripts: Arc::clone(&self.scripts),
            concurrency: Arc::clone(&self.concurrency),
        }))
    }
}
