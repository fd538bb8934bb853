// src/k3r/runner.rs

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::model::has_dir_component;
use crate::control::{Event, Job, JobQueue, RunContext, Runner, RunnerFactory, EVENT_BUFFER};
use crate::k3r::env::{self, EnvLookup};
use crate::k3r::error::K3rError;
use crate::k3r::test::K3rTest;
use crate::session::SessionAllocator;

/// Runs queued jobs one after another with the k3r runtime.
pub struct K3rRunner {
    jobs: JobQueue,
    sessions: Arc<dyn SessionAllocator>,
    lookup: EnvLookup,
}

impl K3rRunner {
    pub fn new(jobs: JobQueue, sessions: Arc<dyn SessionAllocator>) -> Self {
        Self {
            jobs,
            sessions,
            lookup: env::ambient(),
        }
    }

    pub fn with_env_lookup(mut self, lookup: EnvLookup) -> Self {
        self.lookup = lookup;
        self
    }

    /// Set up working directory, log file and timeout for `job`.
    async fn prepare(&self, job: &Arc<Job>) -> Result<K3rTest, K3rError> {
        let test = K3rTest::new(Arc::clone(job), Arc::clone(&self.sessions))
            .with_env_lookup(Arc::clone(&self.lookup));

        let Some(dir) = &job.dir else {
            return Ok(test.with_log_file(log_file_name(&job.id)));
        };

        let workdir = dir.join(&job.id);
        tokio::fs::create_dir_all(&workdir)
            .await
            .map_err(|err| K3rError::process(format!("creating {}", workdir.display()), err))?;

        // Paths in the project config are relative to our working
        // directory, the runtime starts somewhere else.
        let k3 = &job.config.k3;
        let t3xf = std::path::absolute(&k3.t3xf)
            .map_err(|err| K3rError::process(format!("resolving {}", k3.t3xf.display()), err))?;
        let mut test = test.with_t3xf(t3xf).with_dir(workdir);
        if has_dir_component(&k3.runtime) {
            let runtime = std::path::absolute(&k3.runtime).map_err(|err| {
                K3rError::process(format!("resolving {}", k3.runtime.display()), err)
            })?;
            test = test.with_runtime(runtime);
        }
        Ok(test)
    }
}

impl Runner for K3rRunner {
    fn run(self: Box<Self>, ctx: RunContext) -> mpsc::Receiver<Event> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);

        tokio::spawn(async move {
            loop {
                let job = tokio::select! {
                    job = self.jobs.next() => job,
                    () = ctx.done() => None,
                };
                let Some(job) = job else {
                    break;
                };

                let test = match self.prepare(&job).await {
                    Ok(test) => test,
                    Err(err) => {
                        warn!(job = %job.id, error = %err, "could not prepare job");
                        if tx.send(Event::job_error(job, err)).await.is_err() {
                            return;
                        }
                        continue;
                    }
                };

                let timeout = job.effective_timeout();
                let job_ctx = if timeout.is_zero() {
                    ctx.clone()
                } else {
                    ctx.with_timeout(timeout)
                };

                debug!(job = %job.id, log = %test.log_path().display(), "running job");
                let mut events = test.run(job_ctx);
                while let Some(event) = events.recv().await {
                    if tx.send(event).await.is_err() {
                        return;
                    }
                }
            }
            debug!("job queue drained");
        });

        rx
    }
}

/// Log file used when a job has no working directory: named after the
/// instance id, with the first instance keeping the plain name.
pub fn log_file_name(id: &str) -> PathBuf {
    PathBuf::from(format!("{}.log", id.strip_suffix("-0").unwrap_or(id)))
}

/// Creates a [`K3rRunner`] per worker, all sharing one job queue.
pub struct K3rFactory {
    jobs: JobQueue,
    sessions: Arc<dyn SessionAllocator>,
    lookup: EnvLookup,
}

impl K3rFactory {
    pub fn new(jobs: JobQueue, sessions: Arc<dyn SessionAllocator>) -> Self {
        Self {
            jobs,
            sessions,
            lookup: env::ambient(),
        }
    }

    pub fn with_env_lookup(mut self, lookup: EnvLookup) -> Self {
        self.lookup = lookup;
        self
    }
}

impl RunnerFactory for K3rFactory {
    fn create(&self) -> anyhow::Result<Box<dyn Runner>> {
        let runner = K3rRunner::new(self.jobs.clone(), Arc::clone(&self.sessions))
            .with_env_lookup(Arc::clone(&self.lookup));
        Ok(Box::new(runner))
    }
}
