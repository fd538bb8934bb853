// src/control/runner.rs

//! Pluggable runner abstraction.
//!
//! The controller talks to a [`Runner`] instead of spawning processes
//! itself. Production code uses the k3r adapter
//! ([`crate::k3r::K3rRunner`]); tests provide runners that never touch the
//! operating system.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::control::context::RunContext;
use crate::control::event::Event;
use crate::control::job::Job;

/// Buffer size of per-runner event channels.
pub const EVENT_BUFFER: usize = 16;

/// Runs jobs and reports what happens as a stream of events.
///
/// A runner pulls its jobs from wherever it was constructed with (usually a
/// shared [`JobQueue`]) and executes them strictly one at a time. The
/// returned stream closes once the runner has nothing left to do.
pub trait Runner: Send {
    fn run(self: Box<Self>, ctx: RunContext) -> mpsc::Receiver<Event>;
}

/// Creates a fresh runner for each controller worker.
pub trait RunnerFactory: Send + Sync {
    fn create(&self) -> anyhow::Result<Box<dyn Runner>>;
}

impl<F> RunnerFactory for F
where
    F: Fn() -> anyhow::Result<Box<dyn Runner>> + Send + Sync,
{
    fn create(&self) -> anyhow::Result<Box<dyn Runner>> {
        self()
    }
}

/// Job queue shared by all runners of one controller.
///
/// Each job is handed to exactly one caller of [`JobQueue::next`].
#[derive(Debug, Clone)]
pub struct JobQueue {
    rx: Arc<Mutex<mpsc::Receiver<Arc<Job>>>>,
}

impl JobQueue {
    /// A queue fed through the returned sender. The queue ends when the
    /// sender is dropped.
    pub fn channel(capacity: usize) -> (mpsc::Sender<Arc<Job>>, JobQueue) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            tx,
            JobQueue {
                rx: Arc::new(Mutex::new(rx)),
            },
        )
    }

    /// A closed queue holding exactly the given jobs.
    pub fn from_jobs(jobs: impl IntoIterator<Item = Arc<Job>>) -> JobQueue {
        let jobs: Vec<_> = jobs.into_iter().collect();
        let (tx, queue) = Self::channel(jobs.len());
        for job in jobs {
            // Capacity equals the number of jobs, so this never fails.
            let _ = tx.try_send(job);
        }
        queue
    }

    pub async fn next(&self) -> Option<Arc<Job>> {
        self.rx.lock().await.recv().await
    }
}
