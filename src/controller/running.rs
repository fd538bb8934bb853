// src/controller/running.rs

//! Running-set bookkeeping for the merge stage.
//!
//! [`RunningSet`] is owned by the single merge task, so it needs no locking
//! even though starts and stops arrive from many workers. It has no
//! channels and no Tokio types and can be tested on its own.
//!
//! Entries are added on start and never removed: the set grows with the
//! number of jobs in a run, not with their duration.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use time::OffsetDateTime;

use crate::control::{Event, Job};

#[derive(Debug)]
struct RunningJob {
    job: Arc<Job>,
    latest: OffsetDateTime,
    starts: HashMap<String, OffsetDateTime>,
}

#[derive(Debug, Default)]
pub struct RunningSet {
    jobs: BTreeMap<String, RunningJob>,
}

impl RunningSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record starts and fill in `begin` on stops.
    ///
    /// A stop takes the time of the most recent start with the same job and
    /// name, falling back to the most recent start of the job (control
    /// parts may stop under a name the runtime never announced).
    pub fn observe(&mut self, event: &mut Event) {
        match event {
            Event::Start(ev) => {
                let entry = self
                    .jobs
                    .entry(ev.job.id.clone())
                    .or_insert_with(|| RunningJob {
                        job: Arc::clone(&ev.job),
                        latest: ev.time,
                        starts: HashMap::new(),
                    });
                entry.latest = ev.time;
                entry.starts.insert(ev.name.clone(), ev.time);
            }
            Event::Stop(ev) => {
                ev.begin = self.jobs.get(&ev.job.id).map(|running| {
                    running
                        .starts
                        .get(&ev.name)
                        .copied()
                        .unwrap_or(running.latest)
                });
            }
            Event::Log(_) | Event::Error(_) | Event::Heartbeat(_) => {}
        }
    }

    /// One heartbeat per job seen so far, ordered by job id.
    pub fn heartbeats(&self) -> Vec<Event> {
        self.jobs
            .values()
            .map(|running| Event::heartbeat(Arc::clone(&running.job)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
