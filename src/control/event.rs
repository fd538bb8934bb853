// src/control/event.rs

//! Events produced while running jobs.
//!
//! Every runner reports progress as a stream of [`Event`]s. The controller
//! annotates and merges them, printers consume them. The set of variants is
//! closed on purpose: adding one forces every `match` in the crate to be
//! revisited.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::{mpsc, Mutex};

use crate::control::job::Job;

/// Outcome of a test case or control part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Pass,
    Fail,
    Inconc,
    None,
    Error,
    Done,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "pass",
            Verdict::Fail => "fail",
            Verdict::Inconc => "inconc",
            Verdict::None => "none",
            Verdict::Error => "error",
            Verdict::Done => "done",
        }
    }

    /// `pass` for test cases, `done` for control parts.
    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Pass | Verdict::Done)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pass" => Ok(Verdict::Pass),
            "fail" => Ok(Verdict::Fail),
            "inconc" => Ok(Verdict::Inconc),
            "none" => Ok(Verdict::None),
            "error" => Ok(Verdict::Error),
            "done" => Ok(Verdict::Done),
            other => Err(format!("invalid verdict: {other}")),
        }
    }
}

/// A test case or control part began executing.
#[derive(Debug, Clone)]
pub struct StartEvent {
    pub time: OffsetDateTime,
    pub job: Arc<Job>,
    /// May differ from `job.name`: a control part starts test cases of its own.
    pub name: String,
}

/// A test case or control part finished.
#[derive(Debug, Clone)]
pub struct StopEvent {
    pub time: OffsetDateTime,
    pub job: Arc<Job>,
    pub name: String,
    pub verdict: Verdict,
    /// Time of the matching start. Set by the controller, never by a runner.
    pub begin: Option<OffsetDateTime>,
}

/// Diagnostic text, usually a line from the runtime's stderr.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub time: OffsetDateTime,
    pub job: Arc<Job>,
    pub text: String,
}

/// A classified failure.
///
/// `job` is `None` only for failures that are not tied to a job, such as a
/// runner that could not be constructed.
#[derive(Debug, Clone)]
pub struct ErrorEvent {
    pub time: OffsetDateTime,
    pub job: Option<Arc<Job>>,
    pub error: Arc<anyhow::Error>,
}

impl ErrorEvent {
    /// Returns the error as `E` if that is what this event carries.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.error.downcast_ref::<E>()
    }
}

/// Synthetic liveness signal for a job that has been silent for a while.
#[derive(Debug, Clone)]
pub struct HeartbeatEvent {
    pub time: OffsetDateTime,
    pub job: Arc<Job>,
}

#[derive(Debug, Clone)]
pub enum Event {
    Start(StartEvent),
    Stop(StopEvent),
    Log(LogEvent),
    Error(ErrorEvent),
    Heartbeat(HeartbeatEvent),
}

impl Event {
    pub fn start(job: Arc<Job>, name: impl Into<String>) -> Self {
        Event::Start(StartEvent {
            time: OffsetDateTime::now_utc(),
            job,
            name: name.into(),
        })
    }

    pub fn stop(job: Arc<Job>, name: impl Into<String>, verdict: Verdict) -> Self {
        Event::Stop(StopEvent {
            time: OffsetDateTime::now_utc(),
            job,
            name: name.into(),
            verdict,
            begin: None,
        })
    }

    pub fn log(job: Arc<Job>, text: impl Into<String>) -> Self {
        Event::Log(LogEvent {
            time: OffsetDateTime::now_utc(),
            job,
            text: text.into(),
        })
    }

    /// An error that is not tied to a particular job.
    pub fn error(err: impl Into<anyhow::Error>) -> Self {
        Event::Error(ErrorEvent {
            time: OffsetDateTime::now_utc(),
            job: None,
            error: Arc::new(err.into()),
        })
    }

    pub fn job_error(job: Arc<Job>, err: impl Into<anyhow::Error>) -> Self {
        Event::Error(ErrorEvent {
            time: OffsetDateTime::now_utc(),
            job: Some(job),
            error: Arc::new(err.into()),
        })
    }

    pub fn heartbeat(job: Arc<Job>) -> Self {
        Event::Heartbeat(HeartbeatEvent {
            time: OffsetDateTime::now_utc(),
            job,
        })
    }

    pub fn time(&self) -> OffsetDateTime {
        match self {
            Event::Start(ev) => ev.time,
            Event::Stop(ev) => ev.time,
            Event::Log(ev) => ev.time,
            Event::Error(ev) => ev.time,
            Event::Heartbeat(ev) => ev.time,
        }
    }

    fn set_time(&mut self, time: OffsetDateTime) {
        match self {
            Event::Start(ev) => ev.time = time,
            Event::Stop(ev) => ev.time = time,
            Event::Log(ev) => ev.time = time,
            Event::Error(ev) => ev.time = time,
            Event::Heartbeat(ev) => ev.time = time,
        }
    }

    /// Shorthand for [`unwrap_job`].
    pub fn job(&self) -> Option<&Arc<Job>> {
        unwrap_job(self)
    }

    /// A stop with a non-successful verdict, or any error.
    pub fn is_failure(&self) -> bool {
        match self {
            Event::Stop(ev) => !ev.verdict.is_success(),
            Event::Error(_) => true,
            Event::Start(_) | Event::Log(_) | Event::Heartbeat(_) => false,
        }
    }
}

/// Wraps an error with the job that caused it.
///
/// Runners that only have an error at hand can use this instead of filling
/// `ErrorEvent::job`; [`unwrap_job`] looks through it either way.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct JobError {
    pub job: Arc<Job>,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

/// Returns the job that caused the event, if any.
pub fn unwrap_job(event: &Event) -> Option<&Arc<Job>> {
    match event {
        Event::Start(ev) => Some(&ev.job),
        Event::Stop(ev) => Some(&ev.job),
        Event::Log(ev) => Some(&ev.job),
        Event::Heartbeat(ev) => Some(&ev.job),
        Event::Error(ev) => ev.job.as_ref().or_else(|| {
            ev.error
                .chain()
                .find_map(|cause| cause.downcast_ref::<JobError>())
                .map(|err| &err.job)
        }),
    }
}

/// Sending half of an event stream that keeps timestamps non-decreasing.
///
/// Several tasks of one runner may emit concurrently; stamping and sending
/// happen under one lock so the receiver never sees time go backwards.
#[derive(Debug, Clone)]
pub struct EventSink {
    inner: Arc<Mutex<SinkState>>,
}

#[derive(Debug)]
struct SinkState {
    tx: mpsc::Sender<Event>,
    last: Option<OffsetDateTime>,
}

impl EventSink {
    pub fn new(tx: mpsc::Sender<Event>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SinkState { tx, last: None })),
        }
    }

    /// Emit an event. Returns `false` once the receiver is gone.
    pub async fn emit(&self, mut event: Event) -> bool {
        let mut state = self.inner.lock().await;
        if let Some(last) = state.last {
            if event.time() < last {
                event.set_time(last);
            }
        }
        state.last = Some(event.time());
        state.tx.send(event).await.is_ok()
    }
}
