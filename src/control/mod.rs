// src/control/mod.rs

//! Test control model shared by the controller, the runtime adapter and the
//! printers.
//!
//! - [`job`] describes one unit of work (a test case or a control part).
//! - [`event`] is the closed set of events a run produces.
//! - [`context`] carries cancellation and deadlines down into every runner.
//! - [`runner`] defines the `Runner` capability and the shared job queue.

pub mod context;
pub mod event;
pub mod job;
pub mod runner;

pub use context::{ContextError, RunContext};
pub use event::{
    unwrap_job, ErrorEvent, Event, EventSink, HeartbeatEvent, JobError, LogEvent, StartEvent,
    StopEvent, Verdict,
};
pub use job::{Job, JobIds};
pub use runner::{JobQueue, Runner, RunnerFactory, EVENT_BUFFER};
