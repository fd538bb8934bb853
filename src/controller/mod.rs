// src/controller/mod.rs

//! Bounded worker pool and event fan-in.
//!
//! The pure bookkeeping of which jobs are running lives in [`running`];
//! the async shell that spawns workers, merges their event streams and
//! injects heartbeats is implemented in [`pool`].

pub mod pool;
pub mod running;

pub use pool::{Controller, DEFAULT_HEARTBEAT_INTERVAL};
pub use running::RunningSet;
