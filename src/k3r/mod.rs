// src/k3r/mod.rs

//! Adapter for the `k3r` test runtime.
//!
//! One [`K3rTest`] drives one runtime process for one job:
//! - `protocol.rs`: request text and response line parsing.
//! - `error.rs`: classified runtime and process failures.
//! - `env.rs`: the environment handed to the runtime.
//! - `logfile.rs`: log-file finalization (trailing newline + exit trailer).
//! - `test.rs`: process lifecycle of a single invocation.
//! - `runner.rs`: the [`crate::control::Runner`] that feeds queued jobs
//!   through `K3rTest`, and its factory.

pub mod env;
pub mod error;
pub mod logfile;
pub mod protocol;
pub mod runner;

pub use env::{build_env, EnvLookup};
pub use error::K3rError;
pub use protocol::{classify, parse_line, request, Message};
pub use runner::{log_file_name, K3rFactory, K3rRunner};
pub use test::K3rTest;
