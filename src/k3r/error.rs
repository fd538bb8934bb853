// src/k3r/error.rs

use std::io;

use thiserror::Error;

/// Failures reported by the k3r adapter.
///
/// Runtime error codes (`tciError Exxx:`) map onto the lookup and readiness
/// variants through [`crate::k3r::classify`].
#[derive(Debug, Error)]
pub enum K3rError {
    #[error("id not fully qualified")]
    NotQualified,

    #[error("no such module")]
    NoSuchModule,
    #[error("no such test case")]
    NoSuchTestCase,
    #[error("no such control")]
    NoSuchControl,

    #[error("runtime not ready")]
    RuntimeNotReady,
    #[error("module not ready")]
    ModuleNotReady,
    #[error("test case not ready")]
    TestNotReady,
    #[error("control not ready")]
    ControlNotReady,

    #[error("not implemented: {0}")]
    NotImplemented(String),
    #[error("invalid message: {0}")]
    InvalidMessage(String),
    #[error("unknown error: {0}")]
    Unknown(String),

    #[error("timeout")]
    Timeout,

    #[error("runtime exited with status {0}")]
    Exit(i32),

    #[error("{context}: {source}")]
    Process {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl K3rError {
    pub fn process(context: impl Into<String>, source: io::Error) -> Self {
        K3rError::Process {
            context: context.into(),
            source,
        }
    }

    /// `E201` is reported whenever `tciRootModule` was not processed before
    /// the start request. Current runtimes send it even for well-formed
    /// requests, so the adapter drops it.
    pub fn is_spurious(&self) -> bool {
        matches!(self, K3rError::ModuleNotReady)
    }
}
