// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Errors of a single job travel on the event stream (see
//! [`crate::k3r::K3rError`]); [`K3runError`] covers everything that stops
//! the tool as a whole.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum K3runError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("no tests to run")]
    NoTests,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0} test(s) failed")]
    Failed(u64),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, K3runError>;
