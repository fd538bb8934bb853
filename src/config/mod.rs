// src/config/mod.rs

//! Project configuration loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a project file from disk (`loader.rs`).
//! - Validate basic invariants before anything is executed (`validate.rs`).
//! - Parse human-friendly durations such as `"30s"` (`duration.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{K3Section, ProjectConfig, RawProjectConfig};
