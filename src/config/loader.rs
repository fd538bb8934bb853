// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ProjectConfig, RawProjectConfig};
use crate::errors::Result;

/// Load a project file from a given path and return the raw
/// `RawProjectConfig`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawProjectConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawProjectConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a project file, validate it and resolve relative paths against the
/// directory containing the file.
///
/// This is the recommended entry point for the rest of the application.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ProjectConfig> {
    let path = path.as_ref();
    let raw_config = load_from_path(path)?;
    let mut config = ProjectConfig::try_from(raw_config)?;
    config.resolve_paths(&config_root_dir(path));
    Ok(config)
}

/// `k3run.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("k3run.toml")
}

/// Directory the project file lives in.
///
/// A bare file name like `k3run.toml` has an empty parent; that means the
/// current working directory, which is what an empty base path resolves to.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::new(),
    }
}
