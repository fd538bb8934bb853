// src/config/validate.rs

use std::time::Duration;

use crate::config::duration::parse_duration;
use crate::config::model::{ProjectConfig, RawProjectConfig};
use crate::errors::{K3runError, Result};

impl TryFrom<RawProjectConfig> for ProjectConfig {
    type Error = K3runError;

    fn try_from(raw: RawProjectConfig) -> std::result::Result<Self, Self::Error> {
        validate_k3_section(&raw)?;
        validate_names("variables", raw.variables.keys())?;
        validate_names("module_parameters", raw.module_parameters.keys())?;
        let timeout = validate_timeout(&raw)?;
        Ok(ProjectConfig::new_unchecked(raw, timeout))
    }
}

fn validate_k3_section(cfg: &RawProjectConfig) -> Result<()> {
    if cfg.k3.t3xf.as_os_str().is_empty() {
        return Err(K3runError::ConfigError(
            "[k3].t3xf must name the compiled test suite".to_string(),
        ));
    }
    if cfg.k3.runtime.as_os_str().is_empty() {
        return Err(K3runError::ConfigError(
            "[k3].runtime must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Names end up as `NAME=value` in the runtime environment.
fn validate_names<'a>(section: &str, names: impl Iterator<Item = &'a String>) -> Result<()> {
    for name in names {
        if name.is_empty() {
            return Err(K3runError::ConfigError(format!(
                "[{section}] contains an empty name"
            )));
        }
        if name.contains('=') {
            return Err(K3runError::ConfigError(format!(
                "[{section}] name '{name}' must not contain '='"
            )));
        }
    }
    Ok(())
}

fn validate_timeout(cfg: &RawProjectConfig) -> Result<Duration> {
    match cfg.timeout.as_deref() {
        None => Ok(Duration::ZERO),
        Some(s) => parse_duration(s)
            .map_err(|e| K3runError::ConfigError(format!("invalid timeout '{s}': {e}"))),
    }
}
