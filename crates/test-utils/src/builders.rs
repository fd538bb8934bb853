#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use k3run::config::{ProjectConfig, RawProjectConfig};
use k3run::control::Job;

/// Builder for `ProjectConfig` to simplify test setup.
pub struct ProjectConfigBuilder {
    config: RawProjectConfig,
}

impl ProjectConfigBuilder {
    pub fn new() -> Self {
        let mut config = RawProjectConfig {
            name: "suite".to_string(),
            ..RawProjectConfig::default()
        };
        config.k3.t3xf = PathBuf::from("suite.t3xf");
        Self { config }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.config.name = name.to_string();
        self
    }

    pub fn t3xf(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.k3.t3xf = path.into();
        self
    }

    pub fn runtime(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.k3.runtime = path.into();
        self
    }

    pub fn import(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.imports.push(path.into());
        self
    }

    pub fn plugin(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.k3.plugins.push(path.into());
        self
    }

    pub fn clib_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.k3.clib_dirs.push(path.into());
        self
    }

    pub fn variable(mut self, name: &str, value: &str) -> Self {
        self.config
            .variables
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn module_parameter(mut self, name: &str, value: &str) -> Self {
        self.config
            .module_parameters
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.config.timeout = Some(timeout.to_string());
        self
    }

    pub fn build(self) -> Arc<ProjectConfig> {
        Arc::new(
            ProjectConfig::try_from(self.config)
                .expect("Failed to build valid config from builder"),
        )
    }
}

impl Default for ProjectConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `Job`.
pub struct JobBuilder {
    job: Job,
}

impl JobBuilder {
    pub fn new(name: &str, config: Arc<ProjectConfig>) -> Self {
        Self {
            job: Job::new(name, config),
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.job.id = id.to_string();
        self
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.job.args.push(arg.to_string());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.job.timeout = timeout;
        self
    }

    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.job.dir = Some(dir.into());
        self
    }

    pub fn env(mut self, entry: &str) -> Self {
        self.job.env.push(entry.to_string());
        self
    }

    pub fn module_par(mut self, name: &str, value: &str) -> Self {
        self.job
            .module_pars
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn build(self) -> Arc<Job> {
        Arc::new(self.job)
    }
}
