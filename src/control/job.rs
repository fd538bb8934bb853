// src/control/job.rs

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ProjectConfig;

/// Name of the per-module entry point that is not itself a test case.
pub const CONTROL: &str = "control";

/// A test case or control part to be executed.
///
/// Jobs are immutable once handed to the controller; they travel as
/// `Arc<Job>` so every event can point back at the job that caused it.
#[derive(Debug, Clone)]
pub struct Job {
    /// Unique instance id, e.g. `"test.A-0"`. See [`JobIds`].
    pub id: String,

    /// Fully qualified name (`<module>.<testcase>` or `<module>.control`).
    pub name: String,

    /// Literal arguments passed to the test case.
    pub args: Vec<String>,

    /// Time after which the job is stopped. `Duration::ZERO` means no limit.
    pub timeout: Duration,

    /// Module parameters, passed to the runtime as `KEY=VALUE`.
    pub module_pars: BTreeMap<String, String>,

    /// Output directory. The job runs in `<dir>/<id>`; without a directory
    /// only a log file named after the id is written.
    pub dir: Option<PathBuf>,

    /// Extra `KEY=VALUE` environment entries.
    pub env: Vec<String>,

    /// Project configuration this job belongs to.
    pub config: Arc<ProjectConfig>,
}

impl Job {
    pub fn new(name: impl Into<String>, config: Arc<ProjectConfig>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            args: Vec::new(),
            timeout: Duration::ZERO,
            module_pars: BTreeMap::new(),
            dir: None,
            env: Vec::new(),
            config,
        }
    }

    /// The module part of the name, if the name is qualified.
    pub fn module(&self) -> Option<&str> {
        self.name.split_once('.').map(|(module, _)| module)
    }

    pub fn is_qualified(&self) -> bool {
        self.name.contains('.')
    }

    /// True for `<module>.control`.
    pub fn is_control(&self) -> bool {
        self.name
            .rsplit_once('.')
            .is_some_and(|(_, last)| last == CONTROL)
    }

    /// Timeout to apply: the job's own, else the project default.
    pub fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            self.config.timeout
        } else {
            self.timeout
        }
    }
}

/// Hands out unique job ids: `<name>-<n>`, counting from 0 per name.
#[derive(Debug, Default)]
pub struct JobIds {
    seen: HashMap<String, usize>,
}

impl JobIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, name: &str) -> String {
        let n = self.seen.entry(name.to_string()).or_insert(0);
        let id = format!("{name}-{n}");
        *n += 1;
        id
    }
}
