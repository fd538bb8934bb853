// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Project file as read from TOML, before validation.
///
/// ```toml
/// name = "suite"
/// imports = ["lib/common"]
/// timeout = "30s"
///
/// [variables]
/// SUT_HOST = "127.0.0.1"
///
/// [module_parameters]
/// "Tests.PX_RETRIES" = "3"
///
/// [k3]
/// t3xf = "build/suite.t3xf"
/// runtime = "k3r"
/// plugins = ["plugins"]
/// clib_dirs = ["clib"]
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawProjectConfig {
    /// Suite name, exported to the runtime as `K3_NAME`.
    #[serde(default)]
    pub name: String,

    /// Directories of imported libraries. They may provide plugins and
    /// shared libraries, so all of them end up on the runtime search paths.
    #[serde(default)]
    pub imports: Vec<PathBuf>,

    /// Default per-job timeout, e.g. `"30s"`.
    #[serde(default)]
    pub timeout: Option<String>,

    /// Declared variables passed to the runtime environment.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,

    /// Module parameters applied to every job.
    #[serde(default)]
    pub module_parameters: BTreeMap<String, String>,

    #[serde(default)]
    pub k3: K3Section,
}

/// `[k3]` section: where the compiled suite and the runtime live.
#[derive(Debug, Clone, Deserialize)]
pub struct K3Section {
    /// Compiled test suite.
    #[serde(default)]
    pub t3xf: PathBuf,

    /// Runtime executable. A bare name is looked up on `PATH`.
    #[serde(default = "default_runtime")]
    pub runtime: PathBuf,

    /// Plugin directories, appended to `K3R_PATH`.
    #[serde(default)]
    pub plugins: Vec<PathBuf>,

    /// C library directories, appended to `LD_LIBRARY_PATH`.
    #[serde(default)]
    pub clib_dirs: Vec<PathBuf>,
}

fn default_runtime() -> PathBuf {
    PathBuf::from("k3r")
}

impl Default for K3Section {
    fn default() -> Self {
        Self {
            t3xf: PathBuf::new(),
            runtime: default_runtime(),
            plugins: Vec::new(),
            clib_dirs: Vec::new(),
        }
    }
}

/// Validated project configuration.
///
/// Obtain one through `ProjectConfig::try_from(raw)` or
/// [`crate::config::load_and_validate`].
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub name: String,
    pub imports: Vec<PathBuf>,
    /// `Duration::ZERO` means no limit.
    pub timeout: Duration,
    pub variables: BTreeMap<String, String>,
    pub module_parameters: BTreeMap<String, String>,
    pub k3: K3Section,
}

impl ProjectConfig {
    pub(crate) fn new_unchecked(raw: RawProjectConfig, timeout: Duration) -> Self {
        Self {
            name: raw.name,
            imports: raw.imports,
            timeout,
            variables: raw.variables,
            module_parameters: raw.module_parameters,
            k3: raw.k3,
        }
    }

    /// Make relative paths relative to `base` (usually the directory of the
    /// project file). A runtime given as a bare name is left alone so it is
    /// still looked up on `PATH`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };

        resolve(&mut self.k3.t3xf);
        if has_dir_component(&self.k3.runtime) {
            resolve(&mut self.k3.runtime);
        }
        self.imports.iter_mut().for_each(resolve);
        self.k3.plugins.iter_mut().for_each(resolve);
        self.k3.clib_dirs.iter_mut().for_each(resolve);
    }
}

/// True if `path` is more than a bare file name.
pub fn has_dir_component(path: &Path) -> bool {
    path.parent().is_some_and(|p| !p.as_os_str().is_empty())
}
