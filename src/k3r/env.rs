// src/k3r/env.rs

//! Environment handed to the runtime process.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::model::has_dir_component;
use crate::control::Job;

pub const K3_NAME: &str = "K3_NAME";
pub const K3R_PATH: &str = "K3R_PATH";
pub const LD_LIBRARY_PATH: &str = "LD_LIBRARY_PATH";
pub const PATH: &str = "PATH";
pub const K3_SERVER: &str = "K3_SERVER";
pub const NTT_CACHE: &str = "NTT_CACHE";
pub const NTT_SESSION_ID: &str = "NTT_SESSION_ID";
pub const K3RFLAGS: &str = "K3RFLAGS";
pub const GDB_SERVER: &str = "GDB_SERVER";

/// Talk to the runtime over its own stdin and stdout.
pub const K3_SERVER_PIPE: &str = "pipe,/dev/fd/0,/dev/fd/1";

#[cfg(windows)]
pub const PATH_LIST_SEPARATOR: char = ';';
#[cfg(not(windows))]
pub const PATH_LIST_SEPARATOR: char = ':';

/// Looks up a variable of the ambient environment.
///
/// Injected instead of reading `std::env` directly, so the environment a
/// job sees can be controlled without touching the process environment.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Lookup backed by the environment of the current process.
pub fn ambient() -> EnvLookup {
    Arc::new(|name| std::env::var(name).ok())
}

/// Build the `KEY=VALUE` list applied on top of the inherited environment.
///
/// The result is deterministic for a given job and lookup. Later entries
/// win over earlier ones with the same key; duplicates are kept.
pub fn build_env(job: &Job, lookup: &dyn Fn(&str) -> Option<String>) -> Vec<String> {
    let cfg = &job.config;
    let mut env = Vec::new();

    env.push(format!("{K3_NAME}={}", cfg.name));

    let mut common: Vec<PathBuf> = Vec::new();
    if let Some(cache) = lookup(NTT_CACHE) {
        common.extend(
            cache
                .split(PATH_LIST_SEPARATOR)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        );
    }
    common.push(PathBuf::from("."));
    common.extend(cfg.imports.iter().cloned());

    let runtime_dir = cfg
        .k3
        .runtime
        .parent()
        .filter(|_| has_dir_component(&cfg.k3.runtime))
        .map(Path::to_path_buf);

    env.push(search_path(K3R_PATH, &common, &cfg.k3.plugins, lookup));
    env.push(search_path(LD_LIBRARY_PATH, &common, &cfg.k3.clib_dirs, lookup));
    env.push(search_path(PATH, &common, runtime_dir.as_slice(), lookup));

    for (name, value) in &cfg.variables {
        if lookup(name).is_none() {
            env.push(format!("{name}={value}"));
        }
    }

    env.extend(job.env.iter().cloned());

    let mut pars = cfg.module_parameters.clone();
    pars.extend(job.module_pars.iter().map(|(k, v)| (k.clone(), v.clone())));
    env.extend(pars.iter().map(|(k, v)| format!("{k}={v}")));

    env.push(format!("{K3_SERVER}={K3_SERVER_PIPE}"));
    env
}

/// `NAME=<common>:<extra>:<ambient NAME>`.
fn search_path(
    name: &str,
    common: &[PathBuf],
    extra: &[PathBuf],
    lookup: &dyn Fn(&str) -> Option<String>,
) -> String {
    let mut parts: Vec<String> = common
        .iter()
        .chain(extra)
        .map(|p| p.display().to_string())
        .collect();
    if let Some(ambient) = lookup(name).filter(|v| !v.is_empty()) {
        parts.push(ambient);
    }
    format!("{name}={}", parts.join(&PATH_LIST_SEPARATOR.to_string()))
}
