// tests/k3r_env.rs

use k3run::k3r::env::{K3_SERVER_PIPE, PATH_LIST_SEPARATOR};
use k3run::k3r::build_env;
use k3run_test_utils::builders::{JobBuilder, ProjectConfigBuilder};
use proptest::prelude::*;

fn lookup(vars: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    move |name| {
        vars.iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.to_string())
    }
}

fn value<'a>(env: &'a [String], key: &str) -> Option<&'a str> {
    env.iter()
        .rev()
        .find_map(|e| e.strip_prefix(key)?.strip_prefix('='))
}

fn sep(parts: &[&str]) -> String {
    parts.join(&PATH_LIST_SEPARATOR.to_string())
}

#[test]
fn minimal_job_environment() {
    let cfg = ProjectConfigBuilder::new().name("suite").build();
    let job = JobBuilder::new("m.a", cfg).build();

    let env = build_env(&job, &lookup(&[]));

    assert_eq!(
        env,
        vec![
            "K3_NAME=suite".to_string(),
            "K3R_PATH=.".to_string(),
            "LD_LIBRARY_PATH=.".to_string(),
            "PATH=.".to_string(),
            format!("K3_SERVER={K3_SERVER_PIPE}"),
        ]
    );
}

#[test]
fn search_paths_are_assembled_in_order() {
    let cfg = ProjectConfigBuilder::new()
        .import("/imp")
        .plugin("/plugins")
        .clib_dir("/clib")
        .runtime("/opt/k3/bin/k3r")
        .build();
    let job = JobBuilder::new("m.a", cfg).build();
    let ambient = lookup(&[
        ("NTT_CACHE", "/cache1:/cache2"),
        ("K3R_PATH", "/old/k3r"),
        ("PATH", "/usr/bin"),
    ]);

    let env = build_env(&job, &ambient);

    assert_eq!(
        value(&env, "K3R_PATH"),
        Some(sep(&["/cache1", "/cache2", ".", "/imp", "/plugins", "/old/k3r"]).as_str())
    );
    assert_eq!(
        value(&env, "LD_LIBRARY_PATH"),
        Some(sep(&["/cache1", "/cache2", ".", "/imp", "/clib"]).as_str())
    );
    assert_eq!(
        value(&env, "PATH"),
        Some(sep(&["/cache1", "/cache2", ".", "/imp", "/opt/k3/bin", "/usr/bin"]).as_str())
    );
}

#[test]
fn bare_runtime_name_adds_no_path_entry() {
    let cfg = ProjectConfigBuilder::new().runtime("k3r").build();
    let job = JobBuilder::new("m.a", cfg).build();
    let env = build_env(&job, &lookup(&[]));
    assert_eq!(value(&env, "PATH"), Some("."));
}

#[test]
fn ambient_variables_win_over_declared_ones() {
    let cfg = ProjectConfigBuilder::new()
        .variable("SUT_HOST", "10.0.0.1")
        .variable("SUT_PORT", "4000")
        .build();
    let job = JobBuilder::new("m.a", cfg).build();

    let env = build_env(&job, &lookup(&[("SUT_HOST", "192.168.0.1")]));

    assert!(!env.iter().any(|e| e.starts_with("SUT_HOST=")));
    assert_eq!(value(&env, "SUT_PORT"), Some("4000"));
}

#[test]
fn job_env_and_module_parameters_follow_variables() {
    let cfg = ProjectConfigBuilder::new()
        .variable("A", "from-config")
        .module_parameter("m.PX_B", "1")
        .module_parameter("m.PX_A", "1")
        .build();
    let job = JobBuilder::new("m.a", cfg)
        .env("A=from-job")
        .env("A=again")
        .module_par("m.PX_A", "2")
        .build();

    let env = build_env(&job, &lookup(&[]));
    let tail: Vec<&str> = env[4..].iter().map(String::as_str).collect();

    let server = format!("K3_SERVER={K3_SERVER_PIPE}");
    assert_eq!(
        tail,
        vec![
            "A=from-config",
            "A=from-job",
            "A=again",
            "m.PX_A=2",
            "m.PX_B=1",
            server.as_str(),
        ]
    );
    assert_eq!(value(&env, "A"), Some("again"));
}

proptest! {
    #[test]
    fn environment_is_deterministic_and_ends_with_transport(
        vars in proptest::collection::btree_map("[A-Z]{1,6}", "[a-z0-9]{0,6}", 0..6),
        pars in proptest::collection::btree_map("m\\.[A-Z]{1,6}", "[0-9]{1,3}", 0..6),
    ) {
        let mut builder = ProjectConfigBuilder::new();
        for (k, v) in &vars {
            builder = builder.variable(k, v);
        }
        let mut job = JobBuilder::new("m.a", builder.build());
        for (k, v) in &pars {
            job = job.module_par(k, v);
        }
        let job = job.build();

        let first = build_env(&job, &lookup(&[]));
        let second = build_env(&job, &lookup(&[]));
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), 5 + vars.len() + pars.len());
        let last = first.last().cloned().unwrap_or_default();
        prop_assert!(last.starts_with("K3_SERVER="));
    }
}
