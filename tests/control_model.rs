// tests/control_model.rs

use std::sync::Arc;
use std::time::Duration;

use k3run::control::{unwrap_job, Event, JobError, JobIds, Verdict};
use k3run::k3r::K3rError;
use k3run_test_utils::builders::{JobBuilder, ProjectConfigBuilder};

#[test]
fn job_ids_count_per_name() {
    let mut ids = JobIds::new();
    let got: Vec<String> = ["a", "a", "b", "a"].iter().map(|n| ids.next(n)).collect();
    assert_eq!(got, vec!["a-0", "a-1", "b-0", "a-2"]);
}

#[test]
fn job_name_helpers() {
    let cfg = ProjectConfigBuilder::new().build();
    let tc = JobBuilder::new("test.A", cfg.clone()).build();
    assert!(tc.is_qualified());
    assert!(!tc.is_control());
    assert_eq!(tc.module(), Some("test"));

    let control = JobBuilder::new("test.control", cfg.clone()).build();
    assert!(control.is_control());

    let bare = JobBuilder::new("control", cfg).build();
    assert!(!bare.is_qualified());
    assert_eq!(bare.module(), None);
}

#[test]
fn effective_timeout_falls_back_to_project() {
    let cfg = ProjectConfigBuilder::new().timeout("2s").build();
    let default = JobBuilder::new("m.a", cfg.clone()).build();
    assert_eq!(default.effective_timeout(), Duration::from_secs(2));

    let own = JobBuilder::new("m.a", cfg)
        .timeout(Duration::from_millis(500))
        .build();
    assert_eq!(own.effective_timeout(), Duration::from_millis(500));
}

#[test]
fn verdicts_parse_case_insensitively() {
    assert_eq!("PASS".parse::<Verdict>(), Ok(Verdict::Pass));
    assert_eq!("inconc".parse::<Verdict>(), Ok(Verdict::Inconc));
    assert!("maybe".parse::<Verdict>().is_err());
    assert!(Verdict::Done.is_success());
    assert!(!Verdict::None.is_success());
}

#[test]
fn unwrap_job_finds_job_of_every_variant() {
    let cfg = ProjectConfigBuilder::new().build();
    let job = JobBuilder::new("m.a", cfg).id("m.a-0").build();

    let events = [
        Event::start(job.clone(), "m.a"),
        Event::stop(job.clone(), "m.a", Verdict::Pass),
        Event::log(job.clone(), "hello"),
        Event::heartbeat(job.clone()),
        Event::job_error(job.clone(), K3rError::Timeout),
    ];
    for event in &events {
        assert!(Arc::ptr_eq(unwrap_job(event).unwrap(), &job));
    }
}

#[test]
fn unwrap_job_looks_inside_wrapped_errors() {
    let cfg = ProjectConfigBuilder::new().build();
    let job = JobBuilder::new("m.a", cfg).build();

    let wrapped = JobError {
        job: job.clone(),
        source: Box::new(K3rError::NoSuchModule),
    };
    let event = Event::error(anyhow::Error::new(wrapped).context("running m.a"));
    assert_eq!(unwrap_job(&event).map(|j| j.name.as_str()), Some("m.a"));

    let orphan = Event::error(anyhow::anyhow!("factory broke"));
    assert!(unwrap_job(&orphan).is_none());
}

#[test]
fn failures_are_bad_stops_and_errors() {
    let cfg = ProjectConfigBuilder::new().build();
    let job = JobBuilder::new("m.a", cfg).build();

    assert!(!Event::stop(job.clone(), "m.a", Verdict::Pass).is_failure());
    assert!(!Event::stop(job.clone(), "m.control", Verdict::Done).is_failure());
    assert!(Event::stop(job.clone(), "m.a", Verdict::Inconc).is_failure());
    assert!(Event::job_error(job.clone(), K3rError::Timeout).is_failure());
    assert!(!Event::log(job, "x").is_failure());
}
