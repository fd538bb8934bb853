// tests/running_set.rs

use std::time::Duration;

use k3run::control::{Event, Verdict};
use k3run::controller::RunningSet;
use k3run_test_utils::builders::{JobBuilder, ProjectConfigBuilder};

fn begin_of(event: &Event) -> Option<time::OffsetDateTime> {
    match event {
        Event::Stop(ev) => ev.begin,
        _ => panic!("not a stop event"),
    }
}

#[test]
fn stop_gets_time_of_matching_start() {
    let cfg = ProjectConfigBuilder::new().build();
    let job = JobBuilder::new("m.control", cfg).id("m.control-0").build();
    let mut running = RunningSet::new();

    let mut control = Event::start(job.clone(), "m.control");
    running.observe(&mut control);
    std::thread::sleep(Duration::from_millis(5));
    let mut tc = Event::start(job.clone(), "m.tc");
    running.observe(&mut tc);

    let mut stop_tc = Event::stop(job.clone(), "m.tc", Verdict::Pass);
    running.observe(&mut stop_tc);
    assert_eq!(begin_of(&stop_tc), Some(tc.time()));

    let mut stop_control = Event::stop(job, "m.control", Verdict::Pass);
    running.observe(&mut stop_control);
    assert_eq!(begin_of(&stop_control), Some(control.time()));
}

#[test]
fn stop_under_unknown_name_uses_latest_start_of_job() {
    let cfg = ProjectConfigBuilder::new().build();
    let job = JobBuilder::new("m.a", cfg).build();
    let mut running = RunningSet::new();

    let mut start = Event::start(job.clone(), "m.a");
    running.observe(&mut start);
    let mut stop = Event::stop(job, "", Verdict::Fail);
    running.observe(&mut stop);
    assert_eq!(begin_of(&stop), Some(start.time()));
}

#[test]
fn stop_without_start_has_no_begin() {
    let cfg = ProjectConfigBuilder::new().build();
    let job = JobBuilder::new("m.a", cfg).build();
    let mut running = RunningSet::new();

    let mut stop = Event::stop(job, "m.a", Verdict::Pass);
    running.observe(&mut stop);
    assert_eq!(begin_of(&stop), None);
    assert!(running.is_empty());
}

#[test]
fn heartbeats_cover_every_started_job_in_id_order() {
    let cfg = ProjectConfigBuilder::new().build();
    let b = JobBuilder::new("m.b", cfg.clone()).id("m.b-0").build();
    let a = JobBuilder::new("m.a", cfg).id("m.a-0").build();
    let mut running = RunningSet::new();

    for job in [&b, &a] {
        let mut start = Event::start(job.clone(), job.name.clone());
        running.observe(&mut start);
    }
    // Stops do not remove entries.
    let mut stop = Event::stop(a.clone(), "m.a", Verdict::Pass);
    running.observe(&mut stop);

    let ids: Vec<String> = running
        .heartbeats()
        .iter()
        .map(|ev| ev.job().unwrap().id.clone())
        .collect();
    assert_eq!(ids, vec!["m.a-0", "m.b-0"]);
    assert_eq!(running.len(), 2);
}
