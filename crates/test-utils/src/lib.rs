pub mod builders;
pub mod fake_runner;

use std::collections::HashMap;
use std::sync::{Arc, Once};

use k3run::control::Event;
use k3run::k3r::EnvLookup;
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=k3run=trace cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Run a future with a 10-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(10), f)
        .await
        .expect("Test timed out after 10 seconds")
}

/// Drain an event stream until it closes.
pub async fn collect(mut rx: mpsc::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

/// Compact one-line rendering for assertions, e.g. `StopEvent test.A pass`.
pub fn describe(event: &Event) -> String {
    match event {
        Event::Start(ev) => format!("StartEvent {}", ev.name),
        Event::Stop(ev) => format!("StopEvent {} {}", ev.name, ev.verdict),
        Event::Log(ev) => format!("LogEvent {}", ev.text),
        Event::Error(ev) => format!("ErrorEvent {}", ev.error),
        Event::Heartbeat(ev) => format!("HeartbeatEvent {}", ev.job.id),
    }
}

pub fn describe_all(events: &[Event]) -> Vec<String> {
    events.iter().map(describe).collect()
}

/// Environment lookup over a fixed set of variables.
///
/// `PATH` is forwarded from the real environment unless given, so scripts
/// can still find `sleep` and friends.
pub fn env_lookup(vars: &[(&str, &str)]) -> EnvLookup {
    let mut map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    if !map.contains_key("PATH") {
        if let Ok(path) = std::env::var("PATH") {
            map.insert("PATH".to_string(), path);
        }
    }
    Arc::new(move |name| map.get(name).cloned())
}
