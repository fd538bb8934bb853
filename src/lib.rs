// src/lib.rs

pub mod cli;
pub mod config;
pub mod control;
pub mod controller;
pub mod errors;
pub mod k3r;
pub mod logging;
pub mod printer;
pub mod session;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{load_and_validate, ProjectConfig};
use crate::control::{Job, JobIds, JobQueue, RunContext};
use crate::controller::Controller;
use crate::errors::{K3runError, Result};
use crate::k3r::K3rFactory;
use crate::session::LocalSessions;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - test id collection and job construction
/// - the controller with the k3r runner factory
/// - the printer
/// - Ctrl-C handling and `--max-fail`
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = Arc::new(load_and_validate(&args.config)?);

    let mut names = args.tests.clone();
    if let Some(path) = &args.tests_file {
        names.extend(read_tests_file(path)?);
    }
    if names.is_empty() {
        return Err(K3runError::NoTests);
    }

    let jobs = build_jobs(&cfg, &names, &args);
    let workers = args.jobs.unwrap_or_else(default_workers);
    info!(tests = jobs.len(), workers, "starting run");

    let ctx = RunContext::new();

    // Ctrl-C → cancel everything still running.
    {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
            info!("interrupted; cancelling run");
            ctx.cancel();
        });
    }

    let (job_tx, queue) = JobQueue::channel(workers);
    tokio::spawn(async move {
        for job in jobs {
            if job_tx.send(job).await.is_err() {
                break;
            }
        }
    });

    let factory = K3rFactory::new(queue, Arc::new(LocalSessions::default()));
    let controller = Controller::new(factory).with_max_workers(workers);
    let mut events = controller.run(ctx.clone());

    let mut printer = printer::for_format(args.format, io::stdout());
    let mut failures = 0u64;
    while let Some(event) = events.recv().await {
        if event.is_failure() {
            failures += 1;
            if args.max_fail > 0 && failures == args.max_fail {
                warn!(failures, "failure limit reached; cancelling run");
                ctx.cancel();
            }
        }
        printer.print(&event)?;
    }
    printer.finish()?;

    debug!(failures, "run finished");
    if failures > 0 {
        Err(K3runError::Failed(failures))
    } else {
        Ok(())
    }
}

/// One job per name, with unique ids and the CLI overrides applied.
pub fn build_jobs(cfg: &Arc<ProjectConfig>, names: &[String], args: &CliArgs) -> Vec<Arc<Job>> {
    let module_pars: BTreeMap<String, String> = args.module_pars.iter().cloned().collect();
    let mut ids = JobIds::new();

    names
        .iter()
        .map(|name| {
            let mut job = Job::new(name.clone(), Arc::clone(cfg));
            job.id = ids.next(name);
            job.timeout = args.timeout.unwrap_or_default();
            job.module_pars = module_pars.clone();
            job.dir = args.output_dir.clone();
            Arc::new(job)
        })
        .collect()
}

/// Test ids from `path` (`-` is stdin).
fn read_tests_file(path: &Path) -> Result<Vec<String>> {
    let ids = if path == Path::new("-") {
        read_test_ids(io::stdin().lock())?
    } else {
        read_test_ids(BufReader::new(File::open(path)?))?
    };
    Ok(ids)
}

/// One test id per line; blank lines and `#` comments are skipped.
pub fn read_test_ids(reader: impl BufRead) -> io::Result<Vec<String>> {
    let mut ids = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.split('#').next().unwrap_or_default().trim();
        if !line.is_empty() {
            ids.push(line.to_string());
        }
    }
    Ok(ids)
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
