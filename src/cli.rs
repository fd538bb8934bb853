// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::parse_duration;
use crate::printer::OutputFormat;

/// Command-line arguments for `k3run`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "k3run",
    version,
    about = "Run test cases and control parts of a compiled suite with the k3r runtime.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the project file (TOML).
    #[arg(long, value_name = "PATH", default_value = "k3run.toml")]
    pub config: PathBuf,

    /// Number of tests to run in parallel.
    ///
    /// Default: the available parallelism of this machine.
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Run every test in its own directory `DIR/<id>`.
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Read additional test ids from FILE, one per line ('-' for stdin).
    #[arg(short = 't', long = "tests-file", value_name = "FILE")]
    pub tests_file: Option<PathBuf>,

    /// Per-test timeout, e.g. "30s" or "1m30s". Overrides the project file.
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Module parameter passed to every test (repeatable).
    #[arg(short = 'D', long = "module-par", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub module_pars: Vec<(String, String)>,

    /// Stop after this many failures (0 = never).
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub max_fail: u64,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    pub format: OutputFormat,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `K3RUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Fully qualified test ids, e.g. `mymodule.tc_ok` or `mymodule.control`.
    #[arg(value_name = "TEST_ID")]
    pub tests: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Split `NAME=VALUE`. The name must not be empty.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{s}'")),
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
