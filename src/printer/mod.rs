// src/printer/mod.rs

//! Human- and machine-readable renderings of the event stream.
//!
//! - `console.rs`: coloured progress output for terminals.
//! - `plain.rs`: one tab-separated line per finished test.
//! - `json.rs`: one JSON object per line.
//! - `tap.rs`: Test Anything Protocol.

pub mod console;
pub mod json;
pub mod plain;
pub mod tap;

use std::io::{self, Write};

use clap::ValueEnum;
use crate::control::{Event, StopEvent};

pub use console::ConsolePrinter;
pub use json::JsonPrinter;
pub use plain::PlainPrinter;
pub use tap::TapPrinter;

pub trait Printer: Send {
    fn print(&mut self, event: &Event) -> io::Result<()>;

    /// Called once after the last event.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Output format as exposed on the CLI.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Console,
    Plain,
    Json,
    Tap,
}

/// Printer for `format` writing to `out`.
pub fn for_format<W>(format: OutputFormat, out: W) -> Box<dyn Printer>
where
    W: Write + Send + 'static,
{
    match format {
        OutputFormat::Console => Box::new(ConsolePrinter::new(out)),
        OutputFormat::Plain => Box::new(PlainPrinter::new(out)),
        OutputFormat::Json => Box::new(JsonPrinter::new(out)),
        OutputFormat::Tap => Box::new(TapPrinter::new(out)),
    }
}

/// Seconds between the matching start and the stop, 0 if unknown.
pub(crate) fn elapsed_secs(ev: &StopEvent) -> f64 {
    ev.begin
        .map(|begin| (ev.time - begin).as_seconds_f64())
        .unwrap_or(0.0)
}

/// Name of the job an event belongs to, for error lines.
pub(crate) fn job_name(event: &Event) -> Option<&str> {
    event.job().map(|job| job.name.as_str())
}
