// src/printer/tap.rs

use std::io::{self, Write};

use crate::control::Event;
use crate::printer::Printer;

/// Test Anything Protocol output.
///
/// Every finished test and every error is a test point. The plan is
/// written by [`Printer::finish`], after the last point.
pub struct TapPrinter<W> {
    out: W,
    points: usize,
    failed: usize,
}

impl<W: Write> TapPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            points: 0,
            failed: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Printer for TapPrinter<W> {
    fn print(&mut self, event: &Event) -> io::Result<()> {
        match event {
            Event::Log(ev) => {
                for line in ev.text.trim_end().lines() {
                    writeln!(self.out, "# {line}")?;
                }
                Ok(())
            }
            Event::Start(ev) => writeln!(self.out, "# {} ({}): started", ev.name, ev.job.id),
            Event::Heartbeat(_) => Ok(()),
            Event::Stop(ev) => {
                self.points += 1;
                let status = if ev.verdict.is_success() {
                    "ok"
                } else {
                    self.failed += 1;
                    "not ok"
                };
                writeln!(self.out, "{status} {} - {}", self.points, ev.name)
            }
            Event::Error(ev) => {
                self.points += 1;
                self.failed += 1;
                match event.job() {
                    Some(job) => writeln!(
                        self.out,
                        "not ok {} - {}: {}",
                        self.points, job.name, ev.error
                    ),
                    None => writeln!(self.out, "not ok {} - {}", self.points, ev.error),
                }
            }
        }
    }

    fn finish(&mut self) -> io::Result<()> {
        match self.points {
            0 => writeln!(self.out, "1..0 # SKIP no tests")?,
            n if self.failed == 0 => {
                writeln!(self.out, "# passed all {n} tests.")?;
                writeln!(self.out, "1..{n}")?;
            }
            n => {
                writeln!(self.out, "# failed {} among {n} tests.", self.failed)?;
                writeln!(self.out, "1..{n}")?;
            }
        }
        self.out.flush()
    }
}
