// src/printer/console.rs

use std::io::{self, Write};

use colored::{ColoredString, Colorize};

use crate::control::{Event, Verdict};
use crate::printer::{elapsed_secs, job_name, Printer};

/// Progress output in the style of `go test -v`.
///
/// ```text
/// === RUN test.A
/// --- pass test.A	(duration=0.12s)
/// ```
pub struct ConsolePrinter<W> {
    out: W,
}

impl<W: Write> ConsolePrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Printer for ConsolePrinter<W> {
    fn print(&mut self, event: &Event) -> io::Result<()> {
        match event {
            Event::Log(ev) => writeln!(self.out, "{}", ev.text.trim_end().dimmed()),
            Event::Start(ev) => writeln!(self.out, "=== RUN {}", ev.name),
            Event::Heartbeat(ev) => {
                writeln!(self.out, "{}", format!("... active {}", ev.job.id).as_str().dimmed())
            }
            Event::Stop(ev) => {
                let line = format!(
                    "--- {} {}\t(duration={:.2}s)",
                    ev.verdict,
                    ev.name,
                    elapsed_secs(ev)
                );
                writeln!(self.out, "{}", paint(ev.verdict, &line))
            }
            Event::Error(ev) => {
                let mut line = String::from("+++ fatal ");
                if let Some(name) = job_name(event) {
                    line.push_str(name);
                    line.push_str(": ");
                }
                line.push_str(&ev.error.to_string());
                writeln!(self.out, "{}", line.as_str().red().bold())
            }
        }
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

fn paint(verdict: Verdict, line: &str) -> ColoredString {
    match verdict {
        Verdict::Pass | Verdict::Done => line.normal(),
        Verdict::Inconc | Verdict::None => line.yellow().bold(),
        Verdict::Fail | Verdict::Error => line.red().bold(),
    }
}
