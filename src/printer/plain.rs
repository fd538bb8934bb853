// src/printer/plain.rs

use std::io::{self, Write};

use crate::control::Event;
use crate::printer::{elapsed_secs, job_name, Printer};

/// `<verdict>\t<name>\t<seconds>` per finished test; starts, logs and
/// heartbeats are not shown.
pub struct PlainPrinter<W> {
    out: W,
}

impl<W: Write> PlainPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Printer for PlainPrinter<W> {
    fn print(&mut self, event: &Event) -> io::Result<()> {
        match event {
            Event::Stop(ev) => writeln!(
                self.out,
                "{}\t{}\t{:.2}",
                ev.verdict,
                ev.name,
                elapsed_secs(ev)
            ),
            Event::Error(ev) => match job_name(event) {
                Some(name) => writeln!(self.out, "error: {name}: {}", ev.error),
                None => writeln!(self.out, "error: {}", ev.error),
            },
            Event::Start(_) | Event::Log(_) | Event::Heartbeat(_) => Ok(()),
        }
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
