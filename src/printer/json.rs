// src/printer/json.rs

use std::io::{self, Write};

use serde::Serialize;

use crate::control::Event;
use crate::printer::Printer;

/// One record per event. Only the fields that apply are present.
#[derive(Debug, Serialize)]
struct Record<'a> {
    /// Unix seconds.
    time: i64,
    event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    job_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verdict: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

/// JSON lines; heartbeats are skipped.
pub struct JsonPrinter<W> {
    out: W,
}

impl<W: Write> JsonPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Printer for JsonPrinter<W> {
    fn print(&mut self, event: &Event) -> io::Result<()> {
        let time = event.time().unix_timestamp();
        let job_id = event.job().map(|job| job.id.as_str());
        let record = match event {
            Event::Heartbeat(_) => return Ok(()),
            Event::Log(ev) => Record {
                time,
                event: "log",
                job_id,
                name: None,
                verdict: None,
                text: Some(ev.text.clone()),
            },
            Event::Start(ev) => Record {
                time,
                event: "start",
                job_id,
                name: Some(ev.name.as_str()),
                verdict: None,
                text: None,
            },
            Event::Stop(ev) => Record {
                time,
                event: "stop",
                job_id,
                name: Some(ev.name.as_str()),
                verdict: Some(ev.verdict.as_str()),
                text: None,
            },
            Event::Error(ev) => Record {
                time,
                event: "error",
                job_id,
                name: None,
                verdict: None,
                text: Some(ev.error.to_string()),
            },
        };
        serde_json::to_writer(&mut self.out, &record)?;
        writeln!(self.out)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
