// src/k3r/protocol.rs

//! Line protocol spoken with the runtime.
//!
//! Requests go to the runtime's stdin:
//!
//! ```text
//! tciRootModule <module>
//! tciStartControl                      (for <module>.control)
//! tciStartTestCase "<name>" {<args>}   (everything else)
//! ```
//!
//! Responses arrive on its stdout, one message per line; the first token
//! selects the kind.

use std::fmt::Write as _;

use crate::control::job::CONTROL;
use crate::control::Verdict;
use crate::k3r::error::K3rError;

const ROOT_MODULE: &str = "tciRootModule";
const START_CONTROL: &str = "tciStartControl";
const START_TEST_CASE: &str = "tciStartTestCase";

const TEST_CASE_STARTED: &str = "tciTestCaseStarted";
const TEST_CASE_TERMINATED: &str = "tciTestCaseTerminated";
const CONTROL_TERMINATED: &str = "tciControlTerminated";
const ERROR: &str = "tciError";

/// Request text starting the job `name` with the given literal arguments.
pub fn request(name: &str, args: &[String]) -> String {
    let mut req = String::new();
    let last = match name.split_once('.') {
        Some((module, rest)) => {
            let _ = writeln!(req, "{ROOT_MODULE} {module}");
            rest
        }
        None => name,
    };
    if last == CONTROL {
        let _ = writeln!(req, "{START_CONTROL}");
    } else {
        let _ = writeln!(req, "{START_TEST_CASE} \"{name}\" {{{}}}", args.join(","));
    }
    req
}

/// A response line sent by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    TestCaseStarted { name: String },
    TestCaseTerminated { verdict: Verdict },
    /// The runtime never reports a verdict for control parts.
    ControlTerminated,
    /// `code` is the raw token including its trailing colon, e.g. `E101:`.
    Error { code: String, args: Vec<String> },
}

/// Parse one response line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Message>, K3rError> {
    let line = line.trim();
    let mut fields = line.split_whitespace();
    let Some(kind) = fields.next() else {
        return Ok(None);
    };
    let invalid = || K3rError::InvalidMessage(line.to_string());

    let msg = match kind {
        TEST_CASE_STARTED => {
            let name = fields.next().ok_or_else(invalid)?;
            Message::TestCaseStarted {
                name: unquote(name).to_string(),
            }
        }
        TEST_CASE_TERMINATED => {
            // Verdicts form a closed set; anything else is a protocol violation, not a stop.
            let verdict = fields
                .next()
                .and_then(|v| v.parse::<Verdict>().ok())
                .ok_or_else(invalid)?;
            Message::TestCaseTerminated { verdict }
        }
        CONTROL_TERMINATED => Message::ControlTerminated,
        ERROR => {
            let code = fields.next().ok_or_else(invalid)?.to_string();
            Message::Error {
                code,
                args: fields.map(str::to_string).collect(),
            }
        }
        _ => return Err(invalid()),
    };
    Ok(Some(msg))
}

/// Map a runtime error code to its error kind.
///
/// Unknown codes keep the code and all following tokens as detail.
pub fn classify(code: &str, args: &[String]) -> K3rError {
    match code.trim_end_matches(':') {
        "E101" => K3rError::NoSuchModule,
        "E102" => K3rError::NoSuchTestCase,
        "E103" => K3rError::NoSuchControl,
        "E200" => K3rError::RuntimeNotReady,
        "E201" => K3rError::ModuleNotReady,
        "E202" => K3rError::TestNotReady,
        "E203" => K3rError::ControlNotReady,
        "E999" => K3rError::NotImplemented(args.join(" ")),
        _ => {
            let mut detail = code.to_string();
            for arg in args {
                detail.push(' ');
                detail.push_str(arg);
            }
            K3rError::Unknown(detail)
        }
    }
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}
