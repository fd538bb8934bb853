// src/k3r/logfile.rs

//! Finalization of the runtime's log file.
//!
//! After the runtime exits its log may be cut off in the middle of a line.
//! [`finalize`] terminates the last line and appends a trailer recording
//! when the runtime finished and with which exit code:
//!
//! ```text
//! 20240131T235959.999999|exit|0
//! ```

use std::io::{self, SeekFrom};
use std::path::Path;

use time::macros::format_description;
use time::OffsetDateTime;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::debug;

/// Append the trailer to `path`, creating the file if needed.
///
/// A missing final newline is added first; an existing one is not doubled.
pub async fn finalize(path: &Path, exit_code: i32) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .await?;

    let mut out = Vec::new();
    if file.metadata().await?.len() > 0 {
        file.seek(SeekFrom::End(-1)).await?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last).await?;
        if last[0] != b'\n' {
            out.push(b'\n');
        }
    }

    let line = trailer(local_now(), exit_code).map_err(io::Error::other)?;
    out.extend_from_slice(line.as_bytes());

    file.seek(SeekFrom::End(0)).await?;
    file.write_all(&out).await?;
    file.flush().await?;

    debug!(path = %path.display(), exit_code, "log file finalized");
    Ok(())
}

/// The trailer line for a runtime that exited at `at` with `exit_code`.
pub fn trailer(at: OffsetDateTime, exit_code: i32) -> Result<String, time::error::Format> {
    let stamp = at.format(format_description!(
        "[year][month][day]T[hour][minute][second]"
    ))?;
    Ok(format!("{stamp}.999999|exit|{exit_code}\n"))
}

/// Current local time, UTC when the local offset cannot be determined.
pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
