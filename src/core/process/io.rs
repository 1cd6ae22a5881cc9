// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Output capture for processes with a deadline.
//!
//! ```text
//! wait_with_timeout()
//!   stdout/stderr reader threads (read_to_end)
//!   poll try_wait() until exit or deadline
//!   deadline hit --> kill the process group + reap
//!   exited, but pipes still held by a descendant at the deadline
//!            --> kill the process group
//!   join readers within a grace period, abandon the rest
//!            --> CommandResult
//! ```
//!
//! On Unix the child leads its own process group (see `ProcessRunner`), so
//! helpers git starts (`ssh`, `git-remote-https`, `git-lfs`) die with it.

use std::io::Read;
use std::process::Child;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{trace, warn};

use super::builder::CommandResult;
use crate::error::ProcessError;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How long readers may take to drain once the process group is gone.
const READER_GRACE: Duration = Duration::from_millis(500);

/// Threads draining the child's stdout and stderr.
struct Readers {
    stdout: Option<JoinHandle<Vec<u8>>>,
    stderr: Option<JoinHandle<Vec<u8>>>,
}

impl Readers {
    fn spawn(child: &mut Child) -> Self {
        Self {
            stdout: spawn_reader(child.stdout.take()),
            stderr: spawn_reader(child.stderr.take()),
        }
    }

    fn finished(&self) -> bool {
        [&self.stdout, &self.stderr]
            .into_iter()
            .flatten()
            .all(JoinHandle::is_finished)
    }

    /// Waits until both readers are done or `until` passes.
    fn finish_by(&self, until: Instant) -> bool {
        while !self.finished() {
            if Instant::now() >= until {
                return false;
            }
            std::thread::sleep(POLL_INTERVAL);
        }
        true
    }

    fn collect(self, command: &str) -> Result<(String, String), ProcessError> {
        Ok((
            collect_reader(self.stdout, command)?,
            collect_reader(self.stderr, command)?,
        ))
    }
}

fn spawn_reader<R>(stream: Option<R>) -> Option<JoinHandle<Vec<u8>>>
where
    R: Read + Send + 'static,
{
    stream.map(|mut stream| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            if let Err(e) = stream.read_to_end(&mut buf) {
                trace!(error = %e, "stream closed with error");
            }
            buf
        })
    })
}

/// Joins a finished reader. A reader still blocked is left behind with
/// whatever it has read.
fn collect_reader(
    handle: Option<JoinHandle<Vec<u8>>>,
    command: &str,
) -> Result<String, ProcessError> {
    let Some(handle) = handle else {
        return Ok(String::new());
    };
    if !handle.is_finished() {
        warn!(cmd = %command, "output pipe still open, abandoning reader");
        return Ok(String::new());
    }
    handle
        .join()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .map_err(|_| ProcessError::OutputError {
            command: command.to_string(),
            message: "reader thread panicked".to_string(),
        })
}

/// Sends `SIGKILL` to the process group led by `pid`.
#[cfg(unix)]
fn kill_process_group(pid: u32) -> bool {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Ok(pid) = i32::try_from(pid) else {
        return false;
    };
    match killpg(Pid::from_raw(pid), Signal::SIGKILL) {
        Ok(()) => true,
        Err(e) => {
            trace!(pid, error = %e, "killpg failed");
            false
        }
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: u32) -> bool {
    false
}

/// Waits for `child`, killing it and its descendants once `timeout` has elapsed.
pub(super) fn wait_with_timeout(
    mut child: Child,
    timeout: Duration,
    command: &str,
) -> Result<CommandResult, ProcessError> {
    let pid = child.id();
    let readers = Readers::spawn(&mut child);

    let io_err = |e: std::io::Error| ProcessError::OutputError {
        command: command.to_string(),
        message: e.to_string(),
    };

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait().map_err(io_err)? {
            break Some(status);
        }
        if Instant::now() >= deadline {
            warn!(cmd = %command, timeout = ?timeout, "process timed out");
            if !kill_process_group(pid) {
                child.kill().map_err(io_err)?;
            }
            child.wait().map_err(io_err)?;
            break None;
        }
        std::thread::sleep(POLL_INTERVAL);
    };

    if status.is_some() && !readers.finish_by(deadline) {
        warn!(cmd = %command, "descendants outlived the process, killing its group");
        kill_process_group(pid);
    }
    readers.finish_by(Instant::now() + READER_GRACE);
    let (stdout, stderr) = readers.collect(command)?;

    Ok(match status {
        Some(status) => CommandResult::new(status.code(), stdout, stderr),
        None => CommandResult::timed_out_with(stdout, stderr),
    })
}
