// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution.
//!
//! ```text
//! execute(&CommandLine)
//!              |
//!              v
//!     build_command()
//!     args, env, piped stdio
//!     own process group with a timeout
//!              |
//!              v
//!          spawn()
//!         /       \
//!     failed       ok
//!        |       /    \
//!        |  no timeout  timeout
//!        |  wait_with   wait_with_timeout
//!        |  _output     (kill group on deadline)
//!         \      |      /
//!          v     v     v
//!        CommandResult
//!   { exit_code, stdout, stderr, timed_out }
//! ```
//!
//! A non-zero exit or a missing executable is a normal `CommandResult`;
//! only a malformed command line or lost output is an `Err`.

use bon::Builder;
use std::process::{Command, Stdio};
use std::time::Duration;
use tracing::{debug, trace};

use super::builder::{CommandLine, CommandResult};
use super::io::wait_with_timeout;
use crate::error::ProcessError;

/// Executes external commands synchronously.
pub trait CommandRunner: Send + Sync {
    /// Runs `command` to completion and captures its output.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` only if the command line is malformed or the
    /// process output could not be collected. Launch failures and non-zero
    /// exits are reported through [`CommandResult::success`].
    fn execute(&self, command: &CommandLine) -> Result<CommandResult, ProcessError>;
}

/// [`CommandRunner`] backed by `std::process`.
#[derive(Debug, Clone, Default, Builder)]
pub struct ProcessRunner {
    #[builder(setters(name = with_timeout))]
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// Creates a runner without a timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the configured timeout.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn build_command(&self, command: &CommandLine) -> Command {
        let mut cmd = Command::new(command.program());
        cmd.args(command.arg_values());

        // own process group, so a timeout can take down every descendant
        if self.timeout.is_some() {
            own_process_group(&mut cmd);
        }

        for (key, value) in command.env_vars() {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

#[cfg(unix)]
fn own_process_group(cmd: &mut Command) {
    use std::os::unix::process::CommandExt;
    cmd.process_group(0);
}

#[cfg(not(unix))]
fn own_process_group(_cmd: &mut Command) {}

impl CommandRunner for ProcessRunner {
    fn execute(&self, command: &CommandLine) -> Result<CommandResult, ProcessError> {
        if command.program().as_os_str().is_empty() {
            return Err(ProcessError::InvalidCommand(
                "program name is empty".to_string(),
            ));
        }

        let cmd_line = command.display();
        debug!(cmd = %cmd_line, "exec");

        let child = match self.build_command(command).spawn() {
            Ok(child) => child,
            Err(e) => {
                debug!(cmd = %cmd_line, error = %e, "failed to spawn");
                return Ok(CommandResult::not_started(format!(
                    "failed to execute {}: {e}",
                    command.display_name()
                )));
            }
        };
        trace!(process = %command.display_name(), pid = child.id(), "spawned");

        let result = match self.timeout {
            Some(timeout) => wait_with_timeout(child, timeout, &cmd_line)?,
            None => {
                let output =
                    child
                        .wait_with_output()
                        .map_err(|e| ProcessError::OutputError {
                            command: cmd_line.clone(),
                            message: e.to_string(),
                        })?;
                CommandResult::from_output(&output)
            }
        };

        trace!(
            process = %command.display_name(),
            exit_code = ?result.exit_code(),
            timed_out = result.timed_out(),
            "completed"
        );
        Ok(result)
    }
}
