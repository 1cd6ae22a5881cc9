// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command line builder and command result.
//!
//! ```text
//! CommandLine
//!  • new/find/exists
//!  • arg/args/secret_arg/env
//!  • display()  --> redacted text for logs
//!
//! CommandResult { exit_code, stdout, stderr, timed_out }
//!  • success() / output()
//! ```

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::{OnceLock, RwLock};

/// Static cache for executable paths resolved via `which`.
static EXECUTABLE_CACHE: OnceLock<RwLock<BTreeMap<String, PathBuf>>> = OnceLock::new();

/// Get the executable cache, initializing if needed.
fn exe_cache() -> &'static RwLock<BTreeMap<String, PathBuf>> {
    EXECUTABLE_CACHE.get_or_init(|| RwLock::new(BTreeMap::new()))
}

/// A single argument. `shown` replaces `value` whenever the argument is displayed.
#[derive(Clone)]
struct Arg {
    value: OsString,
    shown: Option<String>,
}

impl Arg {
    fn display(&self) -> String {
        self.shown
            .clone()
            .unwrap_or_else(|| self.value.to_string_lossy().into_owned())
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.display())
    }
}

/// A fully formed invocation of an external executable.
///
/// Arguments are handed to the process as-is, never through a shell.
#[derive(Debug, Clone)]
pub struct CommandLine {
    program: PathBuf,
    args: Vec<Arg>,
    env: Vec<(String, String)>,
}

impl CommandLine {
    /// Creates a command line for the given program.
    ///
    /// The program can be an absolute path or a bare name resolved via PATH
    /// when the process is spawned.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Checks if an executable exists in PATH.
    #[must_use]
    pub fn exists(program: &str) -> bool {
        Self::find(program).is_some()
    }

    /// Finds the full path to an executable in PATH.
    ///
    /// Results are cached for subsequent lookups.
    #[must_use]
    pub fn find(program: &str) -> Option<PathBuf> {
        {
            let cache = exe_cache()
                .read()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(path) = cache.get(program) {
                return Some(path.clone());
            }
        }

        which::which(program).map_or(None, |path| {
            {
                let mut cache = exe_cache()
                    .write()
                    .unwrap_or_else(std::sync::PoisonError::into_inner);
                cache.insert(program.to_string(), path.clone());
            }
            Some(path)
        })
    }

    /// Adds an argument.
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(Arg {
            value: arg.as_ref().to_os_string(),
            shown: None,
        });
        self
    }

    /// Adds multiple arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    /// Adds an argument whose real value must never appear in logs.
    ///
    /// `shown` is what [`CommandLine::display`] and `Debug` print instead.
    #[must_use]
    pub fn secret_arg(mut self, value: impl AsRef<OsStr>, shown: impl Into<String>) -> Self {
        self.args.push(Arg {
            value: value.as_ref().to_os_string(),
            shown: Some(shown.into()),
        });
        self
    }

    /// Adds an environment variable on top of the inherited environment.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Returns the program path.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Returns the argument values passed to the process.
    pub fn arg_values(&self) -> impl Iterator<Item = &OsStr> {
        self.args.iter().map(|a| a.value.as_os_str())
    }

    /// Returns the arguments as shown in logs.
    #[must_use]
    pub fn shown_args(&self) -> Vec<String> {
        self.args.iter().map(Arg::display).collect()
    }

    /// Returns the extra environment variables.
    #[must_use]
    pub fn env_vars(&self) -> &[(String, String)] {
        &self.env
    }

    /// Returns the display name for this process (the program's file stem).
    #[must_use]
    pub fn display_name(&self) -> String {
        self.program.file_stem().map_or_else(
            || "process".to_string(),
            |s| s.to_string_lossy().into_owned(),
        )
    }

    /// Returns the full command line as a string, with secrets redacted.
    #[must_use]
    pub fn display(&self) -> String {
        use std::fmt::Write as _;

        let mut cmd = format!("{}", self.program.display());
        for arg in &self.args {
            let shown = arg.display();
            if shown.contains(' ') {
                let _ = write!(cmd, " \"{shown}\"");
            } else {
                let _ = write!(cmd, " {shown}");
            }
        }
        cmd
    }
}

/// Outcome of one external-process invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    exit_code: Option<i32>,
    stdout: String,
    stderr: String,
    timed_out: bool,
}

impl CommandResult {
    /// Creates a result from its parts.
    #[must_use]
    pub const fn new(exit_code: Option<i32>, stdout: String, stderr: String) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            timed_out: false,
        }
    }

    /// Result for a process that could not be started at all.
    #[must_use]
    pub const fn not_started(message: String) -> Self {
        Self::new(None, String::new(), message)
    }

    /// Result for a process killed after exceeding its timeout.
    #[must_use]
    pub const fn timed_out_with(stdout: String, stderr: String) -> Self {
        Self {
            exit_code: None,
            stdout,
            stderr,
            timed_out: true,
        }
    }

    pub(super) fn from_output(output: &Output) -> Self {
        Self::new(
            output.status.code(),
            String::from_utf8_lossy(&output.stdout).into_owned(),
            String::from_utf8_lossy(&output.stderr).into_owned(),
        )
    }

    /// Returns the exit code, `None` if the process never ran or was killed.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Returns captured stdout.
    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Returns captured stderr.
    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Returns whether the process was killed by the runner's timeout.
    #[must_use]
    pub const fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Returns true if the process exited with code 0.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0)) && !self.timed_out
    }

    /// Stdout followed by stderr, trimmed.
    #[must_use]
    pub fn output(&self) -> String {
        let stdout = self.stdout.trim();
        let stderr = self.stderr.trim();
        match (stdout.is_empty(), stderr.is_empty()) {
            (true, _) => stderr.to_string(),
            (false, true) => stdout.to_string(),
            (false, false) => format!("{stdout}\n{stderr}"),
        }
    }
}
