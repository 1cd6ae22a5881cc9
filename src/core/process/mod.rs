// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Synchronous process spawning.
//!
//! ```text
//! CommandLine::new("git")
//!   .arg() .secret_arg() .env()
//!       --> CommandRunner::execute()
//!           ProcessRunner: std::process::Command
//!           optional timeout (kill on deadline)
//!       --> CommandResult { exit_code, stdout, stderr, timed_out }
//! ```

pub mod builder;
mod io;
pub mod runner;

pub use builder::{CommandLine, CommandResult};
pub use runner::{CommandRunner, ProcessRunner};
