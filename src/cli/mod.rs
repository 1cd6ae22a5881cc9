// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for scm-backup using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! scm-backup [global options] <command>
//! version
//! options
//! configs
//! scms [--json]
//! backup [names...]
//! remote-exists <url> [--scm git] [--user U --password P]
//! contains-commit <dir> <id>
//! verify-lfs <dir> <file>
//! ```

pub mod backup;
pub mod global;
pub mod scm;

#[cfg(test)]
mod tests;

use crate::cli::backup::BackupArgs;
use crate::cli::global::GlobalOptions;
use crate::cli::scm::{ContainsCommitArgs, RemoteExistsArgs, ScmsArgs, VerifyLfsArgs};
use clap::{Parser, Subcommand};

/// Source Control Mirror Backup Tool
///
/// Mirrors remote repositories onto local disk.
#[derive(Debug, Parser)]
#[command(
    name = "scm-backup",
    author,
    version,
    about = "Source Control Mirror Backup Tool",
    long_about = "scm-backup Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Mirrors remote source control repositories onto local disk.\n\n\
                  Invoking `scm-backup backup` pulls every configured repository\n\
                  into its own folder below `global.local_folder`. Do\n\
                  `scm-backup backup <name>...` to back up specific repositories.\n\
                  See `scm-backup <command> --help` for more information about a command.",
    after_help = "CONFIG FILES:\n\n\
                  By default, scm-backup loads `scm-backup.toml` from the current\n\
                  directory if it exists. Additional files can be given with --config,\n\
                  those are loaded afterwards and override earlier values.\n\
                  SCMBACKUP_<SECTION>__<KEY> environment variables and --set override\n\
                  all files. Use --no-default-config to only use --config."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files in load order.
    Configs,

    /// Lists the registered backends, whether they are installed and their version.
    Scms(ScmsArgs),

    /// Backs up the configured repositories.
    Backup(BackupArgs),

    /// Checks whether a remote repository exists.
    #[command(name = "remote-exists")]
    RemoteExists(RemoteExistsArgs),

    /// Checks whether a local repository contains a commit.
    #[command(name = "contains-commit")]
    ContainsCommit(ContainsCommitArgs),

    /// Checks that a large file can be restored from a local backup.
    #[command(name = "verify-lfs")]
    VerifyLfs(VerifyLfsArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
