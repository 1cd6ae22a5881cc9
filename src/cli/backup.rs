// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backup command arguments.

use clap::Args;

/// Arguments for the `backup` command.
#[derive(Debug, Clone, Args)]
pub struct BackupArgs {
    /// Repositories to back up, by configured name. Backs up all if empty.
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,

    /// Does not copy the configuration files into the backup folder.
    #[arg(long = "no-config-copy")]
    pub no_config_copy: bool,
}
