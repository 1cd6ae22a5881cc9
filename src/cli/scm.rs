// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backend query arguments.
//!
//! ```text
//! scms [--json]
//!   -> registered backends, installed?, version, lfs?
//! remote-exists URL [--scm git] [-u USER -p PASSWORD]
//!   -> exit 0 if the remote answers
//! contains-commit DIR ID [--scm git]
//!   -> exit 0 if the backup has the commit
//! verify-lfs DIR FILE [--scm git]
//!   -> exit 0 if FILE materializes from the backup
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::scm::ScmType;

/// Arguments for the `scms` command.
#[derive(Debug, Clone, Args)]
pub struct ScmsArgs {
    /// Prints JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `remote-exists` command.
#[derive(Debug, Clone, Args)]
pub struct RemoteExistsArgs {
    /// Remote repository URL.
    #[arg(value_name = "URL")]
    pub url: String,

    /// Backend to ask.
    #[arg(long, value_name = "SCM", default_value_t = ScmType::Git)]
    pub scm: ScmType,

    /// User name for the remote.
    #[arg(short = 'u', long, requires = "password")]
    pub user: Option<String>,

    /// Password for the remote.
    #[arg(
        short = 'p',
        long,
        env = "SCM_BACKUP_PASSWORD",
        hide_env_values = true,
        requires = "user"
    )]
    pub password: Option<String>,
}

/// Arguments for the `contains-commit` command.
#[derive(Debug, Clone, Args)]
pub struct ContainsCommitArgs {
    /// Local repository.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Commit id, full or abbreviated.
    #[arg(value_name = "ID")]
    pub commit: String,

    /// Backend owning the repository.
    #[arg(long, value_name = "SCM", default_value_t = ScmType::Git)]
    pub scm: ScmType,
}

/// Arguments for the `verify-lfs` command.
#[derive(Debug, Clone, Args)]
pub struct VerifyLfsArgs {
    /// Local backup repository.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Tracked file, relative to the repository root.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Backend owning the repository.
    #[arg(long, value_name = "SCM", default_value_t = ScmType::Git)]
    pub scm: ScmType,
}
