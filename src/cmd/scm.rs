// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backend query commands.
//!
//! Each query prints its answer and fails when the answer is "no", so the
//! exit code can be used from scripts.

use anyhow::bail;
use serde::Serialize;

use crate::cli::scm::{ContainsCommitArgs, RemoteExistsArgs, ScmsArgs, VerifyLfsArgs};
use crate::error::Result;
use crate::scm::registry::ScmRegistry;
use crate::scm::{Scm, ScmCredentials};

/// What `scms` reports about one backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScmStatus {
    pub name: &'static str,
    pub display_name: &'static str,
    pub installed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub lfs: bool,
}

impl ScmStatus {
    /// Inspects `scm`. A version that cannot be determined is left out.
    pub fn inspect(scm: &dyn Scm) -> Self {
        let installed = scm.is_on_this_computer();
        let version = if installed {
            scm.version_number()
                .inspect_err(|e| tracing::warn!(scm = scm.short_name(), error = %e, "no version"))
                .ok()
        } else {
            None
        };
        Self {
            name: scm.short_name(),
            display_name: scm.display_name(),
            installed,
            version,
            lfs: installed && scm.lfs_is_on_this_computer(),
        }
    }
}

/// Inspects every registered backend, in registration order.
#[must_use]
pub fn scm_statuses(registry: &ScmRegistry) -> Vec<ScmStatus> {
    registry
        .iter()
        .map(|scm| ScmStatus::inspect(scm.as_ref()))
        .collect()
}

/// Formats statuses as an aligned table.
#[must_use]
pub fn format_scm_table(statuses: &[ScmStatus]) -> Vec<String> {
    statuses
        .iter()
        .map(|s| {
            let installed = if s.installed { "installed" } else { "missing" };
            let lfs = if s.lfs { "lfs" } else { "no lfs" };
            format!(
                "{:<8} {:<10} {:<9} {}",
                s.display_name,
                installed,
                lfs,
                s.version.as_deref().unwrap_or("-")
            )
        })
        .collect()
}

/// Main handler for scms command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run_scms_command(args: &ScmsArgs, registry: &ScmRegistry) -> Result<()> {
    let statuses = scm_statuses(registry);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
    } else if statuses.is_empty() {
        println!("No scm registered");
    } else {
        for line in format_scm_table(&statuses) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Main handler for remote-exists command.
///
/// # Errors
///
/// Returns an error if the backend is not registered, the url is invalid,
/// or the remote does not exist.
pub fn run_remote_exists_command(args: &RemoteExistsArgs, registry: &ScmRegistry) -> Result<()> {
    let scm = registry.create(args.scm)?;
    let credentials = args
        .user
        .as_ref()
        .zip(args.password.as_ref())
        .map(|(user, password)| ScmCredentials::new(user, password));

    if scm.remote_repository_exists(&args.url, credentials.as_ref())? {
        println!("remote repository exists: {}", args.url);
        Ok(())
    } else {
        bail!("remote repository does not exist: {}", args.url)
    }
}

/// Main handler for contains-commit command.
///
/// # Errors
///
/// Returns an error if the directory is not a repository or the commit is
/// missing.
pub fn run_contains_commit_command(args: &ContainsCommitArgs, registry: &ScmRegistry) -> Result<()> {
    let scm = registry.create(args.scm)?;
    if scm.repository_contains_commit(&args.dir, &args.commit)? {
        println!("{} contains {}", args.dir.display(), args.commit);
        Ok(())
    } else {
        bail!("{} does not contain commit {}", args.dir.display(), args.commit)
    }
}

/// Main handler for verify-lfs command.
///
/// # Errors
///
/// Returns an error if verification cannot run or the file does not
/// materialize.
pub fn run_verify_lfs_command(args: &VerifyLfsArgs, registry: &ScmRegistry) -> Result<()> {
    let scm = registry.create(args.scm)?;
    if scm.backup_contains_lfs_file(&args.dir, &args.file)? {
        println!(
            "{} restores from {}",
            args.file.display(),
            args.dir.display()
        );
        Ok(())
    } else {
        bail!(
            "{} does not restore from {}",
            args.file.display(),
            args.dir.display()
        )
    }
}
