// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backup command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;

use crate::backup::{BackupMaker, BackupReport, ConfigBackup};
use crate::cli::backup::BackupArgs;
use crate::config::Config;
use crate::config::types::RepoConfig;
use crate::error::Result;
use crate::scm::registry::ScmRegistry;

/// Picks the repositories named on the command line, or all of them.
///
/// # Errors
///
/// Returns an error if a name is not configured.
pub fn select_repos(config: &Config, names: &[String]) -> Result<Vec<RepoConfig>> {
    if names.is_empty() {
        return Ok(config.repos.clone());
    }
    names
        .iter()
        .map(|name| {
            config
                .repo(name)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no repository named '{name}' is configured"))
        })
        .collect()
}

/// Main handler for backup command.
///
/// # Errors
///
/// Returns an error if `global.local_folder` is unset, a requested repository
/// is unknown, the configuration copy fails, or any repository failed.
pub async fn run_backup_command(
    args: &BackupArgs,
    config: &Config,
    config_files: &[PathBuf],
    registry: ScmRegistry,
) -> Result<()> {
    let local_folder = config.local_folder()?.to_path_buf();
    let repos = select_repos(config, &args.names)?;
    if repos.is_empty() {
        tracing::warn!("no repositories configured");
        return Ok(());
    }

    if !args.no_config_copy {
        let file_system = registry.context().file_system();
        ConfigBackup::new(file_system, &local_folder).backup_configs(config_files)?;
    }

    let maker = BackupMaker::new(Arc::new(registry), &local_folder, config.global.jobs);

    let interrupter = maker.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, finishing running backups...");
            interrupter.interrupt_all();
        }
    });

    let report = maker.backup_all(&repos).await;
    print_report(&report);

    if report.is_success() {
        tracing::info!(count = report.repos().len(), "Backup completed successfully");
        Ok(())
    } else {
        bail!(
            "{} of {} repositories were not backed up",
            report.failed_count(),
            report.repos().len()
        )
    }
}

fn print_report(report: &BackupReport) {
    for repo in report.repos() {
        println!("{repo}");
    }
}
