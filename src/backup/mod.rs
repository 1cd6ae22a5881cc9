// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backup driver.
//!
//! ```text
//! BackupMaker::new(registry, local_folder, jobs)
//!   .backup_all(repos).await
//!       per repo (jobs at a time, blocking pool):
//!         registry.create(repo.scm)
//!         is_on_this_computer?  no --> ToolUnavailable
//!         pull_from_remote(url, local_folder/name, creds)
//!       cancelled --> remaining repos are Skipped
//!   --> BackupReport
//!
//! ConfigBackup::backup_configs(files)
//!   copy each file --> local_folder/_config/
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, warn};

use crate::config::types::RepoConfig;
use crate::error::{BackupError, BackupResult, FsError, ScmError};
use crate::scm::registry::ScmRegistry;
use crate::utility::fs::FileSystem;


/// Directory below `local_folder` receiving copies of the configuration.
pub const CONFIG_BACKUP_DIR: &str = "_config";

/// Outcome of backing up one repository.
#[derive(Debug)]
pub enum BackupStatus {
    /// Mirror is up to date at this path.
    Completed(PathBuf),
    /// The backup failed; other repositories were not affected.
    Failed(BackupError),
    /// Never started because the run was interrupted.
    Skipped,
}

/// Status of one repository in a [`BackupReport`].
#[derive(Debug)]
pub struct RepoReport {
    pub name: String,
    pub status: BackupStatus,
}

impl RepoReport {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, BackupStatus::Completed(_))
    }
}

impl fmt::Display for RepoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            BackupStatus::Completed(path) => write!(f, "{}: ok ({})", self.name, path.display()),
            BackupStatus::Failed(e) => write!(f, "{}: failed: {e}", self.name),
            BackupStatus::Skipped => write!(f, "{}: skipped", self.name),
        }
    }
}

/// Per-repository results, in configuration order.
#[derive(Debug, Default)]
pub struct BackupReport {
    repos: Vec<RepoReport>,
}

impl BackupReport {
    #[must_use]
    pub fn repos(&self) -> &[RepoReport] {
        &self.repos
    }

    /// Number of repositories that were not backed up.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.repos.iter().filter(|r| !r.is_success()).count()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    #[must_use]
    pub fn status(&self, name: &str) -> Option<&BackupStatus> {
        self.repos
            .iter()
            .find(|r| r.name == name)
            .map(|r| &r.status)
    }
}

/// Mirrors configured repositories into `local_folder`.
///
/// Each repository is pulled into its own directory, so concurrent pulls
/// never share a target.
#[derive(Debug, Clone)]
pub struct BackupMaker {
    registry: Arc<ScmRegistry>,
    local_folder: PathBuf,
    cancel_token: CancellationToken,
    concurrency_semaphore: Arc<Semaphore>,
}

impl BackupMaker {
    /// Creates a maker running at most `jobs` pulls at once.
    #[must_use]
    pub fn new(registry: Arc<ScmRegistry>, local_folder: impl Into<PathBuf>, jobs: usize) -> Self {
        Self {
            registry,
            local_folder: local_folder.into(),
            cancel_token: CancellationToken::new(),
            concurrency_semaphore: Arc::new(Semaphore::new(jobs.max(1))),
        }
    }

    #[must_use]
    pub fn local_folder(&self) -> &Path {
        &self.local_folder
    }

    /// Returns whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Requests cancellation. Pulls already running finish normally.
    pub fn interrupt_all(&self) {
        self.cancel_token.cancel();
    }

    /// Backs up a single repository, blocking until the pull is done.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownScmType` if the repository's backend is
    /// not registered, `ScmError::ToolUnavailable` if it is not installed, or
    /// whatever the pull reports.
    pub fn backup_repo(&self, repo: &RepoConfig) -> BackupResult<PathBuf> {
        let _span = info_span!("backup", repo = %repo.name).entered();

        let scm = self.registry.create(repo.scm)?;
        if !scm.is_on_this_computer() {
            return Err(ScmError::ToolUnavailable {
                tool: scm.display_name().to_string(),
                message: "not found on this computer".to_string(),
            }
            .into());
        }

        let dir = self.local_folder.join(&repo.name);
        info!(scm = scm.short_name(), dir = %dir.display(), "pulling");
        let credentials = repo.credentials();
        scm.pull_from_remote(&repo.url, &dir, credentials.as_ref())?;
        info!("backup complete");
        Ok(dir)
    }

    /// Backs up every repository in `repos`, `jobs` at a time.
    ///
    /// A failing repository does not stop the others. Once cancelled, no new
    /// pull is started and the remaining repositories are reported as skipped.
    pub async fn backup_all(&self, repos: &[RepoConfig]) -> BackupReport {
        let mut statuses: Vec<Option<BackupStatus>> = repos.iter().map(|_| None).collect();
        let mut set = JoinSet::new();

        for (index, repo) in repos.iter().enumerate() {
            let permit = tokio::select! {
                biased;
                () = self.cancel_token.cancelled() => None,
                permit = Arc::clone(&self.concurrency_semaphore).acquire_owned() => permit.ok(),
            };
            let Some(permit) = permit else {
                warn!(repo = %repo.name, "backup interrupted, skipping");
                statuses[index] = Some(BackupStatus::Skipped);
                continue;
            };

            let maker = self.clone();
            let repo = repo.clone();
            set.spawn_blocking(move || {
                let _permit = permit;
                (index, maker.backup_repo(&repo))
            });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, Ok(path))) => statuses[index] = Some(BackupStatus::Completed(path)),
                Ok((index, Err(e))) => {
                    error!(repo = %repos[index].name, error = %e, "backup failed");
                    statuses[index] = Some(BackupStatus::Failed(e));
                }
                Err(e) => error!(error = %e, "backup task did not complete"),
            }
        }

        let repos = repos
            .iter()
            .zip(statuses)
            .map(|(repo, status)| RepoReport {
                name: repo.name.clone(),
                status: status.unwrap_or_else(|| {
                    BackupStatus::Failed(BackupError::Other("backup task did not complete".into()))
                }),
            })
            .collect();
        BackupReport { repos }
    }
}

/// Copies the configuration files that produced a run next to the mirrors.
pub struct ConfigBackup {
    file_system: Arc<dyn FileSystem>,
    local_folder: PathBuf,
}

impl ConfigBackup {
    #[must_use]
    pub fn new(file_system: Arc<dyn FileSystem>, local_folder: impl Into<PathBuf>) -> Self {
        Self {
            file_system,
            local_folder: local_folder.into(),
        }
    }

    /// Copies every file in `files` into `<local_folder>/_config/`.
    ///
    /// Returns the copies, in order.
    ///
    /// # Errors
    ///
    /// Returns `FsError` if the folder cannot be created or a copy fails.
    pub fn backup_configs(&self, files: &[PathBuf]) -> Result<Vec<PathBuf>, FsError> {
        self.file_system.create_directory(&self.local_folder)?;
        let dir = self
            .file_system
            .create_sub_directory(&self.local_folder, CONFIG_BACKUP_DIR)?;

        files
            .iter()
            .map(|file| {
                let copy = self.file_system.copy_file(file, &dir)?;
                info!(file = %file.display(), "configuration backed up");
                Ok(copy)
            })
            .collect()
    }
}
