// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Source control backends.
//!
//! ```text
//!            ScmRegistry
//!       ScmType --> Arc<dyn Scm>
//!                 |
//!                 v
//!      ,----------------------,
//!      |   Scm (contract)     |
//!      '----------+-----------'
//!                 |
//!                 v
//!              GitScm ------> CommandRunner --> git
//!           pull protocol  \
//!           lfs protocol    -> FileSystem (temp dirs, emptiness)
//! ```
//!
//! Backends hold no per-repository state: every directory and remote URL
//! arrives per call, so one instance serves all repositories. Calls for the
//! same directory must be serialized by the caller.

pub mod credentials;
pub mod git;
pub mod registry;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::process::{CommandRunner, ProcessRunner};
use crate::error::{RegistryError, ScmResult};
use crate::utility::fs::{FileSystem, LocalFileSystem};

pub use credentials::ScmCredentials;

/// Supported backend kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScmType {
    Git,
}

impl ScmType {
    /// Every supported kind.
    pub const ALL: [Self; 1] = [Self::Git];

    /// Short lowercase identifier, also the default executable name.
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Git => "git",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Git => "Git",
        }
    }
}

impl fmt::Display for ScmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl std::str::FromStr for ScmType {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.short_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RegistryError::NotAnScmImplementation(s.to_string()))
    }
}

/// Operations every backup-capable backend provides.
pub trait Scm: Send + Sync {
    /// Identifier this backend is registered under.
    fn scm_type(&self) -> ScmType;

    /// Short lowercase name, e.g. `git`.
    fn short_name(&self) -> &'static str {
        self.scm_type().short_name()
    }

    /// Human-readable name, e.g. `Git`.
    fn display_name(&self) -> &'static str {
        self.scm_type().display_name()
    }

    /// Checks whether the executable is installed and reports a version.
    fn is_on_this_computer(&self) -> bool;

    /// Returns the executable's version string.
    ///
    /// # Errors
    ///
    /// Returns `ScmError::ToolUnavailable` if the version check fails.
    fn version_number(&self) -> ScmResult<String>;

    /// Checks whether the large-file extension is installed.
    fn lfs_is_on_this_computer(&self) -> bool;

    /// Asks the tool whether `dir` is a repository of this kind.
    fn directory_is_repository(&self, dir: &Path) -> bool;

    /// Creates a bare repository in `dir`, creating parents as needed.
    /// Does nothing if `dir` already is a repository.
    ///
    /// # Errors
    ///
    /// Returns `ScmError::InitFailed` if the tool cannot initialize `dir`.
    fn create_repository(&self, dir: &Path) -> ScmResult<()>;

    /// Creates or updates the mirror in `dir` so that it matches `url`.
    ///
    /// # Errors
    ///
    /// Returns `ScmError::TargetNotEmpty` if `dir` holds unrelated content,
    /// `ScmError::RemoteFetchFailed` if the fetch fails, or any error of the
    /// large-file sub-protocol.
    fn pull_from_remote(
        &self,
        url: &str,
        dir: &Path,
        credentials: Option<&ScmCredentials>,
    ) -> ScmResult<()>;

    /// Fetches all large-file content referenced by the mirror in `dir`.
    ///
    /// # Errors
    ///
    /// Returns `ScmError::LfsFetchFailed` if the fetch fails.
    fn pull_lfs_from_remote(
        &self,
        url: &str,
        dir: &Path,
        credentials: Option<&ScmCredentials>,
    ) -> ScmResult<()>;

    /// Checks whether the mirror references any large files.
    ///
    /// # Errors
    ///
    /// Returns `ScmError::LfsListFailed` if the listing itself fails.
    fn repository_contains_lfs(&self, dir: &Path) -> ScmResult<bool>;

    /// Checks whether the mirror contains `commit_id`.
    ///
    /// # Errors
    ///
    /// Returns `ScmError::RepositoryNotFound` if `dir` does not exist and
    /// `ScmError::NotARepository` if it is not a repository.
    fn repository_contains_commit(&self, dir: &Path, commit_id: &str) -> ScmResult<bool>;

    /// Checks whether `url` points at a reachable repository.
    /// A missing remote is `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns `ScmError::InvalidUrl` if the URL cannot be used at all.
    fn remote_repository_exists(
        &self,
        url: &str,
        credentials: Option<&ScmCredentials>,
    ) -> ScmResult<bool>;

    /// Verifies that large-file content for `file` is actually retrievable
    /// from the backup in `dir`. Expensive: meant for diagnostics only.
    ///
    /// # Errors
    ///
    /// Returns `ScmError::RepositoryNotFound`/`NotARepository` for a bad
    /// `dir`, `ScmError::ToolUnavailable` without the large-file extension
    /// and `ScmError::LfsVerificationFailed` if a round-trip step fails.
    fn backup_contains_lfs_file(&self, dir: &Path, file: &Path) -> ScmResult<bool>;
}

/// A backend that the registry can build from a shared [`ScmContext`].
pub trait ScmBackend: Scm + Sized + 'static {
    /// Identifier the backend is registered under.
    const SCM_TYPE: ScmType;

    /// Builds the backend from its declared dependencies.
    fn from_context(context: &ScmContext) -> Self;
}

/// Dependencies handed to every backend at construction.
#[derive(Clone)]
pub struct ScmContext {
    runner: Arc<dyn CommandRunner>,
    file_system: Arc<dyn FileSystem>,
    executables: BTreeMap<ScmType, PathBuf>,
}

impl Default for ScmContext {
    fn default() -> Self {
        Self::new(
            Arc::new(ProcessRunner::new()),
            Arc::new(LocalFileSystem::new()),
        )
    }
}

impl fmt::Debug for ScmContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScmContext")
            .field("executables", &self.executables)
            .finish_non_exhaustive()
    }
}

impl ScmContext {
    /// Creates a context from a runner and a filesystem.
    pub fn new(runner: Arc<dyn CommandRunner>, file_system: Arc<dyn FileSystem>) -> Self {
        Self {
            runner,
            file_system,
            executables: BTreeMap::new(),
        }
    }

    /// Overrides the executable used for `scm`.
    #[must_use]
    pub fn with_executable(mut self, scm: ScmType, path: impl Into<PathBuf>) -> Self {
        self.executables.insert(scm, path.into());
        self
    }

    /// Returns the command runner.
    #[must_use]
    pub fn runner(&self) -> Arc<dyn CommandRunner> {
        Arc::clone(&self.runner)
    }

    /// Returns the filesystem capability.
    #[must_use]
    pub fn file_system(&self) -> Arc<dyn FileSystem> {
        Arc::clone(&self.file_system)
    }

    /// Returns the executable for `scm`, defaulting to its short name.
    #[must_use]
    pub fn executable(&self, scm: ScmType) -> PathBuf {
        self.executables
            .get(&scm)
            .cloned()
            .unwrap_or_else(|| PathBuf::from(scm.short_name()))
    }
}
