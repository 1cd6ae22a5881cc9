// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for scm-backup.
//!
//! # Config Structure
//!
//! ```text
//! Config
//!   [global]   GlobalConfig   local_folder, log levels, log_file, jobs
//!   [scm]      ScmConfig      enabled backends, executables, timeout
//!   [[repos]]  RepoConfig     name, scm, url, user/password
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::logging::LogLevel;
use crate::scm::{ScmCredentials, ScmType};

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Folder holding one mirror per repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_folder: Option<PathBuf>,

    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file, empty for no file log.
    pub log_file: PathBuf,

    /// Repositories backed up concurrently.
    pub jobs: usize,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            local_folder: None,
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: PathBuf::new(),
            jobs: 1,
        }
    }
}

/// Backend selection and tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScmConfig {
    /// Names of the backends registered at startup, in order.
    pub enabled: Vec<String>,
    /// Git executable, a bare name is looked up in PATH.
    pub git: PathBuf,
    /// Seconds before an external command is killed, 0 for no limit.
    pub timeout_secs: u64,
}

impl Default for ScmConfig {
    fn default() -> Self {
        Self {
            enabled: vec![ScmType::Git.short_name().to_string()],
            git: PathBuf::from("git"),
            timeout_secs: 0,
        }
    }
}

impl ScmConfig {
    /// Command timeout, `None` when disabled.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }

    /// Executable configured for `scm`.
    #[must_use]
    pub fn executable(&self, scm: ScmType) -> &PathBuf {
        match scm {
            ScmType::Git => &self.git,
        }
    }
}

/// One repository to mirror.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoConfig {
    /// Directory name of the mirror below `global.local_folder`.
    pub name: String,
    /// Backend used for this repository.
    #[serde(default = "default_scm")]
    pub scm: ScmType,
    /// Remote URL.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

const fn default_scm() -> ScmType {
    ScmType::Git
}

impl RepoConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scm: ScmType::Git,
            url: url.into(),
            user: None,
            password: None,
        }
    }

    #[must_use]
    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    /// Credentials, if both user and password are set.
    #[must_use]
    pub fn credentials(&self) -> Option<ScmCredentials> {
        match (&self.user, &self.password) {
            (Some(user), Some(password)) => Some(ScmCredentials::new(user, password)),
            _ => None,
        }
    }
}

impl std::fmt::Debug for RepoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepoConfig")
            .field("name", &self.name)
            .field("scm", &self.scm)
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "[hidden]"))
            .finish()
    }
}
