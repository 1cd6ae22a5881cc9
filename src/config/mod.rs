// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for scm-backup.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. local scm-backup.toml (cwd)
//! 3. --config FILE (repeatable)
//! 4. SCMBACKUP_* env vars
//! 5. --set key=value
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! SCMBACKUP_GLOBAL__LOCAL_FOLDER=/backups → global.local_folder = "/backups"
//! SCMBACKUP_GLOBAL__JOBS=4                → global.jobs = 4
//! SCMBACKUP_SCM__TIMEOUT_SECS=600         → scm.timeout_secs = 600
//! ```
//!
//! # Repositories
//!
//! ```toml
//! [[repos]]
//! name = "scm-backup"
//! url = "https://github.com/user/scm-backup.git"
//!
//! [[repos]]
//! name = "private"
//! url = "https://bitbucket.org/user/private.git"
//! user = "user"
//! password = "app-password"
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::backup::CONFIG_BACKUP_DIR;
use crate::error::{ConfigError, Result};
use crate::logging::LogConfig;

use loader::ConfigLoader;
use types::{GlobalConfig, RepoConfig, ScmConfig};

/// Default local configuration file name.
pub const LOCAL_CONFIG_FILE: &str = "scm-backup.toml";

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "SCMBACKUP";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Backend options.
    pub scm: ScmConfig,
    /// Repositories to back up.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub repos: Vec<RepoConfig>,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use scm_backup::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file("backup.toml")
    ///     .add_toml_file_optional("scm-backup.toml")
    ///     .with_env_prefix("SCMBACKUP")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not pass validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not pass
    /// validation.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Validate the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for a zero job count, an empty or duplicate
    /// repository name, a name that is not a plain directory name, an empty
    /// url, or a user without password (or the reverse).
    pub fn resolve_and_validate(&mut self) -> Result<()> {
        if self.global.jobs == 0 {
            return Err(invalid("global", "jobs", "must be at least 1").into());
        }

        let mut names = BTreeSet::new();
        for repo in &self.repos {
            validate_repo_name(&repo.name)?;
            if !names.insert(repo.name.to_lowercase()) {
                return Err(invalid(
                    "repos",
                    "name",
                    format!("repository '{}' is configured more than once", repo.name),
                )
                .into());
            }
            if repo.url.trim().is_empty() {
                return Err(ConfigError::MissingKey {
                    section: format!("repos.{}", repo.name),
                    key: "url".to_string(),
                }
                .into());
            }
            if repo.user.is_some() != repo.password.is_some() {
                return Err(invalid(
                    &format!("repos.{}", repo.name),
                    "user",
                    "user and password must be given together",
                )
                .into());
            }
        }
        Ok(())
    }

    /// Folder holding the mirrors.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` if `global.local_folder` is unset.
    pub fn local_folder(&self) -> std::result::Result<&Path, ConfigError> {
        self.global
            .local_folder
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| ConfigError::MissingKey {
                section: "global".to_string(),
                key: "local_folder".to_string(),
            })
    }

    /// Looks up a configured repository by name.
    #[must_use]
    pub fn repo(&self, name: &str) -> Option<&RepoConfig> {
        self.repos.iter().find(|r| r.name.eq_ignore_ascii_case(name))
    }

    /// Logging settings derived from `[global]`.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        let log_file = (!self.global.log_file.as_os_str().is_empty())
            .then(|| self.global.log_file.clone());
        LogConfig::builder()
            .with_console_level(self.global.output_log_level)
            .with_file_level(self.global.file_log_level)
            .maybe_with_log_file(log_file)
            .build()
    }

    /// Format configuration options for display.
    ///
    /// Passwords are shown as `[hidden]`. Output is deterministically ordered.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_scm_options(&mut options);
        self.format_repo_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.local_folder".into(),
            self.global
                .local_folder
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global.log_file.display().to_string(),
        );
        options.insert("global.jobs".into(), self.global.jobs.to_string());
    }

    fn format_scm_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("scm.enabled".into(), self.scm.enabled.join(", "));
        options.insert("scm.git".into(), self.scm.git.display().to_string());
        options.insert(
            "scm.timeout_secs".into(),
            self.scm.timeout_secs.to_string(),
        );
    }

    fn format_repo_options(&self, options: &mut BTreeMap<String, String>) {
        for repo in &self.repos {
            let key = |field: &str| format!("repos.{}.{field}", repo.name);
            options.insert(key("scm"), repo.scm.to_string());
            options.insert(key("url"), repo.url.clone());
            if let Some(user) = &repo.user {
                options.insert(key("user"), user.clone());
            }
            if repo.password.is_some() {
                options.insert(key("password"), "[hidden]".into());
            }
        }
    }
}

fn invalid(section: &str, key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        message: message.into(),
    }
}

/// A repository name becomes a directory name below `local_folder`.
fn validate_repo_name(name: &str) -> std::result::Result<(), ConfigError> {
    let message = if name.trim().is_empty() {
        "repository name must not be empty".to_string()
    } else if name.contains(['/', '\\']) || name == "." || name == ".." {
        format!("'{name}' is not a valid directory name")
    } else if name.eq_ignore_ascii_case(CONFIG_BACKUP_DIR) {
        format!("'{name}' is reserved for the configuration backup")
    } else {
        return Ok(());
    };
    Err(invalid("repos", "name", message))
}
