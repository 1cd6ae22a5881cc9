// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the Config module with realistic TOML configurations.

use std::path::Path;
use std::sync::Arc;

use scm_backup::backup::{CONFIG_BACKUP_DIR, ConfigBackup};
use scm_backup::config::Config;
use scm_backup::scm::ScmType;
use scm_backup::utility::fs::LocalFileSystem;

const FULL: &str = r#"
[global]
local_folder = "/srv/backups"
output_log_level = 2
file_log_level = 4
log_file = "/var/log/scm-backup.log"
jobs = 4

[scm]
enabled = ["git"]
git = "/usr/bin/git"
timeout_secs = 3600

[[repos]]
name = "scm-backup"
url = "https://github.com/scm-backup-testuser/scm-backup.git"

[[repos]]
name = "private"
scm = "git"
url = "https://bitbucket.org/scm-backup-testuser/private.git"
user = "scm-backup-testuser"
password = "app-password"
"#;

// =============================================================================
// Loading from TOML strings
// =============================================================================

#[test]
fn config_parse_minimal() {
    let config = Config::parse("").unwrap();
    assert!(config.repos.is_empty());
    assert!(config.local_folder().is_err());
}

#[test]
fn config_parse_full() {
    let config = Config::parse(FULL).unwrap();

    assert_eq!(config.local_folder().unwrap(), Path::new("/srv/backups"));
    assert_eq!(config.global.output_log_level.as_u8(), 2);
    assert_eq!(config.global.file_log_level.as_u8(), 4);
    assert_eq!(config.global.jobs, 4);
    assert_eq!(config.scm.enabled, vec!["git".to_string()]);
    assert_eq!(config.scm.executable(ScmType::Git), Path::new("/usr/bin/git"));

    let names: Vec<&str> = config.repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["scm-backup", "private"]);
    assert!(config.repo("private").unwrap().credentials().is_some());
}

#[test]
fn config_options_never_show_passwords() {
    let config = Config::parse(FULL).unwrap();
    let options = config.format_options().join("\n");
    assert!(!options.contains("app-password"));
    assert!(options.contains("repos.private.password"));
}

#[test]
fn config_invalid_toml() {
    assert!(Config::parse("[global\n").is_err());
}

#[test]
fn config_invalid_log_level() {
    assert!(Config::parse("[global]\noutput_log_level = 9\n").is_err());
}

// =============================================================================
// Loading from files
// =============================================================================

#[test]
fn config_from_file_and_copy_into_backup() {
    let temp = tempfile::tempdir().expect("failed to create temp dir");
    let path = temp.path().join("scm-backup.toml");
    std::fs::write(&path, FULL).unwrap();

    let loader = Config::builder().add_toml_file(&path);
    let files = loader.config_files();
    let config = loader.build().unwrap();
    assert_eq!(config.repos.len(), 2);

    let local_folder = temp.path().join("backups");
    let copies = ConfigBackup::new(Arc::new(LocalFileSystem::new()), &local_folder)
        .backup_configs(&files)
        .unwrap();

    assert_eq!(copies.len(), 1);
    let copied = local_folder.join(CONFIG_BACKUP_DIR).join("scm-backup.toml");
    assert_eq!(std::fs::read_to_string(copied).unwrap(), FULL);
}

#[test]
fn config_from_missing_file() {
    assert!(Config::from_file("/nonexistent/scm-backup.toml").is_err());
}
