// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;
use std::sync::Arc;

use super::backup::select_repos;
use super::build_registry;
use super::config::load_config;
use super::scm::{ScmStatus, format_scm_table, scm_statuses};
use crate::cli::global::GlobalOptions;
use crate::config::Config;
use crate::error::{RegistryError, ScmError, ScmResult};
use crate::scm::registry::ScmRegistry;
use crate::scm::{Scm, ScmCredentials, ScmType};

const REPOS: &str = r#"
[global]
local_folder = "/backups"

[[repos]]
name = "tool"
url = "https://example.com/tool.git"

[[repos]]
name = "docs"
url = "https://example.com/docs.git"
"#;

/// Backend with a configurable install state.
struct StubScm {
    installed: bool,
    lfs: bool,
    version: Option<&'static str>,
}

impl Scm for StubScm {
    fn scm_type(&self) -> ScmType {
        ScmType::Git
    }
    fn is_on_this_computer(&self) -> bool {
        self.installed
    }
    fn version_number(&self) -> ScmResult<String> {
        self.version
            .map(str::to_string)
            .ok_or_else(|| ScmError::ToolUnavailable {
                tool: "Git".to_string(),
                message: "no version".to_string(),
            })
    }
    fn lfs_is_on_this_computer(&self) -> bool {
        self.lfs
    }
    fn directory_is_repository(&self, _dir: &Path) -> bool {
        false
    }
    fn create_repository(&self, _dir: &Path) -> ScmResult<()> {
        Ok(())
    }
    fn pull_from_remote(&self, _: &str, _: &Path, _: Option<&ScmCredentials>) -> ScmResult<()> {
        Ok(())
    }
    fn pull_lfs_from_remote(&self, _: &str, _: &Path, _: Option<&ScmCredentials>) -> ScmResult<()> {
        Ok(())
    }
    fn repository_contains_lfs(&self, _dir: &Path) -> ScmResult<bool> {
        Ok(false)
    }
    fn repository_contains_commit(&self, _dir: &Path, _commit_id: &str) -> ScmResult<bool> {
        Ok(false)
    }
    fn remote_repository_exists(&self, _: &str, _: Option<&ScmCredentials>) -> ScmResult<bool> {
        Ok(false)
    }
    fn backup_contains_lfs_file(&self, _dir: &Path, _file: &Path) -> ScmResult<bool> {
        Ok(false)
    }
}

fn status(installed: bool, lfs: bool, version: Option<&'static str>) -> ScmStatus {
    ScmStatus::inspect(&StubScm {
        installed,
        lfs,
        version,
    })
}

#[test]
fn test_build_registry_registers_enabled() {
    let config = Config::parse("[scm]\ngit = \"/opt/git/bin/git\"\ntimeout_secs = 30\n").unwrap();
    let registry = build_registry(&config).unwrap();

    assert_eq!(registry.types().collect::<Vec<_>>(), vec![ScmType::Git]);
    assert_eq!(
        registry.context().executable(ScmType::Git),
        Path::new("/opt/git/bin/git")
    );
}

#[test]
fn test_build_registry_rejects_unknown_backend_name() {
    let config = Config::parse("[scm]\nenabled = [\"svn\"]\n").unwrap();
    let err = build_registry(&config).unwrap_err();
    let err = err
        .downcast_ref::<RegistryError>()
        .expect("registry error expected");
    assert!(matches!(err, RegistryError::NotAnScmImplementation(_)));
    insta::assert_snapshot!(err, @"'svn' is not an scm implementation");
}

#[test]
fn test_build_registry_nothing_enabled() {
    let config = Config::parse("[scm]\nenabled = []\n").unwrap();
    let registry = build_registry(&config).unwrap();
    assert!(registry.is_empty());
}

#[test]
fn test_select_repos() {
    let config = Config::parse(REPOS).unwrap();

    let all = select_repos(&config, &[]).unwrap();
    assert_eq!(all.len(), 2);

    let some = select_repos(&config, &["DOCS".to_string()]).unwrap();
    assert_eq!(some.len(), 1);
    assert_eq!(some[0].name, "docs");

    let err = select_repos(&config, &["missing".to_string()]).unwrap_err();
    insta::assert_snapshot!(err, @"no repository named 'missing' is configured");
}

#[test]
fn test_scm_status_inspect() {
    assert_eq!(
        status(true, true, Some("2.45.1")),
        ScmStatus {
            name: "git",
            display_name: "Git",
            installed: true,
            version: Some("2.45.1".to_string()),
            lfs: true,
        }
    );

    let missing = status(false, true, Some("2.45.1"));
    assert!(!missing.installed);
    assert_eq!(missing.version, None);
    assert!(!missing.lfs);

    assert_eq!(status(true, false, None).version, None);
}

#[test]
fn test_scm_table_and_json() {
    let statuses = vec![status(true, false, Some("2.45.1")), status(false, false, None)];

    insta::assert_snapshot!(format_scm_table(&statuses).join("\n"), @r"
    Git      installed  no lfs    2.45.1
    Git      missing    no lfs    -
    ");

    let json = serde_json::to_value(&statuses[1]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "name": "git",
            "display_name": "Git",
            "installed": false,
            "lfs": false,
        })
    );
}

#[test]
fn test_scm_statuses_follow_registry() {
    let mut registry = ScmRegistry::default();
    registry
        .register_instance(Arc::new(StubScm {
            installed: true,
            lfs: false,
            version: Some("2.0"),
        }))
        .unwrap();

    let statuses = scm_statuses(&registry);
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].version.as_deref(), Some("2.0"));
}

#[test]
fn test_load_config_from_options() {
    let temp = tempfile::tempdir().expect("failed to create temp dir");
    let path = temp.path().join("backup.toml");
    std::fs::write(&path, REPOS).unwrap();

    let global = GlobalOptions {
        configs: vec![path.clone()],
        no_default_config: true,
        jobs: Some(3),
        log_level: Some(4),
        ..GlobalOptions::default()
    };
    let loaded = load_config(&global).unwrap();

    assert_eq!(loaded.files, vec![path]);
    assert_eq!(loaded.sources.len(), 1);
    assert_eq!(loaded.config.global.jobs, 3);
    assert_eq!(loaded.config.global.output_log_level.as_u8(), 4);
    assert_eq!(loaded.config.repos.len(), 2);
}

#[test]
fn test_load_config_bad_set_option() {
    let global = GlobalOptions {
        no_default_config: true,
        options: vec!["jobs".to_string()],
        ..GlobalOptions::default()
    };
    assert!(load_config(&global).is_err());
}
