// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{BackupError, BackupResult, ConfigError, RegistryError, ScmError};

#[test]
fn test_config_error_display() {
    let err = ConfigError::MissingKey {
        section: "global".to_string(),
        key: "local_folder".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"missing required config key 'local_folder' in section '[global]'"
    );
}

#[test]
fn test_scm_error_display() {
    let err = ScmError::TargetNotEmpty {
        path: "/backups/repo".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"target directory is not empty and not a repository: /backups/repo"
    );
}

#[test]
fn test_registry_error_display() {
    let err = RegistryError::UnknownScmType("git".to_string());
    insta::assert_snapshot!(err.to_string(), @"no scm registered for type 'git'");
}

#[test]
fn test_scm_error_boxes_into_backup_error() {
    let err: BackupError = ScmError::NotARepository {
        path: "/tmp/x".to_string(),
    }
    .into();
    assert!(matches!(err, BackupError::Scm(_)));
    insta::assert_snapshot!(err.to_string(), @"scm error: directory is not a repository: /tmp/x");
}

#[test]
fn test_backup_error_size() {
    // Box<str> variant (Other) are 16 bytes (fat pointer: ptr + len)
    // With discriminant + alignment = 24 bytes
    let size = std::mem::size_of::<BackupError>();
    assert!(size <= 24, "BackupError is {size} bytes, expected <= 24");
}

#[test]
fn test_backup_result_size() {
    let size = std::mem::size_of::<BackupResult<()>>();
    assert!(size <= 24, "BackupResult<()> is {size} bytes, expected <= 24");
}
