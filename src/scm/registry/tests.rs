// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;
use std::sync::Arc;

use super::ScmRegistry;
use crate::error::{RegistryError, ScmResult};
use crate::scm::git::GitScm;
use crate::scm::{Scm, ScmContext, ScmCredentials, ScmType};

/// Backend that answers everything with a fixed value.
struct FakeScm;

impl Scm for FakeScm {
    fn scm_type(&self) -> ScmType {
        ScmType::Git
    }
    fn is_on_this_computer(&self) -> bool {
        true
    }
    fn version_number(&self) -> ScmResult<String> {
        Ok("0.0.0-fake".to_string())
    }
    fn lfs_is_on_this_computer(&self) -> bool {
        false
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

#[test]
fn test_register_and_create() {
    let mut registry = ScmRegistry::default();
    assert!(registry.is_empty());

    registry.register::<GitScm>().unwrap();

    assert_eq!(registry.len(), 1);
    assert!(registry.contains(ScmType::Git));
    let scm = registry.create(ScmType::Git).unwrap();
    assert_eq!(scm.short_name(), "git");
    assert_eq!(scm.display_name(), "Git");
}

#[test]
fn test_create_returns_shared_instance() {
    let mut registry = ScmRegistry::default();
    registry.register::<GitScm>().unwrap();

    let first = registry.create(ScmType::Git).unwrap();
    let second = registry.create(ScmType::Git).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_create_unknown_type() {
    let registry = ScmRegistry::default();
    let err = registry.create(ScmType::Git).err().unwrap();
    assert!(matches!(err, RegistryError::UnknownScmType(_)));
    insta::assert_snapshot!(err, @"no scm registered for type 'git'");
}

#[test]
fn test_register_twice_is_rejected() {
    let mut registry = ScmRegistry::default();
    registry.register_type(ScmType::Git).unwrap();

    let err = registry.register::<GitScm>().unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateScmType(_)));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_register_by_name() {
    let mut registry = ScmRegistry::default();
    assert_eq!(registry.register_by_name("Git").unwrap(), ScmType::Git);
    assert!(registry.contains(ScmType::Git));
}

#[test]
fn test_register_by_name_not_an_implementation() {
    let mut registry = ScmRegistry::default();
    let err = registry.register_by_name("svn").unwrap_err();
    assert!(matches!(err, RegistryError::NotAnScmImplementation(_)));
    insta::assert_snapshot!(err, @"'svn' is not an scm implementation");
    assert!(registry.is_empty());
}

#[test]
fn test_register_instance() {
    let mut registry = ScmRegistry::default();
    registry.register_instance(Arc::new(FakeScm)).unwrap();

    let scm = registry.create(ScmType::Git).unwrap();
    assert_eq!(scm.version_number().unwrap(), "0.0.0-fake");

    let err = registry.register_instance(Arc::new(FakeScm)).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateScmType(_)));
}

#[test]
fn test_with_enabled() {
    let registry = ScmRegistry::with_enabled(ScmContext::default(), &["git"]).unwrap();
    assert_eq!(registry.types().collect::<Vec<_>>(), vec![ScmType::Git]);
    assert_eq!(registry.iter().count(), 1);

    let err = ScmRegistry::with_enabled(ScmContext::default(), &["git", "Git"]).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateScmType(_)));

    let err = ScmRegistry::with_enabled(ScmContext::default(), &["git", "svn"]).unwrap_err();
    assert!(matches!(err, RegistryError::NotAnScmImplementation(_)));
}

#[test]
fn test_backend_uses_context_executable() {
    let context = ScmContext::default().with_executable(ScmType::Git, "/opt/git/bin/git");
    assert_eq!(
        context.executable(ScmType::Git),
        Path::new("/opt/git/bin/git")
    );

    let mut registry = ScmRegistry::new(context);
    registry.register::<GitScm>().unwrap();
    let scm = registry.create(ScmType::Git).unwrap();
    assert_eq!(scm.scm_type(), ScmType::Git);
}

#[test]
fn test_scm_type_parse_and_display() {
    assert_eq!("git".parse::<ScmType>().unwrap(), ScmType::Git);
    assert_eq!(" GIT ".parse::<ScmType>().unwrap(), ScmType::Git);
    assert!("mercurial".parse::<ScmType>().is_err());
    assert_eq!(ScmType::Git.to_string(), "git");
    assert_eq!(ScmType::ALL.len(), 1);
}
