// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{FileSystem, LocalFileSystem};
use crate::error::FsError;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

#[test]
fn test_directory_is_empty_when_empty() {
    let temp = temp_dir();
    let fs = LocalFileSystem::new();
    assert!(fs.directory_is_empty(temp.path()).unwrap());
}

#[test]
fn test_directory_is_not_empty_with_file() {
    let temp = temp_dir();
    std::fs::write(temp.path().join("foo.txt"), "foo").unwrap();
    let fs = LocalFileSystem::new();
    assert!(!fs.directory_is_empty(temp.path()).unwrap());
}

#[test]
fn test_directory_is_not_empty_with_subdir() {
    let temp = temp_dir();
    std::fs::create_dir(temp.path().join("subdir")).unwrap();
    let fs = LocalFileSystem::new();
    assert!(!fs.directory_is_empty(temp.path()).unwrap());
}

#[test]
fn test_directory_is_empty_missing_dir() {
    let temp = temp_dir();
    let fs = LocalFileSystem::new();
    let result = fs.directory_is_empty(&temp.path().join("doesnt-exist"));
    assert!(matches!(result, Err(FsError::NotFound(_))));
}

#[test]
fn test_directory_is_empty_on_file() {
    let temp = temp_dir();
    let file = temp.path().join("foo.txt");
    std::fs::write(&file, "foo").unwrap();
    let fs = LocalFileSystem::new();
    assert!(matches!(
        fs.directory_is_empty(&file),
        Err(FsError::NotADirectory(_))
    ));
}

#[test]
fn test_create_sub_directory() {
    let temp = temp_dir();
    let fs = LocalFileSystem::new();
    let sub = fs.create_sub_directory(temp.path(), "sub").unwrap();
    assert!(sub.is_dir());
    assert_eq!(sub, temp.path().join("sub"));
}

#[test]
fn test_create_sub_directory_missing_main_dir() {
    let temp = temp_dir();
    let fs = LocalFileSystem::new();
    let result = fs.create_sub_directory(&temp.path().join("doesnt-exist"), "sub");
    assert!(matches!(result, Err(FsError::NotFound(_))));
}

#[test]
fn test_create_temp_directory_with_suffix() {
    let temp = temp_dir();
    let fs = LocalFileSystem::with_temp_root(temp.path());

    let first = fs.create_temp_directory("_scm-backup-tests", "foo").unwrap();
    let second = fs.create_temp_directory("_scm-backup-tests", "foo").unwrap();

    assert!(first.is_dir());
    assert!(second.is_dir());
    assert_ne!(first, second, "temp directories must not collide");
    assert!(first.starts_with(temp.path().join("_scm-backup-tests")));
    assert!(first.to_string_lossy().ends_with("-foo"));
}

#[test]
fn test_create_temp_directory_without_suffix() {
    let temp = temp_dir();
    let fs = LocalFileSystem::with_temp_root(temp.path());
    let dir = fs.create_temp_directory("ns", "").unwrap();
    assert!(dir.is_dir());
    assert!(!dir.to_string_lossy().ends_with('-'));
}

#[test]
fn test_copy_file() {
    let temp = temp_dir();
    let src = temp.path().join("scm-backup.toml");
    std::fs::write(&src, "[global]\n").unwrap();
    let dest = temp.path().join("dest");
    std::fs::create_dir(&dest).unwrap();

    let fs = LocalFileSystem::new();
    let copied = fs.copy_file(&src, &dest).unwrap();

    assert_eq!(copied, dest.join("scm-backup.toml"));
    assert_eq!(std::fs::read_to_string(copied).unwrap(), "[global]\n");
}

#[test]
fn test_remove_directory() {
    let temp = temp_dir();
    let dir = temp.path().join("tree");
    std::fs::create_dir_all(dir.join("nested")).unwrap();
    std::fs::write(dir.join("nested").join("file"), "x").unwrap();

    let fs = LocalFileSystem::new();
    fs.remove_directory(&dir).unwrap();
    assert!(!dir.exists());

    // already gone
    fs.remove_directory(&dir).unwrap();
}

#[test]
fn test_create_directory_with_parents() {
    let temp = temp_dir();
    let fs = LocalFileSystem::new();
    let nested = temp.path().join("a").join("b");
    fs.create_directory(&nested).unwrap();
    assert!(nested.is_dir());

    std::fs::write(nested.join("keep.txt"), "x").unwrap();
    fs.create_directory(&nested).unwrap();
    assert!(nested.join("keep.txt").is_file());
}

#[test]
fn test_create_directory_over_file_fails() {
    let temp = temp_dir();
    let file = temp.path().join("foo.txt");
    std::fs::write(&file, "foo").unwrap();
    let fs = LocalFileSystem::new();
    assert!(matches!(
        fs.create_directory(&file.join("sub")),
        Err(FsError::IoError { .. })
    ));
}
