// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem capability consumed by the SCM backends.
//!
//! ```text
//! FileSystem (trait, injected)
//!   directory_is_empty(dir)
//!   create_directory(dir)             --> dir, parents included
//!   create_sub_directory(main, sub)   --> main/sub
//!   create_temp_directory(ns, suffix) --> $TMP/ns/<unique>-suffix
//!   copy_file(src, dst_dir)
//!   remove_directory(dir)
//!         |
//!         v
//!   LocalFileSystem (std::fs + tempfile::Builder)
//! ```

use std::path::{Path, PathBuf};

use crate::error::FsError;

/// Filesystem operations the SCM backends depend on.
pub trait FileSystem: Send + Sync {
    /// Checks whether the directory contains no files and no subdirectories.
    ///
    /// # Errors
    ///
    /// Returns `FsError::NotFound` if `dir` does not exist and
    /// `FsError::NotADirectory` if it is a file.
    fn directory_is_empty(&self, dir: &Path) -> Result<bool, FsError>;

    /// Creates `dir` and any missing parents. An existing `dir` is kept.
    ///
    /// # Errors
    ///
    /// Returns `FsError::IoError` if a component cannot be created.
    fn create_directory(&self, dir: &Path) -> Result<(), FsError>;

    /// Creates `main_dir/sub_dir` and returns its path.
    ///
    /// # Errors
    ///
    /// Returns `FsError::NotFound` if `main_dir` does not exist.
    fn create_sub_directory(&self, main_dir: &Path, sub_dir: &str) -> Result<PathBuf, FsError>;

    /// Creates a fresh, uniquely named directory under `<temp>/<namespace>`.
    ///
    /// The name ends with `-<suffix>` unless `suffix` is empty. The directory
    /// is not removed automatically.
    ///
    /// # Errors
    ///
    /// Returns `FsError::IoError` if the directory cannot be created.
    fn create_temp_directory(&self, namespace: &str, suffix: &str) -> Result<PathBuf, FsError>;

    /// Copies `file` into `dest_dir`, keeping its file name.
    ///
    /// # Errors
    ///
    /// Returns `FsError` if `file` has no file name or the copy fails.
    fn copy_file(&self, file: &Path, dest_dir: &Path) -> Result<PathBuf, FsError>;

    /// Removes `dir` and everything below it. A missing `dir` is not an error.
    ///
    /// # Errors
    ///
    /// Returns `FsError::IoError` if removal fails.
    fn remove_directory(&self, dir: &Path) -> Result<(), FsError>;
}

/// [`FileSystem`] on the local disk.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    temp_root: PathBuf,
}

impl Default for LocalFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalFileSystem {
    /// Uses the system temp directory for temp directories.
    #[must_use]
    pub fn new() -> Self {
        Self {
            temp_root: std::env::temp_dir(),
        }
    }

    /// Uses `root` instead of the system temp directory.
    #[must_use]
    pub fn with_temp_root(root: impl Into<PathBuf>) -> Self {
        Self {
            temp_root: root.into(),
        }
    }

    /// Returns the root under which temp directories are created.
    #[must_use]
    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }
}

impl FileSystem for LocalFileSystem {
    fn directory_is_empty(&self, dir: &Path) -> Result<bool, FsError> {
        if !dir.exists() {
            return Err(FsError::NotFound(dir.display().to_string()));
        }
        if !dir.is_dir() {
            return Err(FsError::NotADirectory(dir.display().to_string()));
        }
        let mut entries = std::fs::read_dir(dir).map_err(|e| FsError::io(dir, e))?;
        Ok(entries.next().is_none())
    }

    fn create_directory(&self, dir: &Path) -> Result<(), FsError> {
        std::fs::create_dir_all(dir).map_err(|e| FsError::io(dir, e))
    }

    fn create_sub_directory(&self, main_dir: &Path, sub_dir: &str) -> Result<PathBuf, FsError> {
        if !main_dir.is_dir() {
            return Err(FsError::NotFound(main_dir.display().to_string()));
        }
        let new_dir = main_dir.join(sub_dir);
        std::fs::create_dir_all(&new_dir).map_err(|e| FsError::io(&new_dir, e))?;
        Ok(new_dir)
    }

    fn create_temp_directory(&self, namespace: &str, suffix: &str) -> Result<PathBuf, FsError> {
        let base = self.temp_root.join(namespace);
        std::fs::create_dir_all(&base).map_err(|e| FsError::io(&base, e))?;

        let suffix = if suffix.is_empty() {
            String::new()
        } else {
            format!("-{suffix}")
        };
        let dir = tempfile::Builder::new()
            .prefix("")
            .suffix(&suffix)
            .tempdir_in(&base)
            .map_err(|e| FsError::io(&base, e))?;
        Ok(dir.keep())
    }

    fn copy_file(&self, file: &Path, dest_dir: &Path) -> Result<PathBuf, FsError> {
        let name = file
            .file_name()
            .ok_or_else(|| FsError::NotFound(file.display().to_string()))?;
        let target = dest_dir.join(name);
        std::fs::copy(file, &target).map_err(|e| FsError::io(file, e))?;
        Ok(target)
    }

    fn remove_directory(&self, dir: &Path) -> Result<(), FsError> {
        match std::fs::remove_dir_all(dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FsError::io(dir, e)),
        }
    }
}

#[cfg(test)]
mod tests;
