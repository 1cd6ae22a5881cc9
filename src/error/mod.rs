// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!              BackupError (~24 bytes)
//!                     |
//!    +------+-----+-----+------+------+------+
//!    |      |           |      |      |      |
//!    v      v           v      v      v      v
//!   Scm  Registry      Cfg   Proc    Fs   Io/Other
//!   Box    Box         Box   Box    Box   Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Scm      ToolUnavailable, TargetNotEmpty, RemoteFetchFailed,
//!            LfsFetchFailed, LfsListFailed, RepositoryNotFound,
//!            NotARepository, InitFailed, InvalidUrl, LfsVerificationFailed
//!   Registry UnknownScmType, NotAnScmImplementation, DuplicateScmType
//!   Config   MissingKey, InvalidValue
//!   Process  InvalidCommand, OutputError
//!   Fs       NotFound, NotADirectory, IoError
//!
//! All variants boxed => BackupError fits in 24 bytes.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`BackupError`].
pub type BackupResult<T> = std::result::Result<T, BackupError>;

/// Result type for SCM contract operations.
pub type ScmResult<T> = std::result::Result<T, ScmError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum BackupError {
    /// SCM operation failed.
    #[error("scm error: {0}")]
    Scm(#[from] Box<ScmError>),

    /// Backend registry misuse.
    #[error("registry error: {0}")]
    Registry(#[from] Box<RegistryError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// A failure with no more specific category, e.g. a panicked backup task.
    #[error("{0}")]
    Other(Box<str>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for BackupError {
                fn from(err: $error) -> Self {
                    BackupError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ScmError => Scm,
    RegistryError => Registry,
    ConfigError => Config,
    ProcessError => Process,
    FsError => Fs,
    std::io::Error => Io,
}

// --- SCM Errors ---

/// Errors raised by SCM contract operations.
///
/// Variants that carry `output` hold the external tool's diagnostic text
/// verbatim, after credentials have been redacted.
#[derive(Debug, Error)]
pub enum ScmError {
    /// The executable could not be invoked or did not report a recognizable version.
    #[error("{tool} is not available: {message}")]
    ToolUnavailable { tool: String, message: String },

    /// Pull target exists, is not a repository and is not empty.
    #[error("target directory is not empty and not a repository: {path}")]
    TargetNotEmpty { path: String },

    /// Fetching from the remote failed.
    #[error("failed to fetch from {url}: {output}")]
    RemoteFetchFailed { url: String, output: String },

    /// Fetching large-file content failed.
    #[error("failed to fetch lfs content from {url}: {output}")]
    LfsFetchFailed { url: String, output: String },

    /// Listing large files failed.
    #[error("failed to list lfs files in {path}: {output}")]
    LfsListFailed { path: String, output: String },

    /// Directory does not exist.
    #[error("directory does not exist: {path}")]
    RepositoryNotFound { path: String },

    /// Directory exists but is not a repository.
    #[error("directory is not a repository: {path}")]
    NotARepository { path: String },

    /// Repository initialization failed.
    #[error("failed to create repository in {path}: {output}")]
    InitFailed { path: String, output: String },

    /// Remote URL cannot be used.
    #[error("invalid remote url '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// A step of the large-file materialization round trip failed.
    #[error("lfs verification failed at '{step}': {output}")]
    LfsVerificationFailed { step: String, output: String },

    /// The command runner itself faulted.
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// Filesystem collaborator failed.
    #[error(transparent)]
    Fs(#[from] FsError),
}

// --- Registry Errors ---

/// SCM registry errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No backend registered for this identifier.
    #[error("no scm registered for type '{0}'")]
    UnknownScmType(String),

    /// Name does not refer to any SCM implementation.
    #[error("'{0}' is not an scm implementation")]
    NotAnScmImplementation(String),

    /// Identifier registered twice.
    #[error("scm type '{0}' is already registered")]
    DuplicateScmType(String),
}

// --- Config Errors ---

/// Problems with the merged configuration, reported with the offending
/// `[section]` and key so the user can find it in their TOML file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Process Errors ---

/// Faults of the command runner.
///
/// Ordinary command failure is not an error; it is reported through
/// `CommandResult::success`.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The command line handed to the runner is malformed.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// Spawning failed or output could not be collected.
    #[error("failed to read output from process '{command}': {message}")]
    OutputError { command: String, message: String },
}

// --- Filesystem Errors ---

#[derive(Debug, Error)]
pub enum FsError {
    #[error("path not found: {0}")]
    NotFound(String),

    /// Path exists but is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests;
