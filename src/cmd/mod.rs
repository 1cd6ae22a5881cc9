// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   config   options, configs
//!   backup   backup
//!   scm      scms, remote-exists, contains-commit, verify-lfs
//! ```

pub mod backup;
pub mod config;
pub mod scm;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::config::Config;
use crate::core::process::ProcessRunner;
use crate::error::Result;
use crate::scm::{ScmContext, ScmType};
use crate::scm::registry::ScmRegistry;
use crate::utility::fs::LocalFileSystem;

/// Builds the backend registry described by `[scm]`.
///
/// # Errors
///
/// Returns an error if `scm.enabled` names something that is not a backend
/// or lists a backend twice.
pub fn build_registry(config: &Config) -> Result<ScmRegistry> {
    let runner = ProcessRunner::builder()
        .maybe_with_timeout(config.scm.timeout())
        .build();

    let mut context = ScmContext::new(Arc::new(runner), Arc::new(LocalFileSystem::new()));
    for scm in ScmType::ALL {
        context = context.with_executable(scm, config.scm.executable(scm));
    }

    Ok(ScmRegistry::with_enabled(context, &config.scm.enabled)?)
}
