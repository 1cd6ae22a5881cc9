// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Config-related commands for scm-backup.

use std::path::PathBuf;

use crate::cli::global::GlobalOptions;
use crate::config::loader::ConfigLoader;
use crate::config::{Config, ENV_PREFIX, LOCAL_CONFIG_FILE};
use crate::error::Result;

/// Configuration together with the sources it was built from.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// Files on disk, in load order.
    pub files: Vec<PathBuf>,
    /// Numbered source descriptions for `configs`.
    pub sources: Vec<String>,
}

/// Assembles the loader for the given command-line options.
///
/// # Errors
///
/// Returns an error if a `--set` option is malformed.
pub fn build_config_loader(global: &GlobalOptions) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional(LOCAL_CONFIG_FILE);
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);

    for option in global.to_config_overrides() {
        loader = loader.set_option(&option)?;
    }
    Ok(loader)
}

/// Loads and validates the configuration.
///
/// # Errors
///
/// Returns an error if a file is missing or invalid, or validation fails.
pub fn load_config(global: &GlobalOptions) -> Result<LoadedConfig> {
    let loader = build_config_loader(global)?;
    let files = loader.config_files();
    let sources = loader.format_loaded_files();
    let config = loader.build()?;
    Ok(LoadedConfig {
        config,
        files,
        sources,
    })
}

/// Display current configuration options.
pub fn run_options_command(config: &Config) {
    for line in config.format_options() {
        println!("{line}");
    }
}

/// Display loaded configuration files.
pub fn run_configs_command(sources: &[String]) {
    if sources.is_empty() {
        println!("No configuration files loaded");
    } else {
        for line in sources {
            println!("{line}");
        }
    }
}
