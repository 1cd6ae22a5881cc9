// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> load config --> Logging --> Command Dispatch
//!   Version | Options | Configs | Scms | Backup
//!   RemoteExists | ContainsCommit | VerifyLfs
//! ```

use std::process::ExitCode;

use scm_backup::cli::global::GlobalOptions;
use scm_backup::cli::{self, Command};
use scm_backup::cmd::backup::run_backup_command;
use scm_backup::cmd::build_registry;
use scm_backup::cmd::config::{LoadedConfig, load_config, run_configs_command, run_options_command};
use scm_backup::cmd::scm::{
    run_contains_commit_command, run_remote_exists_command, run_scms_command,
    run_verify_lfs_command,
};
use scm_backup::error::Result;
use scm_backup::logging::{LogConfig, LogLevel, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let loaded = load_config(&cli.global);
    let log_config = loaded
        .as_ref()
        .map_or_else(|_| build_log_config(&cli.global), |l| l.config.log_config());
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, loaded).await
}

/// Logging settings when the configuration could not be loaded.
fn build_log_config(global: &GlobalOptions) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(console_level);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(global.log_file.clone())
        .build()
}

async fn dispatch_command(cli: &cli::Cli, loaded: Result<LoadedConfig>) -> ExitCode {
    match run(cli, loaded).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &cli::Cli, loaded: Result<LoadedConfig>) -> Result<()> {
    match &cli.command {
        None => anyhow::bail!("no command specified, use --help for usage information"),
        // works even with a broken configuration
        Some(Command::Version) => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(command) => run_with_config(command, loaded?).await,
    }
}

async fn run_with_config(command: &Command, loaded: LoadedConfig) -> Result<()> {
    let LoadedConfig {
        config,
        files,
        sources,
    } = loaded;
    match command {
        Command::Version => Ok(()),
        Command::Options => {
            run_options_command(&config);
            Ok(())
        }
        Command::Configs => {
            run_configs_command(&sources);
            Ok(())
        }
        Command::Scms(args) => run_scms_command(args, &build_registry(&config)?),
        Command::Backup(args) => {
            let registry = build_registry(&config)?;
            run_backup_command(args, &config, &files, registry).await
        }
        Command::RemoteExists(args) => run_remote_exists_command(args, &build_registry(&config)?),
        Command::ContainsCommit(args) => {
            run_contains_commit_command(args, &build_registry(&config)?)
        }
        Command::VerifyLfs(args) => run_verify_lfs_command(args, &build_registry(&config)?),
    }
}
