// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for CLI parsing.
//!
//! Tests the CLI module with realistic command-line argument patterns.

use clap::Parser;
use scm_backup::cli::global::GlobalOptions;
use scm_backup::cli::{Cli, Command};
use scm_backup::cmd::config::load_config;

// =============================================================================
// Version Command
// =============================================================================

#[test]
fn cli_version_command() {
    let cli = Cli::try_parse_from(["scm-backup", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn cli_version_alias() {
    let cli = Cli::try_parse_from(["scm-backup", "-v"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

// =============================================================================
// Commands
// =============================================================================

#[test]
fn cli_every_command_parses() {
    let commands: &[&[&str]] = &[
        &["options"],
        &["configs"],
        &["scms"],
        &["backup"],
        &["remote-exists", "https://example.com/r.git"],
        &["contains-commit", "/backups/r", "abc123"],
        &["verify-lfs", "/backups/r", "big.bin"],
    ];
    for args in commands {
        let argv = std::iter::once("scm-backup").chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv);
        assert!(cli.is_ok(), "{args:?} should parse");
    }
}

#[test]
fn cli_unknown_command_rejected() {
    assert!(Cli::try_parse_from(["scm-backup", "restore"]).is_err());
}

#[test]
fn cli_missing_positional_rejected() {
    assert!(Cli::try_parse_from(["scm-backup", "contains-commit", "/backups/r"]).is_err());
    assert!(Cli::try_parse_from(["scm-backup", "verify-lfs"]).is_err());
    assert!(Cli::try_parse_from(["scm-backup", "remote-exists"]).is_err());
}

// =============================================================================
// Global Options
// =============================================================================

#[test]
fn cli_global_options_before_command() {
    let cli = Cli::try_parse_from(["scm-backup", "-l", "5", "--jobs", "2", "backup"]).unwrap();
    assert_eq!(cli.global.log_level, Some(5));
    assert_eq!(cli.global.jobs, Some(2));
}

#[test]
fn cli_overrides_reach_config() {
    let temp = tempfile::tempdir().expect("failed to create temp dir");
    let path = temp.path().join("backup.toml");
    std::fs::write(
        &path,
        "[global]\nlocal_folder = \"/from-file\"\njobs = 1\n\n[scm]\ntimeout_secs = 10\n",
    )
    .unwrap();

    let path_arg = path.display().to_string();
    let cli = Cli::try_parse_from([
        "scm-backup",
        "--no-default-config",
        "-c",
        &path_arg,
        "-d",
        "/from-cli",
        "-s",
        "scm.timeout_secs=20",
        "options",
    ])
    .unwrap();

    let loaded = load_config(&cli.global).unwrap();
    let config = loaded.config;
    assert_eq!(config.local_folder().unwrap(), std::path::Path::new("/from-cli"));
    assert_eq!(config.scm.timeout_secs, 20);
    assert_eq!(config.global.jobs, 1);
}

#[test]
fn cli_missing_config_file_fails() {
    let global = GlobalOptions {
        configs: vec!["/nonexistent/backup.toml".into()],
        no_default_config: true,
        ..GlobalOptions::default()
    };
    assert!(load_config(&global).is_err());
}
