// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};

use crate::cli::{Cli, Command};
use crate::scm::ScmType;
use clap::Parser;

#[test]
fn test_parse_version() {
    let cli = Cli::try_parse_from(["scm-backup", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_no_command() {
    let cli = Cli::try_parse_from(["scm-backup"]).unwrap();
    assert!(cli.command.is_none());
}

#[test]
fn test_parse_global_options() {
    let cli = Cli::try_parse_from([
        "scm-backup",
        "-c",
        "base.toml",
        "--config",
        "local.toml",
        "-l",
        "4",
        "-d",
        "/backups",
        "-j",
        "3",
        "-s",
        "scm.timeout_secs=600",
        "options",
    ])
    .unwrap();

    assert_eq!(
        cli.global.configs,
        vec![PathBuf::from("base.toml"), PathBuf::from("local.toml")]
    );
    assert_eq!(cli.global.log_level, Some(4));
    assert_eq!(cli.global.local_folder.as_deref(), Some(Path::new("/backups")));
    assert_eq!(cli.global.jobs, Some(3));
    assert!(matches!(cli.command, Some(Command::Options)));
}

#[test]
fn test_config_overrides() {
    let cli = Cli::try_parse_from([
        "scm-backup",
        "-s",
        "scm.git=/opt/git",
        "-l",
        "2",
        "--log-file",
        "backup.log",
        "-d",
        "/backups",
        "-j",
        "4",
        "backup",
    ])
    .unwrap();

    insta::assert_snapshot!(cli.global.to_config_overrides().join("\n"), @r"
    scm.git=/opt/git
    global.output_log_level=2
    global.file_log_level=2
    global.log_file=backup.log
    global.local_folder=/backups
    global.jobs=4
    ");
}

#[test]
fn test_file_log_level_overrides_log_level() {
    let cli =
        Cli::try_parse_from(["scm-backup", "-l", "1", "--file-log-level", "5", "configs"]).unwrap();
    let overrides = cli.global.to_config_overrides();
    assert!(overrides.contains(&"global.output_log_level=1".to_string()));
    assert!(overrides.contains(&"global.file_log_level=5".to_string()));
}

#[test]
fn test_log_level_out_of_range() {
    assert!(Cli::try_parse_from(["scm-backup", "-l", "7", "version"]).is_err());
}

#[test]
fn test_zero_jobs_rejected() {
    assert!(Cli::try_parse_from(["scm-backup", "-j", "0", "backup"]).is_err());
}

#[test]
fn test_parse_backup() {
    let cli = Cli::try_parse_from(["scm-backup", "backup", "tool", "docs"]).unwrap();
    let Some(Command::Backup(args)) = cli.command else {
        panic!("expected backup command");
    };
    assert_eq!(args.names, vec!["tool", "docs"]);
    assert!(!args.no_config_copy);

    let cli = Cli::try_parse_from(["scm-backup", "backup", "--no-config-copy"]).unwrap();
    let Some(Command::Backup(args)) = cli.command else {
        panic!("expected backup command");
    };
    assert!(args.names.is_empty());
    assert!(args.no_config_copy);
}

#[test]
fn test_parse_scms() {
    let cli = Cli::try_parse_from(["scm-backup", "scms", "--json"]).unwrap();
    let Some(Command::Scms(args)) = cli.command else {
        panic!("expected scms command");
    };
    assert!(args.json);
}

#[test]
fn test_parse_remote_exists() {
    let cli = Cli::try_parse_from([
        "scm-backup",
        "remote-exists",
        "https://example.com/r.git",
        "--scm",
        "GIT",
        "-u",
        "me",
        "-p",
        "secret",
    ])
    .unwrap();
    let Some(Command::RemoteExists(args)) = cli.command else {
        panic!("expected remote-exists command");
    };
    assert_eq!(args.url, "https://example.com/r.git");
    assert_eq!(args.scm, ScmType::Git);
    assert_eq!(args.user.as_deref(), Some("me"));
    assert_eq!(args.password.as_deref(), Some("secret"));
}

#[test]
fn test_remote_exists_user_requires_password() {
    let result = Cli::try_parse_from([
        "scm-backup",
        "remote-exists",
        "https://example.com/r.git",
        "-u",
        "me",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_unknown_scm_rejected() {
    let result = Cli::try_parse_from([
        "scm-backup",
        "remote-exists",
        "https://example.com/r.git",
        "--scm",
        "svn",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_parse_contains_commit_and_verify_lfs() {
    let cli = Cli::try_parse_from(["scm-backup", "contains-commit", "/backups/tool", "7be2913"])
        .unwrap();
    let Some(Command::ContainsCommit(args)) = cli.command else {
        panic!("expected contains-commit command");
    };
    assert_eq!(args.dir, Path::new("/backups/tool"));
    assert_eq!(args.commit, "7be2913");
    assert_eq!(args.scm, ScmType::Git);

    let cli =
        Cli::try_parse_from(["scm-backup", "verify-lfs", "/backups/tool", "assets/logo.png"])
            .unwrap();
    let Some(Command::VerifyLfs(args)) = cli.command else {
        panic!("expected verify-lfs command");
    };
    assert_eq!(args.file, Path::new("assets/logo.png"));
}
