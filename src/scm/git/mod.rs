// scm-backup: Source Control Mirror Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend.
//!
//! ```text
//! pull_from_remote(url, dir, creds)
//!   dir not a repo? --> non-empty? --> TargetNotEmpty
//!   url usable with creds?            --> InvalidUrl
//!   dir not a repo? --> init --bare dir
//!   fetch --force --prune url heads/* tags/*   --> RemoteFetchFailed
//!   align HEAD with remote default branch       (warn only)
//!   lfs present && lfs ls-files non-empty?  --> lfs fetch --all url
//!
//! backup_contains_lfs_file(dir, file)
//!   tmprepo   <-- push --mirror, symbolic-ref HEAD, lfs push --all
//!   finalrepo <-- clone tmprepo (smudge materializes lfs content)
//!   finalrepo/file is a regular file and not a pointer?
//! ```
//!
//! Every invocation runs with `GIT_TERMINAL_PROMPT=0` and
//! `GCM_INTERACTIVE=never` so that a remote asking for credentials fails
//! instead of hanging. Remote URLs carrying credentials are passed as secret
//! arguments and all tool output is redacted before it reaches an error.

use regex::Regex;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use super::credentials::RemoteUrl;
use super::{Scm, ScmBackend, ScmContext, ScmCredentials, ScmType};
use crate::core::process::{CommandLine, CommandResult, CommandRunner};
use crate::error::{ScmError, ScmResult};
use crate::utility::fs::FileSystem;

/// Namespace for temp directories created during lfs verification.
pub const TEMP_NAMESPACE: &str = "_scm-backup-gitscm";

const LFS_POINTER_HEADER: &[u8] = b"version https://git-lfs.github.com/spec/v1";

/// Backend driving the `git` executable.
pub struct GitScm {
    executable: PathBuf,
    runner: Arc<dyn CommandRunner>,
    file_system: Arc<dyn FileSystem>,
}

impl fmt::Debug for GitScm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitScm")
            .field("executable", &self.executable)
            .finish_non_exhaustive()
    }
}

impl ScmBackend for GitScm {
    const SCM_TYPE: ScmType = ScmType::Git;

    fn from_context(context: &ScmContext) -> Self {
        Self::new(
            context.executable(ScmType::Git),
            context.runner(),
            context.file_system(),
        )
    }
}

impl GitScm {
    pub fn new(
        executable: impl Into<PathBuf>,
        runner: Arc<dyn CommandRunner>,
        file_system: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            executable: executable.into(),
            runner,
            file_system,
        }
    }

    /// Returns the executable this backend invokes.
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Whether the executable exists, without starting it.
    ///
    /// Bare names go through the cached PATH lookup.
    fn executable_found(&self) -> bool {
        match self.executable.to_str() {
            Some(name) if self.executable.components().count() == 1 => CommandLine::exists(name),
            _ => self.executable.is_file(),
        }
    }

    fn tool(&self) -> String {
        self.executable.display().to_string()
    }

    /// Base command with the non-interactive environment.
    fn git(&self) -> CommandLine {
        CommandLine::new(&self.executable)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GCM_INTERACTIVE", "never")
    }

    /// `git -C <dir>`.
    fn git_in(&self, dir: &Path) -> CommandLine {
        self.git().arg("-C").arg(dir)
    }

    fn run(&self, cmd: &CommandLine) -> ScmResult<CommandResult> {
        Ok(self.runner.execute(cmd)?)
    }

    /// Runs a yes/no query. A runner fault counts as "no".
    fn query(&self, cmd: &CommandLine) -> Option<CommandResult> {
        match self.run(cmd) {
            Ok(result) => Some(result),
            Err(e) => {
                debug!(command = %cmd.display(), error = %e, "query could not run");
                None
            }
        }
    }

    fn ensure_repository(&self, dir: &Path) -> ScmResult<()> {
        if !dir.exists() {
            return Err(ScmError::RepositoryNotFound {
                path: dir.display().to_string(),
            });
        }
        if !self.directory_is_repository(dir) {
            return Err(ScmError::NotARepository {
                path: dir.display().to_string(),
            });
        }
        Ok(())
    }

    /// Points the mirror's `HEAD` at the remote's default branch.
    ///
    /// A fresh bare repository's `HEAD` names the local default branch, which
    /// may not exist in the remote. Nothing here fails the pull.
    fn align_head(&self, dir: &Path, remote: &RemoteUrl) {
        let ls_remote = self
            .git()
            .args(["ls-remote", "--symref"])
            .secret_arg(remote.for_command(), remote.plain())
            .arg("HEAD");

        let head_ref = match self.run(&ls_remote) {
            Ok(result) if result.success() => parse_remote_head(result.stdout()).map(str::to_string),
            Ok(result) => {
                warn!(
                    url = %remote.plain(),
                    output = %remote.redact(&result.output()),
                    "could not query remote HEAD"
                );
                return;
            }
            Err(e) => {
                warn!(url = %remote.plain(), error = %e, "could not query remote HEAD");
                return;
            }
        };

        let Some(head_ref) = head_ref else {
            debug!(url = %remote.plain(), "remote has no symbolic HEAD");
            return;
        };

        let verify = self
            .git_in(dir)
            .args(["rev-parse", "--quiet", "--verify"])
            .arg(&head_ref);
        if !self.run(&verify).is_ok_and(|r| r.success()) {
            debug!(dir = %dir.display(), head = %head_ref, "remote HEAD branch not in mirror");
            return;
        }

        let set_head = self.git_in(dir).args(["symbolic-ref", "HEAD"]).arg(&head_ref);
        match self.run(&set_head) {
            Ok(result) if result.success() => {
                debug!(dir = %dir.display(), head = %head_ref, "aligned HEAD");
            }
            Ok(result) => {
                warn!(dir = %dir.display(), output = %result.output(), "could not set HEAD");
            }
            Err(e) => warn!(dir = %dir.display(), error = %e, "could not set HEAD"),
        }
    }

    fn verification_step(step: &str, result: &CommandResult) -> ScmResult<()> {
        if result.success() {
            return Ok(());
        }
        Err(ScmError::LfsVerificationFailed {
            step: step.to_string(),
            output: result.output(),
        })
    }

    fn lfs_round_trip(
        &self,
        dir: &Path,
        file: &Path,
        tmp_repo: &Path,
        final_repo: &mut Option<PathBuf>,
    ) -> ScmResult<bool> {
        self.create_repository(tmp_repo)?;

        let push = self.git_in(dir).args(["push", "--mirror"]).arg(tmp_repo);
        Self::verification_step("push --mirror", &self.run(&push)?)?;

        let head = self.run(&self.git_in(dir).args(["symbolic-ref", "HEAD"]))?;
        if head.success() {
            let set_head = self
                .git_in(tmp_repo)
                .args(["symbolic-ref", "HEAD"])
                .arg(head.stdout().trim());
            Self::verification_step("symbolic-ref HEAD", &self.run(&set_head)?)?;
        }

        let target = Url::from_file_path(tmp_repo).map_err(|()| ScmError::LfsVerificationFailed {
            step: "lfs push".to_string(),
            output: format!("cannot build file url for {}", tmp_repo.display()),
        })?;
        let lfs_push = self
            .git_in(dir)
            .args(["lfs", "push", "--all"])
            .arg(target.as_str());
        Self::verification_step("lfs push", &self.run(&lfs_push)?)?;

        let clone_dir = final_repo.insert(
            self.file_system
                .create_temp_directory(TEMP_NAMESPACE, "finalrepo")?,
        );
        let clone = self
            .git()
            .args([
                "-c",
                "filter.lfs.smudge=git-lfs smudge -- %f",
                "-c",
                "filter.lfs.process=git-lfs filter-process",
                "-c",
                "filter.lfs.required=true",
                "clone",
            ])
            .arg(tmp_repo)
            .arg(&*clone_dir);
        Self::verification_step("clone", &self.run(&clone)?)?;

        let candidate = clone_dir.join(file);
        Ok(candidate.is_file() && !is_lfs_pointer(&candidate))
    }

    fn remove_temp(&self, dir: &Path) {
        if let Err(e) = self.file_system.remove_directory(dir) {
            debug!(dir = %dir.display(), error = %e, "failed to remove temp directory");
        }
    }
}

/// Extracts the version token from `git --version` output.
fn parse_version(stdout: &str) -> Option<String> {
    let re = Regex::new(r"git version (\S+)").ok()?;
    re.captures(stdout)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extracts `refs/heads/<branch>` from `git ls-remote --symref <url> HEAD`.
fn parse_remote_head(stdout: &str) -> Option<&str> {
    stdout.lines().find_map(|line| {
        let rest = line.strip_prefix("ref:")?;
        let mut parts = rest.split_whitespace();
        let target = parts.next()?;
        (parts.next() == Some("HEAD") && target.starts_with("refs/heads/")).then_some(target)
    })
}

/// Compares resolved paths, falling back to the literal paths when either
/// cannot be resolved.
fn same_directory(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn is_commit_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_hexdigit())
}

/// Whether `path` still holds an lfs pointer instead of the real content.
fn is_lfs_pointer(path: &Path) -> bool {
    let mut head = [0u8; LFS_POINTER_HEADER.len()];
    std::fs::File::open(path)
        .and_then(|mut f| f.read_exact(&mut head))
        .is_ok_and(|()| head == LFS_POINTER_HEADER)
}

impl Scm for GitScm {
    fn scm_type(&self) -> ScmType {
        ScmType::Git
    }

    fn is_on_this_computer(&self) -> bool {
        if !self.executable_found() {
            debug!(executable = %self.tool(), "executable not found");
            return false;
        }
        self.query(&self.git().arg("--version"))
            .is_some_and(|r| r.success() && r.stdout().to_lowercase().contains("git version"))
    }

    fn version_number(&self) -> ScmResult<String> {
        let result = self
            .run(&self.git().arg("--version"))
            .map_err(|e| ScmError::ToolUnavailable {
                tool: self.tool(),
                message: e.to_string(),
            })?;

        if !result.success() {
            return Err(ScmError::ToolUnavailable {
                tool: self.tool(),
                message: result.output(),
            });
        }

        parse_version(result.stdout()).ok_or_else(|| ScmError::ToolUnavailable {
            tool: self.tool(),
            message: format!("unrecognized version output: {}", result.output()),
        })
    }

    fn lfs_is_on_this_computer(&self) -> bool {
        self.query(&self.git().args(["lfs", "version"]))
            .is_some_and(|r| r.success())
    }

    fn directory_is_repository(&self, dir: &Path) -> bool {
        let check = self
            .git_in(dir)
            .args(["rev-parse", "--is-bare-repository", "--absolute-git-dir"]);
        let Some(result) = self.query(&check) else {
            return false;
        };
        if !result.success() {
            return false;
        }

        // mirrors are always bare, so non-bare repositories do not count
        let mut lines = result.stdout().lines().map(str::trim);
        if lines.next() != Some("true") {
            return false;
        }
        // git also answers for directories inside a repository, e.g. `<mirror>/refs`
        lines
            .next()
            .is_some_and(|git_dir| same_directory(Path::new(git_dir), dir))
    }

    fn create_repository(&self, dir: &Path) -> ScmResult<()> {
        if self.directory_is_repository(dir) {
            return Ok(());
        }

        let result = self.run(&self.git().args(["init", "--bare"]).arg(dir))?;
        if !result.success() {
            return Err(ScmError::InitFailed {
                path: dir.display().to_string(),
                output: result.output(),
            });
        }
        debug!(dir = %dir.display(), "created bare repository");
        Ok(())
    }

    fn pull_from_remote(
        &self,
        url: &str,
        dir: &Path,
        credentials: Option<&ScmCredentials>,
    ) -> ScmResult<()> {
        let is_repository = self.directory_is_repository(dir);
        if !is_repository && dir.exists() && !self.file_system.directory_is_empty(dir)? {
            return Err(ScmError::TargetNotEmpty {
                path: dir.display().to_string(),
            });
        }

        // validated before init so a bad url leaves nothing behind
        let remote = RemoteUrl::new(url, credentials)?;
        if !is_repository {
            self.create_repository(dir)?;
        }

        info!(url = %remote.plain(), dir = %dir.display(), "fetching");
        let fetch = self
            .git_in(dir)
            .args(["fetch", "--force", "--prune"])
            .secret_arg(remote.for_command(), remote.plain())
            .args(["refs/heads/*:refs/heads/*", "refs/tags/*:refs/tags/*"]);
        let result = self.run(&fetch)?;
        if !result.success() {
            return Err(ScmError::RemoteFetchFailed {
                url: remote.plain().to_string(),
                output: remote.redact(&result.output()),
            });
        }

        self.align_head(dir, &remote);

        if !self.lfs_is_on_this_computer() {
            debug!(dir = %dir.display(), "git lfs not installed, skipping lfs content");
            return Ok(());
        }
        if self.repository_contains_lfs(dir)? {
            self.pull_lfs_from_remote(url, dir, credentials)?;
        }
        Ok(())
    }

    fn pull_lfs_from_remote(
        &self,
        url: &str,
        dir: &Path,
        credentials: Option<&ScmCredentials>,
    ) -> ScmResult<()> {
        let remote = RemoteUrl::new(url, credentials)?;

        info!(url = %remote.plain(), dir = %dir.display(), "fetching lfs content");
        let fetch = self
            .git_in(dir)
            .args(["lfs", "fetch", "--all"])
            .secret_arg(remote.for_command(), remote.plain());
        let result = self.run(&fetch)?;
        if !result.success() {
            return Err(ScmError::LfsFetchFailed {
                url: remote.plain().to_string(),
                output: remote.redact(&result.output()),
            });
        }
        Ok(())
    }

    fn repository_contains_lfs(&self, dir: &Path) -> ScmResult<bool> {
        let result = self.run(&self.git_in(dir).args(["lfs", "ls-files", "--all"]))?;
        if !result.success() {
            return Err(ScmError::LfsListFailed {
                path: dir.display().to_string(),
                output: result.output(),
            });
        }
        Ok(!result.stdout().trim().is_empty())
    }

    fn repository_contains_commit(&self, dir: &Path, commit_id: &str) -> ScmResult<bool> {
        self.ensure_repository(dir)?;

        let commit_id = commit_id.trim();
        if !is_commit_id(commit_id) {
            return Ok(false);
        }

        let verify = self
            .git_in(dir)
            .args(["rev-parse", "--quiet", "--verify"])
            .arg(format!("{commit_id}^{{commit}}"));
        let result = self.run(&verify)?;
        Ok(result.success()
            && result
                .stdout()
                .trim()
                .to_ascii_lowercase()
                .starts_with(&commit_id.to_ascii_lowercase()))
    }

    fn remote_repository_exists(
        &self,
        url: &str,
        credentials: Option<&ScmCredentials>,
    ) -> ScmResult<bool> {
        let remote = RemoteUrl::new(url, credentials)?;
        let ls_remote = self
            .git()
            .arg("ls-remote")
            .secret_arg(remote.for_command(), remote.plain());
        let result = self.run(&ls_remote)?;
        if !result.success() {
            debug!(
                url = %remote.plain(),
                output = %remote.redact(&result.output()),
                "remote not reachable"
            );
        }
        Ok(result.success())
    }

    fn backup_contains_lfs_file(&self, dir: &Path, file: &Path) -> ScmResult<bool> {
        self.ensure_repository(dir)?;
        if !self.lfs_is_on_this_computer() {
            return Err(ScmError::ToolUnavailable {
                tool: format!("{} lfs", self.tool()),
                message: "git lfs is not installed".to_string(),
            });
        }

        let tmp_repo = self
            .file_system
            .create_temp_directory(TEMP_NAMESPACE, "tmprepo")?;
        let mut final_repo = None;

        let outcome = self.lfs_round_trip(dir, file, &tmp_repo, &mut final_repo);

        self.remove_temp(&tmp_repo);
        if let Some(final_repo) = final_repo {
            self.remove_temp(&final_repo);
        }
        outcome
    }
}
