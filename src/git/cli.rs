use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Context;

use crate::foundation::error::{TutoError, TutoResult};

/// Run `git <args>` in `dir` and return raw stdout; a non-zero exit is [`TutoError::Git`].
pub fn git_cmd<S: AsRef<OsStr>>(dir: &Path, args: &[S]) -> TutoResult<String> {
    let command = format!(
        "git {}",
        args.iter()
            .map(|a| a.as_ref().to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );
    tracing::debug!(dir = %dir.display(), "{command}");
    let out = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| TutoError::Git {
            command: command.clone(),
            stderr: e.to_string(),
            exit_code: None,
        })?;
    if out.status.success() {
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    } else {
        Err(TutoError::Git {
            command,
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_owned(),
            exit_code: out.status.code(),
        })
    }
}

/// A repository (or worktree) the `git` binary is run against.
#[derive(Clone, Debug)]
pub struct Git {
    dir: PathBuf,
}

impl Git {
    /// Run commands with `dir` as the working directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Working directory of every command.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Absolute, canonical top-level directory of the repository containing [`Git::dir`].
    pub fn repo_root(&self) -> TutoResult<PathBuf> {
        let out = git_cmd(&self.dir, &["rev-parse", "--show-toplevel"])?;
        let root = PathBuf::from(out.trim_end());
        Ok(std::fs::canonicalize(&root)
            .with_context(|| format!("canonicalize repo root '{}'", root.display()))?)
    }

    /// `git worktree add --detach <dir> <commit>`.
    pub fn worktree_add_detached(&self, dir: &Path, commit: &str) -> TutoResult<()> {
        git_cmd(
            &self.dir,
            &[
                OsStr::new("worktree"),
                OsStr::new("add"),
                OsStr::new("--detach"),
                dir.as_os_str(),
                OsStr::new(commit),
            ],
        )?;
        Ok(())
    }

    /// `git worktree remove [--force] <dir>`.
    pub fn worktree_remove(&self, dir: &Path, force: bool) -> TutoResult<()> {
        let mut args = vec![OsStr::new("worktree"), OsStr::new("remove")];
        if force {
            args.push(OsStr::new("--force"));
        }
        args.push(dir.as_os_str());
        git_cmd(&self.dir, &args)?;
        Ok(())
    }

    /// `git worktree prune`.
    pub fn worktree_prune(&self) -> TutoResult<()> {
        git_cmd(&self.dir, &["worktree", "prune"])?;
        Ok(())
    }

    /// `git diff --name-status -M <from> <to>` output.
    pub fn name_status_diff(&self, from: &str, to: &str) -> TutoResult<String> {
        git_cmd(&self.dir, &["diff", "--name-status", "-M", from, to])
    }

    /// Content of repo-relative `path` at `commit`, or `None` when the commit has no such
    /// file. An unknown commit or a broken repository is still a [`TutoError::Git`].
    pub fn show_file(&self, commit: &str, path: &str) -> TutoResult<Option<String>> {
        let listed = git_cmd(
            &self.dir,
            &[
                "--literal-pathspecs",
                "ls-tree",
                "-z",
                "--full-tree",
                commit,
                "--",
                path,
            ],
        )?;
        // Entries are "<mode> <type> <object>\t<path>".
        let is_blob = listed.split('\0').any(|entry| match entry.split_once('\t') {
            Some((meta, name)) => name == path && meta.split(' ').nth(1) == Some("blob"),
            None => false,
        });
        if !is_blob {
            return Ok(None);
        }
        git_cmd(&self.dir, &["show", format!("{commit}:{path}").as_str()]).map(Some)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/git/cli.rs"]
mod tests;
