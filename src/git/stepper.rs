use std::path::{Component, Path, PathBuf};

use anyhow::Context;

use crate::executor::code::CodeExecutor;
use crate::foundation::error::TutoResult;
use crate::git::applier::GitDiffApplier;
use crate::git::cli::Git;

/// A live detached worktree and the bookkeeping needed to tear it down.
#[derive(Debug)]
pub struct WorktreeSession {
    /// Canonical root of the stepped repository.
    pub repo_root: PathBuf,
    /// Project directory relative to [`WorktreeSession::repo_root`] (empty at the root).
    pub project_prefix: PathBuf,
    /// Scratch directory holding the worktrees; removed on teardown.
    pub temp_root: tempfile::TempDir,
    /// The current worktree.
    pub worktree_dir: PathBuf,
    /// Commit the session currently shows.
    pub commit: String,
    applier: Option<GitDiffApplier>,
}

impl WorktreeSession {
    /// The project directory inside the current worktree.
    pub fn project_dir(&self) -> PathBuf {
        self.worktree_dir.join(&self.project_prefix)
    }
}

#[derive(Debug, Default)]
enum StepperState {
    #[default]
    Uninitialized,
    Active(WorktreeSession),
    TornDown,
}

/// Steps a project through commits in disposable worktrees, leaving the caller's checkout
/// untouched.
///
/// Lifecycle: `Uninitialized → Active(A) → Active(B) → … → TornDown`. The first checkout
/// creates a worktree; later ones either replay the diff into a live editor
/// ([`CommitStepper::checkout_live`]) or swap the worktree wholesale
/// ([`CommitStepper::checkout`]). Any git failure is returned as a fatal error.
#[derive(Debug)]
pub struct CommitStepper {
    original_project_dir: PathBuf,
    state: StepperState,
    created: usize,
}

impl CommitStepper {
    /// Stepper for the repository containing `project_dir`.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            original_project_dir: project_dir.into(),
            state: StepperState::Uninitialized,
            created: 0,
        }
    }

    /// Project directory before stepping started.
    pub fn original_project_dir(&self) -> &Path {
        &self.original_project_dir
    }

    /// Where project files currently live: inside the worktree while active, else the
    /// original directory.
    pub fn project_dir(&self) -> PathBuf {
        match &self.state {
            StepperState::Active(s) => s.project_dir(),
            _ => self.original_project_dir.clone(),
        }
    }

    /// The live session, if any.
    pub fn session(&self) -> Option<&WorktreeSession> {
        match &self.state {
            StepperState::Active(s) => Some(s),
            _ => None,
        }
    }

    /// `true` once torn down.
    pub fn is_torn_down(&self) -> bool {
        matches!(self.state, StepperState::TornDown)
    }

    /// Show `commit` by swapping in a fresh worktree. Returns the new project directory.
    #[tracing::instrument(skip(self))]
    pub fn checkout(&mut self, commit: &str) -> TutoResult<PathBuf> {
        let StepperState::Active(session) = &mut self.state else {
            return self.start(commit);
        };
        let git = Git::new(session.repo_root.clone());
        remove_worktree(&git, &session.worktree_dir);
        self.created += 1;
        let dir = worktree_dir(session.temp_root.path(), self.created, commit);
        git.worktree_add_detached(&dir, commit)?;
        session.worktree_dir = dir;
        session.commit = commit.to_string();
        session.applier = None;
        tracing::info!(worktree = %session.worktree_dir.display(), "worktree swapped");
        Ok(session.project_dir())
    }

    /// Show `commit` by replaying the diff from the current commit into `editor`, keeping
    /// the worktree and the editor session. Returns the project directory.
    #[tracing::instrument(skip(self, editor))]
    pub fn checkout_live(
        &mut self,
        commit: &str,
        editor: &mut dyn CodeExecutor,
    ) -> TutoResult<PathBuf> {
        let StepperState::Active(session) = &mut self.state else {
            return self.start(commit);
        };
        let prefix = prefix_string(&session.project_prefix);
        let applier = session
            .applier
            .get_or_insert_with(|| GitDiffApplier::new(session.worktree_dir.clone(), &prefix));
        let touched = applier.apply(&session.commit, commit, editor)?;
        session.commit = commit.to_string();
        tracing::info!(touched, "diff replayed into editor");
        Ok(session.project_dir())
    }

    /// Remove the worktree and scratch directory and return the original project directory.
    /// Safe to call in any state.
    pub fn teardown(&mut self) -> TutoResult<PathBuf> {
        match std::mem::replace(&mut self.state, StepperState::TornDown) {
            StepperState::Active(session) => {
                let git = Git::new(session.repo_root.clone());
                remove_worktree(&git, &session.worktree_dir);
                let temp = session.temp_root.path().to_path_buf();
                session
                    .temp_root
                    .close()
                    .with_context(|| format!("remove '{}'", temp.display()))?;
                tracing::info!("commit stepping torn down");
            }
            StepperState::Uninitialized => self.state = StepperState::Uninitialized,
            StepperState::TornDown => {}
        }
        Ok(self.original_project_dir.clone())
    }

    fn start(&mut self, commit: &str) -> TutoResult<PathBuf> {
        let project = std::fs::canonicalize(&self.original_project_dir).with_context(|| {
            format!(
                "resolve project dir '{}'",
                self.original_project_dir.display()
            )
        })?;
        let repo_root = Git::new(project.clone()).repo_root()?;
        let project_prefix = project
            .strip_prefix(&repo_root)
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let temp_root = tempfile::Builder::new()
            .prefix("tutoreel-git-")
            .tempdir()
            .context("create worktree scratch dir")?;
        self.created += 1;
        let dir = worktree_dir(temp_root.path(), self.created, commit);
        Git::new(repo_root.clone()).worktree_add_detached(&dir, commit)?;

        let session = WorktreeSession {
            repo_root,
            project_prefix,
            temp_root,
            worktree_dir: dir,
            commit: commit.to_string(),
            applier: None,
        };
        let project_dir = session.project_dir();
        tracing::info!(worktree = %session.worktree_dir.display(), "commit stepping started");
        self.state = StepperState::Active(session);
        Ok(project_dir)
    }
}

impl Drop for CommitStepper {
    fn drop(&mut self) {
        if let Err(e) = self.teardown() {
            tracing::warn!("commit stepper teardown failed: {e}");
        }
    }
}

fn remove_worktree(git: &Git, dir: &Path) {
    let removed = git
        .worktree_remove(dir, true)
        .and_then(|()| git.worktree_prune());
    if let Err(e) = removed {
        tracing::warn!(worktree = %dir.display(), "could not remove worktree: {e}");
    }
}

fn worktree_dir(temp_root: &Path, n: usize, commit: &str) -> PathBuf {
    temp_root.join(format!("worktree-{n}-{}", sanitize_ref(commit)))
}

/// Filesystem-safe form of a git ref: path separators and odd characters become `-`, runs
/// collapse, and the result is capped at 48 characters.
pub fn sanitize_ref(reference: &str) -> String {
    let mut out = String::new();
    for c in reference.trim().chars() {
        let keep = c.is_ascii_alphanumeric() || matches!(c, '.' | '_');
        if keep {
            out.push(c);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    let out: String = out.trim_matches('-').chars().take(48).collect();
    if out.is_empty() { "ref".to_string() } else { out }
}

fn prefix_string(prefix: &Path) -> String {
    prefix
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
#[path = "../../tests/unit/git/stepper.rs"]
mod tests;
