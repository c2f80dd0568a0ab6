//! Version-control plumbing: the `git` CLI wrapper, name-status parsing, live diff replay
//! across commits and the worktree-based commit stepper.

/// Replays commit-to-commit changes into a live editor.
pub mod applier;
/// `git diff --name-status` parsing.
pub mod changes;
/// Thin wrapper over the `git` binary.
pub mod cli;
/// Disposable-worktree commit stepping.
pub mod stepper;
