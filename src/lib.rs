//! tutoreel replays scripted tutorials into video.
//!
//! A compiled action stream (narrate, open a file, type a line, click, step to a commit, ...)
//! is executed by a [`Runtime`] one action at a time. Each action emits at most one segment,
//! normalized to a single [`OutputStandard`], and a final `merge` stream-copies them into one
//! MP4 after checking every segment's encoding [`Signature`].
//!
//! - Code changes are replayed keystroke by keystroke from a Myers diff ([`diff`]).
//! - Commits are stepped in disposable `git` worktrees ([`git`]).
//! - Narration is cached on disk and degrades to silence on failure ([`narration`]).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Content-addressed disk cache.
pub mod cache;
/// Runtime configuration.
pub mod config;
/// Myers diff engine and editor replay.
pub mod diff;
/// Code editor and browser capability traits.
pub mod executor;
/// Error taxonomy and the canonical output standard.
pub mod foundation;
/// Commit stepping over `git` worktrees.
pub mod git;
/// `ffmpeg`/`ffprobe` wrappers and segment synthesis.
pub mod media;
/// Narration synthesis and caching.
pub mod narration;
/// The action stream orchestrator.
pub mod runtime;

pub use crate::config::RuntimeConfig;
pub use crate::diff::sequence::{DiffKind, DiffOp, diff_chars, diff_lines, diff_sequence};
pub use crate::executor::browser::BrowserExecutor;
pub use crate::executor::code::{CodeExecutor, OpenFileOptions};
pub use crate::foundation::core::OutputStandard;
pub use crate::foundation::error::{Severity, TutoError, TutoResult};
pub use crate::git::stepper::CommitStepper;
pub use crate::media::signature::Signature;
pub use crate::narration::provider::{ProviderError, SpeechProvider, SpeechRequest};
pub use crate::runtime::action::{Action, FileMode};
pub use crate::runtime::orchestrator::Runtime;
