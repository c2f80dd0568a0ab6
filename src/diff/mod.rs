//! Shortest-edit-script diffing and the editor replays built on top of it.

/// Replay of line and character diffs against a live [`crate::executor::code::CodeExecutor`].
pub mod apply;
/// Myers diff over arbitrary comparable sequences.
pub mod sequence;
