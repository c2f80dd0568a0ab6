//! The replay-and-assembly orchestrator: the action vocabulary, per-file replay state and the
//! [`Runtime`](orchestrator::Runtime) state machine that turns an action stream into ordered
//! segments.

/// Serde-tagged action stream.
pub mod action;
/// Per-open-file replay state and static previews.
pub mod file_context;
/// The orchestrator.
pub mod orchestrator;
