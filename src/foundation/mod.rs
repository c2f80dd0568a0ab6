//! Shared primitives: error taxonomy and the canonical output standard.

/// Canonical encoding target shared by every produced segment.
pub mod core;
/// Error taxonomy and severity classification.
pub mod error;
