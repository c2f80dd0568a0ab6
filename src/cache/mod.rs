//! Content-addressed on-disk cache for generated artifacts.

/// Hash-keyed blob store with race-tolerant atomic writes.
pub mod disk;
