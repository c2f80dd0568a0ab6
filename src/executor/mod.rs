//! Capability interfaces for the external code-editor and browser drivers.
//!
//! The runtime only ever talks to these traits; concrete drivers (an editor extension, a
//! headless browser) live outside this crate and are attached as optional collaborators.

/// Browser driver contract.
pub mod browser;
/// Code editor driver contract.
pub mod code;
/// In-memory code editor for tests and debugging.
pub mod memory;
