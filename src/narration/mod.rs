//! Narration synthesis: provider seam, rate limiting, retries, caching and WAVE wrapping.

/// Minimum-interval rate limiting and bounded exponential backoff.
pub mod limiter;
/// Cached, best-effort narration generator.
pub mod narrator;
/// Speech provider contract.
pub mod provider;
/// Minimal RIFF/WAVE container helpers.
pub mod wav;
