//! `ffmpeg`/`ffprobe` process wrappers and segment synthesis.
//!
//! Every segment produced here is normalized to one [`crate::OutputStandard`] so the final
//! merge can stream-copy. The signature gate in [`tools::MediaTools::concat_segments`] refuses
//! to merge anything that slipped through.

/// Order-preserving ffmpeg argument builder.
pub mod command;
/// Encoding signature of a segment.
pub mod signature;
/// Slide, image and capture segment producers.
pub mod segments;
/// Process wrappers around the configured binaries.
pub mod tools;
