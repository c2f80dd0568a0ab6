use crate::foundation::error::{TutoError, TutoResult};

/// Canonical frame size, frame rate and audio sample rate that every generated segment is
/// normalized to before concatenation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputStandard {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second.
    pub fps: u32,
    /// Audio sample rate in Hz (mono).
    pub sample_rate: u32,
}

impl Default for OutputStandard {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 30,
            sample_rate: 24_000,
        }
    }
}

impl OutputStandard {
    /// Reject values the encoder settings cannot honour.
    pub fn validate(&self) -> TutoResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TutoError::validation("output width/height must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            // Segments are encoded as yuv420p.
            return Err(TutoError::validation(
                "output width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if self.fps == 0 {
            return Err(TutoError::validation("output fps must be non-zero"));
        }
        if self.sample_rate == 0 {
            return Err(TutoError::validation("output sample rate must be non-zero"));
        }
        Ok(())
    }

    /// `WxH` as used in ffmpeg filter arguments.
    pub fn size_arg(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Rows of code that fit a static preview at this frame height.
    pub fn preview_rows(&self) -> usize {
        if self.height <= 720 { 18 } else { 26 }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
