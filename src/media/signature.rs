use std::fmt;
use std::path::Path;

use crate::foundation::error::{TutoError, TutoResult};

/// Encoding parameters that must be identical across segments for a stream-copy concat.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Signature {
    /// Video codec name, e.g. `h264`.
    pub video_codec: String,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Pixel format, e.g. `yuv420p`.
    pub pixel_format: String,
    /// Frame rate as ffprobe reports it, e.g. `30/1`.
    pub frame_rate: String,
    /// Audio codec name, e.g. `aac`.
    pub audio_codec: String,
    /// Audio channel count.
    pub channels: u32,
    /// Audio sample rate as ffprobe reports it, e.g. `24000`.
    pub sample_rate: String,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "v={} {}x{} {} fps={}; a={} ch={} rate={}",
            self.video_codec,
            self.width,
            self.height,
            self.pixel_format,
            self.frame_rate,
            self.audio_codec,
            self.channels,
            self.sample_rate
        )
    }
}

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    pix_fmt: Option<String>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    channels: Option<u32>,
    sample_rate: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    streams: Vec<ProbeStream>,
}

fn required<T>(value: Option<T>, what: &str) -> TutoResult<T> {
    value.ok_or_else(|| TutoError::media(format!("ffprobe output is missing {what}")))
}

fn required_str(value: Option<&String>, what: &str) -> TutoResult<String> {
    value
        .filter(|s| !s.trim().is_empty() && s.as_str() != "0/0")
        .cloned()
        .ok_or_else(|| TutoError::media(format!("ffprobe output is missing {what}")))
}

impl Signature {
    /// Parse `ffprobe -show_entries stream=... -of json` output.
    pub fn from_ffprobe_json(json: &[u8]) -> TutoResult<Self> {
        let parsed: ProbeOut = serde_json::from_slice(json)
            .map_err(|e| TutoError::media(format!("ffprobe json parse failed: {e}")))?;
        let video = parsed
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .ok_or_else(|| TutoError::media("no video stream found"))?;
        let audio = parsed
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("audio"))
            .ok_or_else(|| TutoError::media("no audio stream found"))?;

        let frame_rate = required_str(video.r_frame_rate.as_ref(), "video frame rate")
            .or_else(|_| required_str(video.avg_frame_rate.as_ref(), "video frame rate"))?;

        Ok(Self {
            video_codec: required_str(video.codec_name.as_ref(), "video codec_name")?,
            width: required(video.width.filter(|w| *w > 0), "video width")?,
            height: required(video.height.filter(|h| *h > 0), "video height")?,
            pixel_format: required_str(video.pix_fmt.as_ref(), "video pix_fmt")?,
            frame_rate,
            audio_codec: required_str(audio.codec_name.as_ref(), "audio codec_name")?,
            channels: required(audio.channels.filter(|c| *c > 0), "audio channels")?,
            sample_rate: required_str(audio.sample_rate.as_ref(), "audio sample_rate")?,
        })
    }

    /// Fail with [`TutoError::SignatureMismatch`] unless `actual` (probed from `path`) equals
    /// `self` field by field.
    pub fn ensure_matches(&self, actual: &Signature, path: &Path) -> TutoResult<()> {
        if self == actual {
            return Ok(());
        }
        Err(TutoError::SignatureMismatch {
            expected: Box::new(self.clone()),
            actual: Box::new(actual.clone()),
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/signature.rs"]
mod tests;
