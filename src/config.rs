use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use crate::foundation::core::OutputStandard;
use crate::foundation::error::{TutoError, TutoResult};

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(default)]
/// Everything a [`crate::Runtime`] needs to know before the first action runs.
///
/// All fields are optional in JSON; missing sections take their defaults.
pub struct RuntimeConfig {
    /// Produce media. `false` is a dry run: actions are logged and executors driven, but no
    /// segment is rendered and `merge` only logs.
    pub render_video: bool,
    /// Scratch directory for segments and manifests; a private temp dir when unset.
    pub temp_dir: Option<PathBuf>,
    /// Directory that relative script paths resolve against; the working directory when unset.
    pub project_dir: Option<PathBuf>,
    /// Cache root; see [`crate::cache::disk::cache_root_dir`].
    pub cache_dir: Option<PathBuf>,
    /// Canonical frame size.
    pub screen: ScreenConfig,
    /// Canonical frame rate.
    pub output: OutputConfig,
    /// Narration settings.
    pub tts: TtsConfig,
    /// Media tool locations.
    pub ffmpeg: FfmpegConfig,
    /// Static slide styling.
    pub slide: SlideConfig,
    /// Capture timing.
    pub capture: CaptureConfig,
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Canonical frame size.
pub struct ScreenConfig {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Canonical frame rate.
pub struct OutputConfig {
    /// Frames per second.
    pub fps: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { fps: 30 }
    }
}

#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Which narration backend to use.
pub enum TtsEngine {
    /// The injected [`crate::narration::provider::SpeechProvider`].
    #[default]
    Provider,
    /// Narration disabled; every slide gets silent audio.
    None,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(default)]
/// Narration settings.
pub struct TtsConfig {
    /// Backend selection.
    pub engine: TtsEngine,
    /// Provider model identifier.
    pub model: String,
    /// Provider voice name.
    pub voice: String,
    /// PCM sample rate in Hz; also the canonical audio rate of every segment.
    pub sample_rate: u32,
    /// Reading-speed multiplier used when estimating silent slide durations.
    pub speaking_rate: f64,
    /// Retries after the first provider attempt.
    pub max_retries: u32,
    /// Minimum spacing between provider requests.
    pub min_interval_ms: u64,
    /// First retry delay; doubled after each retry.
    pub initial_backoff_ms: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            engine: TtsEngine::Provider,
            model: "gemini-2.5-flash-preview-tts".to_string(),
            voice: "Puck".to_string(),
            sample_rate: 24_000,
            speaking_rate: 1.0,
            max_retries: 3,
            min_interval_ms: 500,
            initial_backoff_ms: 300,
        }
    }
}

impl TtsConfig {
    /// [`TtsConfig::min_interval_ms`] as a duration.
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    /// [`TtsConfig::initial_backoff_ms`] as a duration.
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Media tool locations.
pub struct FfmpegConfig {
    /// `ffmpeg` binary.
    pub path: PathBuf,
    /// `ffprobe` binary.
    pub ffprobe_path: PathBuf,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Static slide styling.
pub struct SlideConfig {
    /// Font for `drawtext`; ffmpeg's default font when unset.
    pub font_file: Option<PathBuf>,
    /// Background color in any ffmpeg color syntax.
    pub background: String,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            font_file: None,
            background: "black".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(default)]
/// Capture timing. Durations are in seconds unless the name says otherwise.
pub struct CaptureConfig {
    /// Shortest code capture.
    pub code_min_secs: f64,
    /// Shortest browser capture.
    pub browser_min_secs: f64,
    /// Shortest capture that carries narration.
    pub narrated_min_secs: f64,
    /// Shortest capture when flushing the rest of a file on close.
    pub flush_min_secs: f64,
    /// Silence added after narration audio.
    pub audio_padding_secs: f64,
    /// Wait after a browser click before stopping the recording.
    pub click_settle_ms: u64,
    /// Wait after a browser highlight before stopping the recording.
    pub highlight_settle_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            code_min_secs: 1.2,
            browser_min_secs: 1.0,
            narrated_min_secs: 1.2,
            flush_min_secs: 0.8,
            audio_padding_secs: 0.2,
            click_settle_ms: 250,
            highlight_settle_ms: 150,
        }
    }
}

impl RuntimeConfig {
    /// Load a JSON config file.
    pub fn from_json_file(path: &Path) -> TutoResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse config '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// The canonical encoding target derived from this config.
    pub fn standard(&self) -> OutputStandard {
        OutputStandard {
            width: self.screen.width,
            height: self.screen.height,
            fps: self.output.fps,
            sample_rate: self.tts.sample_rate,
        }
    }

    /// Check values that would otherwise fail deep inside an encode.
    pub fn validate(&self) -> TutoResult<()> {
        self.standard().validate()?;
        if !self.tts.speaking_rate.is_finite() || self.tts.speaking_rate <= 0.0 {
            return Err(TutoError::validation(
                "tts.speaking_rate must be finite and > 0",
            ));
        }
        let c = &self.capture;
        for (name, value) in [
            ("code_min_secs", c.code_min_secs),
            ("browser_min_secs", c.browser_min_secs),
            ("narrated_min_secs", c.narrated_min_secs),
            ("flush_min_secs", c.flush_min_secs),
            ("audio_padding_secs", c.audio_padding_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TutoError::validation(format!(
                    "capture.{name} must be finite and >= 0",
                )));
            }
        }
        if self.slide.background.trim().is_empty() {
            return Err(TutoError::validation("slide.background must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
