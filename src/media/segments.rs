use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::SlideConfig;
use crate::foundation::core::OutputStandard;
use crate::foundation::error::TutoResult;
use crate::media::command::{FfmpegArgs, escape_filter_value, secs_arg};
use crate::media::tools::MediaTools;

/// Shortest estimated reading time for a slide.
pub const MIN_ESTIMATE_SECS: f64 = 1.8;
/// Longest estimated reading time for a slide.
pub const MAX_ESTIMATE_SECS: f64 = 15.0;
const WORDS_PER_SEC: f64 = 2.6;

/// How slide text is placed on the frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SlideLayout {
    /// Centered, larger type; long lines are wrapped.
    #[default]
    Center,
    /// Top-left aligned monospace-ish block for code previews; never wrapped.
    Code,
}

impl SlideLayout {
    fn font_size(self) -> u32 {
        match self {
            Self::Center => 32,
            Self::Code => 26,
        }
    }
}

/// Reading-time estimate for `text`: words / 2.6 per second, divided by `speaking_rate`,
/// clamped to [[`MIN_ESTIMATE_SECS`], [`MAX_ESTIMATE_SECS`]].
pub fn estimate_duration(text: &str, speaking_rate: f64) -> f64 {
    let words = text.split_whitespace().count();
    let base = if words == 0 {
        MIN_ESTIMATE_SECS
    } else {
        words as f64 / WORDS_PER_SEC
    };
    let rate = if speaking_rate.is_finite() && speaking_rate > 0.0 {
        speaking_rate
    } else {
        1.0
    };
    (base / rate).clamp(MIN_ESTIMATE_SECS, MAX_ESTIMATE_SECS)
}

/// Greedy word wrap at `max_cols` characters. Existing line breaks are kept; words longer
/// than a line are left whole.
pub fn wrap_text(text: &str, max_cols: usize) -> String {
    let max_cols = max_cols.max(1);
    let mut out: Vec<String> = Vec::new();
    for raw in text.replace("\r\n", "\n").split('\n') {
        let mut line = String::new();
        for word in raw.split_whitespace() {
            let needed =
                line.chars().count() + usize::from(!line.is_empty()) + word.chars().count();
            if !line.is_empty() && needed > max_cols {
                out.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        out.push(line);
    }
    out.join("\n")
}

/// Produces canonical segments: text slides, image slides and transcoded captures.
#[derive(Clone, Debug)]
pub struct SegmentSynth {
    tools: MediaTools,
    standard: OutputStandard,
    slide: SlideConfig,
    speaking_rate: f64,
    audio_padding: f64,
}

impl SegmentSynth {
    /// Synth normalizing everything to `standard`.
    pub fn new(
        tools: MediaTools,
        standard: OutputStandard,
        slide: SlideConfig,
        speaking_rate: f64,
        audio_padding: f64,
    ) -> Self {
        Self {
            tools,
            standard,
            slide,
            speaking_rate,
            audio_padding,
        }
    }

    /// Underlying process wrappers.
    pub fn tools(&self) -> &MediaTools {
        &self.tools
    }

    /// The canonical encoding target.
    pub fn standard(&self) -> OutputStandard {
        self.standard
    }

    /// Slide length: an explicit duration wins but never cuts narration short; otherwise the
    /// narration length plus padding; otherwise a reading-time estimate.
    pub fn resolve_slide_duration(
        &self,
        text: &str,
        explicit: Option<f64>,
        audio_secs: Option<f64>,
    ) -> f64 {
        let narrated = audio_secs.map(|a| a + self.audio_padding);
        match (explicit, narrated) {
            (Some(d), Some(n)) => d.max(n),
            (Some(d), None) => d,
            (None, Some(n)) => n,
            (None, None) => estimate_duration(text, self.speaking_rate),
        }
    }

    /// Render `text` over the background color, with `audio` or synthesized silence.
    /// Returns the segment duration.
    pub fn slide(
        &self,
        out: &Path,
        text: &str,
        layout: SlideLayout,
        duration: Option<f64>,
        audio: Option<&Path>,
    ) -> TutoResult<f64> {
        let audio_secs = audio.and_then(|a| self.tools.media_duration(a));
        let secs = self.resolve_slide_duration(text, duration, audio_secs);

        let text_file = sidecar(out, "txt");
        let body = match layout {
            SlideLayout::Center => wrap_text(text, self.wrap_columns(layout)),
            SlideLayout::Code => text.replace("\r\n", "\n"),
        };
        std::fs::write(&text_file, body)
            .with_context(|| format!("write slide text '{}'", text_file.display()))?;

        let args = FfmpegArgs::new()
            .lavfi(&format!(
                "color=size={}:duration={}:rate={}:color={}",
                self.standard.size_arg(),
                secs_arg(secs),
                self.standard.fps,
                self.slide.background
            ))
            .audio_or_silence(audio, self.standard.sample_rate)
            .out("-vf", self.drawtext(&text_file, layout))
            .canonical_segment(self.standard.sample_rate, secs)
            .build(out);
        self.tools.run_ffmpeg(&args)?;
        tracing::debug!(out = %out.display(), secs, "slide segment");
        Ok(secs)
    }

    /// Render a still image letterboxed to the canonical frame, with an optional caption.
    /// Returns the segment duration.
    pub fn image_slide(
        &self,
        out: &Path,
        image: &Path,
        caption: Option<&str>,
        duration: Option<f64>,
        audio: Option<&Path>,
    ) -> TutoResult<f64> {
        let audio_secs = audio.and_then(|a| self.tools.media_duration(a));
        let secs = self.resolve_slide_duration(caption.unwrap_or_default(), duration, audio_secs);

        let mut vf = self.letterbox_filter();
        if let Some(caption) = caption.filter(|c| !c.trim().is_empty()) {
            let text_file = sidecar(out, "txt");
            std::fs::write(&text_file, wrap_text(caption, self.wrap_columns(SlideLayout::Center)))
                .with_context(|| format!("write caption '{}'", text_file.display()))?;
            vf.push(',');
            vf.push_str(&self.caption_drawtext(&text_file));
        }

        let fps = self.standard.fps.to_string();
        let args = FfmpegArgs::new()
            .input_with(&["-loop", "1", "-framerate", fps.as_str()], image)
            .audio_or_silence(audio, self.standard.sample_rate)
            .out("-vf", vf)
            .out("-t", secs_arg(secs))
            .canonical_segment(self.standard.sample_rate, secs)
            .build(out);
        self.tools.run_ffmpeg(&args)?;
        tracing::debug!(out = %out.display(), secs, "image segment");
        Ok(secs)
    }

    /// Re-encode a raw screen capture to the canonical standard, padded (last frame held) or
    /// truncated to `duration`.
    pub fn transcode_capture(
        &self,
        out: &Path,
        capture: &Path,
        audio: Option<&Path>,
        duration: f64,
    ) -> TutoResult<()> {
        let vf = format!(
            "{},tpad=stop_mode=clone:stop_duration={}",
            self.letterbox_filter(),
            secs_arg(duration)
        );
        let args = FfmpegArgs::new()
            .input(capture)
            .audio_or_silence(audio, self.standard.sample_rate)
            .out("-vf", vf)
            .out("-t", secs_arg(duration))
            .canonical_segment(self.standard.sample_rate, duration)
            .build(out);
        self.tools.run_ffmpeg(&args)?;
        tracing::debug!(out = %out.display(), duration, "capture segment");
        Ok(())
    }

    fn letterbox_filter(&self) -> String {
        let (w, h) = (self.standard.width, self.standard.height);
        format!(
            "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setsar=1,fps={},format=yuv420p",
            self.standard.fps
        )
    }

    fn wrap_columns(&self, layout: SlideLayout) -> usize {
        // Average glyph advance is a bit over half the font size.
        let usable = self.standard.width.saturating_sub(160) as f64;
        (usable / (f64::from(layout.font_size()) * 0.55)).floor().max(16.0) as usize
    }

    fn font_prefix(&self) -> String {
        match &self.slide.font_file {
            Some(font) => format!("fontfile={}:", escape_filter_value(&font.to_string_lossy())),
            None => String::new(),
        }
    }

    fn drawtext(&self, text_file: &Path, layout: SlideLayout) -> String {
        let file = escape_filter_value(&text_file.to_string_lossy());
        let font = self.font_prefix();
        match layout {
            SlideLayout::Code => format!(
                "drawtext={font}textfile={file}:fontcolor=white:fontsize=26:box=1:boxcolor=0x000000cc:boxborderw=18:x=60:y=60:line_spacing=6"
            ),
            SlideLayout::Center => format!(
                "drawtext={font}textfile={file}:fontcolor=white:fontsize=32:box=1:boxcolor=0x00000099:boxborderw=20:x=(w-text_w)/2:y=(h-text_h)/2:line_spacing=6"
            ),
        }
    }

    fn caption_drawtext(&self, text_file: &Path) -> String {
        let file = escape_filter_value(&text_file.to_string_lossy());
        let font = self.font_prefix();
        format!(
            "drawtext={font}textfile={file}:fontcolor=white:fontsize=28:box=1:boxcolor=0x000000b0:boxborderw=16:x=(w-text_w)/2:y=h-text_h-48:line_spacing=6"
        )
    }
}

fn sidecar(out: &Path, ext: &str) -> PathBuf {
    let mut name = out.as_os_str().to_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

#[cfg(test)]
#[path = "../../tests/unit/media/segments.rs"]
mod tests;
