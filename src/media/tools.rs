use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Context;

use crate::config::FfmpegConfig;
use crate::foundation::error::{TutoError, TutoResult};
use crate::media::command::FfmpegArgs;
use crate::media::signature::Signature;
use crate::narration::wav::read_wav_duration;

const SIGNATURE_ENTRIES: &str = "stream=codec_type,codec_name,width,height,pix_fmt,r_frame_rate,avg_frame_rate,channels,sample_rate";

/// Runs the configured `ffmpeg`/`ffprobe` binaries to completion.
#[derive(Clone, Debug)]
pub struct MediaTools {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl Default for MediaTools {
    fn default() -> Self {
        Self::new(&FfmpegConfig::default())
    }
}

impl MediaTools {
    /// Tools at the configured paths.
    pub fn new(cfg: &FfmpegConfig) -> Self {
        Self {
            ffmpeg: cfg.path.clone(),
            ffprobe: cfg.ffprobe_path.clone(),
        }
    }

    /// `true` when both binaries answer `-version`.
    pub fn available(&self) -> bool {
        let ok = |bin: &Path| {
            Command::new(bin)
                .arg("-version")
                .output()
                .is_ok_and(|o| o.status.success())
        };
        ok(&self.ffmpeg) && ok(&self.ffprobe)
    }

    /// Run `ffmpeg` with `args`; a non-zero exit is a [`TutoError::Media`] carrying stderr.
    pub fn run_ffmpeg(&self, args: &[OsString]) -> TutoResult<()> {
        tracing::debug!(args = ?args, "ffmpeg");
        let out = Command::new(&self.ffmpeg)
            .args(["-hide_banner", "-loglevel", "error"])
            .args(args)
            .output()
            .map_err(|e| {
                TutoError::media(format!(
                    "failed to run '{}': {e}",
                    self.ffmpeg.display()
                ))
            })?;
        if !out.status.success() {
            return Err(TutoError::media(format!(
                "ffmpeg exited with {}: {}",
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        Ok(())
    }

    /// Run `ffprobe` with `args` and return its stdout.
    pub fn run_ffprobe<S: AsRef<OsStr>>(&self, args: &[S]) -> TutoResult<String> {
        let out = Command::new(&self.ffprobe)
            .args(args)
            .output()
            .map_err(|e| {
                TutoError::media(format!(
                    "failed to run '{}': {e}",
                    self.ffprobe.display()
                ))
            })?;
        if !out.status.success() {
            return Err(TutoError::media(format!(
                "ffprobe exited with {}: {}",
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }

    /// Duration of a media file in seconds.
    ///
    /// `.wav` files are read from their header; everything else asks ffprobe. Probe failures
    /// are logged and reported as `None`.
    pub fn media_duration(&self, path: &Path) -> Option<f64> {
        let is_wav = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
        if is_wav
            && let Ok(Some(secs)) = read_wav_duration(path)
            && secs > 0.0
        {
            return Some(secs);
        }
        let probed = self.run_ffprobe(&[
            OsStr::new("-v"),
            OsStr::new("error"),
            OsStr::new("-show_entries"),
            OsStr::new("format=duration"),
            OsStr::new("-of"),
            OsStr::new("default=noprint_wrappers=1:nokey=1"),
            path.as_os_str(),
        ]);
        match probed {
            Ok(text) => text.trim().parse::<f64>().ok().filter(|d| d.is_finite()),
            Err(e) => {
                tracing::warn!(path = %path.display(), "could not read media duration: {e}");
                None
            }
        }
    }

    /// Probe the [`Signature`] of a segment.
    pub fn probe_signature(&self, path: &Path) -> TutoResult<Signature> {
        let json = self.run_ffprobe(&[
            OsStr::new("-v"),
            OsStr::new("error"),
            OsStr::new("-show_entries"),
            OsStr::new(SIGNATURE_ENTRIES),
            OsStr::new("-of"),
            OsStr::new("json"),
            path.as_os_str(),
        ])?;
        Signature::from_ffprobe_json(json.as_bytes())
    }

    /// Compare every segment's signature against the first one's.
    pub fn assert_segments_compatible(&self, paths: &[PathBuf]) -> TutoResult<()> {
        let Some((first, rest)) = paths.split_first() else {
            return Ok(());
        };
        if rest.is_empty() {
            return Ok(());
        }
        let expected = self.probe_signature(first).map_err(|e| {
            TutoError::media(format!(
                "cannot inspect segment '{}' (is ffprobe installed or ffmpeg.ffprobe_path set?): {e}",
                first.display()
            ))
        })?;
        for path in rest {
            let actual = self.probe_signature(path).map_err(|e| {
                TutoError::media(format!("cannot inspect segment '{}': {e}", path.display()))
            })?;
            expected.ensure_matches(&actual, path)?;
        }
        Ok(())
    }

    /// Check signatures, write the concat manifest next to `manifest`, and stream-copy every
    /// segment into `output`.
    ///
    /// Nothing is written when the signature gate fails.
    #[tracing::instrument(skip(self, segments), fields(segments = segments.len()))]
    pub fn concat_segments(
        &self,
        segments: &[PathBuf],
        manifest: &Path,
        output: &Path,
    ) -> TutoResult<()> {
        if segments.is_empty() {
            return Err(TutoError::validation("nothing to merge: no segments"));
        }
        self.assert_segments_compatible(segments)?;

        let body = concat_manifest(segments)?;
        std::fs::write(manifest, body)
            .with_context(|| format!("write concat manifest '{}'", manifest.display()))?;
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }

        let args = FfmpegArgs::new()
            .input_with(&["-f", "concat", "-safe", "0"], manifest)
            .out("-c", "copy")
            .build(output);
        self.run_ffmpeg(&args)?;
        tracing::info!(output = %output.display(), "merged");
        Ok(())
    }
}

/// Concat-demuxer manifest listing `segments` by absolute path.
pub fn concat_manifest(segments: &[PathBuf]) -> TutoResult<String> {
    let mut out = String::new();
    for seg in segments {
        let abs = std::path::absolute(seg)
            .with_context(|| format!("resolve segment path '{}'", seg.display()))?;
        let escaped = abs.to_string_lossy().replace('\'', "'\\''");
        out.push_str(&format!("file '{escaped}'\n"));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/media/tools.rs"]
mod tests;
