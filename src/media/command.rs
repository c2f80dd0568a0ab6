use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Builds an ffmpeg command line with input-side and output-side options kept apart.
///
/// ffmpeg applies options to the next input or output that follows them, so filters and
/// stream maps must never drift in front of an `-i`. [`FfmpegArgs::build`] always emits
/// `-y`, then every input group, then every output option, then the output path.
#[derive(Clone, Debug, Default)]
pub struct FfmpegArgs {
    inputs: Vec<OsString>,
    outputs: Vec<OsString>,
}

impl FfmpegArgs {
    /// Empty command line.
    pub fn new() -> Self {
        Self::default()
    }

    /// `-i <path>`.
    pub fn input(self, path: impl AsRef<OsStr>) -> Self {
        self.input_with(&[], path)
    }

    /// `<opts...> -i <path>`; `opts` apply to this input only.
    pub fn input_with(mut self, opts: &[&str], path: impl AsRef<OsStr>) -> Self {
        self.inputs.extend(opts.iter().map(OsString::from));
        self.inputs.push("-i".into());
        self.inputs.push(path.as_ref().to_os_string());
        self
    }

    /// `-f lavfi -i <graph>`.
    pub fn lavfi(self, graph: &str) -> Self {
        self.input_with(&["-f", "lavfi"], graph)
    }

    /// Audio input: `path` when given, otherwise a silent mono source at `sample_rate`.
    pub fn audio_or_silence(self, audio: Option<&Path>, sample_rate: u32) -> Self {
        match audio {
            Some(path) => self.input(path),
            None => self.lavfi(&format!(
                "anullsrc=channel_layout=mono:sample_rate={sample_rate}"
            )),
        }
    }

    /// Output option with a value, e.g. `-c:v libx264`.
    pub fn out(mut self, key: &str, value: impl AsRef<OsStr>) -> Self {
        self.outputs.push(key.into());
        self.outputs.push(value.as_ref().to_os_string());
        self
    }

    /// Valueless output option, e.g. `-shortest`.
    pub fn out_flag(mut self, flag: &str) -> Self {
        self.outputs.push(flag.into());
        self
    }

    /// The canonical segment encoding: one video and one mono audio stream, H.264/AAC,
    /// yuv420p, audio padded to `duration` and mapped explicitly.
    pub fn canonical_segment(self, sample_rate: u32, duration: f64) -> Self {
        self.out("-af", format!("apad=whole_dur={}", secs_arg(duration)))
            .out("-map", "0:v:0")
            .out("-map", "1:a:0")
            .out("-c:v", "libx264")
            .out("-c:a", "aac")
            .out("-ac", "1")
            .out("-ar", sample_rate.to_string())
            .out("-pix_fmt", "yuv420p")
            .out_flag("-shortest")
    }

    /// Final argument vector writing to `output`.
    pub fn build(self, output: &Path) -> Vec<OsString> {
        let mut out = Vec::with_capacity(self.inputs.len() + self.outputs.len() + 2);
        out.push("-y".into());
        out.extend(self.inputs);
        out.extend(self.outputs);
        out.push(output.as_os_str().to_os_string());
        out
    }
}

/// Seconds formatted for ffmpeg duration arguments.
pub fn secs_arg(secs: f64) -> String {
    let s = format!("{:.3}", secs.max(0.0));
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() { "0".to_string() } else { s.to_string() }
}

/// Escape a value for use inside an ffmpeg filter option (`key=value:key=value`).
pub fn escape_filter_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | ':' | '\'') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/media/command.rs"]
mod tests;
