use std::path::PathBuf;

use crate::media::signature::Signature;

/// Convenience result type used across tutoreel.
pub type TutoResult<T> = Result<T, TutoError>;

/// How a failure affects the surrounding run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Aborts the whole video-generation run.
    Fatal,
    /// Logged; the runtime substitutes a best-effort fallback and keeps going.
    Degraded,
}

/// Top-level error taxonomy used by runtime APIs.
#[derive(thiserror::Error, Debug)]
pub enum TutoError {
    /// Invalid configuration, action arguments or script data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A source file needed for live replay could not be read.
    #[error("source file missing: '{}' (live input replay requires a readable source file)", .path.display())]
    SourceMissing {
        /// Resolved path of the missing file.
        path: PathBuf,
    },

    /// A version-control command failed.
    #[error("`{command}` failed{}: {stderr}", .exit_code.map(|c| format!(" (exit code {c})")).unwrap_or_default())]
    Git {
        /// The command line that was run.
        command: String,
        /// Trimmed standard error output.
        stderr: String,
        /// Process exit code, if the process exited normally.
        exit_code: Option<i32>,
    },

    /// `ffmpeg`/`ffprobe` invocation or output parsing failed.
    #[error("media error: {0}")]
    Media(String),

    /// Two queued segments do not share the same encoding signature.
    #[error(
        "segment encoding mismatch, refusing to concatenate without re-encoding\n- expected: {expected}\n- actual:   {actual}\n- file:     {}",
        .path.display()
    )]
    SignatureMismatch {
        /// Signature of the first queued segment.
        expected: Box<Signature>,
        /// Signature of the offending segment.
        actual: Box<Signature>,
        /// Offending segment file.
        path: PathBuf,
    },

    /// A code or browser executor call failed.
    #[error("executor error: {0}")]
    Executor(String),

    /// Screen recording could not be started, stopped or transcoded.
    #[error("capture error: {0}")]
    Capture(String),

    /// Narration could not be produced.
    #[error("narration error: {0}")]
    Narration(String),

    /// A runtime action failed; names the step that failed.
    #[error("step {index} ({action}) failed: {source}")]
    Step {
        /// Zero-based position of the action in the stream.
        index: usize,
        /// Short description of the action.
        action: String,
        /// Underlying failure.
        #[source]
        source: Box<TutoError>,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TutoError {
    /// Build a [`TutoError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TutoError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`TutoError::Executor`] value.
    pub fn executor(msg: impl Into<String>) -> Self {
        Self::Executor(msg.into())
    }

    /// Build a [`TutoError::Capture`] value.
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Build a [`TutoError::Narration`] value.
    pub fn narration(msg: impl Into<String>) -> Self {
        Self::Narration(msg.into())
    }

    /// Build a [`TutoError::SourceMissing`] value.
    pub fn source_missing(path: impl Into<PathBuf>) -> Self {
        Self::SourceMissing { path: path.into() }
    }

    /// Classify the error per the run's propagation policy.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Narration(_) | Self::Capture(_) => Severity::Degraded,
            Self::Step { source, .. } => source.severity(),
            _ => Severity::Fatal,
        }
    }

    /// `true` when the run must abort.
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl From<std::io::Error> for TutoError {
    fn from(e: std::io::Error) -> Self {
        Self::Other(anyhow::Error::new(e))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
