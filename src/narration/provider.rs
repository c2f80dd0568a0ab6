/// One speech synthesis request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeechRequest<'a> {
    /// Text to speak verbatim.
    pub text: &'a str,
    /// Provider model identifier.
    pub model: &'a str,
    /// Provider voice name.
    pub voice: &'a str,
    /// Requested PCM sample rate in Hz.
    pub sample_rate: u32,
}

/// Failure reported by a [`SpeechProvider`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Rate limits, timeouts and other failures worth retrying.
    #[error("transient provider failure: {0}")]
    Transient(String),
    /// The provider refused the request; retrying will not help.
    #[error("provider rejected request: {0}")]
    Rejected(String),
}

impl ProviderError {
    /// `true` for [`ProviderError::Transient`].
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// A text-to-speech backend.
///
/// Implementations return raw little-endian 16-bit mono PCM at the requested sample rate;
/// the caller adds the container.
pub trait SpeechProvider {
    /// Synthesize `req.text`.
    fn synthesize(&mut self, req: &SpeechRequest<'_>) -> Result<Vec<u8>, ProviderError>;
}
