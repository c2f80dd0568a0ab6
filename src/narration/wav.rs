use std::path::Path;

use anyhow::Context;

use crate::foundation::error::TutoResult;

const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

/// Wrap raw little-endian 16-bit mono PCM in a 44-byte canonical WAVE header.
pub fn wrap_pcm_wav(pcm: &[u8], sample_rate: u32) -> Vec<u8> {
    let block_align = CHANNELS * (BITS_PER_SAMPLE / 8);
    let byte_rate = sample_rate * u32::from(block_align);
    let data_len = pcm.len() as u32;

    let mut out = Vec::with_capacity(44 + pcm.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(pcm);
    out
}

fn u32_at(bytes: &[u8], at: usize) -> Option<u32> {
    let raw: [u8; 4] = bytes.get(at..at + 4)?.try_into().ok()?;
    Some(u32::from_le_bytes(raw))
}

/// Duration of a RIFF/WAVE file from its `fmt ` and `data` chunks.
///
/// Returns `None` when the bytes are not a WAVE file or the header is incomplete.
pub fn wav_duration_secs(bytes: &[u8]) -> Option<f64> {
    if bytes.get(0..4)? != b"RIFF" || bytes.get(8..12)? != b"WAVE" {
        return None;
    }
    let mut byte_rate = None;
    let mut at = 12;
    while at + 8 <= bytes.len() {
        let id = &bytes[at..at + 4];
        let size = u32_at(bytes, at + 4)? as usize;
        let body = at + 8;
        match id {
            b"fmt " => byte_rate = u32_at(bytes, body + 8),
            b"data" => {
                let rate = byte_rate.filter(|r| *r > 0)?;
                // Streaming writers leave the size unset; fall back to what is on disk.
                let available = bytes.len().saturating_sub(body);
                let len = if size == 0 || size == u32::MAX as usize {
                    available
                } else {
                    size.min(available)
                };
                return Some(len as f64 / f64::from(rate));
            }
            _ => {}
        }
        at = body + size + (size & 1);
    }
    None
}

/// [`wav_duration_secs`] for a file on disk.
pub fn read_wav_duration(path: &Path) -> TutoResult<Option<f64>> {
    let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    Ok(wav_duration_secs(&bytes))
}

#[cfg(test)]
#[path = "../../tests/unit/narration/wav.rs"]
mod tests;
