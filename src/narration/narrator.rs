use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::cache::disk::{DiskCache, cache_key};
use crate::config::{TtsConfig, TtsEngine};
use crate::foundation::error::{TutoError, TutoResult};
use crate::narration::limiter::{RateLimiter, RetryPolicy};
use crate::narration::provider::{SpeechProvider, SpeechRequest};
use crate::narration::wav::wrap_pcm_wav;

const KEY_SCHEMA: u32 = 1;

#[derive(serde::Serialize)]
struct NarrationKey<'a> {
    schema: u32,
    text: &'a str,
    model: &'a str,
    voice: &'a str,
    rate: u32,
}

/// Turns narration text into WAVE files, at most one provider call per distinct input.
///
/// Entries are keyed by `(text, model, voice, sample rate)` in a [`DiskCache`]. When an
/// output directory is set, every returned file is linked (or copied) there so a run's
/// artifacts stay together.
pub struct Narrator {
    cache: DiskCache,
    output_dir: Option<PathBuf>,
    provider: Option<Box<dyn SpeechProvider>>,
    enabled: bool,
    model: String,
    voice: String,
    sample_rate: u32,
    limiter: RateLimiter,
    retry: RetryPolicy,
    memo: HashMap<String, PathBuf>,
    warned_disabled: bool,
}

impl std::fmt::Debug for Narrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Narrator")
            .field("cache", &self.cache)
            .field("output_dir", &self.output_dir)
            .field("has_provider", &self.provider.is_some())
            .field("enabled", &self.enabled)
            .field("model", &self.model)
            .field("voice", &self.voice)
            .field("sample_rate", &self.sample_rate)
            .finish_non_exhaustive()
    }
}

impl Narrator {
    /// Build a narrator over `cache`. Without a provider (or with `engine = none`) every
    /// request yields no audio.
    pub fn new(
        cfg: &TtsConfig,
        cache: DiskCache,
        provider: Option<Box<dyn SpeechProvider>>,
    ) -> Self {
        Self {
            cache,
            output_dir: None,
            provider,
            enabled: cfg.engine == TtsEngine::Provider,
            model: cfg.model.clone(),
            voice: cfg.voice.clone(),
            sample_rate: cfg.sample_rate,
            limiter: RateLimiter::new(cfg.min_interval()),
            retry: RetryPolicy {
                max_retries: cfg.max_retries,
                initial_backoff: cfg.initial_backoff(),
            },
            memo: HashMap::new(),
            warned_disabled: false,
        }
    }

    /// Link every returned file into `dir`.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// `true` when a provider is attached and the engine is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled && self.provider.is_some()
    }

    /// Speak `text`. `Ok(None)` when narration is disabled; every failure is reported as
    /// [`TutoError::Narration`] so callers can degrade to silence.
    #[tracing::instrument(skip(self), fields(chars = text.chars().count()))]
    pub fn generate(&mut self, text: &str) -> TutoResult<Option<PathBuf>> {
        if !self.is_enabled() {
            if !self.warned_disabled {
                self.warned_disabled = true;
                tracing::warn!("no speech provider configured; narration is silent");
            }
            return Ok(None);
        }
        self.generate_inner(text).map(Some).map_err(|e| match e {
            narration @ TutoError::Narration(_) => narration,
            other => TutoError::narration(format!("{other:#}")),
        })
    }

    fn generate_inner(&mut self, text: &str) -> TutoResult<PathBuf> {
        let key = cache_key(&NarrationKey {
            schema: KEY_SCHEMA,
            text,
            model: &self.model,
            voice: &self.voice,
            rate: self.sample_rate,
        })?;

        if let Some(cached) = self.memo.get(&key).cloned() {
            return self.ensure_output(&cached);
        }

        let cache_path = self.cache.resolve_path(&key, "wav");
        if let Some(out) = self.output_path(&cache_path)
            && is_nonempty_file(&out)
        {
            // A previous run left the output behind; backfill the shared cache from it.
            if !is_nonempty_file(&cache_path) {
                link_or_copy(&out, &cache_path)?;
            }
            self.memo.insert(key, cache_path);
            return Ok(out);
        }

        let request = SpeechRequest {
            text,
            model: &self.model,
            voice: &self.voice,
            sample_rate: self.sample_rate,
        };
        let limiter = &mut self.limiter;
        let retry = self.retry;
        let Some(provider) = self.provider.as_mut() else {
            return Err(TutoError::narration("no speech provider attached"));
        };
        let entry = self.cache.get_or_create(&key, "wav", || {
            limiter.wait();
            let pcm = retry
                .run(|_| provider.synthesize(&request))
                .map_err(|e| TutoError::narration(e.to_string()))?;
            if pcm.is_empty() {
                return Err(TutoError::narration("provider returned no audio data"));
            }
            Ok(wrap_pcm_wav(&pcm, request.sample_rate))
        })?;
        tracing::info!(path = %entry.path.display(), created = entry.created, "narration ready");

        self.memo.insert(key, entry.path.clone());
        self.ensure_output(&entry.path)
    }

    fn output_path(&self, cache_path: &Path) -> Option<PathBuf> {
        let dir = self.output_dir.as_ref()?;
        Some(dir.join(cache_path.file_name()?))
    }

    fn ensure_output(&self, cache_path: &Path) -> TutoResult<PathBuf> {
        let Some(out) = self.output_path(cache_path) else {
            return Ok(cache_path.to_path_buf());
        };
        if is_nonempty_file(&out) {
            return Ok(out);
        }
        if let Some(dir) = &self.output_dir {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create narration dir '{}'", dir.display()))?;
        }
        link_or_copy(cache_path, &out)?;
        Ok(out)
    }
}

fn is_nonempty_file(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.len() > 0)
}

fn link_or_copy(from: &Path, to: &Path) -> TutoResult<()> {
    match std::fs::hard_link(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(()),
        Err(e)
            if matches!(
                e.kind(),
                std::io::ErrorKind::CrossesDevices | std::io::ErrorKind::PermissionDenied
            ) =>
        {
            std::fs::copy(from, to).with_context(|| {
                format!("copy '{}' to '{}'", from.display(), to.display())
            })?;
            Ok(())
        }
        Err(e) => Err(anyhow::Error::new(e)
            .context(format!("link '{}' to '{}'", from.display(), to.display()))
            .into()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/narration/narrator.rs"]
mod tests;
