use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use sha2::Digest as _;

use crate::foundation::error::TutoResult;

/// Environment variable overriding the default cache root.
pub const CACHE_DIR_ENV: &str = "TUTOREEL_CACHE_DIR";

/// Default cache root, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = ".tutoreel-cache";

/// Resolve the cache root: an explicit directory wins, then [`CACHE_DIR_ENV`], then
/// [`DEFAULT_CACHE_DIR`].
pub fn cache_root_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    match std::env::var_os(CACHE_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(DEFAULT_CACHE_DIR),
    }
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

/// Stable key for any serializable generation input (hash of its JSON form).
pub fn cache_key<K: serde::Serialize>(input: &K) -> TutoResult<String> {
    let json = serde_json::to_vec(input).context("serialize cache key")?;
    Ok(sha256_hex(&json))
}

/// Result of [`DiskCache::get_or_create`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry {
    /// Final location of the entry.
    pub path: PathBuf,
    /// `true` when this call produced the bytes, `false` on a hit.
    pub created: bool,
}

/// A directory of immutable, hash-named blobs.
///
/// Entries are produced at most once per key. Writes go to a temp file in the same directory
/// and are published with a hard link; losing a race against another writer (the link target
/// already exists) counts as success.
#[derive(Clone, Debug)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    /// Open (creating if needed) a cache rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> TutoResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create cache dir '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Cache root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the entry for `key` lives, whether or not it exists yet.
    pub fn resolve_path(&self, key: &str, ext: &str) -> PathBuf {
        let ext = ext.trim_start_matches('.');
        if ext.is_empty() {
            self.dir.join(key)
        } else {
            self.dir.join(format!("{key}.{ext}"))
        }
    }

    /// Return the entry for `key`, calling `produce` only when it is missing.
    pub fn get_or_create<F>(&self, key: &str, ext: &str, produce: F) -> TutoResult<CacheEntry>
    where
        F: FnOnce() -> TutoResult<Vec<u8>>,
    {
        let path = self.resolve_path(key, ext);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "cache hit");
            return Ok(CacheEntry {
                path,
                created: false,
            });
        }
        let bytes = produce()?;
        self.publish(&path, &bytes)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "cache entry written");
        Ok(CacheEntry {
            path,
            created: true,
        })
    }

    fn publish(&self, path: &Path, bytes: &[u8]) -> TutoResult<()> {
        let mut tmp = tempfile::Builder::new()
            .prefix(".tmp-")
            .tempfile_in(&self.dir)
            .with_context(|| format!("create temp file in '{}'", self.dir.display()))?;
        tmp.write_all(bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .with_context(|| format!("write temp file '{}'", tmp.path().display()))?;
        match std::fs::hard_link(tmp.path(), path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                tracing::debug!(path = %path.display(), "cache entry raced, keeping existing");
                Ok(())
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("publish cache entry '{}'", path.display()))
                .into()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/disk.rs"]
mod tests;
