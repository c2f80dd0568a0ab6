use std::cell::Cell;

use super::*;

#[test]
fn produces_once_per_key() {
    let dir = tempfile::tempdir().unwrap();
    let cache = DiskCache::new(dir.path().join("tts")).unwrap();
    let calls = Cell::new(0);
    let first = cache
        .get_or_create("abc", "wav", || {
            calls.set(calls.get() + 1);
            Ok(b"RIFF".to_vec())
        })
        .unwrap();
    assert!(first.created);
    assert_eq!(std::fs::read(&first.path).unwrap(), b"RIFF");

    let second = cache
        .get_or_create("abc", "wav", || {
            calls.set(calls.get() + 1);
            Ok(b"other".to_vec())
        })
        .unwrap();
    assert!(!second.created);
    assert_eq!(second.path, first.path);
    assert_eq!(calls.get(), 1);
}

#[test]
fn failed_production_leaves_no_entry() {
    let dir = tempfile::tempdir().unwrap();
    let cache = DiskCache::new(dir.path()).unwrap();
    let err = cache
        .get_or_create("k", "wav", || Err(crate::foundation::error::TutoError::narration("boom")))
        .unwrap_err();
    assert!(err.to_string().contains("boom"));
    assert!(!cache.resolve_path("k", "wav").exists());
    let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert!(leftovers.is_empty());
}

#[test]
fn existing_target_counts_as_published() {
    let dir = tempfile::tempdir().unwrap();
    let cache = DiskCache::new(dir.path()).unwrap();
    let target = cache.resolve_path("k", ".bin");
    std::fs::write(&target, b"winner").unwrap();
    cache.publish(&target, b"loser").unwrap();
    assert_eq!(std::fs::read(&target).unwrap(), b"winner");
}

#[test]
fn keys_are_stable_hex_digests() {
    let a = cache_key(&serde_json::json!({"schema": 1, "text": "hi"})).unwrap();
    let b = cache_key(&serde_json::json!({"schema": 1, "text": "hi"})).unwrap();
    let c = cache_key(&serde_json::json!({"schema": 1, "text": "hello"})).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
    assert_eq!(
        sha256_hex(b""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn explicit_cache_root_wins() {
    assert_eq!(
        cache_root_dir(Some(Path::new("/tmp/explicit"))),
        PathBuf::from("/tmp/explicit")
    );
}
