use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::narration::provider::ProviderError;

struct FakeProvider {
    calls: Rc<Cell<usize>>,
    failures: Vec<ProviderError>,
}

impl FakeProvider {
    fn boxed(calls: &Rc<Cell<usize>>, failures: Vec<ProviderError>) -> Box<dyn SpeechProvider> {
        Box::new(Self {
            calls: Rc::clone(calls),
            failures,
        })
    }
}

impl SpeechProvider for FakeProvider {
    fn synthesize(&mut self, req: &SpeechRequest<'_>) -> Result<Vec<u8>, ProviderError> {
        self.calls.set(self.calls.get() + 1);
        if let Some(err) = self.failures.pop() {
            return Err(err);
        }
        Ok(vec![1u8; req.sample_rate as usize / 10])
    }
}

fn quick_cfg() -> TtsConfig {
    TtsConfig {
        min_interval_ms: 0,
        initial_backoff_ms: 1,
        ..TtsConfig::default()
    }
}

#[test]
fn identical_requests_call_the_provider_once() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Rc::new(Cell::new(0));
    let cache = DiskCache::new(dir.path().join("tts")).unwrap();
    let mut narrator = Narrator::new(&quick_cfg(), cache, Some(FakeProvider::boxed(&calls, vec![])));

    let first = narrator.generate("Hello there").unwrap().unwrap();
    let second = narrator.generate("Hello there").unwrap().unwrap();
    assert_eq!(first, second);
    assert_eq!(calls.get(), 1);
    let bytes = std::fs::read(&first).unwrap();
    assert_eq!(&bytes[0..4], b"RIFF");

    narrator.generate("Something else").unwrap().unwrap();
    assert_eq!(calls.get(), 2);
}

#[test]
fn a_fresh_narrator_reuses_the_disk_cache() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Rc::new(Cell::new(0));
    let first = {
        let cache = DiskCache::new(dir.path()).unwrap();
        let mut narrator =
            Narrator::new(&quick_cfg(), cache, Some(FakeProvider::boxed(&calls, vec![])));
        narrator.generate("cached line").unwrap().unwrap()
    };
    let cache = DiskCache::new(dir.path()).unwrap();
    let mut narrator = Narrator::new(&quick_cfg(), cache, Some(FakeProvider::boxed(&calls, vec![])));
    assert_eq!(narrator.generate("cached line").unwrap().unwrap(), first);
    assert_eq!(calls.get(), 1);
}

#[test]
fn voice_is_part_of_the_key() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Rc::new(Cell::new(0));
    let a = Narrator::new(
        &quick_cfg(),
        DiskCache::new(dir.path()).unwrap(),
        Some(FakeProvider::boxed(&calls, vec![])),
    )
    .generate("same text")
    .unwrap()
    .unwrap();
    let other_voice = TtsConfig {
        voice: "Kore".to_string(),
        ..quick_cfg()
    };
    let b = Narrator::new(
        &other_voice,
        DiskCache::new(dir.path()).unwrap(),
        Some(FakeProvider::boxed(&calls, vec![])),
    )
    .generate("same text")
    .unwrap()
    .unwrap();
    assert_ne!(a, b);
    assert_eq!(calls.get(), 2);
}

#[test]
fn output_dir_receives_a_link() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("run");
    let calls = Rc::new(Cell::new(0));
    let cache = DiskCache::new(dir.path().join("cache")).unwrap();
    let mut narrator = Narrator::new(&quick_cfg(), cache, Some(FakeProvider::boxed(&calls, vec![])))
        .with_output_dir(&out_dir);
    let path = narrator.generate("linked").unwrap().unwrap();
    assert!(path.starts_with(&out_dir));
    let cached = dir
        .path()
        .join("cache")
        .join(path.file_name().unwrap());
    assert_eq!(std::fs::read(&path).unwrap(), std::fs::read(cached).unwrap());
    assert_eq!(narrator.generate("linked").unwrap().unwrap(), path);
}

#[test]
fn transient_failures_are_retried() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Rc::new(Cell::new(0));
    let failures = vec![
        ProviderError::Transient("503".to_string()),
        ProviderError::Transient("429".to_string()),
    ];
    let mut narrator = Narrator::new(
        &quick_cfg(),
        DiskCache::new(dir.path()).unwrap(),
        Some(FakeProvider::boxed(&calls, failures)),
    );
    assert!(narrator.generate("retry me").unwrap().is_some());
    assert_eq!(calls.get(), 3);
}

#[test]
fn exhausted_retries_degrade() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Rc::new(Cell::new(0));
    let failures = vec![ProviderError::Transient("down".to_string()); 4];
    let cfg = TtsConfig {
        max_retries: 1,
        ..quick_cfg()
    };
    let mut narrator = Narrator::new(
        &cfg,
        DiskCache::new(dir.path()).unwrap(),
        Some(FakeProvider::boxed(&calls, failures)),
    );
    let err = narrator.generate("never").unwrap_err();
    assert!(matches!(err, TutoError::Narration(_)));
    assert!(!err.is_fatal());
    assert_eq!(calls.get(), 2);
}

#[test]
fn disabled_engine_or_missing_provider_yields_silence() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Rc::new(Cell::new(0));
    let cfg = TtsConfig {
        engine: TtsEngine::None,
        ..quick_cfg()
    };
    let mut narrator = Narrator::new(
        &cfg,
        DiskCache::new(dir.path()).unwrap(),
        Some(FakeProvider::boxed(&calls, vec![])),
    );
    assert!(!narrator.is_enabled());
    assert_eq!(narrator.generate("quiet").unwrap(), None);
    assert_eq!(calls.get(), 0);

    let mut narrator = Narrator::new(&quick_cfg(), DiskCache::new(dir.path()).unwrap(), None);
    assert_eq!(narrator.generate("quiet").unwrap(), None);
}
