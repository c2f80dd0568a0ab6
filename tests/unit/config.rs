use super::*;

#[test]
fn empty_json_yields_defaults() {
    let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, RuntimeConfig::default());
    assert!(!cfg.render_video);
    assert_eq!(cfg.standard(), OutputStandard::default());
    assert_eq!(cfg.tts.engine, TtsEngine::Provider);
    assert_eq!(cfg.tts.min_interval(), Duration::from_millis(500));
    assert_eq!(cfg.capture.audio_padding_secs, 0.2);
    cfg.validate().unwrap();
}

#[test]
fn partial_sections_keep_other_defaults() {
    let cfg: RuntimeConfig = serde_json::from_str(
        r#"{"render_video": true, "output": {"fps": 25}, "tts": {"engine": "none", "voice": "Kore"}}"#,
    )
    .unwrap();
    assert!(cfg.render_video);
    assert_eq!(cfg.standard().fps, 25);
    assert_eq!(cfg.standard().width, 1280);
    assert_eq!(cfg.tts.engine, TtsEngine::None);
    assert_eq!(cfg.tts.voice, "Kore");
    assert_eq!(cfg.tts.sample_rate, 24_000);
}

#[test]
fn validate_rejects_bad_values() {
    let mut cfg = RuntimeConfig::default();
    cfg.screen.width = 1281;
    assert!(cfg.validate().is_err());

    let mut cfg = RuntimeConfig::default();
    cfg.tts.speaking_rate = 0.0;
    assert!(
        cfg.validate()
            .unwrap_err()
            .to_string()
            .contains("speaking_rate")
    );

    let mut cfg = RuntimeConfig::default();
    cfg.capture.code_min_secs = f64::NAN;
    assert!(cfg.validate().is_err());
}

#[test]
fn from_json_file_reads_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg.json");
    std::fs::write(&path, r#"{"screen": {"width": 1920, "height": 1080}}"#).unwrap();
    let cfg = RuntimeConfig::from_json_file(&path).unwrap();
    assert_eq!(cfg.standard().preview_rows(), 26);

    std::fs::write(&path, r#"{"output": {"fps": 0}}"#).unwrap();
    assert!(RuntimeConfig::from_json_file(&path).is_err());
    std::fs::write(&path, "not json").unwrap();
    assert!(RuntimeConfig::from_json_file(&path).is_err());
}
