use super::*;

fn synth() -> SegmentSynth {
    SegmentSynth::new(
        MediaTools::default(),
        OutputStandard::default(),
        SlideConfig::default(),
        1.0,
        0.2,
    )
}

#[test]
fn ten_words_estimate() {
    let text = "one two three four five six seven eight nine ten";
    let secs = estimate_duration(text, 1.0);
    assert!((secs - 10.0 / 2.6).abs() < 1e-9);
    assert!((MIN_ESTIMATE_SECS..=MAX_ESTIMATE_SECS).contains(&secs));
}

#[test]
fn estimate_is_clamped_and_scaled() {
    assert_eq!(estimate_duration("", 1.0), MIN_ESTIMATE_SECS);
    assert_eq!(estimate_duration("hi", 1.0), MIN_ESTIMATE_SECS);
    assert_eq!(estimate_duration(&"word ".repeat(200), 1.0), MAX_ESTIMATE_SECS);
    let ten = "a b c d e f g h i j";
    assert!((estimate_duration(ten, 4.0) - MIN_ESTIMATE_SECS).abs() < 1e-9);
    assert!((estimate_duration(ten, 0.5) - 20.0 / 2.6).abs() < 1e-9);
    assert!((estimate_duration(ten, 0.0) - 10.0 / 2.6).abs() < 1e-9);
}

#[test]
fn duration_resolution_order() {
    let s = synth();
    let ten = "a b c d e f g h i j";
    assert_eq!(s.resolve_slide_duration(ten, Some(5.0), None), 5.0);
    assert!((s.resolve_slide_duration(ten, None, Some(3.0)) - 3.2).abs() < 1e-9);
    assert!((s.resolve_slide_duration(ten, Some(1.0), Some(3.0)) - 3.2).abs() < 1e-9);
    assert_eq!(s.resolve_slide_duration(ten, Some(9.0), Some(3.0)), 9.0);
    assert!((s.resolve_slide_duration(ten, None, None) - 10.0 / 2.6).abs() < 1e-9);
}

#[test]
fn wrap_breaks_on_word_boundaries() {
    assert_eq!(wrap_text("aaa bbb ccc", 7), "aaa bbb\nccc");
    assert_eq!(wrap_text("aaa\nbbb ccc ddd", 8), "aaa\nbbb ccc\nddd");
    assert_eq!(wrap_text("supercalifragilistic x", 5), "supercalifragilistic\nx");
    assert_eq!(wrap_text("", 10), "");
}

#[test]
fn drawtext_uses_layout_and_font() {
    let mut s = synth();
    let code = s.drawtext(Path::new("/tmp/0001.mp4.txt"), SlideLayout::Code);
    assert!(code.starts_with("drawtext=textfile=/tmp/0001.mp4.txt:"));
    assert!(code.contains("x=60:y=60"));
    let center = s.drawtext(Path::new("/tmp/a.txt"), SlideLayout::Center);
    assert!(center.contains("x=(w-text_w)/2"));

    s.slide.font_file = Some(PathBuf::from("/fonts/Mono.ttf"));
    let with_font = s.drawtext(Path::new("/tmp/a.txt"), SlideLayout::Code);
    assert!(with_font.starts_with("drawtext=fontfile=/fonts/Mono.ttf:textfile="));
}

#[test]
fn letterbox_targets_the_standard() {
    let vf = synth().letterbox_filter();
    assert!(vf.starts_with("scale=1280:720:force_original_aspect_ratio=decrease,pad=1280:720:"));
    assert!(vf.ends_with("setsar=1,fps=30,format=yuv420p"));
}

#[test]
fn sidecar_appends_extension() {
    assert_eq!(
        sidecar(Path::new("/tmp/0002.mp4"), "txt"),
        PathBuf::from("/tmp/0002.mp4.txt")
    );
}
