use super::*;

#[test]
fn default_standard_is_valid() {
    let standard = OutputStandard::default();
    standard.validate().unwrap();
    assert_eq!(standard.size_arg(), "1280x720");
    assert_eq!(standard.preview_rows(), 18);
}

#[test]
fn validation_catches_bad_values() {
    let base = OutputStandard::default();
    assert!(OutputStandard { width: 0, ..base }.validate().is_err());
    assert!(OutputStandard { width: 1279, ..base }.validate().is_err());
    assert!(OutputStandard { fps: 0, ..base }.validate().is_err());
    assert!(
        OutputStandard {
            sample_rate: 0,
            ..base
        }
        .validate()
        .is_err()
    );
}

#[test]
fn taller_frames_show_more_preview_rows() {
    let standard = OutputStandard {
        width: 1920,
        height: 1080,
        ..OutputStandard::default()
    };
    assert_eq!(standard.preview_rows(), 26);
}
