use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TimelapseError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TimelapseError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        TimelapseError::no_frames("x")
            .to_string()
            .contains("no frames to encode:")
    );
}

#[test]
fn directory_open_names_the_path() {
    let err = TimelapseError::DirectoryOpen {
        path: PathBuf::from("/nope/frames"),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    };
    let msg = err.to_string();
    assert!(msg.contains("cannot open input directory"));
    assert!(msg.contains("/nope/frames"));
}

#[test]
fn image_too_large_reports_both_sizes() {
    let err = TimelapseError::ImageTooLarge {
        width: 800,
        height: 600,
        canvas: FrameSize {
            width: 640,
            height: 480,
        },
    };
    assert_eq!(
        err.to_string(),
        "image 800x600 does not fit the 640x480 canvas"
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TimelapseError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
