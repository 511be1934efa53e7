use super::*;

fn fresh_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("timelapse_scan_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn sorted_names(paths: &[PathBuf]) -> Vec<String> {
    let mut names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn image_filter_is_loose_substring_match() {
    assert!(is_image_name("1_a.jpg"));
    assert!(is_image_name("1_a.png"));
    assert!(is_image_name("1_a.jpg.bak"));
    assert!(is_image_name("x.pngfoo"));
    assert!(!is_image_name("1_a.JPG"));
    assert!(!is_image_name("1_a.jpeg"));
    assert!(!is_image_name("notes.txt"));
}

#[test]
fn discovers_only_image_files_non_recursively() {
    let dir = fresh_dir("filter");
    for name in ["1_a.jpg", "2_a.png", "notes.txt", "3_a.jpg.bak", "README"] {
        std::fs::write(dir.join(name), b"x").unwrap();
    }
    std::fs::create_dir_all(dir.join("nested.jpg")).unwrap();
    std::fs::create_dir_all(dir.join("sub")).unwrap();
    std::fs::write(dir.join("sub").join("9_a.jpg"), b"x").unwrap();

    let found = discover_candidates(&dir).unwrap();
    assert_eq!(sorted_names(&found), ["1_a.jpg", "2_a.png", "3_a.jpg.bak"]);
    assert!(found.iter().all(|p| p.parent() == Some(dir.as_path())));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn directory_with_no_images_yields_nothing() {
    let dir = fresh_dir("empty");
    std::fs::write(dir.join("log.txt"), b"x").unwrap();

    assert!(discover_candidates(&dir).unwrap().is_empty());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_directory_is_directory_open_error() {
    let dir = std::env::temp_dir().join(format!("timelapse_scan_missing_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let err = discover_candidates(&dir).unwrap_err();
    assert!(matches!(err, TimelapseError::DirectoryOpen { ref path, .. } if *path == dir));
}

#[test]
fn regular_file_is_not_a_directory() {
    let dir = fresh_dir("file");
    let file = dir.join("1_a.jpg");
    std::fs::write(&file, b"x").unwrap();

    assert!(matches!(
        discover_candidates(&file),
        Err(TimelapseError::DirectoryOpen { .. })
    ));

    std::fs::remove_dir_all(&dir).unwrap();
}
