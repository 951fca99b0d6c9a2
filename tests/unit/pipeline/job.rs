use super::*;

#[test]
fn keys_are_unique_and_hex() {
    let a = JobKey::new(&[Path::new("a.png")]);
    let b = JobKey::new(&[Path::new("a.png")]);
    assert_ne!(a, b);
    assert_eq!(a.as_str().len(), 16);
    assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn intermediates_are_named_by_key() {
    let key = JobKey("00ff".to_owned());
    let files = Intermediates::new(Path::new("work"), &key);
    assert_eq!(files.raw_video, PathBuf::from("work/raw_00ff.mp4"));
    assert_eq!(files.text_video, PathBuf::from("work/text_00ff.mp4"));
    assert_eq!(files.clip_audio, PathBuf::from("work/clip_00ff.f32le"));
}

fn touch_all(dir: &str) -> Intermediates {
    let dir = PathBuf::from("target").join("unit_job").join(dir);
    std::fs::create_dir_all(&dir).unwrap();
    let files = Intermediates::new(&dir, &JobKey::new(&[]));
    for p in files.paths() {
        std::fs::write(p, b"x").unwrap();
    }
    files
}

#[test]
fn guard_removes_intermediates_on_drop() {
    let files = touch_all("drop");
    drop(ArtifactGuard::new(files.clone()));
    assert!(files.paths().iter().all(|p| !p.exists()));
}

#[test]
fn kept_intermediates_survive() {
    let files = touch_all("keep");
    let mut guard = ArtifactGuard::new(files.clone());
    guard.keep();
    drop(guard);
    assert!(files.paths().iter().all(|p| p.exists()));
}
