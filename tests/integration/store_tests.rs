use backdupe::manifest::{store, FileRecord, Manifest, ManifestError};
use backdupe::scanner::Hasher;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn record(path: &str, content: &[u8]) -> FileRecord {
    FileRecord::new(
        PathBuf::from(path),
        ".TXT",
        content.len() as u64,
        Hasher::hash_bytes(content),
    )
}

fn sample() -> Manifest {
    [record("/main/a.txt", b"alpha"), record("/main/b.txt", b"beta")]
        .into_iter()
        .collect()
}

#[test]
fn test_save_then_load_preserves_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("main.json");
    let manifest = sample();

    store::save(&manifest, &path).unwrap();
    let loaded = store::load(&path).unwrap();

    assert_eq!(loaded.len(), 2);
    for original in manifest.records() {
        assert_eq!(loaded.get(&original.digest), Some(original));
    }
}

#[test]
fn test_save_leaves_no_temp_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("main.json");

    store::save(&sample(), &path).unwrap();

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec!["main.json"]);
}

#[test]
fn test_save_replaces_existing_manifest() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("main.json");

    store::save(&sample(), &path).unwrap();
    let smaller: Manifest = [record("/main/c.txt", b"gamma")].into_iter().collect();
    store::save(&smaller, &path).unwrap();

    assert_eq!(store::load(&path).unwrap().len(), 1);
}

#[test]
fn test_save_into_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("main.json");

    let err = store::save(&sample(), &path).unwrap_err();
    assert!(matches!(err, ManifestError::WriteFailed { .. }));
    assert!(!path.exists());
}

#[test]
fn test_load_missing_file() {
    let dir = tempdir().unwrap();
    let err = store::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ManifestError::PathNotFound(_)));
}

#[test]
fn test_load_garbage_is_corrupt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("garbage.json");
    fs::write(&path, "this is not a manifest").unwrap();

    let err = store::load(&path).unwrap_err();
    assert!(matches!(err, ManifestError::CorruptManifest { .. }));
}

#[test]
fn test_tampered_record_is_detected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("main.json");
    store::save(&sample(), &path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    fs::write(&path, content.replace("/main/a.txt", "/main/evil.txt")).unwrap();

    match store::load(&path) {
        Err(ManifestError::CorruptManifest { reason, .. }) => {
            assert!(reason.contains("checksum"));
        }
        other => panic!("expected checksum failure, got {other:?}"),
    }
}

#[test]
fn test_merge_later_manifest_wins() {
    let first: Manifest = [record("/old/a.txt", b"shared")].into_iter().collect();
    let second: Manifest = [record("/new/a.txt", b"shared"), record("/new/b.txt", b"only")]
        .into_iter()
        .collect();

    let merged = store::merge([first, second]);

    assert_eq!(merged.len(), 2);
    let shared = merged.get(&Hasher::hash_bytes(b"shared")).unwrap();
    assert_eq!(shared.path, PathBuf::from("/new/a.txt"));
    assert!(merged.root().is_none());
}

#[test]
fn test_load_merged_in_order() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    store::save(
        &[record("/one/x.txt", b"same")].into_iter().collect(),
        &first,
    )
    .unwrap();
    store::save(
        &[record("/two/x.txt", b"same")].into_iter().collect(),
        &second,
    )
    .unwrap();

    let merged = store::load_merged(&[&first, &second]).unwrap();
    let reversed = store::load_merged(&[&second, &first]).unwrap();
    let digest = Hasher::hash_bytes(b"same");

    assert_eq!(merged.get(&digest).unwrap().path, PathBuf::from("/two/x.txt"));
    assert_eq!(reversed.get(&digest).unwrap().path, PathBuf::from("/one/x.txt"));
}

#[test]
fn test_load_merged_aborts_on_bad_source() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.json");
    store::save(&sample(), &good).unwrap();

    let result = store::load_merged(&[good, dir.path().join("missing.json")]);
    assert!(matches!(result, Err(ManifestError::PathNotFound(_))));
}
