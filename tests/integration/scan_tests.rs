use backdupe::manifest::{Manifest, ManifestBuilder, ManifestError};
use backdupe::scanner::{Hasher, WalkerConfig};
use tempfile::tempdir;

use super::common::write;

#[test]
fn test_scrape_records_files_with_extensions() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"0123456789");
    write(dir.path(), "sub/b.jpg", b"01234567890123456789");
    write(dir.path(), "README", b"hello");

    let report = ManifestBuilder::default().scrape(dir.path()).unwrap();
    let manifest = &report.manifest;

    assert_eq!(manifest.len(), 2);
    assert_eq!(manifest.total_bytes(), 30);
    let exts: Vec<_> = manifest.unique_extensions().into_iter().collect();
    assert_eq!(exts, vec![".JPG", ".TXT"]);
    assert!(manifest
        .records()
        .all(|r| r.path.file_name().unwrap() != "README"));
    assert!(manifest.records().all(|r| r.path.is_absolute()));

    assert_eq!(report.files_seen, 3);
    assert_eq!(report.no_extension, 1);
    assert!(report.is_complete());
}

#[test]
fn test_record_digest_matches_content() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"0123456789");

    let manifest = Manifest::scrape(dir.path()).unwrap();
    let digest = Hasher::hash_bytes(b"0123456789");
    let record = manifest.get(&digest).unwrap();

    assert_eq!(record.size_bytes, 10);
    assert_eq!(record.extension, ".TXT");
    assert_eq!(
        record.path,
        dir.path().canonicalize().unwrap().join("a.txt")
    );
}

#[test]
fn test_identical_content_in_one_tree_keeps_last() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/copy.txt", b"same bytes");
    write(dir.path(), "b/copy.txt", b"same bytes");

    let manifest = Manifest::scrape(dir.path()).unwrap();

    assert_eq!(manifest.len(), 1);
    let record = manifest.records().next().unwrap();
    assert!(record.path.ends_with("b/copy.txt"));
}

#[test]
fn test_empty_tree() {
    let dir = tempdir().unwrap();
    let manifest = Manifest::scrape(dir.path()).unwrap();
    assert!(manifest.is_empty());
}

#[test]
fn test_dotfiles_and_trailing_dots_not_recorded() {
    let dir = tempdir().unwrap();
    write(dir.path(), ".bashrc", b"alias");
    write(dir.path(), "weird.", b"dot");
    write(dir.path(), "archive.tar.gz", b"gz");

    let manifest = Manifest::scrape(dir.path()).unwrap();

    assert_eq!(manifest.len(), 1);
    assert_eq!(manifest.records().next().unwrap().extension, ".GZ");
}

#[test]
fn test_missing_root() {
    let dir = tempdir().unwrap();
    let err = Manifest::scrape(&dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, ManifestError::PathNotFound(_)));
}

#[test]
fn test_file_root() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"a");
    let err = Manifest::scrape(&dir.path().join("a.txt")).unwrap_err();
    assert!(matches!(err, ManifestError::NotADirectory(_)));
}

#[test]
fn test_oversized_file_is_skipped_not_fatal() {
    let dir = tempdir().unwrap();
    write(dir.path(), "big.bin", &[7u8; 64]);
    write(dir.path(), "small.txt", b"ok");

    let builder = ManifestBuilder::new(
        WalkerConfig::default(),
        Hasher::new().with_max_size(Some(16)),
    );
    let report = builder.scrape(dir.path()).unwrap();

    assert_eq!(report.manifest.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].overflow);
    assert!(report.skipped[0].path.ends_with("big.bin"));
    assert!(!report.is_complete());
}

#[test]
fn test_skip_hidden() {
    let dir = tempdir().unwrap();
    write(dir.path(), ".cache/blob.bin", b"hidden");
    write(dir.path(), "visible.txt", b"shown");

    let builder = ManifestBuilder::new(WalkerConfig::new(false, true), Hasher::new());
    let report = builder.scrape(dir.path()).unwrap();

    assert_eq!(report.manifest.len(), 1);
    assert_eq!(report.files_seen, 1);
}

#[test]
fn test_chunk_size_does_not_change_digest() {
    let dir = tempdir().unwrap();
    let content: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    write(dir.path(), "data.bin", &content);

    let small = ManifestBuilder::new(WalkerConfig::default(), Hasher::new().with_chunk_size(7))
        .scrape(dir.path())
        .unwrap();
    let large = ManifestBuilder::new(WalkerConfig::default(), Hasher::new().with_chunk_size(1 << 16))
        .scrape(dir.path())
        .unwrap();

    assert_eq!(
        small.manifest.records().next().unwrap().digest,
        large.manifest.records().next().unwrap().digest
    );
}

#[cfg(unix)]
#[test]
fn test_symlinks_skipped_by_default() {
    let dir = tempdir().unwrap();
    write(dir.path(), "real.txt", b"real");
    std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.txt")).unwrap();

    let report = ManifestBuilder::default().scrape(dir.path()).unwrap();
    assert_eq!(report.files_seen, 1);
    assert!(report
        .manifest
        .records()
        .all(|r| r.path.ends_with("real.txt")));
}

#[cfg(unix)]
#[test]
fn test_non_utf8_name_is_skipped_and_manifest_saves() {
    use backdupe::manifest::store;
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    let tree = dir.path().join("tree");
    write(&tree, "ok.txt", b"fine");
    std::fs::write(tree.join(OsStr::from_bytes(b"bad\xff.txt")), b"latin-1 name").unwrap();

    let report = ManifestBuilder::default().scrape(&tree).unwrap();
    assert_eq!(report.manifest.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert!(!report.is_complete());

    let dest = dir.path().join("tree.json");
    store::save(&report.manifest, &dest).unwrap();
    assert_eq!(store::load(&dest).unwrap(), report.manifest);
}
