#![allow(dead_code)]

use backdupe::manifest::{store, Manifest};
use std::fs;
use std::path::{Path, PathBuf};

/// Write `content` to `root/rel`, creating parent directories.
pub fn write(root: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

/// Scan `root` and save the manifest to `destination`.
pub fn scan_to(root: &Path, destination: &Path) -> Manifest {
    let manifest = Manifest::scrape(root).unwrap();
    store::save(&manifest, destination).unwrap();
    manifest
}

/// A main tree and a backup tree sharing three files, plus one file each
/// that has no counterpart.
pub struct Trees {
    pub dir: tempfile::TempDir,
    pub main: PathBuf,
    pub backup: PathBuf,
    pub main_manifest: PathBuf,
    pub backup_manifest: PathBuf,
}

impl Trees {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let main = dir.path().join("main");
        let backup = dir.path().join("backup");

        write(&main, "photos/beach.jpg", b"beach pixels");
        write(&main, "docs/report.txt", b"quarterly numbers");
        write(&main, "docs/draft.tmp", b"half written");
        write(&main, "only-main.txt", b"nowhere else");

        write(&backup, "2023/beach.jpg", b"beach pixels");
        write(&backup, "2023/report-final.txt", b"quarterly numbers");
        write(&backup, "2023/draft.tmp", b"half written");
        write(&backup, "only-backup.txt", b"backup only");

        let main = main.canonicalize().unwrap();
        let backup = backup.canonicalize().unwrap();
        let main_manifest = dir.path().join("main.json");
        let backup_manifest = dir.path().join("backup.json");
        scan_to(&main, &main_manifest);
        scan_to(&backup, &backup_manifest);

        Self {
            dir,
            main,
            backup,
            main_manifest,
            backup_manifest,
        }
    }
}
