use backdupe::duplicates::{find_duplicates, find_duplicates_in_sets, FilterRules};
use backdupe::manifest::{store, ManifestSet};
use std::path::PathBuf;

use super::common::{scan_to, write, Trees};

fn sets(trees: &Trees) -> (ManifestSet, ManifestSet) {
    (
        ManifestSet::from_paths([&trees.main_manifest]).unwrap(),
        ManifestSet::from_paths([&trees.backup_manifest]).unwrap(),
    )
}

#[test]
fn test_pairs_shared_content_across_trees() {
    let trees = Trees::new();
    let (main, backup) = sets(&trees);

    let result = find_duplicates_in_sets(&main, &backup, &FilterRules::none()).unwrap();

    let mains: Vec<_> = result
        .pairs
        .iter()
        .map(|p| p.main.path.strip_prefix(&trees.main).unwrap().to_path_buf())
        .collect();
    let expected: Vec<PathBuf> = ["docs/draft.tmp", "docs/report.txt", "photos/beach.jpg"]
        .into_iter()
        .map(PathBuf::from)
        .collect();
    assert_eq!(mains, expected);
    assert!(result
        .pairs
        .iter()
        .all(|p| p.backup.path.starts_with(&trees.backup)));
    assert_eq!(
        result.total_bytes(),
        (b"half written".len() + b"quarterly numbers".len() + b"beach pixels".len()) as u64
    );
    assert_eq!(result.filtered, 0);
    assert_eq!(result.same_path, 0);
}

#[test]
fn test_different_names_still_pair() {
    let trees = Trees::new();
    let (main, backup) = sets(&trees);

    let result = find_duplicates_in_sets(&main, &backup, &FilterRules::none()).unwrap();
    let report = result
        .pairs
        .iter()
        .find(|p| p.main.path.ends_with("report.txt"))
        .unwrap();

    assert!(report.backup.path.ends_with("report-final.txt"));
    assert!(!report.same_file_name());
}

#[test]
fn test_ignored_extension_is_never_paired() {
    let trees = Trees::new();
    let (main, backup) = sets(&trees);
    let rules = FilterRules::ignoring([".tmp"]).unwrap();

    let result = find_duplicates_in_sets(&main, &backup, &rules).unwrap();

    assert_eq!(result.pairs.len(), 2);
    assert_eq!(result.filtered, 1);
    assert!(result.pairs.iter().all(|p| p.main.extension != ".TMP"));
}

#[test]
fn test_sought_extension_restricts_pairs() {
    let trees = Trees::new();
    let (main, backup) = sets(&trees);
    let mut rules = FilterRules::none();
    rules
        .add_sought(&backdupe::duplicates::ExtensionSet::parse("jpg").unwrap())
        .unwrap();

    let result = find_duplicates_in_sets(&main, &backup, &rules).unwrap();

    assert_eq!(result.pairs.len(), 1);
    assert_eq!(result.pairs[0].main.extension, ".JPG");
    assert_eq!(result.filtered, 2);
}

#[test]
fn test_same_tree_on_both_sides_deletes_nothing() {
    let trees = Trees::new();
    let main = store::load(&trees.main_manifest).unwrap();

    let result = find_duplicates(&main, &main, &FilterRules::none());

    assert!(result.is_empty());
    assert_eq!(result.same_path, main.len());
}

#[test]
fn test_multiple_backup_manifests_are_merged() {
    let trees = Trees::new();
    let extra_root = trees.dir.path().join("extra");
    write(&extra_root, "notes.txt", b"nowhere else");
    let extra_manifest = trees.dir.path().join("extra.json");
    scan_to(&extra_root, &extra_manifest);

    let main = ManifestSet::from_paths([&trees.main_manifest]).unwrap();
    let backup = ManifestSet::from_paths([&trees.backup_manifest, &extra_manifest]).unwrap();

    let result = find_duplicates_in_sets(&main, &backup, &FilterRules::none()).unwrap();

    assert_eq!(result.pairs.len(), 4);
    assert!(result
        .pairs
        .iter()
        .any(|p| p.main.path.ends_with("only-main.txt") && p.backup.path.ends_with("notes.txt")));
}

#[test]
fn test_empty_backup_yields_nothing() {
    let trees = Trees::new();
    let empty_root = trees.dir.path().join("empty");
    std::fs::create_dir(&empty_root).unwrap();
    let empty_manifest = trees.dir.path().join("empty.json");
    scan_to(&empty_root, &empty_manifest);

    let main = ManifestSet::from_paths([&trees.main_manifest]).unwrap();
    let backup = ManifestSet::from_paths([&empty_manifest]).unwrap();

    let result = find_duplicates_in_sets(&main, &backup, &FilterRules::none()).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.total_bytes(), 0);
}
