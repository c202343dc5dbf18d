use backdupe::actions::{delete_duplicates, Confirmation, DeleteConfig, DeleteError, DeletionOutcome};
use backdupe::duplicates::{find_duplicates_in_sets, FilterRules, KillList};
use backdupe::manifest::ManifestSet;
use std::fs;

use super::common::{scan_to, write, Trees};

fn kill_list(trees: &Trees, rules: &FilterRules) -> KillList {
    let main = ManifestSet::from_paths([&trees.main_manifest]).unwrap();
    let backup = ManifestSet::from_paths([&trees.backup_manifest]).unwrap();
    find_duplicates_in_sets(&main, &backup, rules)
        .unwrap()
        .into_kill_list()
}

#[test]
fn test_confirmed_delete_removes_only_main_copies() {
    let trees = Trees::new();
    let list = kill_list(&trees, &FilterRules::none());

    let outcome = delete_duplicates(&list, Confirmation::Confirmed, &DeleteConfig::permanent(), None);
    let report = outcome.report().unwrap();

    assert_eq!(report.deleted_count(), 3);
    assert!(report.all_succeeded());
    assert_eq!(report.bytes_removed, list.total_bytes());
    for pair in &list {
        assert!(!pair.main.path.exists());
        assert!(pair.backup.path.exists());
    }
    assert!(trees.main.join("only-main.txt").exists());
    assert!(trees.backup.join("only-backup.txt").exists());
    assert!(report.backup_dirs.contains(&trees.backup.join("2023")));
}

#[test]
fn test_declined_delete_touches_nothing() {
    let trees = Trees::new();
    let list = kill_list(&trees, &FilterRules::none());

    for answer in ["no", "y", "", "yes please", "YESS"] {
        let outcome = delete_duplicates(
            &list,
            Confirmation::parse(answer),
            &DeleteConfig::permanent(),
            None,
        );
        assert!(matches!(outcome, DeletionOutcome::Declined), "answer {answer:?}");
    }
    assert!(list.iter().all(|p| p.main.path.exists()));
}

#[test]
fn test_filtered_pairs_survive_deletion() {
    let trees = Trees::new();
    let rules = FilterRules::ignoring(["tmp"]).unwrap();
    let list = kill_list(&trees, &rules);

    let _ = delete_duplicates(&list, Confirmation::parse("  YES \n"), &DeleteConfig::permanent(), None);

    assert!(trees.main.join("docs/draft.tmp").exists());
    assert!(!trees.main.join("docs/report.txt").exists());
}

#[test]
fn test_vanished_backup_keeps_main_copy() {
    let trees = Trees::new();
    let list = kill_list(&trees, &FilterRules::none());
    fs::remove_file(trees.backup.join("2023/beach.jpg")).unwrap();

    let outcome = delete_duplicates(&list, Confirmation::Confirmed, &DeleteConfig::permanent(), None);
    let report = outcome.report().unwrap();

    assert_eq!(report.deleted_count(), 2);
    assert_eq!(report.failure_count(), 1);
    assert!(matches!(report.failures[0].error, DeleteError::BackupMissing(_)));
    assert!(trees.main.join("photos/beach.jpg").exists());
}

#[test]
fn test_changed_main_copy_is_kept() {
    let trees = Trees::new();
    let list = kill_list(&trees, &FilterRules::none());
    fs::write(trees.main.join("docs/report.txt"), b"quarterly numbers, revised").unwrap();

    let outcome = delete_duplicates(&list, Confirmation::Confirmed, &DeleteConfig::permanent(), None);
    let report = outcome.report().unwrap();

    assert_eq!(report.failure_count(), 1);
    assert!(matches!(report.failures[0].error, DeleteError::Modified(_)));
    assert!(trees.main.join("docs/report.txt").exists());
}

#[test]
fn test_already_deleted_main_copy_is_reported() {
    let trees = Trees::new();
    let list = kill_list(&trees, &FilterRules::none());
    fs::remove_file(trees.main.join("docs/draft.tmp")).unwrap();

    let outcome = delete_duplicates(&list, Confirmation::Confirmed, &DeleteConfig::permanent(), None);
    let report = outcome.report().unwrap();

    assert_eq!(report.deleted_count(), 2);
    assert!(matches!(report.failures[0].error, DeleteError::NotFound(_)));
    assert!(report.summary().contains("1 failed"));
}

#[test]
fn test_one_shared_file_between_small_trees() {
    let dir = tempfile::tempdir().unwrap();
    let main = dir.path().join("main");
    let backup = dir.path().join("backup");
    let a = write(&main, "a.txt", b"0123456789");
    let b = write(&main, "b.jpg", b"main picture, 20 B..");
    write(&backup, "a.txt", b"0123456789");
    write(&backup, "c.jpg", b"another picture 20 B");
    let main_json = dir.path().join("main.json");
    let backup_json = dir.path().join("backup.json");
    scan_to(&main, &main_json);
    scan_to(&backup, &backup_json);

    let main_set = ManifestSet::from_paths([&main_json]).unwrap();
    let backup_set = ManifestSet::from_paths([&backup_json]).unwrap();
    let list = find_duplicates_in_sets(&main_set, &backup_set, &FilterRules::none())
        .unwrap()
        .into_kill_list();
    assert_eq!(list.len(), 1);

    let outcome = delete_duplicates(&list, Confirmation::parse("yes"), &DeleteConfig::permanent(), None);
    let report = outcome.report().unwrap();

    assert_eq!(report.deleted_count(), 1);
    assert_eq!(report.bytes_removed, 10);
    assert!(!a.exists());
    assert!(b.exists());
    assert!(backup.join("a.txt").exists());
    assert!(backup.join("c.jpg").exists());
}
