use backdupe::actions::DeleteConfig;
use backdupe::menu::Menu;
use backdupe::session::{DedupeSession, Side};

use super::common::Trees;

fn drive(script: &str) -> (String, DedupeSession) {
    let mut out = Vec::new();
    let mut menu = Menu::new(DedupeSession::new(), script.as_bytes(), &mut out)
        .with_delete_config(DeleteConfig::permanent());
    menu.run().unwrap();
    let session = menu.into_session();
    (String::from_utf8(out).unwrap(), session)
}

fn select_both(trees: &Trees) -> String {
    format!(
        "m\na\n{}\ne\nb\na\n{}\ne\n",
        trees.main_manifest.display(),
        trees.backup_manifest.display()
    )
}

#[test]
fn test_menu_review_then_delete() {
    let trees = Trees::new();
    let script = format!("{}r\nd\nyes\ne\n", select_both(&trees));

    let (out, session) = drive(&script);

    assert!(out.contains("3 duplicate(s)"));
    assert!(out.contains("Type 'yes' to delete 3 main-side file(s): "));
    assert!(out.contains("by deleting 3 file(s)."));
    assert!(out.contains("Backup copies kept in:"));
    assert!(out.ends_with("Exited.\n"));

    assert!(!trees.main.join("photos/beach.jpg").exists());
    assert!(!trees.main.join("docs/report.txt").exists());
    assert!(trees.main.join("only-main.txt").exists());
    assert!(trees.backup.join("2023/beach.jpg").exists());

    assert!(session.manifests(Side::Main).is_empty());
    assert!(session.kill_list().is_none());
}

#[test]
fn test_menu_decline_keeps_files() {
    let trees = Trees::new();
    let script = format!("{}d\ny\ne\n", select_both(&trees));

    let (out, session) = drive(&script);

    assert!(out.contains("Nothing was deleted."));
    assert!(trees.main.join("photos/beach.jpg").exists());
    assert_eq!(session.manifests(Side::Main).len(), 1);
    assert_eq!(session.kill_list().map(|k| k.len()), Some(3));
}

#[test]
fn test_menu_filters_protect_extensions() {
    let trees = Trees::new();
    let script = format!("{}f\ni\n.tmp jpg\ne\nd\nyes\ne\n", select_both(&trees));

    let (out, _) = drive(&script);

    assert!(out.contains("1 duplicate(s)"));
    assert!(out.contains("2 filtered out"));
    assert!(!trees.main.join("docs/report.txt").exists());
    assert!(trees.main.join("docs/draft.tmp").exists());
    assert!(trees.main.join("photos/beach.jpg").exists());
}

#[test]
fn test_menu_rejects_bad_manifest_path() {
    let trees = Trees::new();
    let missing = trees.dir.path().join("missing.json");
    let script = format!("m\na\n{}\ne\ne\n", missing.display());

    let (out, session) = drive(&script);

    assert!(out.contains("Invalid file path:"));
    assert!(session.manifests(Side::Main).is_empty());
}

#[test]
fn test_menu_delete_with_nothing_shared() {
    let trees = Trees::new();
    let script = format!(
        "m\na\n{0}\ne\nb\na\n{0}\ne\nd\ne\n",
        trees.main_manifest.display()
    );

    let (out, _) = drive(&script);

    assert!(out.contains("No duplicates found."));
    assert!(out.contains("no duplicates to delete"));
    assert!(!out.contains("Type 'yes'"));
    assert!(trees.main.join("photos/beach.jpg").exists());
}

#[test]
fn test_menu_eof_during_confirmation_declines() {
    let trees = Trees::new();
    let script = format!("{}d\n", select_both(&trees));

    let (out, _) = drive(&script);

    assert!(out.contains("Nothing was deleted."));
    assert!(out.ends_with("Exited.\n"));
    assert!(trees.main.join("photos/beach.jpg").exists());
}
