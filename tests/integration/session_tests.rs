use backdupe::actions::{Confirmation, DeleteConfig, DeletionOutcome};
use backdupe::session::{DedupeSession, SessionError, SessionState, Side};

use super::common::Trees;

fn selected(trees: &Trees) -> DedupeSession {
    let mut session = DedupeSession::new();
    session.add_manifest(Side::Main, &trees.main_manifest).unwrap();
    session.add_manifest(Side::Backup, &trees.backup_manifest).unwrap();
    session
}

#[test]
fn test_review_requires_both_sides() {
    let trees = Trees::new();
    let mut session = DedupeSession::new();
    session.add_manifest(Side::Main, &trees.main_manifest).unwrap();

    assert!(matches!(session.review(), Err(SessionError::MissingManifests)));
    assert!(matches!(session.begin_delete(), Err(SessionError::NotReviewed)));
}

#[test]
fn test_full_session_deletes_and_clears_main() {
    let trees = Trees::new();
    let mut session = selected(&trees);

    let result = session.review().unwrap();
    assert_eq!(result.pairs.len(), 3);
    assert_eq!(session.state(), SessionState::Reviewing);

    assert_eq!(session.begin_delete().unwrap().len(), 3);
    assert_eq!(session.state(), SessionState::AwaitingConfirmation);

    let outcome = session
        .confirm_delete(Confirmation::parse("yes"), &DeleteConfig::permanent(), None)
        .unwrap();
    assert_eq!(outcome.report().unwrap().deleted_count(), 3);

    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.kill_list().is_none());
    assert!(session.manifests(Side::Main).is_empty());
    assert_eq!(session.manifests(Side::Backup).len(), 1);
    assert!(!trees.main.join("photos/beach.jpg").exists());
}

#[test]
fn test_declined_session_keeps_review() {
    let trees = Trees::new();
    let mut session = selected(&trees);
    session.review().unwrap();
    session.begin_delete().unwrap();

    let outcome = session
        .confirm_delete(Confirmation::parse("no"), &DeleteConfig::permanent(), None)
        .unwrap();

    assert!(matches!(outcome, DeletionOutcome::Declined));
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.kill_list().map(|k| k.len()), Some(3));
    assert!(trees.main.join("photos/beach.jpg").exists());
}

#[test]
fn test_filter_change_discards_review() {
    let trees = Trees::new();
    let mut session = selected(&trees);
    session.review().unwrap();

    session.add_ignored(".jpg .tmp").unwrap();
    assert!(session.kill_list().is_none());
    assert!(matches!(session.begin_delete(), Err(SessionError::NotReviewed)));

    let result = session.review().unwrap();
    assert_eq!(result.pairs.len(), 1);
    assert_eq!(result.filtered, 2);
}

#[test]
fn test_conflicting_filters_rejected() {
    let trees = Trees::new();
    let mut session = selected(&trees);
    session.add_ignored("tmp").unwrap();

    assert!(matches!(session.add_sought(".TMP"), Err(SessionError::Filter(_))));
    assert!(session.filters().sought().is_empty());
}

#[test]
fn test_confirm_without_begin_is_rejected() {
    let trees = Trees::new();
    let mut session = selected(&trees);
    session.review().unwrap();

    let err = session
        .confirm_delete(Confirmation::Confirmed, &DeleteConfig::permanent(), None)
        .unwrap_err();
    assert!(matches!(err, SessionError::NotAwaitingConfirmation(SessionState::Reviewing)));
    assert!(trees.main.join("photos/beach.jpg").exists());
}

#[test]
fn test_nothing_to_delete() {
    let trees = Trees::new();
    let mut session = DedupeSession::new();
    session.add_manifest(Side::Main, &trees.main_manifest).unwrap();
    session.add_manifest(Side::Backup, &trees.main_manifest).unwrap();

    assert!(session.review().unwrap().is_empty());
    assert!(matches!(session.begin_delete(), Err(SessionError::NothingToDelete)));
}

#[test]
fn test_remove_unselected_manifest() {
    let trees = Trees::new();
    let mut session = selected(&trees);

    let err = session
        .remove_manifest(Side::Main, &trees.backup_manifest)
        .unwrap_err();
    assert!(matches!(err, SessionError::NotSelected { side: Side::Main, .. }));

    session.remove_manifest(Side::Main, &trees.main_manifest).unwrap();
    assert!(session.manifests(Side::Main).is_empty());
}
