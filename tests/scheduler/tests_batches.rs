//! Batch scheduling across documents.

use std::time::Instant;

use mythic::scheduler::SchedulerState;
use mythic::{DocumentUri, PublishDiagnostics};
use rstest::rstest;

use crate::helpers::fixtures::{FIRE_SKILLS, IMP_MOBS, SUMMONER_SKILLS};
use crate::helpers::workspace::{analyzed, uri, TestWorkspace};

fn published_uris(published: &[PublishDiagnostics]) -> Vec<DocumentUri> {
    published.iter().map(|p| p.uri.clone()).collect()
}

// ============================================================================
// Deduplication
// ============================================================================

#[rstest]
#[case(1)]
#[case(2)]
#[case(5)]
fn test_repeated_edits_parse_once(#[case] edits: usize) {
    let mut workspace = TestWorkspace::new();
    workspace.open("Skills/a.yml", "A:\n  Cooldown: 1\n");
    for i in 0..edits {
        workspace.edit("Skills/a.yml", &format!("A:\n  Cooldown: {i}\n"));
    }
    let report = workspace.flush();
    assert_eq!(report.pre_parses, 1);
    assert_eq!(report.post_parses, 1);
    assert_eq!(report.published.len(), 1);
    assert_eq!(report.published[0].version, edits as u64);
}

// ============================================================================
// Related documents
// ============================================================================

#[test]
fn test_editing_declaration_reparses_referrers() {
    let (mut workspace, uris) = analyzed(&[
        ("Skills/fire.yml", FIRE_SKILLS),
        ("Mobs/imp.yml", IMP_MOBS),
        ("Skills/summoner.yml", SUMMONER_SKILLS),
    ]);
    let imp = workspace.edit("Mobs/imp.yml", IMP_MOBS);
    let report = workspace.flush();

    let published = published_uris(&report.published);
    assert!(published.contains(&imp));
    assert!(published.contains(&uris[2]), "referrer re-parsed: {published:?}");
    assert!(published.contains(&uris[0]), "dependency re-parsed: {published:?}");
    assert_eq!(report.post_parses, 3);
    assert!(workspace.messages(&uris[2]).is_empty());
}

#[test]
fn test_renamed_declaration_breaks_referrer() {
    let (mut workspace, uris) = analyzed(&[
        ("Mobs/imp.yml", IMP_MOBS),
        ("Skills/summoner.yml", SUMMONER_SKILLS),
    ]);
    workspace.edit("Mobs/imp.yml", "Devil:\n  Health: 20\n");
    workspace.flush();

    assert_eq!(workspace.messages(&uris[1]), vec!["Unknown mob 'Imp'".to_string()]);
}

#[test]
fn test_forward_reference_resolves_when_declared() {
    let mut workspace = TestWorkspace::new();
    let summoner = workspace.open("Skills/summoner.yml", SUMMONER_SKILLS);
    workspace.flush();
    assert_eq!(workspace.messages(&summoner), vec!["Unknown mob 'Imp'".to_string()]);

    workspace.open("Mobs/imp.yml", "Imp:\n  Health: 20\n");
    let report = workspace.flush();

    let entry = report
        .published
        .iter()
        .find(|p| p.uri == summoner)
        .expect("summoner re-published");
    assert!(entry.diagnostics.is_empty());
    let imp = workspace.host.graph().lookup(mythic::EntityKind::Mob, "Imp").unwrap();
    assert_eq!(imp.dependents().len(), 1);
}

// ============================================================================
// Publishing
// ============================================================================

#[test]
fn test_fixed_document_publishes_empty_list() {
    let mut workspace = TestWorkspace::new();
    let a = workspace.open("Skills/a.yml", "A:\n  Cooldown: -1\n");
    let report = workspace.flush();
    assert_eq!(report.published[0].diagnostics.len(), 1);

    workspace.edit("Skills/a.yml", "A:\n  Cooldown: 1\n");
    let report = workspace.flush();
    assert_eq!(report.published.len(), 1);
    assert_eq!(report.published[0].uri, a);
    assert!(report.published[0].diagnostics.is_empty());
}

#[test]
fn test_unrelated_document_is_not_published() {
    let (mut workspace, uris) = analyzed(&[
        ("Skills/a.yml", "A:\n  Cooldown: 1\n"),
        ("Skills/b.yml", "B:\n  Cooldown: 1\n"),
    ]);
    workspace.edit("Skills/a.yml", "A:\n  Cooldown: 2\n");
    let report = workspace.flush();
    assert_eq!(published_uris(&report.published), vec![uris[0].clone()]);
}

#[test]
fn test_flush_leaves_scheduler_idle() {
    let (mut workspace, _) = analyzed(&[("Skills/fire.yml", FIRE_SKILLS)]);
    assert_eq!(workspace.scheduler.state(), SchedulerState::Idle);
    assert!(!workspace.scheduler.has_pending());

    workspace.scheduler.enqueue_full(uri("Skills/fire.yml"), Instant::now());
    assert!(matches!(workspace.scheduler.state(), SchedulerState::Scheduled { .. }));
    let report = workspace.flush();
    assert_eq!(report.pre_parses, 1);
    assert_eq!(report.post_parses, 1);
}

#[test]
fn test_closed_document_in_queue_is_skipped() {
    let mut workspace = TestWorkspace::new();
    let a = workspace.open("Skills/a.yml", "A:\n  Cooldown: 1\n");
    workspace.host.close(&a);
    let report = workspace.flush();
    assert_eq!(report.pre_parses, 0);
    assert!(report.published.is_empty());
}
