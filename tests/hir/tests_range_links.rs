//! Range link mirroring tests.

use mythic::workspace::RangeLink;
use mythic::{AnalysisHost, DocumentUri, Position, Range};
use rstest::rstest;

use crate::helpers::fixtures::{FIRE_SKILLS, IMP_MOBS};
use crate::helpers::workspace::{analyzed, uri};

#[rstest]
#[case(Range::from_coords(0, 0, 0, 4), Range::from_coords(3, 2, 3, 9))]
#[case(Range::from_coords(5, 10, 5, 12), Range::from_coords(0, 0, 0, 1))]
#[case(Range::from_coords(1, 0, 2, 0), Range::from_coords(1, 0, 2, 0))]
fn test_link_is_discoverable_from_target(#[case] from: Range, #[case] target: Range) {
    let mut host = AnalysisHost::new();
    let x = DocumentUri::new("file:///ws/x.yml");
    let y = DocumentUri::new("file:///ws/y.yml");
    host.open(x.clone(), "x");
    host.open(y.clone(), "y");

    assert!(host.add_range_link(&x, RangeLink::new(from, y.clone(), target)));

    let mirrors = host.document(&y).unwrap().references();
    assert_eq!(mirrors.len(), 1);
    assert_eq!(mirrors[0], RangeLink::new(target, x.clone(), from));
    assert_eq!(
        host.document(&y).unwrap().references_at(target.start).count(),
        1
    );
}

#[test]
fn test_link_from_unknown_source_is_rejected() {
    let mut host = AnalysisHost::new();
    let y = DocumentUri::new("file:///ws/y.yml");
    host.open(y.clone(), "y");
    let link = RangeLink::new(Range::default(), y.clone(), Range::default());
    assert!(!host.add_range_link(&DocumentUri::new("file:///ws/none.yml"), link));
    assert!(host.document(&y).unwrap().references().is_empty());
}

#[test]
fn test_resolved_reference_is_mirrored() {
    let (workspace, uris) = analyzed(&[("Skills/fire.yml", FIRE_SKILLS), ("Mobs/imp.yml", IMP_MOBS)]);
    let imp = workspace.host.document(&uris[1]).unwrap();
    let link = imp.definition_at(Position::new(8, 14)).expect("reference to FireBall");
    assert_eq!(link.target_document, uris[0]);
    assert_eq!(link.target_range, Range::from_coords(1, 0, 1, 8));

    let fire = workspace.host.document(&uris[0]).unwrap();
    let from_imp: Vec<_> = fire
        .references_at(Position::new(1, 3))
        .filter(|l| l.target_document == uris[1])
        .collect();
    assert_eq!(from_imp.len(), 1);
    assert_eq!(from_imp[0].target_range, link.from_range);
}

#[test]
fn test_edit_removing_reference_drops_mirror() {
    let (mut workspace, uris) = analyzed(&[("Skills/fire.yml", FIRE_SKILLS), ("Mobs/imp.yml", IMP_MOBS)]);
    workspace.edit("Mobs/imp.yml", "Imp:\n  Health: 20\n");
    workspace.flush();

    let fire = workspace.host.document(&uris[0]).unwrap();
    assert!(fire.references().iter().all(|l| l.target_document != uri("Mobs/imp.yml")));
}
