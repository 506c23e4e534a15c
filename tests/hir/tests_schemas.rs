//! Schema diagnostic tests.

use mythic::hir::codes;
use rstest::rstest;

use crate::helpers::fixtures::{FIRE_SKILLS, IMP_MOBS, SUMMONER_SKILLS};
use crate::helpers::workspace::analyzed;

#[rstest]
#[case("Skills/a.yml", "A:\n  Cooldown: -1\n", "Number must be at least 0!", codes::OUT_OF_RANGE)]
#[case("Skills/a.yml", "A:\n  Cooldown: soon\n", "Expected a number, found `soon`!", codes::NOT_A_NUMBER)]
#[case("Skills/a.yml", "A:\n  Skills: heal\n", "Expected a list, found a scalar!", codes::WRONG_SHAPE)]
#[case("Skills/a.yml", "A:\n  Cooldown: 1\nA:\n  Cooldown: 2\n", "Duplicate key A!", codes::DUPLICATE_KEY)]
#[case("Skills/a.yml", "A:\n  Skills:\n  - skill{s=Missing}\n", "Unknown metaskill 'Missing'", codes::UNKNOWN_SKILL)]
#[case("Skills/a.yml", "A:\n  Skills:\n  - skill:Missing @Self\n", "Unknown metaskill 'Missing'", codes::UNKNOWN_SKILL)]
#[case("Mobs/m.yml", "M:\n  Armor: 31\n", "Number must be between 0 and 30!", codes::OUT_OF_RANGE)]
#[case("Mobs/m.yml", "M:\n  DamageModifiers:\n  - FIRE\n", "Missing a value for the damage modifier!", codes::MISSING_VALUE)]
#[case("Mobs/m.yml", "M:\n  DamageModifiers:\n  - FIRE lots\n", "Invalid value. Must be a number.", codes::NOT_A_NUMBER)]
#[case("Mobs/m.yml", "M:\n  Skills:\n  - summon{type=Ghost}\n", "Unknown mob 'Ghost'", codes::UNKNOWN_MOB)]
fn test_single_diagnostic(
    #[case] path: &str,
    #[case] text: &str,
    #[case] message: &str,
    #[case] code: &str,
) {
    let (workspace, uris) = analyzed(&[(path, text)]);
    let diagnostics = workspace.diagnostics(&uris[0]);
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    assert_eq!(diagnostics[0].message.as_ref(), message);
    assert_eq!(diagnostics[0].code.as_deref(), Some(code));
    assert_eq!(diagnostics[0].source, "mythic");
}

#[test]
fn test_yaml_syntax_error() {
    let (workspace, uris) = analyzed(&[("Skills/a.yml", "A:\n  Skills: [heal\n")]);
    let diagnostics = workspace.diagnostics(&uris[0]);
    assert!(
        diagnostics.iter().any(|d| d.code.as_deref() == Some(codes::YAML_SYNTAX)),
        "{diagnostics:?}"
    );
}

#[test]
fn test_skill_line_syntax_error_position() {
    let (workspace, uris) = analyzed(&[("Skills/a.yml", "A:\n  Skills:\n  - damage{amount=5\n")]);
    let diagnostics = workspace.diagnostics(&uris[0]);
    let error = diagnostics
        .iter()
        .find(|d| d.message.starts_with("Expected '}'"))
        .expect("missing brace reported");
    assert_eq!(error.range.start.line, 2);
}

#[test]
fn test_inline_skill_is_validated() {
    let text = "A:\n  Skills:\n  - aura{onTick=[ - skill{s=Nope} ]} @Self\n";
    let (workspace, uris) = analyzed(&[("Skills/a.yml", text)]);
    let messages = workspace.messages(&uris[0]);
    assert_eq!(messages, vec!["Unknown metaskill 'Nope'".to_string()]);
    assert_eq!(workspace.diagnostics(&uris[0])[0].range.start.line, 2);
}

#[rstest]
#[case::flow_sequence("A:\n  Skills: [heal, \"damage{amount=1} @Self\"]\n")]
#[case::flow_map("A: {Cooldown: 1}\n")]
#[case::anchored_body("A: &base\n  Cooldown: 1\n")]
#[case::folded_skill_line("A:\n  Skills:\n  - >-\n    damage{amount=5}\n    @Target\n")]
fn test_valid_yaml_forms_are_clean(#[case] text: &str) {
    let (workspace, uris) = analyzed(&[("Skills/a.yml", text)]);
    assert!(workspace.diagnostics(&uris[0]).is_empty(), "{:?}", workspace.diagnostics(&uris[0]));
}

#[test]
fn test_block_scalar_reference_position() {
    let text = "A:\n  Skills:\n  - |-\n    skill{s=Nope}\n";
    let (workspace, uris) = analyzed(&[("Skills/a.yml", text)]);
    let diagnostics = workspace.diagnostics(&uris[0]);
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    assert_eq!(diagnostics[0].message.as_ref(), "Unknown metaskill 'Nope'");
    assert_eq!((diagnostics[0].range.start.line, diagnostics[0].range.start.character), (3, 12));
}

#[rstest]
#[case("A:\n  Skills:\n  - meta{m=[ - skill{s=Nope} ]} @Self\n", 23)]
#[case("A:\n  Skills:\n  - metaskill{skill=Nope} @Self\n", 20)]
fn test_skill_valued_entry_resolves(#[case] text: &str, #[case] col: u32) {
    let (workspace, uris) = analyzed(&[("Skills/a.yml", text)]);
    assert_eq!(workspace.messages(&uris[0]), vec!["Unknown metaskill 'Nope'".to_string()]);
    let start = workspace.diagnostics(&uris[0])[0].range.start;
    assert_eq!((start.line, start.character), (2, col));
}

#[test]
fn test_vanilla_summon_is_not_a_reference() {
    let (workspace, uris) = analyzed(&[("Skills/a.yml", "A:\n  Skills:\n  - summon{type=ZOMBIE}\n")]);
    assert!(workspace.diagnostics(&uris[0]).is_empty());
}

#[test]
fn test_fixture_workspace_is_clean() {
    let (workspace, uris) = analyzed(&[
        ("Skills/fire.yml", FIRE_SKILLS),
        ("Mobs/imp.yml", IMP_MOBS),
        ("Skills/summoner.yml", SUMMONER_SKILLS),
    ]);
    for uri in &uris {
        assert!(workspace.diagnostics(uri).is_empty(), "{uri}: {:?}", workspace.diagnostics(uri));
    }
    assert_eq!(workspace.host.graph().len(), 4);
    assert_eq!(workspace.host.graph().edge_count(), 3);
}

#[test]
fn test_unmatched_path_has_no_schema() {
    let (workspace, uris) = analyzed(&[("config.yml", "A:\n  Cooldown: -1\n")]);
    assert!(workspace.diagnostics(&uris[0]).is_empty());
    assert!(workspace.host.graph().is_empty());
}
