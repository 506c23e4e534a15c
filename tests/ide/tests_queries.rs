//! Editor queries over an analyzed fixture workspace.

use mythic::ide::{encode, CompletionItemKind, TokenType};
use mythic::parser::CompletionKind;
use mythic::{EntityKind, Position, Range};
use rstest::{fixture, rstest};

use crate::helpers::fixtures::{FIRE_SKILLS, IMP_MOBS, SUMMONER_SKILLS};
use crate::helpers::workspace::{analyzed, uri, TestWorkspace};

#[fixture]
fn workspace() -> TestWorkspace {
    let (workspace, _) = analyzed(&[
        ("Skills/fire.yml", FIRE_SKILLS),
        ("Mobs/imp.yml", IMP_MOBS),
        ("Skills/summoner.yml", SUMMONER_SKILLS),
    ]);
    workspace
}

// ============================================================================
// Hover
// ============================================================================

#[rstest]
#[case("Skills/fire.yml", 1, 3, "# Skill: `FireBall`")]
#[case("Mobs/imp.yml", 1, 1, "# MythicMob: `Imp`")]
#[case("Mobs/imp.yml", 8, 14, "# Skill: `FireBall`")]
#[case("Skills/summoner.yml", 2, 17, "# Mob: `Imp`")]
fn test_hover_title(workspace: TestWorkspace, #[case] path: &str, #[case] line: u32, #[case] col: u32, #[case] title: &str) {
    let result = workspace
        .host
        .analysis()
        .hover(&uri(path), Position::new(line, col))
        .expect("hover");
    assert!(result.contents.starts_with(title), "{}", result.contents);
}

#[rstest]
fn test_reference_hover_carries_description(workspace: TestWorkspace) {
    let result = workspace
        .host
        .analysis()
        .hover(&uri("Mobs/imp.yml"), Position::new(8, 14))
        .unwrap();
    assert!(result.contents.contains("Sets the target ablaze"));
    assert!(result.contents.contains("```yaml"));
    assert_eq!(result.range, Range::from_coords(8, 12, 8, 20));
}

// ============================================================================
// Goto and references
// ============================================================================

#[rstest]
fn test_goto_definition_across_files(workspace: TestWorkspace) {
    let result = workspace
        .host
        .analysis()
        .goto_definition(&uri("Mobs/imp.yml"), Position::new(8, 14))
        .unwrap();
    assert_eq!(result.origin, Range::from_coords(8, 12, 8, 20));
    assert_eq!(result.target.uri, uri("Skills/fire.yml"));
    assert_eq!(result.target.range, Range::from_coords(1, 0, 1, 8));
}

#[rstest]
fn test_goto_on_plain_text_is_none(workspace: TestWorkspace) {
    let analysis = workspace.host.analysis();
    assert!(analysis.goto_definition(&uri("Mobs/imp.yml"), Position::new(3, 4)).is_none());
}

#[rstest]
#[case(false, 2)]
#[case(true, 3)]
fn test_references_of_declaration(workspace: TestWorkspace, #[case] include_declaration: bool, #[case] expected: usize) {
    let references = workspace.host.analysis().find_references(
        &uri("Skills/fire.yml"),
        Position::new(1, 3),
        include_declaration,
    );
    assert_eq!(references.len(), expected, "{references:?}");
    assert_eq!(references[0].uri, uri("Mobs/imp.yml"));
    assert_eq!(
        references.iter().filter(|r| r.is_definition).count(),
        usize::from(include_declaration)
    );
}

#[rstest]
fn test_references_from_a_usage(workspace: TestWorkspace) {
    let from_usage = workspace
        .host
        .analysis()
        .find_references(&uri("Mobs/imp.yml"), Position::new(8, 14), false);
    let from_declaration = workspace
        .host
        .analysis()
        .find_references(&uri("Skills/fire.yml"), Position::new(1, 3), false);
    assert_eq!(from_usage, from_declaration);
}

// ============================================================================
// Symbols
// ============================================================================

#[rstest]
#[case(None, &["FireBall", "FireWall", "Imp", "Summoner"])]
#[case(Some("fire"), &["FireBall", "FireWall"])]
#[case(Some("MON"), &["Summoner"])]
#[case(Some("zzz"), &[])]
fn test_workspace_symbols(workspace: TestWorkspace, #[case] query: Option<&str>, #[case] expected: &[&str]) {
    let names: Vec<String> = workspace
        .host
        .analysis()
        .workspace_symbols(query)
        .iter()
        .map(|s| s.name.to_string())
        .collect();
    assert_eq!(names, expected);
}

#[rstest]
fn test_document_symbols(workspace: TestWorkspace) {
    let symbols = workspace.host.analysis().document_symbols(&uri("Skills/fire.yml"));
    assert_eq!(symbols.len(), 2);
    assert_eq!(symbols[0].name, "FireBall");
    assert_eq!(symbols[0].kind, EntityKind::Skill);
    assert_eq!(symbols[0].lsp_kind(), 12);
    assert_eq!(symbols[0].detail.as_deref(), Some("Sets the target ablaze"));
    assert_eq!(symbols[1].detail, None);

    let mobs = workspace.host.analysis().document_symbols(&uri("Mobs/imp.yml"));
    assert_eq!(mobs[0].lsp_kind(), 5);
}

// ============================================================================
// Semantic tokens
// ============================================================================

#[rstest]
#[case(1, 0, 3, TokenType::Class)]
#[case(8, 4, 5, TokenType::Function)]
#[case(8, 22, 7, TokenType::Variable)]
#[case(8, 30, 9, TokenType::Event)]
fn test_semantic_token_present(
    workspace: TestWorkspace,
    #[case] line: u32,
    #[case] col: u32,
    #[case] length: u32,
    #[case] token_type: TokenType,
) {
    let tokens = workspace.host.analysis().semantic_tokens(&uri("Mobs/imp.yml"));
    let token = tokens
        .iter()
        .find(|t| t.line == line && t.col == col)
        .unwrap_or_else(|| panic!("no token at {line}:{col} in {tokens:?}"));
    assert_eq!(token.length, length);
    assert_eq!(token.token_type, token_type);
}

#[rstest]
fn test_semantic_tokens_are_ordered(workspace: TestWorkspace) {
    let tokens = workspace.host.analysis().semantic_tokens(&uri("Skills/fire.yml"));
    assert!(!tokens.is_empty());
    assert!(tokens.windows(2).all(|w| (w[0].line, w[0].col) < (w[1].line, w[1].col)));
    assert_eq!(encode(&tokens).len(), tokens.len() * 5);
}

// ============================================================================
// Completion
// ============================================================================

#[rstest]
#[case("  - skill{s=Fi}", 14, &["FireBall", "FireWall"], CompletionItemKind::Skill)]
#[case("  - summon{type=I}", 17, &["Imp"], CompletionItemKind::Mob)]
#[case("  - meta{m=Fi}", 13, &["FireBall", "FireWall"], CompletionItemKind::Skill)]
#[case("  - aura{onTick=[ - skill{s=Fi} ]} @Self", 30, &["FireBall", "FireWall"], CompletionItemKind::Skill)]
fn test_completion_of_references(
    mut workspace: TestWorkspace,
    #[case] line: &str,
    #[case] col: u32,
    #[case] expected: &[&str],
    #[case] kind: CompletionItemKind,
) {
    let draft = workspace.open("Skills/draft.yml", &format!("Draft:\n  Skills:\n{line}\n"));
    workspace.flush();
    let list = workspace
        .host
        .analysis()
        .completions(&draft, Position::new(2, col))
        .expect("completion context");
    let labels: Vec<&str> = list.items.iter().map(|i| i.label.as_ref()).collect();
    assert_eq!(labels, expected);
    assert!(list.items.iter().all(|i| i.kind == kind));
}

#[rstest]
fn test_completion_inside_inline_skill(mut workspace: TestWorkspace) {
    let draft = workspace.open(
        "Skills/draft.yml",
        "Draft:\n  Skills:\n  - aura{onTick=[ - dam] ;duration=20} @Self\n",
    );
    workspace.flush();
    let list = workspace
        .host
        .analysis()
        .completions(&draft, Position::new(2, 23))
        .expect("completion context");
    assert_eq!(list.context, CompletionKind::MechanicName);
    assert_eq!(list.range, Range::from_coords(2, 20, 2, 23));
}

// ============================================================================
// Debug views
// ============================================================================

#[rstest]
fn test_dependency_report(workspace: TestWorkspace) {
    let report = workspace
        .host
        .analysis()
        .dependency_report(&uri("Skills/fire.yml"))
        .unwrap();
    let fire_ball = report.entities.iter().find(|e| e.name == "FireBall").unwrap();
    assert_eq!(fire_ball.dependents.len(), 2);
    let text = report.to_string();
    assert!(text.contains("  skill FireWall"), "{text}");
    assert!(text.contains("<- file:///ws/Mobs/imp.yml"), "{text}");
}

#[rstest]
fn test_document_stats(workspace: TestWorkspace) {
    let stats = workspace
        .host
        .analysis()
        .document_stats(&uri("Mobs/imp.yml"))
        .unwrap();
    assert_eq!(stats.entities, 1);
    assert_eq!(stats.definitions, 1);
    assert_eq!(stats.diagnostics, 0);
    assert!(workspace.host.analysis().document_stats(&uri("nope.yml")).is_none());
}
