//! Skill line parser tests.

use mythic::parser::{
    parse_skill_line, scan, ErrorCode, Parse, ScanMode, SkillLineExpr, TokenKind,
};
use mythic::TextSize;
use rstest::rstest;

fn parse(source: &str) -> Parse<SkillLineExpr> {
    parse_skill_line(&scan(source, TextSize::new(0), ScanMode::SkillLine))
}

// =============================================================================
// VALID LINES
// =============================================================================

#[rstest]
#[case("heal", "mechanic only")]
#[case("  heal  ", "surrounding spaces")]
#[case("damage{amount=5} @Target", "mechanic and targeter")]
#[case("damage{amount=5} @Target ~onDamaged ?enemy{type=ZOMBIE} 2 =10-20", "every component")]
#[case("skill{s=FireBall} @PIR{r=5} ~onTimer:20", "trigger with argument")]
#[case("message{m=Hello <caster.name>} @Self", "placeholder value")]
#[case("aura{onTick=[ - damage{amount=1} ];duration=20} @Self", "inline skill value")]
#[case("heal ?!~isMonster 0.5 <50%", "negated trigger condition")]
fn test_valid_line_covers_input(#[case] input: &str, #[case] desc: &str) {
    let parse = parse(input);
    assert!(parse.ok(), "{desc}: {:?}", parse.errors);

    let mut expected = TextSize::new(0);
    for token in parse.tree.tokens() {
        assert_ne!(token.kind, TokenKind::Eof, "{desc}: Eof consumed");
        assert_eq!(token.range.start(), expected, "{desc}: gap before {token:?}");
        expected = token.range.end();
    }
    assert_eq!(expected, TextSize::of(input), "{desc}: tokens stop early");
}

#[test]
fn test_every_component() {
    let parse = parse("damage{amount=5} @Target ~onDamaged ?enemy{type=ZOMBIE} 2 =10-20");
    assert!(parse.ok(), "{:?}", parse.errors);
    let line = parse.tree;

    let mechanic = line.mechanic.as_ref().unwrap();
    assert_eq!(mechanic.name(), "damage");
    let config = mechanic.config.as_ref().unwrap();
    assert_eq!(config.entries.len(), 1);
    assert_eq!(config.entries[0].key(), "amount");
    assert_eq!(config.entries[0].value.text(), "5");

    assert_eq!(line.targeter.as_ref().unwrap().name(), "Target");
    assert_eq!(line.trigger.as_ref().unwrap().name(), "onDamaged");

    assert_eq!(line.conditions.len(), 1);
    let condition = &line.conditions[0];
    assert_eq!(condition.name(), "enemy");
    assert!(!condition.is_negated());
    let condition_config = condition.config.as_ref().unwrap();
    assert_eq!(condition_config.get("type").unwrap().value.text(), "ZOMBIE");

    assert_eq!(line.chance.as_ref().unwrap().lexeme, "2");

    let health = line.health_modifier.as_ref().unwrap();
    assert_eq!(health.operator(), TokenKind::Equal);
    assert!(health.is_range());
    assert_eq!(health.min.value(), Some(10.0));
    assert_eq!(health.max.as_ref().and_then(|m| m.value()), Some(20.0));
}

// =============================================================================
// ERROR RECOVERY
// =============================================================================

#[test]
fn test_missing_closing_brace() {
    let parse = parse("damage{amount=5 @Target");
    assert!(!parse.errors.is_empty());
    assert!(
        parse.errors.iter().any(|e| e.message.starts_with("Expected '}'")),
        "{:?}",
        parse.errors
    );
    let mechanic = parse.tree.mechanic.expect("mechanic survives");
    assert_eq!(mechanic.name(), "damage");
    let config = mechanic.config.unwrap();
    assert!(!config.is_closed());
    assert_eq!(config.entries.len(), 1);
    assert_eq!(config.entries[0].key(), "amount");
}

#[test]
fn test_duplicate_targeter_keeps_first() {
    let parse = parse("heal @Target @Self");
    assert_eq!(parse.tree.targeter.unwrap().name(), "Target");
    let duplicates: Vec<_> = parse
        .errors
        .iter()
        .filter(|e| e.message.starts_with("Duplicate targeter"))
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].code, ErrorCode::E0211);
}

#[rstest]
#[case("damage{amount=5", "unclosed block at end")]
#[case("damage{=5}", "missing key")]
#[case("heal @", "targeter without name")]
#[case("heal ~", "trigger without name")]
#[case("heal =", "health modifier without value")]
#[case("heal ) @Self", "stray closer")]
fn test_broken_lines_report_and_keep_mechanic(#[case] input: &str, #[case] desc: &str) {
    let parse = parse(input);
    assert!(!parse.errors.is_empty(), "{desc}: expected errors");
    assert!(parse.tree.mechanic.is_some(), "{desc}: mechanic lost");
    for error in &parse.errors {
        assert!(
            error.range.end() <= TextSize::of(input),
            "{desc}: error outside input {error:?}"
        );
    }
}

#[test]
fn test_lexical_errors_come_first() {
    let parse = parse("heal § @Self @Target");
    assert!(parse.errors.len() >= 2);
    assert!(parse.errors[0].code.as_str().starts_with("E01"));
    assert!(parse.errors.iter().any(|e| e.code == ErrorCode::E0211));
}
