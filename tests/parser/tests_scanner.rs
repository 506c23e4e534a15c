//! Scanner tests.

use mythic::parser::{scan, ScanMode, TokenKind};
use mythic::TextSize;
use rstest::rstest;

// =============================================================================
// TERMINATION AND EOF
// =============================================================================

#[rstest]
#[case("", "empty input")]
#[case("heal", "single identifier")]
#[case("damage{amount=5} @Target ~onDamaged ?enemy 0.5 <50%", "full line")]
#[case("\"unterminated", "unterminated string")]
#[case("§§§ ¤", "unscannable characters")]
#[case("a{b=[ - c{d=<e.f>} ]}", "nested blocks")]
#[case("   \t  ", "only whitespace")]
#[case("}}}]]]", "only closers")]
fn test_scan_ends_with_single_eof(#[case] input: &str, #[case] desc: &str) {
    for mode in [ScanMode::SkillLine, ScanMode::InlineSkill] {
        let result = scan(input, TextSize::new(0), mode);
        let eofs = result
            .tokens()
            .iter()
            .filter(|t| t.kind == TokenKind::Eof)
            .count();
        assert_eq!(eofs, 1, "{desc}: expected one Eof in {mode:?}");
        assert_eq!(
            result.tokens().last().map(|t| t.kind),
            Some(TokenKind::Eof),
            "{desc}: Eof must be last"
        );
    }
}

#[test]
fn test_tokens_are_contiguous_and_absolute() {
    let source = "damage{amount=5} @Target";
    let result = scan(source, TextSize::new(100), ScanMode::SkillLine);
    let mut expected = TextSize::new(100);
    for token in result.tokens() {
        assert_eq!(token.range.start(), expected, "gap before {token:?}");
        expected = token.range.end();
    }
    assert_eq!(expected, TextSize::new(100) + TextSize::of(source));
}

#[test]
fn test_unknown_character_is_reported_and_skipped() {
    let result = scan("heal § @Self", TextSize::new(0), ScanMode::SkillLine);
    assert!(result.has_errors());
    assert!(result.tokens().iter().any(|t| t.kind == TokenKind::Unknown));
    assert!(result.tokens().iter().any(|t| t.kind == TokenKind::At));
}

#[test]
fn test_inline_mode_separates_comments() {
    let source = "[\n  # first\n  - heal\n]";
    let result = scan(source, TextSize::new(0), ScanMode::InlineSkill);
    assert_eq!(result.comments().len(), 1);
    assert_eq!(result.comments()[0].lexeme, "# first");
    assert!(result.tokens().iter().all(|t| t.kind != TokenKind::Comment));

    let plain = scan("# first", TextSize::new(0), ScanMode::SkillLine);
    assert!(plain.comments().is_empty());
    assert_eq!(plain.tokens()[0].kind, TokenKind::Hash);
}
