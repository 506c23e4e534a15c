//! Completion mode tests.

use mythic::parser::{
    complete_inline_skill, complete_skill_line, scan, CompletionKind, CompletionOutcome,
    ComponentKind, ScanMode,
};
use mythic::TextSize;
use rstest::rstest;

fn complete_at_end(source: &str) -> CompletionOutcome {
    let result = scan(source, TextSize::new(0), ScanMode::SkillLine);
    complete_skill_line(&result, TextSize::of(source))
}

fn context_kind(outcome: CompletionOutcome) -> CompletionKind {
    match outcome {
        CompletionOutcome::Completions(context) => context.kind,
        CompletionOutcome::Finished => panic!("expected completions"),
    }
}

#[rstest]
#[case("", CompletionKind::MechanicName)]
#[case("hea", CompletionKind::MechanicName)]
#[case("heal @", CompletionKind::TargeterName)]
#[case("heal @Tar", CompletionKind::TargeterName)]
#[case("heal ~on", CompletionKind::TriggerName)]
#[case("heal ?", CompletionKind::ConditionName)]
#[case("heal ", CompletionKind::NextComponent)]
fn test_context_at_end(#[case] source: &str, #[case] expected: CompletionKind) {
    assert_eq!(context_kind(complete_at_end(source)), expected, "{source:?}");
}

#[test]
fn test_prefix_and_range() {
    let CompletionOutcome::Completions(context) = complete_at_end("heal @Tar") else {
        panic!("expected completions");
    };
    assert_eq!(context.prefix, "Tar");
    assert_eq!(context.range.start(), TextSize::new(6));
}

#[test]
fn test_mlc_value_names_owner_and_key() {
    let kind = context_kind(complete_at_end("skill{s="));
    let CompletionKind::MlcValue { owner, key } = kind else {
        panic!("unexpected {kind:?}");
    };
    assert_eq!(owner.kind, ComponentKind::Mechanic);
    assert_eq!(owner.name, "skill");
    assert_eq!(key, "s");
}

#[test]
fn test_cursor_in_middle_of_line() {
    let source = "damage{amount=5} @Target";
    let result = scan(source, TextSize::new(0), ScanMode::SkillLine);
    let outcome = complete_skill_line(&result, TextSize::new(3));
    let CompletionOutcome::Completions(context) = outcome else {
        panic!("expected completions");
    };
    assert_eq!(context.kind, CompletionKind::MechanicName);
    assert_eq!(context.prefix, "dam");
}

#[test]
fn test_inline_skill_completion() {
    let source = "[ - heal @";
    let result = scan(source, TextSize::new(0), ScanMode::InlineSkill);
    let outcome = complete_inline_skill(&result, TextSize::of(source));
    assert_eq!(context_kind(outcome), CompletionKind::TargeterName);
}
