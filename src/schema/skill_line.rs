//! Skill lines embedded in YAML scalars.
//!
//! Pre-validation parses the scalar, reports syntax errors and attaches
//! highlights and color hints. Post-validation parses it again and resolves
//! the names it references against the entity graph:
//!
//! - `skill:<Name>` mechanics
//! - `s`, `skill`, `meta` and `m` keys of the `skill`, `metaskill` and
//!   `meta` mechanics
//! - any `on*` key, e.g. `onTick` or `onHit`
//! - `type`, `t`, `mob` and `m` keys of `summon`, which name mobs
//!
//! Skill-valued entries are parsed again as a skill reference: a name, or an
//! inline skill (`[ - line ... ]`) scanned in inline mode at its absolute
//! offset whose lines are validated like top-level skill lines. A `[` value
//! under any other key is treated as an inline skill too.

use text_size::{TextRange, TextSize};

use crate::hir::{codes, Diagnostic, Entity, EntityId, EntityKind};
use crate::parser::{
    parse_skill_line, parse_skill_reference, scan, ComponentKind, ConfigBlock, InlineSkillExpr,
    MechanicExpr, MlcExpr, MlcValuePart, Parse, ScanMode, SkillLineExpr, SkillReference,
    SyntaxError, TokenKind,
};
use crate::syntax::{SourceFile, YamlScalar};
use crate::workspace::{DocumentCx, HighlightKind};

const SKILL_PREFIX: &str = "skill:";

const SKILL_KEYS: &[&str] = &["skill", "s", "meta", "m"];
const MOB_KEYS: &[&str] = &["type", "mob", "t", "m"];

/// Mechanics whose config names other declarations: the mechanic, the keys
/// holding the name and what they name.
pub const REFERENCE_MECHANICS: &[(&str, &[&str], EntityKind)] = &[
    ("skill", SKILL_KEYS, EntityKind::Skill),
    ("metaskill", SKILL_KEYS, EntityKind::Skill),
    ("meta", SKILL_KEYS, EntityKind::Skill),
    ("summon", MOB_KEYS, EntityKind::Mob),
];

// ============================================================================
// Entry points
// ============================================================================

/// Parse a skill line scalar and report its syntax errors.
pub fn pre_validate(file: &SourceFile, scalar: &YamlScalar, cx: &mut DocumentCx<'_>) -> Vec<Diagnostic> {
    let scan = scan(&scalar.text, scalar.range.start(), ScanMode::SkillLine);
    let parse = parse_skill_line(&scan);
    let mut diagnostics = syntax_diagnostics(&parse.errors, cx);
    highlight_line(file, &parse.tree, cx, &mut diagnostics);
    diagnostics
}

/// Resolve the references of a skill line scalar.
///
/// Resolved references become dependencies of `owner`.
pub fn post_validate(
    file: &SourceFile,
    scalar: &YamlScalar,
    owner: Option<&EntityId>,
    cx: &mut DocumentCx<'_>,
) -> Vec<Diagnostic> {
    let scan = scan(&scalar.text, scalar.range.start(), ScanMode::SkillLine);
    let parse = parse_skill_line(&scan);
    let mut diagnostics = Vec::new();
    resolve_line(file, &parse.tree, owner, cx, &mut diagnostics);
    diagnostics
}

/// Entity kind a config value names, if any.
pub fn reference_kind(owner: ComponentKind, owner_name: &str, key: &str) -> Option<EntityKind> {
    if owner == ComponentKind::Mechanic {
        let named = REFERENCE_MECHANICS.iter().find(|(mechanic, keys, _)| {
            owner_name.eq_ignore_ascii_case(mechanic) && keys.iter().any(|k| key.eq_ignore_ascii_case(k))
        });
        if let Some((_, _, kind)) = named {
            return Some(*kind);
        }
    }
    let on = key.get(..2).is_some_and(|prefix| prefix.eq_ignore_ascii_case("on"));
    (on && key.len() > 2).then_some(EntityKind::Skill)
}

/// The skill an entry's value names or defines inline.
///
/// `None` for values that hold neither: mob references and plain values
/// not starting with `[`.
fn skill_reference(
    file: &SourceFile,
    kind: ComponentKind,
    owner: &str,
    entry: &MlcExpr,
) -> Option<Parse<Option<SkillReference>>> {
    let range = entry.value.trimmed_range();
    let text = file.slice(range);
    match reference_kind(kind, owner, entry.key()) {
        Some(EntityKind::Skill) => {}
        Some(EntityKind::Mob) => return None,
        None if text.starts_with('[') => {}
        None => return None,
    }
    let scan = scan(text, range.start(), ScanMode::InlineSkill);
    Some(parse_skill_reference(&scan))
}

/// Name and range of the skill in a `skill:<Name>` mechanic.
pub fn skill_mechanic_reference(mechanic: &MechanicExpr) -> Option<(String, TextRange)> {
    let name = mechanic.name();
    let prefix = name.get(..SKILL_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(SKILL_PREFIX) || name.len() == SKILL_PREFIX.len() {
        return None;
    }
    let start = mechanic.name.range.start() + TextSize::of(SKILL_PREFIX);
    let range = TextRange::new(start, mechanic.name.range.end());
    Some((name[SKILL_PREFIX.len()..].to_string(), range))
}

fn syntax_diagnostics(errors: &[SyntaxError], cx: &DocumentCx<'_>) -> Vec<Diagnostic> {
    errors
        .iter()
        .map(|error| Diagnostic::from_syntax_error(error, cx.line_index()))
        .collect()
}

// ============================================================================
// Highlighting
// ============================================================================

fn highlight_line(file: &SourceFile, line: &SkillLineExpr, cx: &mut DocumentCx<'_>, diagnostics: &mut Vec<Diagnostic>) {
    if let Some(mechanic) = &line.mechanic {
        match skill_mechanic_reference(mechanic) {
            Some(_) => {
                let prefix = TextRange::at(mechanic.name.range.start(), TextSize::of(SKILL_PREFIX));
                cx.highlight(prefix, HighlightKind::Function);
            }
            None => cx.highlight(mechanic.name.range, HighlightKind::Function),
        }
    }
    if let Some(targeter) = &line.targeter {
        cx.highlight(targeter.at.range.cover(targeter.name.range), HighlightKind::Variable);
    }
    if let Some(trigger) = &line.trigger {
        cx.highlight(trigger.tilde.range.cover(trigger.name.range), HighlightKind::Event);
        if let Some(arg) = &trigger.arg {
            cx.highlight(arg.range, HighlightKind::Parameter);
        }
    }
    for condition in &line.conditions {
        cx.highlight(condition.question.range.cover(condition.name.range), HighlightKind::Macro);
    }
    if let Some(chance) = &line.chance {
        cx.highlight(chance.range, HighlightKind::Number);
    }
    if let Some(health) = &line.health_modifier {
        cx.highlight(health.operator.range, HighlightKind::Operator);
        for value in std::iter::once(&health.min).chain(health.max.as_ref()) {
            let range = match &value.percent {
                Some(percent) => value.number.range.cover(percent.range),
                None => value.number.range,
            };
            cx.highlight(range, HighlightKind::Number);
        }
        if let Some(dash) = &health.dash {
            cx.highlight(dash.range, HighlightKind::Operator);
        }
    }
    for (kind, owner, block) in line.config_blocks() {
        highlight_config(file, kind, &owner, block, cx, diagnostics);
    }
}

fn highlight_config(
    file: &SourceFile,
    kind: ComponentKind,
    owner: &str,
    block: &ConfigBlock,
    cx: &mut DocumentCx<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for entry in &block.entries {
        cx.highlight(entry.key.range, HighlightKind::Property);
        if let Some(reference) = skill_reference(file, kind, owner, entry) {
            if let Some(SkillReference::Inline(inline)) = &reference.tree {
                diagnostics.extend(syntax_diagnostics(&reference.errors, cx));
                highlight_inline(file, inline, cx, diagnostics);
            }
            continue;
        }
        if reference_kind(kind, owner, entry.key()).is_some() {
            continue;
        }
        let range = entry.value.trimmed_range();
        for part in &entry.value.parts {
            match part {
                MlcValuePart::Literal(tokens) => {
                    for token in tokens.iter().filter(|t| t.kind != TokenKind::Space) {
                        let kind = match token.kind {
                            TokenKind::Number => HighlightKind::Number,
                            _ => HighlightKind::String,
                        };
                        cx.highlight(token.range, kind);
                    }
                }
                MlcValuePart::Placeholder(placeholder) => {
                    cx.highlight(placeholder.range, HighlightKind::Parameter);
                }
            }
        }
        add_colors(file, range, cx);
    }
}

/// Color hints for every `#RRGGBB` literal in `range`.
fn add_colors(file: &SourceFile, range: TextRange, cx: &mut DocumentCx<'_>) {
    let text = file.slice(range);
    let bytes = text.as_bytes();
    let mut i = 0;
    while let Some(found) = text[i..].find('#') {
        let start = i + found;
        let end = start + 7;
        let whole = bytes.get(start + 1..end).is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
            && !bytes.get(end).is_some_and(u8::is_ascii_alphanumeric);
        if whole {
            let literal = TextRange::new(
                range.start() + TextSize::new(start as u32),
                range.start() + TextSize::new(end as u32),
            );
            cx.color(literal, &text[start..end]);
            i = end;
        } else {
            i = start + 1;
        }
    }
}

fn highlight_inline(
    file: &SourceFile,
    inline: &InlineSkillExpr,
    cx: &mut DocumentCx<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for comment in &inline.comments {
        cx.highlight(comment.range, HighlightKind::Comment);
    }
    for line in &inline.lines {
        cx.highlight(line.dash.range, HighlightKind::Operator);
        highlight_line(file, &line.line, cx, diagnostics);
    }
}

// ============================================================================
// Reference resolution
// ============================================================================

fn resolve_line(
    file: &SourceFile,
    line: &SkillLineExpr,
    owner: Option<&EntityId>,
    cx: &mut DocumentCx<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if let Some((name, range)) = line.mechanic.as_ref().and_then(skill_mechanic_reference) {
        diagnostics.extend(resolve(EntityKind::Skill, &name, range, owner, cx));
    }
    for (kind, owner_name, block) in line.config_blocks() {
        for entry in &block.entries {
            match skill_reference(file, kind, &owner_name, entry).and_then(|parse| parse.tree) {
                Some(SkillReference::Name(name)) => {
                    let text = name.text();
                    if !text.contains('<') {
                        diagnostics.extend(resolve(EntityKind::Skill, &text, name.range, owner, cx));
                    }
                }
                Some(SkillReference::Inline(inline)) => {
                    for line in &inline.lines {
                        resolve_line(file, &line.line, owner, cx, diagnostics);
                    }
                }
                None if reference_kind(kind, &owner_name, entry.key()) == Some(EntityKind::Mob) => {
                    let range = entry.value.trimmed_range();
                    let text = file.slice(range);
                    if text.is_empty() || text.contains('<') || is_vanilla_mob(EntityKind::Mob, text) {
                        continue;
                    }
                    diagnostics.extend(resolve(EntityKind::Mob, text, range, owner, cx));
                }
                None => {}
            }
        }
    }
}

/// Upper-case summon types such as `ZOMBIE` name vanilla entities.
fn is_vanilla_mob(kind: EntityKind, name: &str) -> bool {
    kind == EntityKind::Mob
        && name
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b == b'_' || b.is_ascii_digit())
}

fn resolve(
    kind: EntityKind,
    name: &str,
    range: TextRange,
    owner: Option<&EntityId>,
    cx: &mut DocumentCx<'_>,
) -> Option<Diagnostic> {
    let Some(target) = cx.lookup(kind, name) else {
        cx.note_unresolved(kind, name);
        let (message, code) = match kind {
            EntityKind::Skill => (format!("Unknown metaskill '{name}'"), codes::UNKNOWN_SKILL),
            EntityKind::Mob => (format!("Unknown mob '{name}'"), codes::UNKNOWN_MOB),
        };
        return Some(Diagnostic::error(cx.range(range), message).with_code(code));
    };
    cx.link(range, target.id.document.clone(), target.id.range);
    cx.hover(range, reference_hover(&target));
    cx.highlight(
        range,
        match kind {
            EntityKind::Skill => HighlightKind::Function,
            EntityKind::Mob => HighlightKind::Class,
        },
    );
    if let Some(owner) = owner {
        cx.add_dependency(owner, &target.id);
    }
    None
}

/// Hover for a resolved reference: description and declaration source.
pub fn reference_hover(target: &Entity) -> String {
    let title = match target.kind {
        EntityKind::Skill => "Skill",
        EntityKind::Mob => "Mob",
    };
    let mut contents = format!("# {title}: `{}`\n\n", target.name);
    if !target.description.is_empty() {
        contents.push_str(&target.description);
        contents.push_str("\n\n");
    }
    contents.push_str("```yaml\n");
    contents.push_str(&target.source);
    contents.push_str("\n```");
    contents
}
