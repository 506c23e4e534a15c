//! Mob files: a map of mob name to mob body.

use text_size::{TextRange, TextSize};

use super::{
    body_map, check_number, check_string, damage_types, declare_entries, declared_entries,
    post_validate_skill_list, pre_validate_skill_list, wrong_shape, Schema,
};
use crate::hir::{codes, Diagnostic, EntityKind};
use crate::syntax::{SourceFile, YamlEntry, YamlNode, YamlScalar};
use crate::workspace::{DocumentCx, HighlightKind};

/// Highest armor value a mob can have.
const MAX_ARMOR: f64 = 30.0;

/// Schema for files declaring mobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MobSchema;

fn declaration_hover(name: &str, description: &str) -> String {
    let mut hover = format!("# MythicMob: `{name}`");
    if !description.is_empty() {
        hover.push_str("\n\n");
        hover.push_str(description);
    }
    hover
}

impl Schema for MobSchema {
    fn name(&self) -> &'static str {
        "mobs"
    }

    fn pre_validate(&self, file: &SourceFile, root: &YamlNode, cx: &mut DocumentCx<'_>) -> Vec<Diagnostic> {
        let Some(map) = root.as_map() else {
            return vec![wrong_shape(root, "map of mobs", cx)];
        };
        let mut diagnostics = Vec::new();
        let declared = declare_entries(file, map, EntityKind::Mob, declaration_hover, cx, &mut diagnostics);
        for (entry, _) in declared {
            let Some(body) = body_map(entry, cx, &mut diagnostics) else {
                continue;
            };
            for field in &body.entries {
                match field.key.as_str().to_ascii_lowercase().as_str() {
                    "type" | "display" | "faction" => diagnostics.extend(check_string(field, cx)),
                    "health" | "damage" => diagnostics.extend(check_number(field, 0.0, None, cx)),
                    "armor" => diagnostics.extend(check_number(field, 0.0, Some(MAX_ARMOR), cx)),
                    "damagemodifiers" => damage_modifiers(field, cx, &mut diagnostics),
                    "skills" => pre_validate_skill_list(file, field, cx, &mut diagnostics),
                    _ => {}
                }
            }
        }
        diagnostics
    }

    fn post_validate(&self, file: &SourceFile, root: &YamlNode, cx: &mut DocumentCx<'_>) -> Vec<Diagnostic> {
        let Some(map) = root.as_map() else {
            return Vec::new();
        };
        let mut diagnostics = Vec::new();
        for (entry, owner) in declared_entries(map, cx) {
            let Some(body) = entry.value.as_ref().and_then(YamlNode::as_map) else {
                continue;
            };
            if let Some(skills) = body.get("Skills") {
                post_validate_skill_list(file, skills, &owner, cx, &mut diagnostics);
            }
        }
        diagnostics
    }
}

fn damage_modifiers(entry: &YamlEntry, cx: &mut DocumentCx<'_>, diagnostics: &mut Vec<Diagnostic>) {
    let Some(value) = entry.value.as_ref() else {
        return;
    };
    let Some(list) = value.as_seq() else {
        diagnostics.push(wrong_shape(value, "list", cx));
        return;
    };
    for item in &list.items {
        match item.as_scalar() {
            Some(scalar) => diagnostics.extend(damage_modifier(scalar, cx)),
            None => diagnostics.push(wrong_shape(item, "damage modifier", cx)),
        }
    }
}

/// `"<TYPE> <number>"`. Unknown types are allowed but not highlighted.
fn damage_modifier(scalar: &YamlScalar, cx: &mut DocumentCx<'_>) -> Option<Diagnostic> {
    let text = scalar.as_str();
    let start = scalar.range.start();
    let (modifier, rest) = match text.split_once(' ') {
        Some((modifier, rest)) => (modifier, Some(rest)),
        None => (text, None),
    };
    let modifier_range = TextRange::at(start, TextSize::of(modifier));
    if let Some(description) = damage_types::describe(modifier) {
        cx.highlight(modifier_range, HighlightKind::EnumMember);
        cx.hover(
            modifier_range,
            format!("# Damage type: `{}`\n\n{description}", modifier.to_ascii_uppercase()),
        );
    }

    let Some(rest) = rest.filter(|r| !r.trim().is_empty()) else {
        return Some(
            Diagnostic::error(cx.range(scalar.range), "Missing a value for the damage modifier!")
                .with_code(codes::MISSING_VALUE),
        );
    };
    let rest_range = TextRange::new(modifier_range.end() + TextSize::new(1), scalar.range.end());
    if rest.trim().parse::<f64>().is_err() {
        return Some(
            Diagnostic::error(cx.range(rest_range), "Invalid value. Must be a number.")
                .with_code(codes::NOT_A_NUMBER),
        );
    }
    cx.highlight(rest_range, HighlightKind::Number);
    None
}
