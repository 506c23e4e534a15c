//! Skill files: a map of skill name to skill body.

use super::{
    body_map, check_number, declare_entries, declared_entries, post_validate_skill_list,
    pre_validate_skill_list, wrong_shape, Schema,
};
use crate::hir::{Diagnostic, EntityKind};
use crate::syntax::{SourceFile, YamlNode};
use crate::workspace::DocumentCx;

/// Schema for files declaring metaskills.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkillSchema;

fn declaration_hover(name: &str, description: &str) -> String {
    let mut hover = format!("# Skill: `{name}`");
    if !description.is_empty() {
        hover.push_str("\n\n");
        hover.push_str(description);
    }
    hover
}

impl Schema for SkillSchema {
    fn name(&self) -> &'static str {
        "skills"
    }

    fn pre_validate(&self, file: &SourceFile, root: &YamlNode, cx: &mut DocumentCx<'_>) -> Vec<Diagnostic> {
        let Some(map) = root.as_map() else {
            return vec![wrong_shape(root, "map of skills", cx)];
        };
        let mut diagnostics = Vec::new();
        let declared = declare_entries(file, map, EntityKind::Skill, declaration_hover, cx, &mut diagnostics);
        for (entry, _) in declared {
            let Some(body) = body_map(entry, cx, &mut diagnostics) else {
                continue;
            };
            for field in &body.entries {
                match field.key.as_str().to_ascii_lowercase().as_str() {
                    "cooldown" => diagnostics.extend(check_number(field, 0.0, None, cx)),
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
