//! Structural schemas for skill and mob files.
//!
//! A document is associated with at most one [`Schema`] by matching its URI
//! path against glob patterns. The scheduler calls the schema twice per
//! parse:
//!
//! ```text
//! pre_validate   shape checks, entity registration, skill line syntax
//!     │          (only looks at the document itself)
//!     ▼
//! post_validate  reference resolution against the entity graph
//!                (sees every name registered in the batch)
//! ```
//!
//! Skill line scalars are handed to [`skill_line`], which runs the parser
//! and writes hovers, highlights and links back through the
//! [`DocumentCx`].

pub mod damage_types;
mod mobs;
pub mod skill_line;
mod skills;

use std::fmt;
use std::sync::Arc;

use globset::{Glob, GlobSet, GlobSetBuilder};
use rustc_hash::FxHashSet;

use crate::base::DocumentUri;
use crate::error::{Error, Result};
use crate::hir::{codes, Diagnostic, Entity, EntityId, EntityKind};
use crate::project::SchemaConfig;
use crate::syntax::{ScalarValue, SourceFile, YamlEntry, YamlMap, YamlNode};
use crate::workspace::{DocumentCx, HighlightKind};

pub use mobs::MobSchema;
pub use skills::SkillSchema;

// ============================================================================
// Schema trait
// ============================================================================

/// Validator for one kind of document.
pub trait Schema: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Local validation. Registers the entities the document declares.
    fn pre_validate(&self, file: &SourceFile, root: &YamlNode, cx: &mut DocumentCx<'_>) -> Vec<Diagnostic>;

    /// Cross-document validation, after every queued document was
    /// pre-validated.
    fn post_validate(&self, file: &SourceFile, root: &YamlNode, cx: &mut DocumentCx<'_>) -> Vec<Diagnostic>;
}

// ============================================================================
// Registry
// ============================================================================

struct SchemaEntry {
    patterns: GlobSet,
    schema: Arc<dyn Schema>,
}

/// Ordered URI-pattern to schema associations. The last matching entry
/// wins.
#[derive(Default)]
pub struct SchemaRegistry {
    entries: Vec<SchemaEntry>,
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| e.schema.name()))
            .finish()
    }
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skill and mob schemas with the default patterns.
    pub fn builtin() -> Self {
        Self::from_config(&SchemaConfig::default()).unwrap_or_else(|error| {
            tracing::warn!(%error, "default schema patterns rejected");
            Self::new()
        })
    }

    /// # Errors
    ///
    /// Returns `Error::InvalidGlob` if a pattern does not compile.
    pub fn from_config(config: &SchemaConfig) -> Result<Self> {
        let mut registry = Self::new();
        registry.register(&config.skills, Arc::new(SkillSchema))?;
        registry.register(&config.mobs, Arc::new(MobSchema))?;
        Ok(registry)
    }

    /// # Errors
    ///
    /// Returns `Error::InvalidGlob` if a pattern does not compile.
    pub fn register(&mut self, patterns: &[String], schema: Arc<dyn Schema>) -> Result<()> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|source| Error::InvalidGlob {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let patterns = builder.build().map_err(|source| Error::InvalidGlob {
            pattern: patterns.join(", "),
            source,
        })?;
        self.entries.push(SchemaEntry { patterns, schema });
        Ok(())
    }

    pub fn schema_for(&self, uri: &DocumentUri) -> Option<Arc<dyn Schema>> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.patterns.is_match(uri.path()))
            .map(|entry| Arc::clone(&entry.schema))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Shared validation helpers
// ============================================================================

/// Register every top-level key of `map` as an entity.
///
/// Repeated keys are reported and skipped. Returns the declared entries
/// with their ids.
fn declare_entries<'m>(
    file: &SourceFile,
    map: &'m YamlMap,
    kind: EntityKind,
    hover: impl Fn(&str, &str) -> String,
    cx: &mut DocumentCx<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<(&'m YamlEntry, EntityId)> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut declared = Vec::new();
    for entry in &map.entries {
        let name = entry.key.as_str();
        if !seen.insert(name) {
            diagnostics.push(
                Diagnostic::error(cx.range(entry.key.raw_range), format!("Duplicate key {name}!"))
                    .with_code(codes::DUPLICATE_KEY),
            );
            continue;
        }
        let id = EntityId::new(cx.uri().clone(), cx.range(entry.key.raw_range));
        let description = file.description_above(entry.key.raw_range.start());
        let entity = Entity::new(id, kind, name)
            .with_description(description.clone())
            .with_source(file.slice(entry.range));
        let id = cx.register(entity);
        cx.hover(entry.key.raw_range, hover(name, &description));
        cx.highlight(
            entry.key.raw_range,
            match kind {
                EntityKind::Skill => HighlightKind::Function,
                EntityKind::Mob => HighlightKind::Class,
            },
        );
        declared.push((entry, id));
    }
    declared
}

/// First entry of every key with the id it was registered under.
fn declared_entries<'m>(map: &'m YamlMap, cx: &DocumentCx<'_>) -> Vec<(&'m YamlEntry, EntityId)> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    map.entries
        .iter()
        .filter(|entry| seen.insert(entry.key.as_str()))
        .filter_map(|entry| {
            let id = EntityId::new(cx.uri().clone(), cx.range(entry.key.raw_range));
            cx.graph().contains(&id).then_some((entry, id))
        })
        .collect()
}

/// Body of a declaration as a map. `None` when empty.
fn body_map<'n>(entry: &'n YamlEntry, cx: &DocumentCx<'_>, diagnostics: &mut Vec<Diagnostic>) -> Option<&'n YamlMap> {
    let value = entry.value.as_ref()?;
    match value {
        YamlNode::Map(map) => Some(map),
        other => {
            diagnostics.push(wrong_shape(other, "map", cx));
            None
        }
    }
}

fn wrong_shape(node: &YamlNode, expected: &str, cx: &DocumentCx<'_>) -> Diagnostic {
    Diagnostic::error(
        cx.range(node.range()),
        format!("Expected a {expected}, found a {}!", node.shape()),
    )
    .with_code(codes::WRONG_SHAPE)
}

fn highlight_key(entry: &YamlEntry, cx: &mut DocumentCx<'_>) {
    if cx.highlight_yaml() {
        cx.highlight(entry.key.raw_range, HighlightKind::Property);
    }
}

/// A scalar that must be a number within `min..=max`.
fn check_number(entry: &YamlEntry, min: f64, max: Option<f64>, cx: &mut DocumentCx<'_>) -> Option<Diagnostic> {
    highlight_key(entry, cx);
    let value = entry.value.as_ref()?;
    let Some(scalar) = value.as_scalar() else {
        return Some(wrong_shape(value, "number", cx));
    };
    let range = cx.range(scalar.raw_range);
    let Some(number) = scalar.as_number() else {
        return Some(
            Diagnostic::error(range, format!("Expected a number, found `{}`!", scalar.as_str()))
                .with_code(codes::NOT_A_NUMBER),
        );
    };
    let message = match max {
        Some(max) if number < min || number > max => Some(format!("Number must be between {min} and {max}!")),
        None if number < min => Some(format!("Number must be at least {min}!")),
        _ => None,
    };
    if let Some(message) = message {
        return Some(Diagnostic::error(range, message).with_code(codes::OUT_OF_RANGE));
    }
    if cx.highlight_yaml() {
        cx.highlight(scalar.raw_range, HighlightKind::Number);
    }
    None
}

/// A scalar that must be text.
fn check_string(entry: &YamlEntry, cx: &mut DocumentCx<'_>) -> Option<Diagnostic> {
    highlight_key(entry, cx);
    let value = entry.value.as_ref()?;
    let Some(scalar) = value.as_scalar() else {
        return Some(wrong_shape(value, "string", cx));
    };
    if cx.highlight_yaml() {
        let kind = match scalar.value() {
            ScalarValue::Number(_) => HighlightKind::Number,
            ScalarValue::Bool(_) | ScalarValue::Null => HighlightKind::Keyword,
            ScalarValue::String => HighlightKind::String,
        };
        cx.highlight(scalar.raw_range, kind);
    }
    None
}

/// Pre-validate a `Skills:` list.
fn pre_validate_skill_list(file: &SourceFile, entry: &YamlEntry, cx: &mut DocumentCx<'_>, diagnostics: &mut Vec<Diagnostic>) {
    highlight_key(entry, cx);
    let Some(value) = entry.value.as_ref() else {
        return;
    };
    let Some(list) = value.as_seq() else {
        diagnostics.push(wrong_shape(value, "list", cx));
        return;
    };
    for item in &list.items {
        match item.as_scalar() {
            Some(scalar) => diagnostics.extend(skill_line::pre_validate(file, scalar, cx)),
            None => diagnostics.push(wrong_shape(item, "skill line", cx)),
        }
    }
}

/// Resolve references of a `Skills:` list on behalf of `owner`.
fn post_validate_skill_list(
    file: &SourceFile,
    entry: &YamlEntry,
    owner: &EntityId,
    cx: &mut DocumentCx<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(list) = entry.value.as_ref().and_then(YamlNode::as_seq) else {
        return;
    };
    for scalar in list.items.iter().filter_map(YamlNode::as_scalar) {
        diagnostics.extend(skill_line::post_validate(file, scalar, Some(owner), cx));
    }
}
