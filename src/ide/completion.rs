//! Completion suggestions implementation.
//!
//! The skill line under the cursor is re-scanned and run through the
//! parser in completion mode; the returned context decides what to offer.
//! A cursor inside a `[ - ... ]` mlc value completes the inline skill
//! instead, at any nesting depth.

use std::sync::Arc;

use text_size::{TextRange, TextSize};

use crate::base::{DocumentUri, Position, Range};
use crate::hir::EntityKind;
use crate::parser::{
    complete_inline_skill, complete_skill_line, parse_inline_skill, parse_skill_line, scan,
    CompletionContext, CompletionKind, CompletionOutcome, ComponentKind, ScanMode, SkillLineExpr,
};
use crate::schema::skill_line::{reference_kind, REFERENCE_MECHANICS};
use crate::syntax::{SourceFile, YamlNode, YamlScalar};
use crate::workspace::AnalysisHost;

/// Kind of completion item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionItemKind {
    Skill,
    Mob,
    Keyword,
    Property,
}

impl CompletionItemKind {
    /// Convert to LSP completion item kind number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            CompletionItemKind::Skill => 3,     // Function
            CompletionItemKind::Mob => 7,       // Class
            CompletionItemKind::Keyword => 14,  // Keyword
            CompletionItemKind::Property => 10, // Property
        }
    }
}

/// A completion suggestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionItem {
    /// The text to insert.
    pub label: Arc<str>,
    pub kind: CompletionItemKind,
    /// Detail text (shown after label).
    pub detail: Option<Arc<str>>,
    /// Documentation (shown in popup).
    pub documentation: Option<Arc<str>>,
    /// Sort priority (lower = higher priority).
    pub sort_priority: u32,
}

impl CompletionItem {
    pub fn new(label: impl Into<Arc<str>>, kind: CompletionItemKind) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            documentation: None,
            sort_priority: 100,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<Arc<str>>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_documentation(mut self, doc: impl Into<Arc<str>>) -> Self {
        self.documentation = Some(doc.into());
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.sort_priority = priority;
        self
    }
}

/// Completions plus the range a chosen item replaces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionList {
    pub range: Range,
    pub context: CompletionKind,
    pub items: Vec<CompletionItem>,
}

/// Completions for the skill line under `position`.
///
/// `None` when the cursor is not inside a skill line or past every point
/// where the grammar makes a decision.
pub fn completions(host: &AnalysisHost, uri: &DocumentUri, position: Position) -> Option<CompletionList> {
    let document = host.document(uri)?;
    let offset = document.line_index().offset(position);
    let file = document.file();
    let scalar = skill_line_at(file.root()?, offset)?;
    let CompletionOutcome::Completions(context) = complete_scalar(file, scalar, offset) else {
        return None;
    };
    let mut items = candidates(host, &context);
    let prefix = context.prefix.to_ascii_lowercase();
    items.retain(|item| item.label.to_ascii_lowercase().starts_with(&prefix));
    items.sort_by(|a, b| a.sort_priority.cmp(&b.sort_priority).then_with(|| a.label.cmp(&b.label)));
    items.dedup_by(|a, b| a.label == b.label);
    tracing::trace!(uri = %uri, context = ?context.kind, items = items.len(), "completions");
    Some(CompletionList {
        range: document.line_index().range(context.range),
        context: context.kind,
        items,
    })
}

fn candidates(host: &AnalysisHost, context: &CompletionContext) -> Vec<CompletionItem> {
    match &context.kind {
        CompletionKind::MechanicName => {
            let mut items: Vec<CompletionItem> = REFERENCE_MECHANICS
                .iter()
                .map(|(name, ..)| CompletionItem::new(*name, CompletionItemKind::Keyword).with_priority(50))
                .collect();
            items.extend(entity_items(host, EntityKind::Skill, "skill:"));
            items
        }
        CompletionKind::MlcKey { owner } if owner.kind == ComponentKind::Mechanic => REFERENCE_MECHANICS
            .iter()
            .filter(|(name, ..)| owner.name.eq_ignore_ascii_case(name))
            .flat_map(|(_, keys, _)| keys.iter())
            .map(|key| CompletionItem::new(*key, CompletionItemKind::Property))
            .collect(),
        CompletionKind::MlcValue { owner, key } => match reference_kind(owner.kind, &owner.name, key) {
            Some(kind) => entity_items(host, kind, ""),
            None => Vec::new(),
        },
        CompletionKind::NextComponent => [("@", "targeter"), ("~", "trigger"), ("?", "condition")]
            .into_iter()
            .map(|(label, detail)| CompletionItem::new(label, CompletionItemKind::Keyword).with_detail(detail))
            .collect(),
        _ => Vec::new(),
    }
}

fn entity_items(host: &AnalysisHost, kind: EntityKind, prefix: &str) -> Vec<CompletionItem> {
    let item_kind = match kind {
        EntityKind::Skill => CompletionItemKind::Skill,
        EntityKind::Mob => CompletionItemKind::Mob,
    };
    host.graph()
        .all(kind)
        .map(|entity| {
            let item = CompletionItem::new(format!("{prefix}{}", entity.name), item_kind)
                .with_detail(entity.kind.display());
            if entity.description.is_empty() {
                item
            } else {
                item.with_documentation(entity.description.as_str())
            }
        })
        .collect()
}

fn complete_scalar(file: &SourceFile, scalar: &YamlScalar, offset: TextSize) -> CompletionOutcome {
    let scan = scan(&scalar.text, scalar.range.start(), ScanMode::SkillLine);
    let line = parse_skill_line(&scan).tree;
    match inline_value_at(file, &line, offset) {
        Some(range) => complete_inline(file, range, offset),
        None => complete_skill_line(&scan, offset),
    }
}

/// Complete inside the inline skill at `range`, descending into a nested
/// inline skill when the cursor is inside one of its lines' values.
fn complete_inline(file: &SourceFile, range: TextRange, offset: TextSize) -> CompletionOutcome {
    let scan = scan(file.slice(range), range.start(), ScanMode::InlineSkill);
    if let Some(inline) = parse_inline_skill(&scan).tree {
        let nested = inline
            .lines
            .iter()
            .find_map(|line| inline_value_at(file, &line.line, offset));
        if let Some(nested) = nested {
            return complete_inline(file, nested, offset);
        }
    }
    complete_inline_skill(&scan, offset)
}

/// Range of the `[`-prefixed mlc value of `line` the cursor is inside.
fn inline_value_at(file: &SourceFile, line: &SkillLineExpr, offset: TextSize) -> Option<TextRange> {
    line.config_blocks()
        .into_iter()
        .flat_map(|(_, _, block)| block.entries.iter())
        .map(|entry| entry.value.trimmed_range())
        .find(|range| {
            let text = file.slice(*range);
            let closed = text.ends_with(']');
            text.starts_with('[')
                && range.start() < offset
                && (offset < range.end() || (!closed && offset == range.end()))
        })
}

/// The `Skills:` list item containing `offset`, at any depth.
fn skill_line_at(node: &YamlNode, offset: TextSize) -> Option<&YamlScalar> {
    let map = node.as_map()?;
    map.entries.iter().find_map(|entry| {
        let value = entry.value.as_ref()?;
        if !value.range().contains_inclusive(offset) {
            return None;
        }
        if entry.key.as_str().eq_ignore_ascii_case("skills") {
            if let Some(list) = value.as_seq() {
                return list
                    .items
                    .iter()
                    .filter_map(YamlNode::as_scalar)
                    .find(|scalar| scalar.range.contains_inclusive(offset));
            }
        }
        skill_line_at(value, offset)
    })
}
