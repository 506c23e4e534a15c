//! One YAML document and everything derived from it.
//!
//! A [`Document`] is never patched: every parse pass clears the derived
//! artifacts and rebuilds them from the current [`SourceFile`].

use std::fmt;
use std::sync::Arc;

use text_size::TextRange;

use crate::base::{DocumentUri, LineIndex, Position, Range};
use crate::hir::{Diagnostic, EntityId};
use crate::syntax::SourceFile;

// ============================================================================
// Derived artifacts
// ============================================================================

/// Semantic highlight category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    Class,
    Function,
    Method,
    EnumMember,
    Property,
    Parameter,
    Variable,
    Keyword,
    Number,
    String,
    Operator,
    Comment,
    Macro,
    Event,
}

impl HighlightKind {
    /// Every kind in legend order.
    pub const ALL: [HighlightKind; 14] = [
        HighlightKind::Class,
        HighlightKind::Function,
        HighlightKind::Method,
        HighlightKind::EnumMember,
        HighlightKind::Property,
        HighlightKind::Parameter,
        HighlightKind::Variable,
        HighlightKind::Keyword,
        HighlightKind::Number,
        HighlightKind::String,
        HighlightKind::Operator,
        HighlightKind::Comment,
        HighlightKind::Macro,
        HighlightKind::Event,
    ];

    /// Convert to LSP token type index (position in [`Self::ALL`]).
    pub fn to_lsp_index(self) -> u32 {
        Self::ALL.iter().position(|k| *k == self).unwrap_or_default() as u32
    }

    /// LSP token type name.
    pub fn as_str(self) -> &'static str {
        match self {
            HighlightKind::Class => "class",
            HighlightKind::Function => "function",
            HighlightKind::Method => "method",
            HighlightKind::EnumMember => "enumMember",
            HighlightKind::Property => "property",
            HighlightKind::Parameter => "parameter",
            HighlightKind::Variable => "variable",
            HighlightKind::Keyword => "keyword",
            HighlightKind::Number => "number",
            HighlightKind::String => "string",
            HighlightKind::Operator => "operator",
            HighlightKind::Comment => "comment",
            HighlightKind::Macro => "macro",
            HighlightKind::Event => "event",
        }
    }
}

/// A highlight, always confined to one line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Highlight {
    pub range: Range,
    pub kind: HighlightKind,
}

/// Markdown hover content for a range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hover {
    pub range: Range,
    pub contents: String,
}

/// A `#RRGGBB` literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorHint {
    pub range: Range,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl ColorHint {
    /// Parse `#RRGGBB`.
    pub fn parse(range: Range, text: &str) -> Option<Self> {
        let hex = text.strip_prefix('#')?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self {
            range,
            red: channel(0)?,
            green: channel(2)?,
            blue: channel(4)?,
        })
    }
}

/// A navigation edge from a range in one document to a range in another.
///
/// Stored on the source document as a definition link and mirrored on the
/// target document as a reference link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeLink {
    pub from_range: Range,
    pub target_range: Range,
    pub target_document: DocumentUri,
}

impl RangeLink {
    pub fn new(from_range: Range, target_document: DocumentUri, target_range: Range) -> Self {
        Self {
            from_range,
            target_range,
            target_document,
        }
    }

    /// The same edge seen from the target.
    pub fn mirror(&self, source: &DocumentUri) -> Self {
        Self {
            from_range: self.target_range,
            target_range: self.from_range,
            target_document: source.clone(),
        }
    }
}

/// Where a document is in the two-phase protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ParseState {
    #[default]
    Fresh,
    PreParsed,
    PostParsed,
}

/// Artifact counts for one document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DocumentStats {
    pub lines: usize,
    pub diagnostics: usize,
    pub hovers: usize,
    pub highlights: usize,
    pub colors: usize,
    pub definitions: usize,
    pub references: usize,
    pub entities: usize,
}

impl fmt::Display for DocumentStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "lines: {}", self.lines)?;
        writeln!(f, "diagnostics: {}", self.diagnostics)?;
        writeln!(f, "hovers: {}", self.hovers)?;
        writeln!(f, "highlights: {}", self.highlights)?;
        writeln!(f, "colors: {}", self.colors)?;
        writeln!(f, "definitions: {}", self.definitions)?;
        writeln!(f, "references: {}", self.references)?;
        write!(f, "entities: {}", self.entities)
    }
}

// ============================================================================
// Document
// ============================================================================

#[derive(Clone, Debug)]
pub struct Document {
    uri: DocumentUri,
    version: u64,
    file: Arc<SourceFile>,
    state: ParseState,
    diagnostics: Vec<Diagnostic>,
    hovers: Vec<Hover>,
    highlights: Vec<Highlight>,
    colors: Vec<ColorHint>,
    definitions: Vec<RangeLink>,
    pub(super) references: Vec<RangeLink>,
    entities: Vec<EntityId>,
}

impl Document {
    pub fn new(uri: DocumentUri, text: impl Into<String>) -> Self {
        Self {
            uri,
            version: 0,
            file: Arc::new(SourceFile::parse(text)),
            state: ParseState::Fresh,
            diagnostics: Vec::new(),
            hovers: Vec::new(),
            highlights: Vec::new(),
            colors: Vec::new(),
            definitions: Vec::new(),
            references: Vec::new(),
            entities: Vec::new(),
        }
    }

    pub fn uri(&self) -> &DocumentUri {
        &self.uri
    }

    /// Bumped on every text change.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn text(&self) -> &str {
        self.file.text()
    }

    pub fn file(&self) -> &Arc<SourceFile> {
        &self.file
    }

    pub fn line_index(&self) -> &LineIndex {
        self.file.line_index()
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: ParseState) {
        self.state = state;
    }

    pub(super) fn set_text(&mut self, text: impl Into<String>) {
        self.file = Arc::new(SourceFile::parse(text));
        self.version += 1;
        self.state = ParseState::Fresh;
    }

    /// Drop everything this document derived from its own text.
    ///
    /// Reference links belong to the documents that point here and are
    /// kept.
    pub(super) fn clear(&mut self) {
        self.diagnostics.clear();
        self.hovers.clear();
        self.highlights.clear();
        self.colors.clear();
        self.definitions.clear();
        self.entities.clear();
        self.state = ParseState::Fresh;
    }

    // ========================================================================
    // Artifacts
    // ========================================================================

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn hovers(&self) -> &[Hover] {
        &self.hovers
    }

    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    pub fn colors(&self) -> &[ColorHint] {
        &self.colors
    }

    /// Goto-definition links originating here.
    pub fn definitions(&self) -> &[RangeLink] {
        &self.definitions
    }

    /// Links from other documents pointing here.
    pub fn references(&self) -> &[RangeLink] {
        &self.references
    }

    /// Entities declared by this document in the last parse.
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    pub fn stats(&self) -> DocumentStats {
        DocumentStats {
            lines: self.line_index().line_count(),
            diagnostics: self.diagnostics.len(),
            hovers: self.hovers.len(),
            highlights: self.highlights.len(),
            colors: self.colors.len(),
            definitions: self.definitions.len(),
            references: self.references.len(),
            entities: self.entities.len(),
        }
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend_diagnostics(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn add_hover(&mut self, range: TextRange, contents: impl Into<String>) {
        let range = self.line_index().range(range);
        self.hovers.push(Hover {
            range,
            contents: contents.into(),
        });
    }

    /// Add a highlight, split into one highlight per covered line.
    pub fn add_highlight(&mut self, range: TextRange, kind: HighlightKind) {
        let index = self.file.line_index();
        let start = index.position(range.start());
        let end = index.position(range.end());
        for line in start.line..=end.line {
            let Some(line_range) = index.line_range(line) else {
                break;
            };
            let Some(part) = line_range.intersect(range) else {
                continue;
            };
            if part.is_empty() {
                continue;
            }
            let range = index.range(part);
            self.highlights.push(Highlight { range, kind });
        }
    }

    pub fn add_color(&mut self, range: TextRange, text: &str) -> bool {
        let range = self.line_index().range(range);
        match ColorHint::parse(range, text) {
            Some(color) => {
                self.colors.push(color);
                true
            }
            None => false,
        }
    }

    pub(super) fn add_definition(&mut self, link: RangeLink) {
        self.definitions.push(link);
    }

    pub(super) fn add_reference(&mut self, link: RangeLink) {
        self.references.push(link);
    }

    pub(crate) fn add_entity(&mut self, id: EntityId) {
        self.entities.push(id);
    }

    // ========================================================================
    // Position queries
    // ========================================================================

    /// Innermost hover containing `position`.
    pub fn hover_at(&self, position: Position) -> Option<&Hover> {
        innermost(&self.hovers, position, |h| h.range)
    }

    /// Innermost definition link containing `position`.
    pub fn definition_at(&self, position: Position) -> Option<&RangeLink> {
        innermost(&self.definitions, position, |l| l.from_range)
    }

    /// Reference links whose local range contains `position`.
    pub fn references_at(&self, position: Position) -> impl Iterator<Item = &RangeLink> {
        self.references
            .iter()
            .filter(move |l| l.from_range.contains(position))
    }
}

/// The smallest range containing `position`; earlier items win ties.
fn innermost<T>(items: &[T], position: Position, range: impl Fn(&T) -> Range) -> Option<&T> {
    items
        .iter()
        .filter(|item| range(item).contains(position))
        .min_by_key(|item| {
            let r = range(item);
            (r.end.line - r.start.line, r.end.character.saturating_sub(r.start.character))
        })
}
