//! AnalysisHost: the explicit registry of documents and entities.
//!
//! The host owns every [`Document`], the [`EntityGraph`] and the schema
//! associations. All mutation goes through it (or through a [`DocumentCx`]
//! it hands out), so there is no ambient global state.
//!
//! ## Usage
//!
//! ```ignore
//! let mut host = AnalysisHost::new();
//! host.open(uri.clone(), text);
//!
//! let mut scheduler = ReparseScheduler::new(SchedulerConfig::default());
//! scheduler.enqueue_partial(uri.clone(), now);
//! scheduler.enqueue_full(uri, now);
//! let published = scheduler.flush(&mut host);
//! ```

use indexmap::IndexMap;
use text_size::TextRange;

use super::document::{Document, HighlightKind, RangeLink};
use crate::base::{DocumentUri, LineIndex, Range};
use crate::error::{Error, Result};
use crate::hir::{Diagnostic, Entity, EntityGraph, EntityId, EntityKind};
use crate::project::Config;
use crate::schema::SchemaRegistry;
use crate::syntax::SourceFile;

/// Owns all mutable analysis state.
#[derive(Debug)]
pub struct AnalysisHost {
    documents: IndexMap<DocumentUri, Document>,
    graph: EntityGraph,
    schemas: SchemaRegistry,
    config: Config,
}

impl Default for AnalysisHost {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisHost {
    /// Host with the default configuration and schema associations.
    pub fn new() -> Self {
        Self::with_schemas(Config::default(), SchemaRegistry::builtin())
    }

    /// Host using `config`, including its schema globs.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidGlob` if a configured pattern is invalid.
    pub fn with_config(config: Config) -> Result<Self> {
        let schemas = SchemaRegistry::from_config(&config.schemas)?;
        Ok(Self::with_schemas(config, schemas))
    }

    pub fn with_schemas(config: Config, schemas: SchemaRegistry) -> Self {
        Self {
            documents: IndexMap::new(),
            graph: EntityGraph::new(),
            schemas,
            config,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Start tracking a document, or replace the text of a tracked one.
    pub fn open(&mut self, uri: DocumentUri, text: impl Into<String>) {
        match self.documents.get_mut(&uri) {
            Some(document) => document.set_text(text),
            None => {
                tracing::debug!(uri = %uri, "document opened");
                let document = Document::new(uri.clone(), text);
                self.documents.insert(uri, document);
            }
        }
    }

    /// Replace the text of a tracked document.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownDocument` if the document is not open.
    pub fn change(&mut self, uri: &DocumentUri, text: impl Into<String>) -> Result<()> {
        let document = self
            .documents
            .get_mut(uri)
            .ok_or_else(|| Error::UnknownDocument(uri.clone()))?;
        document.set_text(text);
        Ok(())
    }

    /// Stop tracking a document. Its entities leave the graph; edges other
    /// documents hold towards them are left dangling.
    pub fn close(&mut self, uri: &DocumentUri) -> bool {
        if self.documents.shift_remove(uri).is_none() {
            return false;
        }
        self.graph.remove_document(uri);
        self.drop_mirrors_from(uri);
        tracing::debug!(uri = %uri, "document closed");
        true
    }

    /// Forget every document and entity.
    pub fn reset(&mut self) {
        self.documents.clear();
        self.graph.clear();
        tracing::debug!("analysis host reset");
    }

    /// Clear everything derived from a document before it is parsed again.
    pub(crate) fn invalidate(&mut self, uri: &DocumentUri) -> Result<()> {
        let document = self
            .documents
            .get_mut(uri)
            .ok_or_else(|| Error::UnknownDocument(uri.clone()))?;
        document.clear();
        self.graph.invalidate_document(uri);
        self.drop_mirrors_from(uri);
        Ok(())
    }

    fn drop_mirrors_from(&mut self, uri: &DocumentUri) {
        for document in self.documents.values_mut() {
            document.references.retain(|link| link.target_document != *uri);
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn document(&self, uri: &DocumentUri) -> Option<&Document> {
        self.documents.get(uri)
    }

    pub fn document_mut(&mut self, uri: &DocumentUri) -> Option<&mut Document> {
        self.documents.get_mut(uri)
    }

    /// Tracked documents in opening order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn contains(&self, uri: &DocumentUri) -> bool {
        self.documents.contains_key(uri)
    }

    pub fn graph(&self) -> &EntityGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut EntityGraph {
        &mut self.graph
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ========================================================================
    // Mutation API
    // ========================================================================

    /// Add a definition link on `from` and its mirrored reference link on
    /// the target document.
    ///
    /// Returns `false` if the source document is unknown. A link towards an
    /// unknown target is kept on the source without a mirror.
    pub fn add_range_link(&mut self, from: &DocumentUri, link: RangeLink) -> bool {
        let mirror = link.mirror(from);
        let target = link.target_document.clone();
        let Some(source) = self.documents.get_mut(from) else {
            return false;
        };
        source.add_definition(link);
        if let Some(target) = self.documents.get_mut(&target) {
            target.add_reference(mirror);
        }
        true
    }

    /// Run `f` with a mutation context for one document.
    ///
    /// Links recorded through the context are mirrored once `f` returns.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownDocument` if the document is not open.
    pub fn with_document<R>(
        &mut self,
        uri: &DocumentUri,
        f: impl FnOnce(&SourceFile, &mut DocumentCx<'_>) -> R,
    ) -> Result<R> {
        let highlight_yaml = self.config.highlight_yaml;
        let document = self
            .documents
            .get_mut(uri)
            .ok_or_else(|| Error::UnknownDocument(uri.clone()))?;
        let file = document.file().clone();
        let mut cx = DocumentCx {
            document,
            graph: &mut self.graph,
            highlight_yaml,
            links: Vec::new(),
        };
        let result = f(&file, &mut cx);
        let links = cx.links;
        for link in links {
            self.add_range_link(uri, link);
        }
        Ok(result)
    }
}

// ============================================================================
// DocumentCx
// ============================================================================

/// Mutation context handed to schema validators for one document.
pub struct DocumentCx<'a> {
    document: &'a mut Document,
    graph: &'a mut EntityGraph,
    highlight_yaml: bool,
    links: Vec<RangeLink>,
}

impl DocumentCx<'_> {
    pub fn uri(&self) -> &DocumentUri {
        self.document.uri()
    }

    pub fn line_index(&self) -> &LineIndex {
        self.document.line_index()
    }

    pub fn range(&self, range: TextRange) -> Range {
        self.document.line_index().range(range)
    }

    /// Whether plain YAML keys and scalars get highlights too.
    pub fn highlight_yaml(&self) -> bool {
        self.highlight_yaml
    }

    pub fn graph(&self) -> &EntityGraph {
        self.graph
    }

    pub fn diagnostic(&mut self, diagnostic: Diagnostic) {
        self.document.push_diagnostic(diagnostic);
    }

    pub fn hover(&mut self, range: TextRange, contents: impl Into<String>) {
        self.document.add_hover(range, contents);
    }

    pub fn highlight(&mut self, range: TextRange, kind: HighlightKind) {
        self.document.add_highlight(range, kind);
    }

    pub fn color(&mut self, range: TextRange, text: &str) -> bool {
        self.document.add_color(range, text)
    }

    /// Record a goto link from `from` in this document.
    pub fn link(&mut self, from: TextRange, target_document: DocumentUri, target_range: Range) {
        let from_range = self.range(from);
        self.links
            .push(RangeLink::new(from_range, target_document, target_range));
    }

    /// Register an entity declared by this document.
    pub fn register(&mut self, entity: Entity) -> EntityId {
        let id = self.graph.register(entity);
        self.document.add_entity(id.clone());
        id
    }

    /// Entities this document declared so far in the current parse.
    pub fn entities(&self) -> &[EntityId] {
        self.document.entities()
    }

    /// Declaration of `name`, cloned out of the graph.
    pub fn lookup(&self, kind: EntityKind, name: &str) -> Option<Entity> {
        self.graph.lookup(kind, name).cloned()
    }

    pub fn add_dependency(&mut self, from: &EntityId, to: &EntityId) -> bool {
        self.graph.add_dependency(from, to)
    }

    pub fn note_unresolved(&mut self, kind: EntityKind, name: &str) {
        let uri = self.document.uri().clone();
        self.graph.note_unresolved(kind, name, &uri);
    }
}
