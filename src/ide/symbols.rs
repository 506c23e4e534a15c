//! Symbol listing for workspace and document views.

use smol_str::SmolStr;

use crate::base::{DocumentUri, Range};
use crate::hir::{Entity, EntityKind};
use crate::workspace::AnalysisHost;

/// A symbol for the workspace symbol list or document outline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolInfo {
    pub name: SmolStr,
    pub kind: EntityKind,
    pub uri: DocumentUri,
    /// Range of the declaring key.
    pub range: Range,
    /// First line of the description, if any.
    pub detail: Option<String>,
}

impl SymbolInfo {
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            name: entity.name.clone(),
            kind: entity.kind,
            uri: entity.id.document.clone(),
            range: entity.id.range,
            detail: entity
                .description
                .lines()
                .next()
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        }
    }

    /// LSP symbol kind number.
    pub fn lsp_kind(&self) -> u32 {
        match self.kind {
            EntityKind::Skill => 12, // Function
            EntityKind::Mob => 5,    // Class
        }
    }
}

/// All declarations, optionally filtered by a case-insensitive substring
/// query. Sorted by name, then location.
pub fn workspace_symbols(host: &AnalysisHost, query: Option<&str>) -> Vec<SymbolInfo> {
    let query = query.map(str::to_lowercase).filter(|q| !q.is_empty());
    let mut results: Vec<SymbolInfo> = [EntityKind::Skill, EntityKind::Mob]
        .into_iter()
        .flat_map(|kind| host.graph().all(kind))
        .filter(|entity| match &query {
            Some(query) => entity.name.to_lowercase().contains(query.as_str()),
            None => true,
        })
        .map(SymbolInfo::from_entity)
        .collect();
    results.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.uri.as_str().cmp(b.uri.as_str()))
            .then(a.range.cmp(&b.range))
    });
    results
}

/// Declarations of one document in source order.
pub fn document_symbols(host: &AnalysisHost, uri: &DocumentUri) -> Vec<SymbolInfo> {
    let mut results: Vec<SymbolInfo> = host
        .graph()
        .entities_in(uri)
        .map(SymbolInfo::from_entity)
        .collect();
    results.sort_by_key(|symbol| symbol.range);
    results
}
