//! Find references implementation.
//!
//! Reference links are the mirrors of goto links, stored on the document
//! that declares the target. A request on a reference first hops to the
//! declaration.

use crate::base::{DocumentUri, Position, Range};
use crate::workspace::AnalysisHost;

/// A single reference location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub uri: DocumentUri,
    pub range: Range,
    /// Whether this is the declaration itself.
    pub is_definition: bool,
}

/// References to the entity under `position`, ordered by document and
/// range. Empty when the cursor is on neither a declaration nor a
/// reference.
pub fn find_references(
    host: &AnalysisHost,
    uri: &DocumentUri,
    position: Position,
    include_declaration: bool,
) -> Vec<Reference> {
    let Some(document) = host.document(uri) else {
        return Vec::new();
    };
    let (declaring, declaration) = match document.definition_at(position) {
        Some(link) => (link.target_document.clone(), link.target_range),
        None => (uri.clone(), declaration_at(host, uri, position).unwrap_or_default()),
    };
    let Some(target) = host.document(&declaring) else {
        return Vec::new();
    };

    let mut results: Vec<Reference> = target
        .references()
        .iter()
        .filter(|link| link.from_range == declaration)
        .map(|link| Reference {
            uri: link.target_document.clone(),
            range: link.target_range,
            is_definition: false,
        })
        .collect();
    if results.is_empty() && !host.graph().entities_in(&declaring).any(|e| e.id.range == declaration) {
        return Vec::new();
    }
    if include_declaration {
        results.push(Reference {
            uri: declaring,
            range: declaration,
            is_definition: true,
        });
    }
    results.sort_by(|a, b| (a.uri.as_str(), a.range).cmp(&(b.uri.as_str(), b.range)));
    results.dedup();
    results
}

fn declaration_at(host: &AnalysisHost, uri: &DocumentUri, position: Position) -> Option<Range> {
    host.graph()
        .entities_in(uri)
        .find(|entity| entity.id.range.contains(position))
        .map(|entity| entity.id.range)
}
