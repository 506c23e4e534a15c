//! Analysis: a read-only view over an [`AnalysisHost`] for IDE queries.
//!
//! ## Usage
//!
//! ```ignore
//! let analysis = host.analysis();
//! let hover = analysis.hover(&uri, position);
//! let symbols = analysis.document_symbols(&uri);
//! ```

use crate::base::{DocumentUri, Position};
use crate::workspace::{AnalysisHost, DocumentStats};

use super::{
    CompletionList, DependencyReport, GotoResult, HoverResult, Reference, SemanticToken, SymbolInfo,
};

impl AnalysisHost {
    /// Borrow the host for queries.
    pub fn analysis(&self) -> Analysis<'_> {
        Analysis { host: self }
    }
}

/// Query methods over the state of the last finished batch.
#[derive(Clone, Copy)]
pub struct Analysis<'a> {
    host: &'a AnalysisHost,
}

impl Analysis<'_> {
    pub fn hover(&self, uri: &DocumentUri, position: Position) -> Option<HoverResult> {
        super::hover(self.host, uri, position)
    }

    pub fn goto_definition(&self, uri: &DocumentUri, position: Position) -> Option<GotoResult> {
        super::goto_definition(self.host, uri, position)
    }

    pub fn find_references(
        &self,
        uri: &DocumentUri,
        position: Position,
        include_declaration: bool,
    ) -> Vec<Reference> {
        super::find_references(self.host, uri, position, include_declaration)
    }

    pub fn completions(&self, uri: &DocumentUri, position: Position) -> Option<CompletionList> {
        super::completions(self.host, uri, position)
    }

    pub fn document_symbols(&self, uri: &DocumentUri) -> Vec<SymbolInfo> {
        super::document_symbols(self.host, uri)
    }

    pub fn workspace_symbols(&self, query: Option<&str>) -> Vec<SymbolInfo> {
        super::workspace_symbols(self.host, query)
    }

    pub fn semantic_tokens(&self, uri: &DocumentUri) -> Vec<SemanticToken> {
        super::semantic_tokens(self.host, uri)
    }

    pub fn dependency_report(&self, uri: &DocumentUri) -> Option<DependencyReport> {
        super::dependency_report(self.host, uri)
    }

    pub fn document_stats(&self, uri: &DocumentUri) -> Option<DocumentStats> {
        super::document_stats(self.host, uri)
    }
}
