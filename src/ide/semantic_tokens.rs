//! Semantic tokens: LSP-ordered highlight ranges.
//!
//! Highlights are recorded per line while documents are validated. This
//! module sorts them, drops overlaps and produces the relative encoding
//! the LSP expects.

use crate::base::DocumentUri;
use crate::workspace::{AnalysisHost, HighlightKind};

/// Token type for semantic highlighting.
pub type TokenType = HighlightKind;

/// A semantic token for syntax highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemanticToken {
    /// Line number (0-indexed)
    pub line: u32,
    /// Column number (0-indexed)
    pub col: u32,
    /// Length of the token in characters
    pub length: u32,
    pub token_type: TokenType,
}

/// Token type names in legend order.
pub fn legend() -> Vec<&'static str> {
    HighlightKind::ALL.iter().map(|kind| kind.as_str()).collect()
}

/// Tokens for one document, sorted by position.
///
/// Where two highlights overlap, the one starting first wins; on equal
/// starts the one recorded first wins.
pub fn semantic_tokens(host: &AnalysisHost, uri: &DocumentUri) -> Vec<SemanticToken> {
    let Some(document) = host.document(uri) else {
        return Vec::new();
    };
    let mut tokens: Vec<SemanticToken> = document
        .highlights()
        .iter()
        .filter(|h| h.range.end.character > h.range.start.character)
        .map(|h| SemanticToken {
            line: h.range.start.line,
            col: h.range.start.character,
            length: h.range.end.character - h.range.start.character,
            token_type: h.kind,
        })
        .collect();
    tokens.sort_by_key(|t| (t.line, t.col));

    let mut result: Vec<SemanticToken> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if let Some(last) = result.last() {
            if last.line == token.line && token.col < last.col + last.length {
                continue;
            }
        }
        result.push(token);
    }
    result
}

/// Relative encoding: `[delta_line, delta_start, length, type, modifiers]`
/// per token.
pub fn encode(tokens: &[SemanticToken]) -> Vec<u32> {
    let mut data = Vec::with_capacity(tokens.len() * 5);
    let (mut line, mut col) = (0, 0);
    for token in tokens {
        let delta_line = token.line - line;
        let delta_start = if delta_line == 0 { token.col - col } else { token.col };
        data.extend([delta_line, delta_start, token.length, token.token_type.to_lsp_index(), 0]);
        line = token.line;
        col = token.col;
    }
    data
}
