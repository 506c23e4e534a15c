//! Hover information implementation.

use crate::base::{DocumentUri, Position, Range};
use crate::workspace::AnalysisHost;

/// Result of a hover request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverResult {
    /// The hover content (markdown).
    pub contents: String,
    /// Range the hover applies to.
    pub range: Range,
}

/// Hover recorded by the last parse at `position`.
///
/// Declarations hover with their own description, references with the
/// description and source of their target. The innermost range wins.
pub fn hover(host: &AnalysisHost, uri: &DocumentUri, position: Position) -> Option<HoverResult> {
    let hover = host.document(uri)?.hover_at(position)?;
    Some(HoverResult {
        contents: hover.contents.clone(),
        range: hover.range,
    })
}
