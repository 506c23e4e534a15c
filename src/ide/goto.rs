//! Goto definition implementation.

use crate::base::{DocumentUri, Position, Range};
use crate::workspace::AnalysisHost;

/// A location a goto request can land on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GotoTarget {
    pub uri: DocumentUri,
    pub range: Range,
}

/// Result of a goto definition request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GotoResult {
    /// Range of the reference under the cursor.
    pub origin: Range,
    pub target: GotoTarget,
}

/// Declaration of the reference under `position`.
pub fn goto_definition(host: &AnalysisHost, uri: &DocumentUri, position: Position) -> Option<GotoResult> {
    let link = host.document(uri)?.definition_at(position)?;
    Some(GotoResult {
        origin: link.from_range,
        target: GotoTarget {
            uri: link.target_document.clone(),
            range: link.target_range,
        },
    })
}
