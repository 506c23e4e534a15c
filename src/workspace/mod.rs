//! Documents and the host that owns them.
//!
//! ## Key Types
//!
//! - [`AnalysisHost`] - registry of documents, entity graph and schemas
//! - [`Document`] - one YAML file with its derived artifacts
//! - [`DocumentCx`] - mutation context handed to validators
//! - [`RangeLink`] - goto link, mirrored onto its target

mod document;
mod host;

pub use document::{
    ColorHint, Document, DocumentStats, Highlight, HighlightKind, Hover, ParseState, RangeLink,
};
pub use host::{AnalysisHost, DocumentCx};
