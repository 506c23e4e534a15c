//! The two validation phases for a single document.
//!
//! ```text
//! pre_parse   invalidate → YAML errors → schema.pre_validate → settle
//! post_parse  schema.post_validate (resolution against the graph)
//! ```

use std::time::Instant;

use crate::base::DocumentUri;
use crate::error::{Error, Result};
use crate::hir::{codes, Diagnostic};
use crate::workspace::{AnalysisHost, ParseState};

/// Rebuild a document from its text and register what it declares.
///
/// # Errors
///
/// Returns `Error::UnknownDocument` if the document is not open.
pub fn pre_parse(host: &mut AnalysisHost, uri: &DocumentUri) -> Result<()> {
    let started = Instant::now();
    host.invalidate(uri)?;
    let schema = host.schemas().schema_for(uri);
    host.with_document(uri, |file, cx| {
        for error in file.errors() {
            let diagnostic = Diagnostic::error(cx.range(error.range), error.message.as_str())
                .with_code(codes::YAML_SYNTAX);
            cx.diagnostic(diagnostic);
        }
        if let (Some(schema), Some(root)) = (&schema, file.root()) {
            for diagnostic in schema.pre_validate(file, root, cx) {
                cx.diagnostic(diagnostic);
            }
        }
    })?;
    host.graph_mut().settle_document(uri);
    if let Some(document) = host.document_mut(uri) {
        document.set_state(ParseState::PreParsed);
    }
    tracing::debug!(
        uri = %uri,
        schema = schema.as_ref().map_or("none", |s| s.name()),
        elapsed_us = started.elapsed().as_micros() as u64,
        "pre-parsed"
    );
    Ok(())
}

/// Resolve cross-document references of a pre-parsed document.
///
/// # Errors
///
/// Returns `Error::UnknownDocument` if the document is not open and
/// `Error::NotParsed` if it was not pre-parsed since its last post-parse.
pub fn post_parse(host: &mut AnalysisHost, uri: &DocumentUri) -> Result<()> {
    let started = Instant::now();
    let state = host
        .document(uri)
        .map(|d| d.state())
        .ok_or_else(|| Error::UnknownDocument(uri.clone()))?;
    if state != ParseState::PreParsed {
        return Err(Error::NotParsed(uri.clone()));
    }
    let schema = host.schemas().schema_for(uri);
    host.with_document(uri, |file, cx| {
        if let (Some(schema), Some(root)) = (&schema, file.root()) {
            for diagnostic in schema.post_validate(file, root, cx) {
                cx.diagnostic(diagnostic);
            }
        }
    })?;
    if let Some(document) = host.document_mut(uri) {
        document.set_state(ParseState::PostParsed);
        tracing::debug!(
            uri = %uri,
            elapsed_us = started.elapsed().as_micros() as u64,
            "post-parsed\n{}",
            document.stats()
        );
    }
    Ok(())
}
