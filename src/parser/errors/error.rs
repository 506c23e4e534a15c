//! Syntax error types
//!
//! Errors are always `(range, message)` pairs plus a categorized code. They
//! are collected while parsing and never interrupt it.

use std::fmt;

use text_size::TextRange;

use super::codes::ErrorCode;

/// A secondary location, e.g. the `{` an unclosed block was opened at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub message: String,
    pub range: TextRange,
}

impl RelatedInfo {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        RelatedInfo {
            message: message.into(),
            range,
        }
    }
}

/// Lexical or syntax problem in a skill line.
///
/// `range` is absolute within the owning document, so errors from a
/// re-scanned sub-span need no adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
    pub code: ErrorCode,
    pub related: Vec<RelatedInfo>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange, code: ErrorCode) -> Self {
        SyntaxError {
            message: message.into(),
            range,
            code,
            related: Vec::new(),
        }
    }

    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }

    /// Raised by the scanner rather than the parser.
    pub fn is_lexical(&self) -> bool {
        self.code.is_lexical()
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}
