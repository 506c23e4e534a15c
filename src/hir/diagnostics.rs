//! Diagnostics: user-facing problem reporting.
//!
//! Lexical, syntax, YAML, schema and reference problems all end up as
//! [`Diagnostic`] values attached to a document. None of them is a Rust error.

use std::sync::Arc;

use crate::base::{LineIndex, Range};
use crate::parser::SyntaxError;

/// Source tag carried by every diagnostic.
pub const DIAGNOSTIC_SOURCE: &str = "mythic";

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Location within the owning document.
    pub range: Range,
    /// Severity level.
    pub severity: Severity,
    /// Error/warning code (e.g., "E0401").
    pub code: Option<Arc<str>>,
    /// The diagnostic message.
    pub message: Arc<str>,
    /// Always [`DIAGNOSTIC_SOURCE`].
    pub source: &'static str,
    /// Optional related locations in the same document.
    pub related: Vec<RelatedInfo>,
}

/// Related information for a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedInfo {
    pub range: Range,
    pub message: Arc<str>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(range: Range, message: impl Into<Arc<str>>) -> Self {
        Self::new(range, Severity::Error, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(range: Range, message: impl Into<Arc<str>>) -> Self {
        Self::new(range, Severity::Warning, message)
    }

    fn new(range: Range, severity: Severity, message: impl Into<Arc<str>>) -> Self {
        Self {
            range,
            severity,
            code: None,
            message: message.into(),
            source: DIAGNOSTIC_SOURCE,
            related: Vec::new(),
        }
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Add related information.
    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }

    /// Convert a scanner/parser error using the document's line index.
    pub fn from_syntax_error(error: &SyntaxError, index: &LineIndex) -> Self {
        let mut diagnostic = Self::error(index.range(error.range), error.message.as_str())
            .with_code(error.code.as_str());
        for related in &error.related {
            diagnostic = diagnostic.with_related(RelatedInfo {
                range: index.range(related.range),
                message: Arc::from(related.message.as_str()),
            });
        }
        diagnostic
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Diagnostic codes produced above the parser.
///
/// ## Error Code Ranges
///
/// - **E01xx/E02xx**: scanner and parser (see [`crate::parser::ErrorCode`])
/// - **E03xx**: YAML syntax
/// - **E04xx**: schema and value validation
/// - **E05xx**: cross-document reference resolution
pub mod codes {
    // ========================================================================
    // YAML (E03xx)
    // ========================================================================

    /// YAML could not be parsed.
    pub const YAML_SYNTAX: &str = "E0301";

    // ========================================================================
    // SCHEMA (E04xx)
    // ========================================================================

    /// Duplicate top-level key.
    pub const DUPLICATE_KEY: &str = "E0401";
    /// Value has the wrong shape (map/list/scalar).
    pub const WRONG_SHAPE: &str = "E0402";
    /// Value is not a number.
    pub const NOT_A_NUMBER: &str = "E0403";
    /// Number out of the allowed range.
    pub const OUT_OF_RANGE: &str = "E0404";
    /// Damage modifier without a value.
    pub const MISSING_VALUE: &str = "E0405";

    // ========================================================================
    // REFERENCES (E05xx)
    // ========================================================================

    /// Skill name not declared anywhere.
    pub const UNKNOWN_SKILL: &str = "E0501";
    /// Mob name not declared anywhere.
    pub const UNKNOWN_MOB: &str = "E0502";
}
