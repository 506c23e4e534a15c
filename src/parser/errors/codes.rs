//! Error code definitions for skill-line parser diagnostics
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E01xx: Lexical errors (unscannable input)
//! - E02xx: Syntax errors (missing/unexpected tokens)
//!
//! Schema and resolution codes (E03xx-E05xx) live in `hir::codes`.

use std::fmt;

/// Error codes for parser diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // E01xx: Lexical errors
    // =========================================================================
    /// Invalid or unexpected character in source
    E0101,
    /// Unterminated string literal
    E0102,

    // =========================================================================
    // E02xx: Syntax errors
    // =========================================================================
    /// Expected `}` closing a config block
    E0201,
    /// Expected `]` closing an inline skill
    E0202,
    /// Expected `>` closing a placeholder
    E0203,
    /// Expected `=` after an mlc key
    E0204,
    /// Missing mechanic name
    E0205,
    /// Missing targeter name
    E0206,
    /// Missing trigger name or argument
    E0207,
    /// Missing inline condition name
    E0208,
    /// Missing mlc key
    E0209,
    /// Missing health modifier value
    E0210,
    /// Duplicate targeter in one skill line
    E0211,
    /// Duplicate trigger in one skill line
    E0212,
    /// Expected `-` before an inline skill line
    E0213,
    /// Unexpected token in current context
    E0214,
    /// Expected `[` opening an inline skill
    E0215,
    /// Missing placeholder segment
    E0216,
}

impl ErrorCode {
    /// Get the string representation of the error code (e.g., "E0201")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E0101 => "E0101",
            Self::E0102 => "E0102",
            Self::E0201 => "E0201",
            Self::E0202 => "E0202",
            Self::E0203 => "E0203",
            Self::E0204 => "E0204",
            Self::E0205 => "E0205",
            Self::E0206 => "E0206",
            Self::E0207 => "E0207",
            Self::E0208 => "E0208",
            Self::E0209 => "E0209",
            Self::E0210 => "E0210",
            Self::E0211 => "E0211",
            Self::E0212 => "E0212",
            Self::E0213 => "E0213",
            Self::E0214 => "E0214",
            Self::E0215 => "E0215",
            Self::E0216 => "E0216",
        }
    }

    pub fn is_lexical(&self) -> bool {
        matches!(self, Self::E0101 | Self::E0102)
    }

    /// Get the default message template for this error code
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::E0101 => "invalid character",
            Self::E0102 => "unterminated string literal",
            Self::E0201 => "expected '}'",
            Self::E0202 => "expected ']'",
            Self::E0203 => "expected '>'",
            Self::E0204 => "expected '='",
            Self::E0205 => "expected mechanic name",
            Self::E0206 => "expected targeter name",
            Self::E0207 => "expected trigger name",
            Self::E0208 => "expected inline condition name",
            Self::E0209 => "expected mlc key",
            Self::E0210 => "expected health modifier value",
            Self::E0211 => "duplicate targeter",
            Self::E0212 => "duplicate trigger",
            Self::E0213 => "expected '-'",
            Self::E0214 => "unexpected token",
            Self::E0215 => "expected '['",
            Self::E0216 => "expected placeholder segment",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
