//! Scanner and error-tolerant parser for skill lines
//!
//! Skill lines are embedded as string values in YAML documents. A schema
//! field validator hands the scalar text and its absolute offset to the
//! scanner, and the parser builds a typed AST from the tokens.
//!
//! ## Architecture
//!
//! ```text
//! Scalar text + absolute offset
//!     ↓
//! Scanner (logos) → Tokens + comments + lexical errors
//!     ↓
//! Parser → SkillLineExpr / InlineSkillExpr / MlcValueExpr + syntax errors
//!     ↓
//! Schema validators → diagnostics, hovers, highlights, entity edges
//! ```
//!
//! The scanner holds no state beyond its cursor, so any component may
//! re-scan a sub-span (an inline skill inside an mlc value) at its own offset.

pub mod ast;
pub mod errors;
mod lexer;
#[allow(clippy::module_inception)]
mod parser;

pub use ast::*;
pub use errors::{ErrorCode, RelatedInfo, SyntaxError};
pub use lexer::{scan, ScanMode, ScanResult, Token, TokenKind};
pub use parser::{
    complete_inline_skill, complete_skill_line, parse_inline_skill,
    parse_skill_line, parse_skill_reference, CompletionContext, CompletionKind,
    CompletionOutcome, MlcOwner, Parse,
};
