//! # mythic-base
//!
//! Core library for MythicMobs skill-line parsing, YAML schema validation
//! and incremental cross-file analysis.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide        → IDE queries (hover, goto, references, symbols, tokens, completion)
//!   ↓
//! scheduler  → Debounced partial/full reparse batches, event loop
//!   ↓
//! schema     → Skill and mob file schemas, URI glob association
//!   ↓
//! workspace  → Documents, range links, AnalysisHost
//!   ↓
//! hir        → Entities, dependency graph, diagnostics
//!   ↓
//! syntax     → YAML outline and syntax errors
//!   ↓
//! parser     → Logos scanner, skill line parser, completion mode
//!   ↓
//! base       → Primitives (DocumentUri, Position, LineIndex, TextRange)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax → hir → workspace → ...)
// ============================================================================

/// Foundation types: DocumentUri, Position/Range, LineIndex
pub mod base;

/// Parser: Logos scanner, skill line grammar, completion mode
pub mod parser;

/// Syntax: YAML source files and their outline
pub mod syntax;

/// High-level IR: entities, dependency graph, diagnostics
pub mod hir;

/// Documents and the AnalysisHost registry
pub mod workspace;

/// Structural schemas for skill and mob files
pub mod schema;

/// Reparse scheduling and the event loop
pub mod scheduler;

/// IDE features: hover, goto-definition, find-references, completion
pub mod ide;

/// Project management: configuration, workspace discovery
pub mod project;

/// Subscriber setup for `tracing`
pub mod logging;

mod error;

pub use error::{Error, Result};

// Re-export foundation types
pub use base::{DocumentUri, LineIndex, Position, Range, TextRange, TextSize};
pub use hir::{Diagnostic, EntityGraph, EntityId, EntityKind, Severity};
pub use project::Config;
pub use scheduler::{PublishDiagnostics, ReparseScheduler};
pub use workspace::{AnalysisHost, Document};
