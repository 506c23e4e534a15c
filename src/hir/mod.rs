//! High-level IR (HIR): entities, the dependency graph and diagnostics.
//!
//! ## Key Types
//!
//! - [`Entity`] - a skill or mob declared by a document
//! - [`EntityId`] - identity: owning document + declaration range
//! - [`EntityGraph`] - arena of entities with mirrored dependency edges
//! - [`Diagnostic`] - a user-facing problem attached to a document
//!
//! ```text
//! schema pre-validation  → register(entity)
//!     │
//!     ▼
//! schema post-validation → lookup(kind, name) → add_dependency(from, to)
//!     │
//!     ▼
//! scheduler cascade      → traverse_dependencies / traverse_dependents
//! ```

mod diagnostics;
mod entity;
mod graph;

pub use diagnostics::{codes, Diagnostic, RelatedInfo, Severity, DIAGNOSTIC_SOURCE};
pub use entity::{Entity, EntityId, EntityKind};
pub use graph::{Direction, EntityGraph};
