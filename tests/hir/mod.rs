//! HIR and workspace tests
//!
//! Tests for:
//! - Dependency graph traversal, cycles and re-declaration
//! - Range links and their mirrors
//! - Schema diagnostics on skill and mob files

pub mod tests_graph;
pub mod tests_range_links;
pub mod tests_schemas;
