//! Scanner and skill line parser tests
//!
//! Tests for:
//! - Scanner termination and token stream shape
//! - Skill line components and error recovery
//! - Completion mode contexts

pub mod tests_completion;
pub mod tests_scanner;
pub mod tests_skill_line;
