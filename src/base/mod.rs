//! Foundation types for the mythic toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`DocumentUri`] - Cheap-clone file identity
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`Position`], [`Range`] - Line/column positions for editor features
//! - [`LineIndex`] - Offset ↔ position conversion from a line-length table
//!
//! This module has NO dependencies on other mythic modules.

mod position;
mod uri;

pub use position::{LineIndex, Position, Range};
pub use uri::DocumentUri;

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
