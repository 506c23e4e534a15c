//! YAML documents: text, positional outline and YAML syntax errors.
//!
//! Skill lines live inside scalar values, so everything above this layer
//! needs the absolute range of each key and scalar. [`SourceFile`] bundles
//! those with the line index used for position conversion.

pub mod file;
pub mod yaml;

pub use file::SourceFile;
pub use yaml::{
    Outline, ScalarStyle, ScalarValue, YamlEntry, YamlError, YamlMap, YamlNode, YamlScalar, YamlSeq,
};
