//! Source file wrapper for YAML documents.
//!
//! Holds the text together with everything derived from it without looking
//! at other documents: the line index, the positional outline and YAML
//! syntax errors.

use text_size::{TextRange, TextSize};

use super::yaml::{self, YamlError, YamlNode};
use crate::base::LineIndex;

/// A parsed YAML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    text: String,
    line_index: LineIndex,
    root: Option<YamlNode>,
    errors: Vec<YamlError>,
}

impl SourceFile {
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_index = LineIndex::new(&text);
        let yaml::Outline { root, errors } = yaml::outline(&text);
        Self {
            text,
            line_index,
            root,
            errors,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Outline root, `None` for an empty document
    pub fn root(&self) -> Option<&YamlNode> {
        self.root.as_ref()
    }

    pub fn errors(&self) -> &[YamlError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Source text of `range`, empty if it falls outside the document
    pub fn slice(&self, range: TextRange) -> &str {
        self.text
            .get(std::ops::Range::<usize>::from(range))
            .unwrap_or_default()
    }

    /// Documentation comment of the declaration starting at `offset`.
    ///
    /// The contiguous run of `##` lines directly above the declaration. A
    /// blank line, a plain `#` comment or content ends the run.
    pub fn description_above(&self, offset: TextSize) -> String {
        let line = self.line_index.position(offset).line;
        let mut collected: Vec<&str> = Vec::new();
        let mut current = line;
        while current > 0 {
            current -= 1;
            let Some(range) = self.line_index.line_range(current) else {
                break;
            };
            let text = self.slice(range).trim();
            let Some(doc) = text.strip_prefix("##") else {
                break;
            };
            collected.push(doc.strip_prefix(' ').unwrap_or(doc).trim_end());
        }
        collected.reverse();
        collected.join("\n")
    }
}
