/// Position tracking for documents
///
/// Stores the source location (line/character) of derived artifacts for LSP
/// features like hover, go-to-definition, and diagnostics.
use std::fmt;

use rustc_hash::FxHashMap;
use text_size::{TextRange, TextSize};

/// A position in source code (0-indexed, character counts UTF-16 code units)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

/// A range between two positions (0-indexed for LSP compatibility)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Create a range from line/character coordinates
    pub fn from_coords(start_line: u32, start_char: u32, end_line: u32, end_char: u32) -> Self {
        Self {
            start: Position::new(start_line, start_char),
            end: Position::new(end_line, end_char),
        }
    }

    /// Check if a position falls within this range (end inclusive)
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.character)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A char whose UTF-8 and UTF-16 lengths differ, by byte column in its line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WideChar {
    start: u32,
    utf8: u32,
    utf16: u32,
}

/// Offset ↔ position conversion built from the length of every line.
///
/// Offsets are bytes; position columns are UTF-16 code units, the encoding
/// LSP clients use unless another one is negotiated. Line lengths exclude
/// the `\n` terminator and are in bytes, so the offset of line `n` is the sum
/// of the previous lengths plus one byte per newline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineIndex {
    line_lengths: Vec<u32>,
    line_starts: Vec<TextSize>,
    /// Non-ASCII chars of each line that has any
    wide_chars: FxHashMap<u32, Vec<WideChar>>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_lengths = Vec::new();
        let mut line_starts = Vec::new();
        let mut wide_chars = FxHashMap::default();
        let mut offset = 0u32;
        for (line, content) in text.split('\n').enumerate() {
            line_starts.push(TextSize::new(offset));
            line_lengths.push(content.len() as u32);
            offset += content.len() as u32 + 1;
            if content.is_ascii() {
                continue;
            }
            let wide: Vec<WideChar> = content
                .char_indices()
                .filter(|(_, c)| !c.is_ascii())
                .map(|(start, c)| WideChar {
                    start: start as u32,
                    utf8: c.len_utf8() as u32,
                    utf16: c.len_utf16() as u32,
                })
                .collect();
            wide_chars.insert(line as u32, wide);
        }
        Self {
            line_lengths,
            line_starts,
            wide_chars,
            len: TextSize::of(text),
        }
    }

    fn wide(&self, line: u32) -> &[WideChar] {
        self.wide_chars.get(&line).map_or(&[], Vec::as_slice)
    }

    /// UTF-16 column of byte column `col` in `line`
    fn utf16_col(&self, line: u32, col: u32) -> u32 {
        self.wide(line)
            .iter()
            .take_while(|c| c.start < col)
            .fold(col, |col, c| col - (c.utf8 - c.utf16))
    }

    /// Byte column of UTF-16 column `col` in `line`. A column inside a
    /// surrogate pair maps to the start of its char.
    fn byte_col(&self, line: u32, col: u32) -> u32 {
        let mut shift = 0;
        for c in self.wide(line) {
            let start = c.start - shift;
            if start >= col {
                break;
            }
            if col < start + c.utf16 {
                return c.start;
            }
            shift += c.utf8 - c.utf16;
        }
        col + shift
    }

    pub fn line_lengths(&self) -> &[u32] {
        &self.line_lengths
    }

    pub fn line_count(&self) -> usize {
        self.line_lengths.len()
    }

    /// Total length of the indexed text.
    pub fn len(&self) -> TextSize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == TextSize::new(0)
    }

    /// Convert a byte offset to a position. Offsets past the end clamp to the end.
    pub fn position(&self, offset: TextSize) -> Position {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        };
        let start = self.line_starts.get(line).copied().unwrap_or_default();
        let line = line as u32;
        Position::new(line, self.utf16_col(line, u32::from(offset - start)))
    }

    /// Convert a position to a byte offset. Positions past a line end clamp to it.
    pub fn offset(&self, position: Position) -> TextSize {
        let line = position.line as usize;
        let Some(start) = self.line_starts.get(line) else {
            return self.len;
        };
        let max = self.line_lengths[line];
        let col = self.byte_col(position.line, position.character);
        *start + TextSize::new(col.min(max))
    }

    pub fn range(&self, range: TextRange) -> Range {
        Range::new(self.position(range.start()), self.position(range.end()))
    }

    pub fn text_range(&self, range: Range) -> TextRange {
        let start = self.offset(range.start);
        let end = self.offset(range.end).max(start);
        TextRange::new(start, end)
    }

    /// Byte range of a single line, without its terminator.
    pub fn line_range(&self, line: u32) -> Option<TextRange> {
        let start = *self.line_starts.get(line as usize)?;
        let len = self.line_lengths[line as usize];
        Some(TextRange::at(start, TextSize::new(len)))
    }
}
