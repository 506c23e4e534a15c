//! Positional outline of YAML documents.
//!
//! Validators need the exact range of every key and scalar (a skill line is
//! re-scanned at its absolute offset), so the outline is built from the
//! marked event stream of `yaml-rust2` rather than a loaded value tree.
//! `serde_yaml` types plain scalars.

use rustc_hash::FxHashMap;
use text_size::{TextRange, TextSize};
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

// ============================================================================
// Outline nodes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    /// `|` block
    Literal,
    /// `>` block
    Folded,
}

/// Typed view of a scalar
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Number(f64),
    String,
}

/// A scalar with its positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YamlScalar {
    /// Content without quotes or block header, exactly as written (no
    /// unescaping or folding), so offsets into it line up with the document.
    pub text: String,
    /// Range of `text`
    pub range: TextRange,
    /// Range including quotes or block header
    pub raw_range: TextRange,
    pub style: ScalarStyle,
}

impl YamlScalar {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Type the scalar the way a YAML loader would.
    pub fn value(&self) -> ScalarValue {
        if self.style != ScalarStyle::Plain {
            return ScalarValue::String;
        }
        match serde_yaml::from_str::<serde_yaml::Value>(&self.text) {
            Ok(serde_yaml::Value::Null) => ScalarValue::Null,
            Ok(serde_yaml::Value::Bool(b)) => ScalarValue::Bool(b),
            Ok(serde_yaml::Value::Number(n)) => {
                n.as_f64().map_or(ScalarValue::String, ScalarValue::Number)
            }
            _ => ScalarValue::String,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.value() {
            ScalarValue::Number(n) => Some(n),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YamlEntry {
    pub key: YamlScalar,
    pub value: Option<YamlNode>,
    /// Key start through value end
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YamlMap {
    pub entries: Vec<YamlEntry>,
    pub range: TextRange,
}

impl YamlMap {
    /// First entry whose key matches, ignoring ASCII case
    pub fn get(&self, key: &str) -> Option<&YamlEntry> {
        self.entries
            .iter()
            .find(|e| e.key.text.eq_ignore_ascii_case(key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YamlSeq {
    pub items: Vec<YamlNode>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YamlNode {
    Map(YamlMap),
    Seq(YamlSeq),
    Scalar(YamlScalar),
}

impl YamlNode {
    pub fn range(&self) -> TextRange {
        match self {
            YamlNode::Map(map) => map.range,
            YamlNode::Seq(seq) => seq.range,
            YamlNode::Scalar(scalar) => scalar.raw_range,
        }
    }

    pub fn as_map(&self) -> Option<&YamlMap> {
        match self {
            YamlNode::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&YamlSeq> {
        match self {
            YamlNode::Seq(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&YamlScalar> {
        match self {
            YamlNode::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Short name of the node shape for messages
    pub fn shape(&self) -> &'static str {
        match self {
            YamlNode::Map(_) => "map",
            YamlNode::Seq(_) => "list",
            YamlNode::Scalar(_) => "scalar",
        }
    }
}

// ============================================================================
// YAML errors
// ============================================================================

/// A YAML syntax error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YamlError {
    pub message: String,
    pub range: TextRange,
}

// ============================================================================
// Outline builder
// ============================================================================

/// A parsed document: its outline plus the syntax error that stopped the
/// parser, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outline {
    pub root: Option<YamlNode>,
    pub errors: Vec<YamlError>,
}

/// Outline `source` from the `yaml-rust2` event stream.
///
/// After a syntax error the collections still open are closed at the end of
/// the input, so invalid input still yields the part of the tree read so far. Anchored
/// nodes are recorded and aliases expand to a copy of them. Duplicate keys
/// are kept so the schemas can report them.
pub fn outline(source: &str) -> Outline {
    let mut builder = Builder::new(source);
    let mut parser = Parser::new_from_str(source);
    let errors = match parser.load(&mut builder, false) {
        Ok(()) => Vec::new(),
        Err(error) => {
            let start = builder.byte(error.marker().index());
            let end = source[start..]
                .find('\n')
                .map_or(source.len(), |n| start + n);
            tracing::debug!(%error, "YAML syntax error");
            vec![YamlError {
                message: error.to_string(),
                range: TextRange::new(offset(start), offset(end)),
            }]
        }
    };
    Outline {
        root: builder.finish(),
        errors,
    }
}

fn offset(index: usize) -> TextSize {
    TextSize::new(index as u32)
}

/// Index of the quote closing a string opened before `from`.
fn closing_quote(text: &str, from: usize, quote: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        let b = bytes[i];
        if quote == b'"' && b == b'\\' {
            i += 2;
            continue;
        }
        if b == quote {
            if quote == b'\'' && bytes.get(i + 1) == Some(&b'\'') {
                i += 2;
                continue;
            }
            return Some(i);
        }
        i += 1;
    }
    None
}

fn line_end(text: &str, from: usize) -> usize {
    text[from..].find('\n').map_or(text.len(), |n| from + n)
}

fn indent_at(text: &str, line_start: usize) -> usize {
    let line = &text[line_start..line_end(text, line_start)];
    line.len() - line.trim_start_matches(' ').len()
}

enum Frame {
    Map {
        start: usize,
        anchor: usize,
        flow: bool,
        entries: Vec<YamlEntry>,
        /// `Some` once a key was read; the inner `None` marks a non-scalar key
        key: Option<Option<YamlScalar>>,
    },
    Seq {
        start: usize,
        anchor: usize,
        flow: bool,
        items: Vec<YamlNode>,
    },
}

struct Builder<'s> {
    source: &'s str,
    /// Byte offset of every char index, plus the end of the source
    bytes: Vec<usize>,
    stack: Vec<Frame>,
    anchors: FxHashMap<usize, YamlNode>,
    root: Option<YamlNode>,
}

impl<'s> Builder<'s> {
    fn new(source: &'s str) -> Self {
        let mut bytes: Vec<usize> = source.char_indices().map(|(i, _)| i).collect();
        bytes.push(source.len());
        Self {
            source,
            bytes,
            stack: Vec::new(),
            anchors: FxHashMap::default(),
            root: None,
        }
    }

    /// Byte offset of a parser char index
    fn byte(&self, index: usize) -> usize {
        self.bytes
            .get(index)
            .copied()
            .unwrap_or(self.source.len())
    }

    /// Close whatever the parser left open and return the root.
    fn finish(mut self) -> Option<YamlNode> {
        while !self.stack.is_empty() {
            self.close(self.source.len());
        }
        self.root
    }

    fn open(&mut self, at: usize, anchor: usize, seq: bool) {
        let flow = matches!(self.source.as_bytes().get(at), Some(b'[' | b'{'));
        let frame = if seq {
            Frame::Seq {
                start: at,
                anchor,
                flow,
                items: Vec::new(),
            }
        } else {
            Frame::Map {
                start: at,
                anchor,
                flow,
                entries: Vec::new(),
                key: None,
            }
        };
        self.stack.push(frame);
    }

    /// Pop the innermost collection. `at` is the end event's position, which
    /// is the closing bracket of a flow collection.
    fn close(&mut self, at: usize) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let (node, anchor) = match frame {
            Frame::Map {
                start,
                anchor,
                flow,
                mut entries,
                key,
            } => {
                if let Some(Some(key)) = key {
                    entries.push(YamlEntry {
                        range: key.raw_range,
                        key,
                        value: None,
                    });
                }
                let end = self.collection_end(
                    flow,
                    at,
                    entries.last().map(|e| e.range.end()),
                );
                let range = TextRange::new(offset(start), end.max(offset(start)));
                (YamlNode::Map(YamlMap { entries, range }), anchor)
            }
            Frame::Seq {
                start,
                anchor,
                flow,
                items,
            } => {
                let end = self.collection_end(flow, at, items.last().map(|i| i.range().end()));
                let range = TextRange::new(offset(start), end.max(offset(start)));
                (YamlNode::Seq(YamlSeq { items, range }), anchor)
            }
        };
        self.add(Some(node), anchor);
    }

    fn collection_end(&self, flow: bool, at: usize, last: Option<TextSize>) -> TextSize {
        let closed = flow && matches!(self.source.as_bytes().get(at), Some(b']' | b'}'));
        match (closed, last) {
            (true, _) => offset(at + 1),
            (false, Some(last)) => last,
            (false, None) => offset(at.min(self.source.len())),
        }
    }

    /// Attach a finished node to the innermost open collection.
    fn add(&mut self, node: Option<YamlNode>, anchor: usize) {
        if let (1.., Some(node)) = (anchor, &node) {
            self.anchors.insert(anchor, node.clone());
        }
        match self.stack.last_mut() {
            None => {
                if self.root.is_none() {
                    self.root = node;
                }
            }
            Some(Frame::Seq { items, .. }) => items.extend(node),
            Some(Frame::Map { entries, key, .. }) => match key.take() {
                None => {
                    *key = Some(match node {
                        Some(YamlNode::Scalar(scalar)) => Some(scalar),
                        _ => None,
                    });
                }
                Some(Some(key)) => {
                    let range = match &node {
                        Some(value) => key.raw_range.cover(value.range()),
                        None => key.raw_range,
                    };
                    entries.push(YamlEntry {
                        key,
                        value: node,
                        range,
                    });
                }
                Some(None) => {}
            },
        }
    }

    /// Scalar whose token starts at byte `start`; `None` for an implicit
    /// empty value.
    fn scalar(&self, start: usize, value: &str, plain: bool) -> Option<YamlScalar> {
        let first = self.source.as_bytes().get(start).copied();
        if plain {
            if value == "~" && first != Some(b'~') {
                return None;
            }
            let end = self.plain_end(start, value);
            let range = TextRange::new(offset(start), offset(end));
            return Some(YamlScalar {
                text: self.source[start..end].to_string(),
                range,
                raw_range: range,
                style: ScalarStyle::Plain,
            });
        }
        match first {
            Some(quote @ (b'"' | b'\'')) => {
                let (content_end, raw_end) = match closing_quote(self.source, start + 1, quote) {
                    Some(close) => (close, close + 1),
                    None => (self.source.len(), self.source.len()),
                };
                Some(YamlScalar {
                    text: self.source[start + 1..content_end].to_string(),
                    range: TextRange::new(offset(start + 1), offset(content_end)),
                    raw_range: TextRange::new(offset(start), offset(raw_end)),
                    style: if quote == b'"' {
                        ScalarStyle::DoubleQuoted
                    } else {
                        ScalarStyle::SingleQuoted
                    },
                })
            }
            Some(indicator @ (b'|' | b'>')) => {
                let (content_start, content_end) = self.block_extent(start);
                Some(YamlScalar {
                    text: self.source[content_start..content_end].to_string(),
                    range: TextRange::new(offset(content_start), offset(content_end)),
                    raw_range: TextRange::new(offset(start), offset(content_end)),
                    style: if indicator == b'|' {
                        ScalarStyle::Literal
                    } else {
                        ScalarStyle::Folded
                    },
                })
            }
            _ => {
                let range = TextRange::empty(offset(start));
                Some(YamlScalar {
                    text: String::new(),
                    range,
                    raw_range: range,
                    style: ScalarStyle::Plain,
                })
            }
        }
    }

    /// End of a plain scalar, found by walking its folded value against the
    /// source. Folding turns line breaks and indentation into a single space
    /// or newline, so whitespace in the value matches any whitespace run.
    fn plain_end(&self, start: usize, value: &str) -> usize {
        let source = self.source.as_bytes();
        let mut pos = start;
        let mut end = start;
        for c in value.chars() {
            if c.is_whitespace() {
                while matches!(source.get(pos), Some(b' ' | b'\t' | b'\r' | b'\n')) {
                    pos += 1;
                }
                continue;
            }
            if !self.source[pos..].starts_with(c) {
                break;
            }
            pos += c.len_utf8();
            end = pos;
        }
        end
    }

    /// Content extent of a block scalar whose indicator is at `start`.
    ///
    /// Content lines must be indented past the line holding the indicator;
    /// the first content line sets the indentation the rest must keep.
    fn block_extent(&self, start: usize) -> (usize, usize) {
        let source = self.source;
        let header_line = source[..start].rfind('\n').map_or(0, |n| n + 1);
        let floor = indent_at(source, header_line);
        let mut pos = line_end(source, start);
        let (mut content_start, mut content_end) = (pos, pos);
        let mut indent = None;
        while pos < source.len() {
            let line_start = pos + 1;
            let end = line_end(source, line_start);
            let line = &source[line_start..end];
            pos = end;
            if line.trim().is_empty() {
                continue;
            }
            let line_indent = indent_at(source, line_start);
            match indent {
                None if line_indent <= floor => break,
                None => {
                    indent = Some(line_indent);
                    content_start = line_start + line_indent;
                }
                Some(n) if line_indent < n => break,
                Some(_) => {}
            }
            content_end = line_start + line.trim_end().len();
        }
        (content_start, content_end.max(content_start))
    }
}

impl MarkedEventReceiver for Builder<'_> {
    fn on_event(&mut self, event: Event, mark: Marker) {
        let at = self.byte(mark.index());
        match event {
            Event::MappingStart(anchor, ..) => self.open(at, anchor, false),
            Event::SequenceStart(anchor, ..) => self.open(at, anchor, true),
            Event::MappingEnd | Event::SequenceEnd => self.close(at),
            Event::Scalar(value, style, anchor, ..) => {
                let plain = matches!(style, TScalarStyle::Plain);
                let node = self.scalar(at, &value, plain).map(YamlNode::Scalar);
                self.add(node, anchor);
            }
            Event::Alias(anchor) => {
                let node = self.anchors.get(&anchor).cloned();
                self.add(node, 0);
            }
            _ => {}
        }
    }
}
