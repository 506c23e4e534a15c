//! Typed AST for skill lines.
//!
//! Nodes are immutable once built. Each keeps the tokens it was built from
//! so hovers and highlights can be attached to exact ranges, and each knows
//! its own source range.

use text_size::TextRange;

use super::lexer::{Token, TokenKind};

/// Common behaviour of all AST nodes
pub trait AstNode {
    fn range(&self) -> TextRange;
}

macro_rules! ast_node {
    ($($name:ident),* $(,)?) => {
        $(
            impl AstNode for $name {
                fn range(&self) -> TextRange {
                    self.range
                }
            }
        )*
    };
}

ast_node!(
    GenericStringExpr,
    MlcExpr,
    MlcValueExpr,
    MlcPlaceholderExpr,
    MechanicExpr,
    TargeterExpr,
    TriggerExpr,
    InlineConditionExpr,
    HealthModifierExpr,
    SkillLineExpr,
    InlineSkillExpr,
);

/// Range spanning a run of tokens, or `fallback` when there are none.
pub(crate) fn span_of(tokens: &[Token], fallback: TextRange) -> TextRange {
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => first.range.cover(last.range),
        _ => fallback,
    }
}

fn concat(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.lexeme.as_str()).collect()
}

// ============================================================================
// Generic strings and config blocks
// ============================================================================

/// An opaque token run used as a name or value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericStringExpr {
    pub tokens: Vec<Token>,
    pub range: TextRange,
}

impl GenericStringExpr {
    pub fn new(tokens: Vec<Token>, fallback: TextRange) -> Self {
        let range = span_of(&tokens, fallback);
        Self { tokens, range }
    }

    /// The source text of the run
    pub fn text(&self) -> String {
        concat(&self.tokens)
    }
}

/// A `{ key=value; ... }` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigBlock {
    pub left_brace: Token,
    pub entries: Vec<MlcExpr>,
    pub right_brace: Option<Token>,
}

impl ConfigBlock {
    pub fn range(&self) -> TextRange {
        let end = match (&self.right_brace, self.entries.last()) {
            (Some(brace), _) => brace.range,
            (None, Some(entry)) => entry.range,
            (None, None) => self.left_brace.range,
        };
        self.left_brace.range.cover(end)
    }

    /// Find an entry by key, ignoring ASCII case
    pub fn get(&self, key: &str) -> Option<&MlcExpr> {
        self.entries
            .iter()
            .find(|e| e.key.lexeme.eq_ignore_ascii_case(key))
    }

    pub fn is_closed(&self) -> bool {
        self.right_brace.is_some()
    }
}

/// A `key=value` pair inside a config block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MlcExpr {
    pub key: Token,
    pub equals: Option<Token>,
    pub value: MlcValueExpr,
    pub semicolon: Option<Token>,
    pub range: TextRange,
}

impl MlcExpr {
    pub fn key(&self) -> &str {
        &self.key.lexeme
    }
}

/// One piece of an mlc value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MlcValuePart {
    Literal(Vec<Token>),
    Placeholder(MlcPlaceholderExpr),
}

/// Literal token runs interleaved with placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MlcValueExpr {
    pub parts: Vec<MlcValuePart>,
    pub range: TextRange,
}

impl MlcValueExpr {
    /// Source text of the value, surrounding whitespace trimmed
    pub fn text(&self) -> String {
        let mut text = String::new();
        for part in &self.parts {
            match part {
                MlcValuePart::Literal(tokens) => text.push_str(&concat(tokens)),
                MlcValuePart::Placeholder(placeholder) => text.push_str(&placeholder.text()),
            }
        }
        text.trim().to_string()
    }

    /// Range of the value without leading and trailing whitespace
    pub fn trimmed_range(&self) -> TextRange {
        let tokens: Vec<&Token> = self.tokens().filter(|t| t.kind != TokenKind::Space).collect();
        match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => first.range.cover(last.range),
            _ => TextRange::empty(self.range.start()),
        }
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &MlcPlaceholderExpr> {
        self.parts.iter().filter_map(|part| match part {
            MlcValuePart::Placeholder(p) => Some(p),
            MlcValuePart::Literal(_) => None,
        })
    }

    /// Every token of the value in source order, placeholders included
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.parts.iter().flat_map(|part| -> Box<dyn Iterator<Item = &Token> + '_> {
            match part {
                MlcValuePart::Literal(tokens) => Box::new(tokens.iter()),
                MlcValuePart::Placeholder(p) => Box::new(p.tokens()),
            }
        })
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_empty()
    }
}

/// One `name{config}` step of a placeholder path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderSegment {
    pub name: GenericStringExpr,
    pub config: Option<ConfigBlock>,
}

/// `<caster.var.name>` style expression inside an mlc value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MlcPlaceholderExpr {
    pub open: Token,
    pub segments: Vec<PlaceholderSegment>,
    pub dots: Vec<Token>,
    pub close: Option<Token>,
    /// Every token from `<` through `>` in source order
    pub source: Vec<Token>,
    pub range: TextRange,
}

impl MlcPlaceholderExpr {
    pub fn text(&self) -> String {
        concat(&self.source)
    }

    /// Dot-joined segment names, e.g. `caster.var.name`
    pub fn path(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.name.text())
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.source.iter()
    }
}

// ============================================================================
// Skill line components
// ============================================================================

/// Which component of a skill line a config block belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Mechanic,
    Targeter,
    Trigger,
    Condition,
    Placeholder,
}

/// The primary action, e.g. `damage{amount=5}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MechanicExpr {
    pub name: GenericStringExpr,
    pub config: Option<ConfigBlock>,
    pub range: TextRange,
}

impl MechanicExpr {
    pub fn name(&self) -> String {
        self.name.text()
    }

    pub fn get(&self, key: &str) -> Option<&MlcExpr> {
        self.config.as_ref().and_then(|c| c.get(key))
    }
}

/// `@Name{config}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargeterExpr {
    pub at: Token,
    pub name: Token,
    pub config: Option<ConfigBlock>,
    pub range: TextRange,
}

impl TargeterExpr {
    pub fn name(&self) -> &str {
        &self.name.lexeme
    }
}

/// `~onName:arg{config}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerExpr {
    pub tilde: Token,
    pub name: GenericStringExpr,
    pub colon: Option<Token>,
    pub arg: Option<GenericStringExpr>,
    pub config: Option<ConfigBlock>,
    pub range: TextRange,
}

impl TriggerExpr {
    pub fn name(&self) -> String {
        self.name.text()
    }
}

/// `?!~name{config}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineConditionExpr {
    pub question: Token,
    pub negation: Option<Token>,
    pub trigger: Option<Token>,
    pub name: Token,
    pub config: Option<ConfigBlock>,
    pub range: TextRange,
}

impl InlineConditionExpr {
    pub fn name(&self) -> &str {
        &self.name.lexeme
    }

    pub fn is_negated(&self) -> bool {
        self.negation.is_some()
    }

    /// Whether the condition applies to the trigger entity (`?~`)
    pub fn is_trigger_condition(&self) -> bool {
        self.trigger.is_some()
    }
}

/// A number with an optional trailing `%`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthValue {
    pub number: Token,
    pub percent: Option<Token>,
}

impl HealthValue {
    pub fn value(&self) -> Option<f64> {
        self.number.lexeme.parse().ok()
    }

    pub fn is_percent(&self) -> bool {
        self.percent.is_some()
    }

    fn range(&self) -> TextRange {
        match &self.percent {
            Some(p) => self.number.range.cover(p.range),
            None => self.number.range,
        }
    }
}

/// `<50%`, `>10`, `=10-20`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthModifierExpr {
    pub operator: Token,
    pub min: HealthValue,
    pub dash: Option<Token>,
    pub max: Option<HealthValue>,
    pub range: TextRange,
}

impl HealthModifierExpr {
    pub(crate) fn new(
        operator: Token,
        min: HealthValue,
        dash: Option<Token>,
        max: Option<HealthValue>,
    ) -> Self {
        let end = max.as_ref().map_or_else(|| min.range(), HealthValue::range);
        let range = operator.range.cover(end);
        Self {
            operator,
            min,
            dash,
            max,
            range,
        }
    }

    pub fn operator(&self) -> TokenKind {
        self.operator.kind
    }

    pub fn is_range(&self) -> bool {
        self.max.is_some()
    }
}

/// A complete skill line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillLineExpr {
    pub mechanic: Option<MechanicExpr>,
    pub targeter: Option<TargeterExpr>,
    pub trigger: Option<TriggerExpr>,
    pub conditions: Vec<InlineConditionExpr>,
    pub chance: Option<Token>,
    pub health_modifier: Option<HealthModifierExpr>,
    /// Every token consumed while parsing this line, in order
    pub tokens: Vec<Token>,
    pub range: TextRange,
}

impl SkillLineExpr {
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// All config blocks of the line with the component they belong to
    pub fn config_blocks(&self) -> Vec<(ComponentKind, String, &ConfigBlock)> {
        let mut blocks = Vec::new();
        if let Some(m) = &self.mechanic {
            if let Some(c) = &m.config {
                blocks.push((ComponentKind::Mechanic, m.name(), c));
            }
        }
        if let Some(t) = &self.targeter {
            if let Some(c) = &t.config {
                blocks.push((ComponentKind::Targeter, t.name().to_string(), c));
            }
        }
        if let Some(t) = &self.trigger {
            if let Some(c) = &t.config {
                blocks.push((ComponentKind::Trigger, t.name(), c));
            }
        }
        for cond in &self.conditions {
            if let Some(c) = &cond.config {
                blocks.push((ComponentKind::Condition, cond.name().to_string(), c));
            }
        }
        blocks
    }
}

/// `[ - line - line ]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSkillExpr {
    pub open: Token,
    pub lines: Vec<InlineSkillLine>,
    pub close: Option<Token>,
    /// Comment tokens found inside the block
    pub comments: Vec<Token>,
    pub range: TextRange,
}

/// One dash-prefixed line of an inline skill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSkillLine {
    pub dash: Token,
    pub line: SkillLineExpr,
}

/// A reference to a skill: a name or an inline block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillReference {
    Name(GenericStringExpr),
    Inline(InlineSkillExpr),
}

impl SkillReference {
    pub fn range(&self) -> TextRange {
        match self {
            Self::Name(name) => name.range,
            Self::Inline(inline) => inline.range,
        }
    }
}
