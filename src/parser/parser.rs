//! Recursive descent parser for skill lines
//!
//! Single pass, one token of lookahead. Syntax errors are recorded and the
//! parser keeps going with the best partial node, so callers always get a
//! tree back.
//!
//! The same grammar functions drive completion. They are generic over a
//! [`Probe`] that is consulted at every decision point: the normal probe can
//! never stop (its halt type is `Infallible`), the completion probe stops
//! with a [`CompletionContext`] once the cursor is reached.

use std::convert::Infallible;

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use super::ast::{
    span_of, ComponentKind, ConfigBlock, GenericStringExpr, HealthModifierExpr, HealthValue,
    InlineConditionExpr, InlineSkillExpr, InlineSkillLine, MechanicExpr, MlcExpr,
    MlcPlaceholderExpr, MlcValueExpr, MlcValuePart, PlaceholderSegment, SkillLineExpr,
    SkillReference, TargeterExpr, TriggerExpr,
};
use super::errors::{ErrorCode, RelatedInfo, SyntaxError};
use super::lexer::{ScanResult, Token, TokenKind};

/// Parse result: the tree plus lexical and syntax errors, in that order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse<T> {
    pub tree: T,
    pub errors: Vec<SyntaxError>,
}

impl<T> Parse<T> {
    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

// ============================================================================
// Completion contexts
// ============================================================================

/// The component owning a config block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MlcOwner {
    pub kind: ComponentKind,
    pub name: SmolStr,
}

/// What may legally be typed at the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionKind {
    MechanicName,
    TargeterName,
    TriggerName,
    ConditionName,
    MlcKey { owner: MlcOwner },
    MlcValue { owner: MlcOwner, key: SmolStr },
    /// Targeter, trigger, condition, chance or health modifier
    NextComponent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionContext {
    pub kind: CompletionKind,
    /// Already typed text in front of the cursor
    pub prefix: SmolStr,
    /// Range a chosen completion replaces
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    Completions(CompletionContext),
    /// The cursor lies beyond every decision point
    Finished,
}

/// Consulted by the grammar at every decision point
trait Probe {
    type Halt;

    fn probe(
        &self,
        token: &Token,
        kind: impl FnOnce() -> CompletionKind,
    ) -> Result<(), Self::Halt>;
}

/// Normal parsing never halts
struct Parsing;

impl Probe for Parsing {
    type Halt = Infallible;

    fn probe(&self, _: &Token, _: impl FnOnce() -> CompletionKind) -> Result<(), Infallible> {
        Ok(())
    }
}

struct Completing {
    cursor: TextSize,
}

impl Probe for Completing {
    type Halt = CompletionContext;

    fn probe(
        &self,
        token: &Token,
        kind: impl FnOnce() -> CompletionKind,
    ) -> Result<(), CompletionContext> {
        let start = token.range.start();
        let in_word = matches!(token.kind, TokenKind::Identifier | TokenKind::Number)
            && start < self.cursor
            && self.cursor <= token.range.end();
        if in_word {
            let typed = usize::from(self.cursor - start);
            let prefix = token.lexeme.get(..typed).unwrap_or(&token.lexeme);
            return Err(CompletionContext {
                kind: kind(),
                prefix: SmolStr::new(prefix),
                range: token.range,
            });
        }
        if start >= self.cursor {
            return Err(CompletionContext {
                kind: kind(),
                prefix: SmolStr::default(),
                range: TextRange::empty(self.cursor),
            });
        }
        Ok(())
    }
}

fn never<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Parse a whole scanned span as one skill line
pub fn parse_skill_line(scan: &ScanResult) -> Parse<SkillLineExpr> {
    let mut parser = Parser::new(scan, Parsing);
    let line = never(parser.skill_line(&[]));
    parser.unexpected_trailing();
    parser.finish(line)
}

/// Parse a `[ - line ... ]` block scanned in inline-skill mode
pub fn parse_inline_skill(scan: &ScanResult) -> Parse<Option<InlineSkillExpr>> {
    let mut parser = Parser::new(scan, Parsing);
    parser.skip_space();
    let inline = never(parser.inline_skill());
    parser.unexpected_trailing();
    parser.finish(inline)
}

/// Parse a metaskill reference: a skill name or an inline skill
pub fn parse_skill_reference(scan: &ScanResult) -> Parse<Option<SkillReference>> {
    let mut parser = Parser::new(scan, Parsing);
    parser.skip_space();
    let reference = if parser.check(TokenKind::LeftSquareBracket) {
        never(parser.inline_skill()).map(SkillReference::Inline)
    } else {
        let name = parser.generic_string(&[TokenKind::Space]);
        if name.is_none() {
            parser.error_at_current("Expected skill name or '[' before inline skill!", ErrorCode::E0215);
        }
        name.map(SkillReference::Name)
    };
    parser.unexpected_trailing();
    parser.finish(reference)
}

/// Run the skill line grammar up to `cursor` and report what can come next
pub fn complete_skill_line(scan: &ScanResult, cursor: TextSize) -> CompletionOutcome {
    let mut parser = Parser::new(scan, Completing { cursor });
    match parser.skill_line(&[]) {
        Ok(_) => CompletionOutcome::Finished,
        Err(context) => CompletionOutcome::Completions(context),
    }
}

/// Like [`complete_skill_line`] for a scan of an inline skill block
pub fn complete_inline_skill(scan: &ScanResult, cursor: TextSize) -> CompletionOutcome {
    let mut parser = Parser::new(scan, Completing { cursor });
    parser.skip_space();
    match parser.inline_skill() {
        Ok(_) => CompletionOutcome::Finished,
        Err(context) => CompletionOutcome::Completions(context),
    }
}

// ============================================================================
// Parser state
// ============================================================================

struct Parser<'t, P> {
    scan: &'t ScanResult,
    tokens: &'t [Token],
    pos: usize,
    errors: Vec<SyntaxError>,
    probe: P,
}

impl<'t, P: Probe> Parser<'t, P> {
    fn new(scan: &'t ScanResult, probe: P) -> Self {
        Self {
            scan,
            tokens: scan.tokens(),
            pos: 0,
            errors: Vec::new(),
            probe,
        }
    }

    fn finish<T>(self, tree: T) -> Parse<T> {
        let mut errors = self.scan.errors().to_vec();
        errors.extend(self.errors);
        Parse { tree, errors }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    /// The current token; the trailing `Eof` once the stream is exhausted
    fn peek(&self) -> &'t Token {
        let tokens: &'t [Token] = self.tokens;
        &tokens[self.pos.min(tokens.len().saturating_sub(1))]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn check_any(&self, kinds: &[TokenKind]) -> bool {
        !self.is_at_end() && kinds.contains(&self.peek().kind)
    }

    fn suggest(&self, kind: impl FnOnce() -> CompletionKind) -> Result<(), P::Halt> {
        self.probe.probe(self.peek(), kind)
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn advance(&mut self) -> &'t Token {
        let token = self.peek();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> Option<&'t Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str, code: ErrorCode) -> Option<Token> {
        match self.eat(kind) {
            Some(token) => Some(token.clone()),
            None => {
                self.error_at_current(message, code);
                None
            }
        }
    }

    /// Expect a closing delimiter, pointing back at its opener on failure
    fn expect_closing(
        &mut self,
        kind: TokenKind,
        message: &str,
        code: ErrorCode,
        opener: &Token,
    ) -> Option<Token> {
        if let Some(token) = self.eat(kind) {
            return Some(token.clone());
        }
        let error = self
            .found_error(message, code)
            .with_related(RelatedInfo::new(format!("'{}' opened here", opener.lexeme), opener.range));
        self.errors.push(error);
        None
    }

    fn skip_space(&mut self) {
        while self.eat(TokenKind::Space).is_some() {}
    }

    /// Advance one token, or past a whole balanced `{...}` / `[...]` group
    fn advance_with_brace(&mut self) {
        if !self.peek().kind.is_opening() {
            self.advance();
            return;
        }
        let mut depth = 0usize;
        while !self.is_at_end() {
            let token = self.advance();
            if token.kind.is_opening() {
                depth += 1;
            } else if token.kind.is_closing() {
                depth -= 1;
                if depth == 0 {
                    return;
                }
            }
        }
    }

    /// Skip to (not past) the next top-level token of `kinds`
    fn recover(&mut self, kinds: &[TokenKind]) {
        while !self.is_at_end() && !self.check_any(kinds) {
            self.advance_with_brace();
        }
    }

    fn found_error(&self, message: &str, code: ErrorCode) -> SyntaxError {
        let found = self.peek();
        SyntaxError::new(
            format!("{message} (got {} '{}')", found.kind, found.lexeme),
            found.range,
            code,
        )
    }

    fn error_at_current(&mut self, message: &str, code: ErrorCode) {
        let error = self.found_error(message, code);
        self.errors.push(error);
    }

    fn unexpected_trailing(&mut self) {
        self.skip_space();
        if !self.is_at_end() {
            let start = self.peek().range.start();
            let end = self.tokens.last().map_or(start, |t| t.range.start());
            self.errors.push(SyntaxError::new(
                format!("Unexpected '{}' after end of expression!", self.peek().lexeme),
                TextRange::new(start, end),
                ErrorCode::E0214,
            ));
        }
    }

    fn consumed_since(&self, start: usize) -> &'t [Token] {
        let tokens: &'t [Token] = self.tokens;
        &tokens[start.min(self.pos)..self.pos]
    }

    fn here(&self) -> TextRange {
        TextRange::empty(self.peek().range.start())
    }

    // =========================================================================
    // Grammar
    // =========================================================================

    fn skill_line(&mut self, exits: &[TokenKind]) -> Result<SkillLineExpr, P::Halt> {
        let start = self.pos;
        self.skip_space();
        let mechanic = self.mechanic(exits)?;
        let mut targeter: Option<TargeterExpr> = None;
        let mut trigger: Option<TriggerExpr> = None;
        let mut conditions = Vec::new();
        let mut chance = None;
        let mut health_modifier = None;

        loop {
            self.skip_space();
            self.suggest(|| CompletionKind::NextComponent)?;
            if self.is_at_end() || self.check_any(exits) {
                break;
            }
            match self.peek().kind {
                TokenKind::At => {
                    let parsed = self.targeter()?;
                    if targeter.is_none() {
                        targeter = parsed;
                    } else if let Some(duplicate) = parsed {
                        self.errors.push(SyntaxError::new(
                            "Duplicate targeter!",
                            duplicate.range,
                            ErrorCode::E0211,
                        ));
                    }
                }
                TokenKind::Tilde => {
                    let parsed = self.trigger(exits)?;
                    if trigger.is_none() {
                        trigger = parsed;
                    } else if let Some(duplicate) = parsed {
                        self.errors.push(SyntaxError::new(
                            "Duplicate trigger!",
                            duplicate.range,
                            ErrorCode::E0212,
                        ));
                    }
                }
                TokenKind::Question => {
                    if let Some(condition) = self.inline_condition()? {
                        conditions.push(condition);
                    }
                }
                TokenKind::Number => chance = Some(self.advance().clone()),
                TokenKind::Equal | TokenKind::GreaterThan | TokenKind::LessThan => {
                    if let Some(modifier) = self.health_modifier() {
                        health_modifier = Some(modifier);
                    }
                }
                _ => {
                    let found = self.peek();
                    self.errors.push(SyntaxError::new(
                        format!(
                            "Expected targeter, trigger or condition, but found '{}'!",
                            found.lexeme
                        ),
                        found.range,
                        ErrorCode::E0214,
                    ));
                    self.advance_with_brace();
                }
            }
        }

        let tokens = self.consumed_since(start).to_vec();
        let range = span_of(&tokens, self.here());
        Ok(SkillLineExpr {
            mechanic,
            targeter,
            trigger,
            conditions,
            chance,
            health_modifier,
            tokens,
            range,
        })
    }

    fn mechanic(&mut self, exits: &[TokenKind]) -> Result<Option<MechanicExpr>, P::Halt> {
        self.suggest(|| CompletionKind::MechanicName)?;
        let mut end = vec![TokenKind::LeftBrace, TokenKind::Space];
        end.extend(exits.iter().filter(|k| **k != TokenKind::Dash));
        let Some(name) = self.generic_string(&end) else {
            self.error_at_current("Expected mechanic name!", ErrorCode::E0205);
            return Ok(None);
        };
        let config = self.optional_config(ComponentKind::Mechanic, &name.text(), "mechanic")?;
        let range = cover_config(name.range, config.as_ref());
        Ok(Some(MechanicExpr {
            name,
            config,
            range,
        }))
    }

    fn targeter(&mut self) -> Result<Option<TargeterExpr>, P::Halt> {
        let at = self.advance().clone();
        self.suggest(|| CompletionKind::TargeterName)?;
        let Some(name) = self.expect(TokenKind::Identifier, "Expected targeter name!", ErrorCode::E0206)
        else {
            return Ok(None);
        };
        let config = self.optional_config(ComponentKind::Targeter, &name.lexeme, "targeter")?;
        let range = cover_config(at.range.cover(name.range), config.as_ref());
        Ok(Some(TargeterExpr {
            at,
            name,
            config,
            range,
        }))
    }

    fn trigger(&mut self, exits: &[TokenKind]) -> Result<Option<TriggerExpr>, P::Halt> {
        let tilde = self.advance().clone();
        self.suggest(|| CompletionKind::TriggerName)?;
        let mut end = vec![TokenKind::LeftBrace, TokenKind::Space, TokenKind::Colon];
        end.extend_from_slice(exits);
        let Some(name) = self.generic_string(&end) else {
            self.error_at_current("Expected trigger name!", ErrorCode::E0207);
            return Ok(None);
        };

        let mut colon = None;
        let mut arg = None;
        if let Some(token) = self.eat(TokenKind::Colon) {
            colon = Some(token.clone());
            let mut end = vec![TokenKind::LeftBrace, TokenKind::Space];
            end.extend_from_slice(exits);
            arg = self.generic_string(&end);
            if arg.is_none() {
                self.error_at_current("Expected trigger argument after ':'!", ErrorCode::E0207);
            }
        }

        let config = self.optional_config(ComponentKind::Trigger, &name.text(), "trigger")?;
        let mut range = tilde.range.cover(name.range);
        if let Some(end) = arg.as_ref().map(|a| a.range).or(colon.as_ref().map(|c| c.range)) {
            range = range.cover(end);
        }
        let range = cover_config(range, config.as_ref());
        Ok(Some(TriggerExpr {
            tilde,
            name,
            colon,
            arg,
            config,
            range,
        }))
    }

    fn inline_condition(&mut self) -> Result<Option<InlineConditionExpr>, P::Halt> {
        let question = self.advance().clone();
        let negation = self.eat(TokenKind::Exclamation).cloned();
        let trigger = self.eat(TokenKind::Tilde).cloned();
        self.suggest(|| CompletionKind::ConditionName)?;
        let Some(name) = self.expect(
            TokenKind::Identifier,
            "Expected inline condition name!",
            ErrorCode::E0208,
        ) else {
            return Ok(None);
        };
        let config = self.optional_config(ComponentKind::Condition, &name.lexeme, "inline condition")?;
        let range = cover_config(question.range.cover(name.range), config.as_ref());
        Ok(Some(InlineConditionExpr {
            question,
            negation,
            trigger,
            name,
            config,
            range,
        }))
    }

    fn health_modifier(&mut self) -> Option<HealthModifierExpr> {
        let operator = self.advance().clone();
        let number = self.expect(TokenKind::Number, "Expected health modifier value!", ErrorCode::E0210)?;
        let min = HealthValue {
            number,
            percent: self.eat(TokenKind::Percent).cloned(),
        };

        if operator.kind == TokenKind::Equal {
            if let Some(dash) = self.eat(TokenKind::Dash).cloned() {
                let max = self
                    .expect(
                        TokenKind::Number,
                        "Expected second health modifier value!",
                        ErrorCode::E0210,
                    )
                    .map(|number| HealthValue {
                        number,
                        percent: self.eat(TokenKind::Percent).cloned(),
                    });
                return Some(HealthModifierExpr::new(operator, min, Some(dash), max));
            }
        }
        Some(HealthModifierExpr::new(operator, min, None, None))
    }

    fn optional_config(
        &mut self,
        kind: ComponentKind,
        owner: &str,
        label: &str,
    ) -> Result<Option<ConfigBlock>, P::Halt> {
        if !self.check(TokenKind::LeftBrace) {
            return Ok(None);
        }
        let left_brace = self.advance().clone();
        let owner = MlcOwner {
            kind,
            name: SmolStr::new(owner),
        };
        let entries = self.mlc(&owner)?;
        let right_brace = self.expect_closing(
            TokenKind::RightBrace,
            &format!("Expected '}}' after {label} mlc!"),
            ErrorCode::E0201,
            &left_brace,
        );
        Ok(Some(ConfigBlock {
            left_brace,
            entries,
            right_brace,
        }))
    }

    fn mlc(&mut self, owner: &MlcOwner) -> Result<Vec<MlcExpr>, P::Halt> {
        let mut entries = Vec::new();
        loop {
            self.skip_space();
            self.suggest(|| CompletionKind::MlcKey {
                owner: owner.clone(),
            })?;
            if self.is_at_end() || self.check(TokenKind::RightBrace) {
                break;
            }
            let Some(key) = self.expect(TokenKind::Identifier, "Expected mlc key!", ErrorCode::E0209)
            else {
                self.recover(&[TokenKind::Semicolon, TokenKind::RightBrace]);
                if self.eat(TokenKind::Semicolon).is_some() {
                    continue;
                }
                break;
            };
            self.skip_space();
            let equals = self.expect(TokenKind::Equal, "Expected '=' after mlc key!", ErrorCode::E0204);
            self.suggest(|| CompletionKind::MlcValue {
                owner: owner.clone(),
                key: key.lexeme.clone(),
            })?;
            let value = self.mlc_value()?;
            let semicolon = self.eat(TokenKind::Semicolon).cloned();
            let range = key.range.cover(value.range);
            let done = semicolon.is_none();
            entries.push(MlcExpr {
                key,
                equals,
                value,
                semicolon,
                range,
            });
            if done {
                break;
            }
        }
        Ok(entries)
    }

    fn mlc_value(&mut self) -> Result<MlcValueExpr, P::Halt> {
        let start = self.pos;
        let mut run_start = self.pos;
        let mut parts = Vec::new();
        while !self.is_at_end()
            && !self.check(TokenKind::Semicolon)
            && !self.check(TokenKind::RightBrace)
        {
            if self.check(TokenKind::LessThan) {
                let run = self.consumed_since(run_start);
                if !run.is_empty() {
                    parts.push(MlcValuePart::Literal(run.to_vec()));
                }
                let placeholder = self.placeholder()?;
                parts.push(MlcValuePart::Placeholder(placeholder));
                run_start = self.pos;
            } else {
                self.advance_with_brace();
            }
        }
        let run = self.consumed_since(run_start);
        if !run.is_empty() {
            parts.push(MlcValuePart::Literal(run.to_vec()));
        }
        let range = span_of(self.consumed_since(start), self.here());
        Ok(MlcValueExpr { parts, range })
    }

    fn placeholder(&mut self) -> Result<MlcPlaceholderExpr, P::Halt> {
        const SEGMENT_END: &[TokenKind] = &[
            TokenKind::GreaterThan,
            TokenKind::Dot,
            TokenKind::LeftBrace,
            TokenKind::RightBrace,
            TokenKind::Semicolon,
        ];

        let start = self.pos;
        let open = self.advance().clone();
        let mut segments = Vec::new();
        let mut dots = Vec::new();
        loop {
            let Some(name) = self.generic_string(SEGMENT_END) else {
                self.error_at_current("Expected placeholder name!", ErrorCode::E0216);
                break;
            };
            let config = self.optional_config(ComponentKind::Placeholder, &name.text(), "placeholder")?;
            segments.push(PlaceholderSegment { name, config });
            match self.eat(TokenKind::Dot) {
                Some(dot) => dots.push(dot.clone()),
                None => break,
            }
        }
        let close = self.expect_closing(
            TokenKind::GreaterThan,
            "Expected '>' after placeholder!",
            ErrorCode::E0203,
            &open,
        );
        let source = self.consumed_since(start).to_vec();
        let range = span_of(&source, open.range);
        Ok(MlcPlaceholderExpr {
            open,
            segments,
            dots,
            close,
            source,
            range,
        })
    }

    fn inline_skill(&mut self) -> Result<Option<InlineSkillExpr>, P::Halt> {
        let Some(open) = self.expect(
            TokenKind::LeftSquareBracket,
            "Expected '[' before inline skill!",
            ErrorCode::E0215,
        ) else {
            return Ok(None);
        };

        let exits = [TokenKind::RightSquareBracket, TokenKind::Dash];
        let mut lines = Vec::new();
        while !self.is_at_end() && !self.check(TokenKind::RightSquareBracket) {
            self.skip_space();
            if self.is_at_end() || self.check(TokenKind::RightSquareBracket) {
                break;
            }
            let Some(dash) = self.expect(TokenKind::Dash, "Expected '-' after '['!", ErrorCode::E0213)
            else {
                self.advance_with_brace();
                continue;
            };
            self.skip_space();
            let line = self.skill_line(&exits)?;
            lines.push(InlineSkillLine { dash, line });
        }

        let close = self.expect_closing(
            TokenKind::RightSquareBracket,
            "Expected ']' after inline skill!",
            ErrorCode::E0202,
            &open,
        );
        let range = open.range.cover(close.as_ref().map_or(self.here(), |c| c.range));
        let comments = self
            .scan
            .comments()
            .iter()
            .filter(|c| range.contains_range(c.range))
            .cloned()
            .collect();
        Ok(Some(InlineSkillExpr {
            open,
            lines,
            close,
            comments,
            range,
        }))
    }

    fn generic_string(&mut self, end: &[TokenKind]) -> Option<GenericStringExpr> {
        let start = self.pos;
        while !self.is_at_end() && !self.check_any(end) {
            self.advance_with_brace();
        }
        let tokens = self.consumed_since(start);
        if tokens.is_empty() {
            return None;
        }
        Some(GenericStringExpr::new(tokens.to_vec(), self.here()))
    }
}

fn cover_config(range: TextRange, config: Option<&ConfigBlock>) -> TextRange {
    match config {
        Some(config) => range.cover(config.range()),
        None => range,
    }
}
