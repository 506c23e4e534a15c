//! Logos-based scanner for skill lines
//!
//! Turns a span of a YAML scalar into typed tokens with absolute ranges.
//! Whitespace is kept (coalesced into `Space`) because mechanic and trigger
//! names end at whitespace. The stream always ends in exactly one `Eof`.

use std::fmt;

use logos::Logos;
use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use super::errors::{ErrorCode, SyntaxError};

/// Token kinds produced by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    At,
    Tilde,
    Question,
    Exclamation,
    Equal,
    GreaterThan,
    LessThan,
    LeftBrace,
    RightBrace,
    LeftSquareBracket,
    RightSquareBracket,
    LeftParen,
    RightParen,
    Dash,
    Colon,
    Semicolon,
    Dot,
    Comma,
    Percent,
    Plus,
    Star,
    Slash,
    Hash,
    Ampersand,
    Caret,
    Pipe,
    Identifier,
    Number,
    String,
    Space,
    Comment,
    Unknown,
    Eof,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Space | Self::Comment)
    }

    pub fn is_opening(self) -> bool {
        matches!(self, Self::LeftBrace | Self::LeftSquareBracket)
    }

    pub fn is_closing(self) -> bool {
        matches!(self, Self::RightBrace | Self::RightSquareBracket)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A token with its kind, text, and absolute range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: SmolStr,
    pub range: TextRange,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<SmolStr>, range: TextRange) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            range,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// How `#` is treated by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// A single skill line: `#` is an ordinary `Hash` token
    #[default]
    SkillLine,
    /// A multi-line inline skill block: `#` at line start begins a comment
    InlineSkill,
}

/// Output of one scanner run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    tokens: Vec<Token>,
    comments: Vec<Token>,
    errors: Vec<SyntaxError>,
}

impl ScanResult {
    /// Parser tokens, always terminated by exactly one `Eof`.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Line comments found in inline-skill mode.
    pub fn comments(&self) -> &[Token] {
        &self.comments
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Logos token enum - maps to TokenKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n]+")]
    Space,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'[^'\n]*'")]
    String,

    /// A quote with no closing partner on its line
    #[token("\"")]
    #[token("'")]
    LoneQuote,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("@")]
    At,
    #[token("~")]
    Tilde,
    #[token("?")]
    Question,
    #[token("!")]
    Exclamation,
    #[token("=")]
    Equal,
    #[token(">")]
    GreaterThan,
    #[token("<")]
    LessThan,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token("[")]
    LeftSquareBracket,
    #[token("]")]
    RightSquareBracket,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("-")]
    Dash,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("%")]
    Percent,
    #[token("+")]
    Plus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("#")]
    Hash,
    #[token("&")]
    Ampersand,
    #[token("^")]
    Caret,
    #[token("|")]
    Pipe,
}

impl From<LogosToken> for TokenKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Space => TokenKind::Space,
            LogosToken::Identifier => TokenKind::Identifier,
            LogosToken::Number => TokenKind::Number,
            LogosToken::String => TokenKind::String,
            LogosToken::LoneQuote => TokenKind::Unknown,
            LogosToken::At => TokenKind::At,
            LogosToken::Tilde => TokenKind::Tilde,
            LogosToken::Question => TokenKind::Question,
            LogosToken::Exclamation => TokenKind::Exclamation,
            LogosToken::Equal => TokenKind::Equal,
            LogosToken::GreaterThan => TokenKind::GreaterThan,
            LogosToken::LessThan => TokenKind::LessThan,
            LogosToken::LeftBrace => TokenKind::LeftBrace,
            LogosToken::RightBrace => TokenKind::RightBrace,
            LogosToken::LeftSquareBracket => TokenKind::LeftSquareBracket,
            LogosToken::RightSquareBracket => TokenKind::RightSquareBracket,
            LogosToken::LeftParen => TokenKind::LeftParen,
            LogosToken::RightParen => TokenKind::RightParen,
            LogosToken::Dash => TokenKind::Dash,
            LogosToken::Colon => TokenKind::Colon,
            LogosToken::Semicolon => TokenKind::Semicolon,
            LogosToken::Dot => TokenKind::Dot,
            LogosToken::Comma => TokenKind::Comma,
            LogosToken::Percent => TokenKind::Percent,
            LogosToken::Plus => TokenKind::Plus,
            LogosToken::Star => TokenKind::Star,
            LogosToken::Slash => TokenKind::Slash,
            LogosToken::Hash => TokenKind::Hash,
            LogosToken::Ampersand => TokenKind::Ampersand,
            LogosToken::Caret => TokenKind::Caret,
            LogosToken::Pipe => TokenKind::Pipe,
        }
    }
}

/// Scan `source`, which starts at absolute `offset` in its document.
///
/// Never fails: unscannable input becomes an `Unknown` token plus an error,
/// and the cursor always advances.
pub fn scan(source: &str, offset: TextSize, mode: ScanMode) -> ScanResult {
    let mut lexer = LogosToken::lexer(source);
    let mut tokens = Vec::new();
    let mut comments = Vec::new();
    let mut errors = Vec::new();

    while let Some(result) = lexer.next() {
        let kind = match result {
            Ok(LogosToken::Hash)
                if mode == ScanMode::InlineSkill && starts_line(source, lexer.span().start) =>
            {
                let rest = lexer.remainder();
                lexer.bump(rest.find('\n').unwrap_or(rest.len()));
                TokenKind::Comment
            }
            Ok(LogosToken::LoneQuote) => {
                let rest = lexer.remainder();
                lexer.bump(rest.len());
                let range = absolute(lexer.span(), offset);
                errors.push(SyntaxError::new(
                    "Unterminated string literal!",
                    range,
                    ErrorCode::E0102,
                ));
                TokenKind::Unknown
            }
            Ok(token) => token.into(),
            Err(()) => {
                let range = absolute(lexer.span(), offset);
                errors.push(SyntaxError::new(
                    format!("Unexpected character '{}'!", lexer.slice()),
                    range,
                    ErrorCode::E0101,
                ));
                TokenKind::Unknown
            }
        };

        let token = Token::new(kind, lexer.slice(), absolute(lexer.span(), offset));
        if kind == TokenKind::Comment {
            comments.push(token);
        } else {
            tokens.push(token);
        }
    }

    let end = offset + TextSize::of(source);
    tokens.push(Token::new(TokenKind::Eof, "", TextRange::empty(end)));

    tracing::trace!(
        tokens = tokens.len(),
        comments = comments.len(),
        errors = errors.len(),
        "scanned span"
    );

    ScanResult {
        tokens,
        comments,
        errors,
    }
}

/// Whether only blanks precede `index` on its line within `source`.
fn starts_line(source: &str, index: usize) -> bool {
    source[..index]
        .chars()
        .rev()
        .take_while(|c| *c != '\n')
        .all(|c| c == ' ' || c == '\t' || c == '\r')
}

fn absolute(span: std::ops::Range<usize>, offset: TextSize) -> TextRange {
    TextRange::new(
        offset + TextSize::new(span.start as u32),
        offset + TextSize::new(span.end as u32),
    )
}
