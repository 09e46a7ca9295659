//! Classified tokens produced by the header token reader.
//!
//! A [`Token`] is a positioned view into the caller-owned source buffer. It
//! never owns text, so tokens are `Copy` and can be recorded and replayed
//! without touching the buffer again.

use std::fmt;

use crate::Span;

/// Lexical classification of a token.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum TokenKind {
    /// No token; the default value of an unset token.
    #[default]
    None,
    /// `[A-Za-z_][A-Za-z0-9_]*` (letters include non-ASCII alphabetics).
    Identifier,
    /// Decimal (or octal-looking) integer constant, with optional `u`/`l` suffixes.
    DecimalConst,
    /// Floating point constant: has a `.`, an exponent, or an `f` suffix.
    FloatConst,
    /// `0x`/`0X` prefixed integer constant.
    HexConst,
    /// Single character constant including quotes: `'a'`, `'\n'`.
    CharConst,
    /// String constant including quotes.
    StringConst,
    /// One or two character punctuation.
    Symbol,
    /// Raw remainder of a line, produced by `get_line`.
    Line,
    /// End of the buffer. Terminal: once produced it is produced forever.
    EndOfFile,
}

impl TokenKind {
    /// `EndOfFile` and `None` end a token stream and are never recorded.
    #[inline]
    pub fn is_end_type(self) -> bool {
        matches!(self, TokenKind::EndOfFile | TokenKind::None)
    }

    /// Any of the numeric constant kinds.
    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            TokenKind::DecimalConst | TokenKind::FloatConst | TokenKind::HexConst
        )
    }

    /// Human-readable name used in dumps and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::None => "none",
            TokenKind::Identifier => "identifier",
            TokenKind::DecimalConst => "decimal constant",
            TokenKind::FloatConst => "float constant",
            TokenKind::HexConst => "hex constant",
            TokenKind::CharConst => "character constant",
            TokenKind::StringConst => "string constant",
            TokenKind::Symbol => "symbol",
            TokenKind::Line => "line",
            TokenKind::EndOfFile => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified, positioned slice of source text.
///
/// `span` covers exactly `text`. The unget position is where the reader
/// stood before it skipped the whitespace and comments leading up to this
/// token; rewinding there re-captures those comments.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub span: Span,
    /// 1-based line of the first character.
    pub start_line: u32,
    /// 1-based line the reader was on after the last character.
    pub end_line: u32,
    pub unget_pos: u32,
    pub unget_line: u32,
    pub text: &'src str,
}

impl<'src> Token<'src> {
    /// Create a token whose unget point is its own start.
    pub fn new(
        kind: TokenKind,
        span: Span,
        start_line: u32,
        end_line: u32,
        text: &'src str,
    ) -> Self {
        Token {
            kind,
            span,
            start_line,
            end_line,
            unget_pos: span.start,
            unget_line: start_line,
            text,
        }
    }

    /// Set the position the reader rewinds to when this token is discarded.
    #[must_use]
    pub fn with_unget(mut self, pos: u32, line: u32) -> Self {
        self.unget_pos = pos;
        self.unget_line = line;
        self
    }

    #[inline]
    pub fn is_end_type(&self) -> bool {
        self.kind.is_end_type()
    }

    /// Check for a symbol token with exactly this text.
    #[inline]
    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Symbol && self.text == symbol
    }

    /// Check for an identifier token with exactly this text.
    #[inline]
    pub fn is_identifier(&self, name: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == name
    }

    /// Byte offset of the first character.
    #[inline]
    pub fn start_pos(&self) -> u32 {
        self.span.start
    }

    /// Byte offset one past the last character.
    #[inline]
    pub fn end_pos(&self) -> u32 {
        self.span.end
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} `{}` @ {}:{}",
            self.kind, self.text, self.start_line, self.span
        )
    }
}
