//! Token classification and whitespace/comment skipping.

use refl_ir::{Span, Token, TokenKind, MAX_NAME_LENGTH, MAX_STRING_LENGTH};
use refl_lexer_core::classify::{
    is_digit, is_exponent_marker, is_float_marker, is_hex_digit, is_hex_marker, is_ident_continue,
    is_ident_start, is_integer_suffix, is_sign,
};
use refl_lexer_core::is_compound_operator;

use super::TokenReader;
use crate::{TokenizeError, TokenizeErrorKind};

impl<'src> TokenReader<'src> {
    /// Scan the next token, handling directives.
    pub(super) fn scan_token(&mut self) -> Result<Token<'src>, TokenizeError> {
        let mut got_inline_comment = false;
        loop {
            let token = self.scan_raw_token(&mut got_inline_comment, true)?;
            if token.is_symbol("#")
                && self.preprocessor.is_some()
                && self.is_first_token_in_line(&token)
            {
                if self.handle_directive(&token)? {
                    self.clear_pending_comments();
                    got_inline_comment = false;
                }
                continue;
            }
            return Ok(token);
        }
    }

    /// Scan one token without looking at directives.
    ///
    /// Comments are only collected when `capture_comments` is set; skipped
    /// blocks scan with it cleared.
    pub(super) fn scan_raw_token(
        &mut self,
        got_inline_comment: &mut bool,
        capture_comments: bool,
    ) -> Result<Token<'src>, TokenizeError> {
        let unget_pos = self.cursor.pos();
        let unget_line = self.cursor.line();
        self.skip_trivia(got_inline_comment, capture_comments)?;

        let start = self.cursor.pos();
        let start_line = self.cursor.line();
        let kind = if self.cursor.is_eof() {
            TokenKind::EndOfFile
        } else {
            let c = self.cursor.current_char();
            if is_ident_start(c) {
                self.scan_identifier(start, start_line)?
            } else if self.at_number_start(c) {
                self.scan_number(start, start_line)?
            } else if c == '\'' {
                self.scan_char_const(start, start_line)?
            } else if c == '"' {
                self.scan_string(start, start_line)?
            } else {
                self.scan_symbol()
            }
        };

        let end = self.cursor.pos();
        Ok(Token::new(
            kind,
            Span::new(start, end),
            start_line,
            self.cursor.line(),
            self.cursor.slice(start, end),
        )
        .with_unget(unget_pos, unget_line))
    }

    fn scan_identifier(&mut self, start: u32, line: u32) -> Result<TokenKind, TokenizeError> {
        self.cursor.bump();
        self.cursor.eat_while(is_ident_continue);
        if (self.cursor.pos() - start) as usize >= MAX_NAME_LENGTH {
            return Err(TokenizeError::new(
                TokenizeErrorKind::IdentifierTooLong,
                start,
                line,
            ));
        }
        Ok(TokenKind::Identifier)
    }

    /// `[0-9]`, `[+-][0-9]`, `[+-].[0-9]` or `.[0-9]`.
    fn at_number_start(&self, c: char) -> bool {
        let next = char::from(self.cursor.peek());
        let after = char::from(self.cursor.peek2());
        if is_digit(c) {
            true
        } else if is_sign(c) {
            is_digit(next) || (next == '.' && is_digit(after))
        } else {
            c == '.' && is_digit(next)
        }
    }

    fn scan_number(&mut self, start: u32, line: u32) -> Result<TokenKind, TokenizeError> {
        let cursor = &mut self.cursor;
        if is_sign(cursor.current_char()) {
            cursor.bump();
        }

        let kind = if cursor.current() == b'0' && is_hex_marker(char::from(cursor.peek())) {
            cursor.bump();
            cursor.bump();
            cursor.eat_while(is_hex_digit);
            TokenKind::HexConst
        } else {
            let mut is_float = false;
            cursor.eat_while(is_digit);
            if cursor.eat(b'.') {
                is_float = true;
                cursor.eat_while(is_digit);
            }
            if is_exponent_marker(cursor.current_char()) {
                is_float = true;
                cursor.bump();
                if is_sign(cursor.current_char()) {
                    cursor.bump();
                }
                cursor.eat_while(is_digit);
            }
            if is_float_marker(cursor.current_char()) {
                is_float = true;
                cursor.bump();
            }
            cursor.eat_while(is_integer_suffix);
            if is_float {
                TokenKind::FloatConst
            } else {
                TokenKind::DecimalConst
            }
        };

        if (self.cursor.pos() - start) as usize >= MAX_NAME_LENGTH {
            return Err(TokenizeError::new(TokenizeErrorKind::NumberTooLong, start, line));
        }
        Ok(kind)
    }

    fn scan_char_const(&mut self, start: u32, line: u32) -> Result<TokenKind, TokenizeError> {
        self.cursor.bump();
        if self.cursor.bump_char() == '\\' {
            self.cursor.bump();
        }
        if self.cursor.is_eof() || self.cursor.bump_char() != '\'' {
            return Err(TokenizeError::new(
                TokenizeErrorKind::UnterminatedCharConst,
                start,
                line,
            ));
        }
        Ok(TokenKind::CharConst)
    }

    /// String constants may span lines; the line counter follows them.
    fn scan_string(&mut self, start: u32, line: u32) -> Result<TokenKind, TokenizeError> {
        let unterminated = TokenizeError::new(TokenizeErrorKind::UnterminatedString, start, line);
        self.cursor.bump();
        loop {
            if self.cursor.is_eof() {
                return Err(unterminated);
            }
            match self.cursor.bump_char() {
                '"' => break,
                '\\' => {
                    if self.cursor.is_eof() {
                        return Err(unterminated);
                    }
                    self.cursor.bump();
                }
                _ => {}
            }
        }
        if (self.cursor.pos() - start) as usize >= MAX_STRING_LENGTH {
            return Err(TokenizeError::new(TokenizeErrorKind::StringTooLong, start, line));
        }
        Ok(TokenKind::StringConst)
    }

    /// One character, or two for a compound operator. `>>` stays two tokens.
    fn scan_symbol(&mut self) -> TokenKind {
        let first = self.cursor.bump_char();
        if !self.cursor.is_eof() && is_compound_operator(first, self.cursor.current_char()) {
            self.cursor.bump();
        }
        TokenKind::Symbol
    }

    /// Skip whitespace and comments in front of a token.
    ///
    /// `got_inline_comment` survives directive restarts within one scan so
    /// that a blank line after a line comment still starts a new group.
    pub(super) fn skip_trivia(
        &mut self,
        got_inline_comment: &mut bool,
        capture_comments: bool,
    ) -> Result<(), TokenizeError> {
        let mut got_newline_between_comments = false;
        loop {
            match self.cursor.current() {
                b'\n' => {
                    got_newline_between_comments |= *got_inline_comment;
                    self.cursor.bump();
                }
                b' ' | b'\t' | b'\r' => self.cursor.bump(),
                b'/' if self.cursor.peek() == b'*' => {
                    if capture_comments {
                        self.clear_all_comments();
                    }
                    let start = self.cursor.pos();
                    let line = self.cursor.line();
                    self.cursor.bump();
                    self.cursor.bump();
                    if !self.cursor.eat_block_comment_body() {
                        if capture_comments {
                            self.clear_all_comments();
                        }
                        return Err(TokenizeError::new(
                            TokenizeErrorKind::UnterminatedComment,
                            start,
                            line,
                        ));
                    }
                    if capture_comments {
                        self.comments.push(self.cursor.slice_from(start));
                    }
                }
                b'/' if self.cursor.peek() == b'/' => {
                    if got_newline_between_comments {
                        got_newline_between_comments = false;
                        if capture_comments {
                            self.clear_all_comments();
                        }
                    }
                    *got_inline_comment = true;
                    let start = self.cursor.pos();
                    self.cursor.eat_until_newline_or_eof();
                    let text = self.cursor.slice_from(start);
                    self.cursor.eat(b'\n');
                    if capture_comments {
                        self.comments.push(text.strip_suffix('\r').unwrap_or(text));
                    }
                }
                _ => return Ok(()),
            }
        }
    }
}
