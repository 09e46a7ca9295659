//! The token reader.
//!
//! Single-token lookahead over a borrowed buffer. The reader keeps:
//! - at most one cached token (filled by [`TokenReader::peek_token`])
//! - the comment list, split into committed and pending comments
//! - one save slot for backtracking
//! - the recording buffer
//!
//! # Comments
//!
//! Comments are collected while skipping the whitespace in front of a token
//! and stay *pending* until that token is consumed, at which point they are
//! *committed* and visible through [`TokenReader::comments`]. A block
//! comment, or a line comment separated from the previous line comment by a
//! blank line, starts a new comment group and drops everything collected so
//! far. While comments are disabled, consuming a token discards the pending
//! comments instead of committing them.

mod directive;
mod scan;

use std::sync::Arc;

use refl_diagnostic::MessageSink;
use refl_ir::{Span, Token, TokenKind, MAX_STRING_LENGTH};
use refl_lexer_core::{classify, Cursor};
use tracing::trace;

use crate::{RawStringOptions, TokenPreprocessor, TokenizeError, TokenizeErrorKind};

/// Snapshot taken by [`TokenReader::save_state`].
#[derive(Clone, Debug)]
struct SavedState<'src> {
    pos: u32,
    line: u32,
    comments: Vec<&'src str>,
    committed_comments: usize,
}

/// Reads classified tokens from a header buffer.
pub struct TokenReader<'src> {
    cursor: Cursor<'src>,
    /// Token buffered by `peek_token`.
    current: Option<Token<'src>>,
    comments: Vec<&'src str>,
    /// `comments[..committed_comments]` are committed, the rest pending.
    committed_comments: usize,
    comments_disable_count: u32,
    /// Pending comments that predate the directive being handled.
    preprocessor_pending_comments: usize,
    saved: Option<SavedState<'src>>,
    recording: bool,
    recorded: Vec<Token<'src>>,
    preprocessor: Option<Box<dyn TokenPreprocessor + 'src>>,
    sink: Arc<dyn MessageSink>,
}

impl<'src> TokenReader<'src> {
    /// Create a reader over `source`, reporting non-fatal findings to `sink`.
    pub fn new(source: &'src str, sink: Arc<dyn MessageSink>) -> Self {
        TokenReader {
            cursor: Cursor::new(source),
            current: None,
            comments: Vec::new(),
            committed_comments: 0,
            comments_disable_count: 0,
            preprocessor_pending_comments: 0,
            saved: None,
            recording: false,
            recorded: Vec::new(),
            preprocessor: None,
            sink,
        }
    }

    /// Attach a directive handler, returning the previous one.
    pub fn set_preprocessor(
        &mut self,
        preprocessor: Box<dyn TokenPreprocessor + 'src>,
    ) -> Option<Box<dyn TokenPreprocessor + 'src>> {
        self.preprocessor.replace(preprocessor)
    }

    /// Detach the directive handler. Without one, `#` is an ordinary symbol.
    pub fn take_preprocessor(&mut self) -> Option<Box<dyn TokenPreprocessor + 'src>> {
        self.preprocessor.take()
    }

    pub fn source(&self) -> &'src str {
        self.cursor.source()
    }

    // --- Token access ---

    /// Return the next token without consuming it.
    ///
    /// Repeated calls return the same token until it is consumed.
    pub fn peek_token(&mut self) -> Result<Token<'src>, TokenizeError> {
        if let Some(token) = self.current {
            return Ok(token);
        }
        let token = self.scan_token()?;
        self.current = Some(token);
        Ok(token)
    }

    /// Consume the peeked token.
    ///
    /// Commits the pending comments, or discards them while comments are
    /// disabled. Records the token if recording is enabled.
    pub fn consume_token(&mut self) {
        if let Some(token) = self.current.take() {
            if self.recording && !token.is_end_type() {
                self.recorded.push(token);
            }
        }
        if self.comments_disable_count == 0 {
            self.committed_comments = self.comments.len();
        } else {
            self.clear_pending_comments();
        }
    }

    /// Peek and consume.
    pub fn get_token(&mut self) -> Result<Token<'src>, TokenizeError> {
        let token = self.peek_token()?;
        self.consume_token();
        Ok(token)
    }

    /// `true` when the next token is the end of input.
    pub fn is_eof(&self) -> bool {
        match &self.current {
            Some(token) => token.is_end_type(),
            None => self.cursor.is_eof(),
        }
    }

    /// Position in front of the peeked token, or the read position.
    pub fn input_pos(&self) -> u32 {
        self.current.map_or(self.cursor.pos(), |token| token.unget_pos)
    }

    /// Line in front of the peeked token, or the current line.
    pub fn input_line(&self) -> u32 {
        self.current.map_or(self.cursor.line(), |token| token.unget_line)
    }

    /// Drop the peeked token and continue counting lines from `line`.
    pub fn set_input_line(&mut self, line: u32) {
        self.clear_token();
        self.cursor.set_line(line);
    }

    /// Skip whitespace and comments, collecting the comments.
    pub fn skip_whitespace_and_comments(&mut self) -> Result<(), TokenizeError> {
        let mut got_inline_comment = false;
        self.skip_trivia(&mut got_inline_comment, true)
    }

    /// Rest of the current line as a [`TokenKind::Line`] token.
    ///
    /// The line terminator is consumed but not part of the token; a `\r`
    /// before it is dropped as well. At the end of input this returns an
    /// [`TokenKind::EndOfFile`] token.
    pub fn get_line(&mut self) -> Token<'src> {
        self.clear_token();
        let start = self.cursor.pos();
        let line = self.cursor.line();

        if self.cursor.is_eof() {
            return Token::new(TokenKind::EndOfFile, Span::point(start), line, line, "");
        }

        let mut last = start;
        while !self.cursor.is_eof() {
            match self.cursor.bump_char() {
                '\r' => {}
                '\n' => break,
                _ => last = self.cursor.pos(),
            }
        }
        Token::new(
            TokenKind::Line,
            Span::new(start, last),
            line,
            line,
            self.cursor.slice(start, last),
        )
    }

    /// Raw text up to `terminator`, the end of the line, or a comment.
    ///
    /// Leading whitespace and comments are skipped first. A consumed
    /// terminator ends the result; with
    /// [`DONT_CONSUME_TERMINATOR`](RawStringOptions::DONT_CONSUME_TERMINATOR)
    /// it is left unread and excluded. Trailing spaces and tabs are trimmed.
    pub fn get_raw_string(
        &mut self,
        terminator: char,
        options: RawStringOptions,
    ) -> Result<&'src str, TokenizeError> {
        self.clear_token();
        self.skip_whitespace_and_comments()?;

        let start = self.cursor.pos();
        let start_line = self.cursor.line();
        let respect_quotes = options.contains(RawStringOptions::RESPECT_QUOTES);
        let mut in_quotes = false;
        let mut end = start;

        while !self.cursor.is_eof() {
            let c = self.cursor.current_char();
            if c == '\r' || c == '\n' {
                break;
            }
            if c == terminator && !in_quotes {
                if !options.contains(RawStringOptions::DONT_CONSUME_TERMINATOR) {
                    self.cursor.bump();
                    end = self.cursor.pos();
                }
                break;
            }
            if !in_quotes && c == '/' && matches!(self.cursor.peek(), b'*' | b'/') {
                break;
            }
            self.cursor.bump();
            end = self.cursor.pos();
            if c == '"' && respect_quotes {
                in_quotes = !in_quotes;
            }
        }

        if in_quotes {
            return Err(TokenizeError::new(
                TokenizeErrorKind::UnterminatedQuote,
                start,
                start_line,
            ));
        }

        let text = self
            .cursor
            .slice(start, end)
            .trim_end_matches(classify::is_horizontal_space);
        if text.len() >= MAX_STRING_LENGTH {
            return Err(TokenizeError::new(
                TokenizeErrorKind::StringTooLong,
                start,
                start_line,
            ));
        }
        Ok(text)
    }

    /// Slice of the source buffer.
    pub fn string_view(&self, start: u32, len: u32) -> &'src str {
        self.cursor.slice(start, start + len)
    }

    /// `true` if only spaces and tabs separate `token` from the start of its
    /// line.
    pub fn is_first_token_in_line(&self, token: &Token<'_>) -> bool {
        let source = self.cursor.source().as_bytes();
        let before = source.get(..token.start_pos() as usize).unwrap_or(source);
        for &byte in before.iter().rev() {
            match byte {
                b'\r' | b'\n' => return true,
                b' ' | b'\t' => {}
                _ => return false,
            }
        }
        true
    }

    // --- Comments ---

    /// Committed comments, oldest first.
    pub fn comments(&self) -> &[&'src str] {
        &self.comments[..self.committed_comments]
    }

    /// Drop the committed comments. Pending comments are kept.
    pub fn clear_comments(&mut self) {
        self.comments = self.comments.split_off(self.committed_comments);
        self.committed_comments = 0;
    }

    /// Stop committing comments; nests.
    pub fn disable_comments(&mut self) {
        self.comments_disable_count += 1;
    }

    /// Undo one [`disable_comments`](Self::disable_comments).
    pub fn enable_comments(&mut self) {
        debug_assert!(
            self.comments_disable_count > 0,
            "enable_comments without matching disable_comments"
        );
        self.comments_disable_count = self.comments_disable_count.saturating_sub(1);
    }

    /// Commit every pending comment now.
    pub fn commit_pending_comments(&mut self) {
        self.committed_comments = self.comments.len();
    }

    fn clear_all_comments(&mut self) {
        self.comments.clear();
        self.committed_comments = 0;
    }

    /// Discard pending comments, keeping the ones reserved by a directive in
    /// progress.
    fn clear_pending_comments(&mut self) {
        self.comments
            .truncate(self.committed_comments + self.preprocessor_pending_comments);
    }

    /// Forget the peeked token and rewind to in front of it.
    fn clear_token(&mut self) {
        if let Some(token) = self.current.take() {
            self.comments.truncate(self.committed_comments);
            self.cursor.reset(token.unget_pos, token.unget_line);
        }
    }

    // --- Save / restore ---

    /// Remember the current position for a later [`restore_state`](Self::restore_state).
    ///
    /// Only one state can be saved at a time.
    pub fn save_state(&mut self) -> Result<(), TokenizeError> {
        if self.saved.is_some() {
            return Err(self.internal_error(TokenizeErrorKind::StateAlreadySaved));
        }
        // Rewinding to a peeked token's unget point collects its pending
        // comments again, so only committed comments belong in the snapshot.
        let comments = if self.current.is_some() {
            self.comments[..self.committed_comments].to_vec()
        } else {
            self.comments.clone()
        };
        let state = SavedState {
            pos: self.input_pos(),
            line: self.input_line(),
            comments,
            committed_comments: self.committed_comments,
        };
        trace!(pos = state.pos, line = state.line, "save reader state");
        self.saved = Some(state);
        if let Some(preprocessor) = self.preprocessor.as_mut() {
            preprocessor.save_state();
        }
        Ok(())
    }

    /// Rewind to the saved state and release the save slot.
    pub fn restore_state(&mut self) -> Result<(), TokenizeError> {
        let Some(state) = self.saved.take() else {
            return Err(self.internal_error(TokenizeErrorKind::NoSavedState));
        };
        trace!(pos = state.pos, line = state.line, "restore reader state");
        self.clear_token();
        self.cursor.reset(state.pos, state.line);
        self.comments = state.comments;
        self.committed_comments = state.committed_comments;
        if let Some(preprocessor) = self.preprocessor.as_mut() {
            preprocessor.restore_state();
        }
        Ok(())
    }

    /// Release the save slot without rewinding.
    ///
    /// The peeked token, if any, is dropped and will be scanned again.
    pub fn abandon_state(&mut self) -> Result<(), TokenizeError> {
        if self.saved.take().is_none() {
            return Err(self.internal_error(TokenizeErrorKind::NoSavedState));
        }
        self.clear_token();
        Ok(())
    }

    // --- Recording ---

    /// Start appending consumed tokens to the recording buffer.
    pub fn enable_recording(&mut self) -> Result<(), TokenizeError> {
        if self.recording {
            return Err(self.internal_error(TokenizeErrorKind::RecordingAlreadyEnabled));
        }
        self.recording = true;
        Ok(())
    }

    /// Append a token to the recording buffer by hand.
    pub fn record_token(&mut self, token: Token<'src>) -> Result<(), TokenizeError> {
        if !self.recording {
            return Err(self.internal_error(TokenizeErrorKind::RecordingNotEnabled));
        }
        self.recorded.push(token);
        Ok(())
    }

    /// Stop recording and clear the buffer.
    pub fn disable_recording(&mut self) -> Result<(), TokenizeError> {
        if !self.recording {
            return Err(self.internal_error(TokenizeErrorKind::RecordingNotEnabled));
        }
        self.recorded.clear();
        self.recording = false;
        Ok(())
    }

    /// Tokens recorded since [`enable_recording`](Self::enable_recording).
    pub fn recorded_tokens(&self) -> Result<&[Token<'src>], TokenizeError> {
        if !self.recording {
            return Err(self.internal_error(TokenizeErrorKind::RecordingNotEnabled));
        }
        Ok(&self.recorded)
    }

    fn internal_error(&self, kind: TokenizeErrorKind) -> TokenizeError {
        TokenizeError::new(kind, self.input_pos(), self.input_line())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
