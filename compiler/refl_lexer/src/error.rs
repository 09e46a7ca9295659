//! Fatal tokenizer errors.
//!
//! A [`TokenizeError`] stops the reader. The header parser converts it to a
//! [`Diagnostic`] with [`TokenizeError::to_diagnostic`] and abandons the file.

use refl_diagnostic::{Diagnostic, ErrorCode};
use refl_ir::{Span, MAX_NAME_LENGTH, MAX_STRING_LENGTH};
use thiserror::Error;

/// What went wrong.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Error)]
pub enum TokenizeErrorKind {
    #[error("identifier length exceeds maximum of {}", MAX_NAME_LENGTH)]
    IdentifierTooLong,
    #[error("number length exceeds maximum of {}", MAX_NAME_LENGTH)]
    NumberTooLong,
    #[error("string exceeds maximum of {} characters", MAX_STRING_LENGTH)]
    StringTooLong,
    #[error("unterminated character constant")]
    UnterminatedCharConst,
    #[error("unterminated string constant")]
    UnterminatedString,
    #[error("unterminated quoted string")]
    UnterminatedQuote,
    #[error("end of header encountered inside comment")]
    UnterminatedComment,
    #[error("preprocessor directive without a matching #if")]
    UnmatchedDirective,

    // Internal consistency errors: the caller misused the reader.
    #[error("can not save more than one state")]
    StateAlreadySaved,
    #[error("can not restore or abandon state when none has been saved")]
    NoSavedState,
    #[error("can not nest token recording")]
    RecordingAlreadyEnabled,
    #[error("token recording is not enabled")]
    RecordingNotEnabled,
}

impl TokenizeErrorKind {
    /// Internal errors point at a bug in the caller, not in the header.
    pub fn is_internal(self) -> bool {
        matches!(
            self,
            TokenizeErrorKind::StateAlreadySaved
                | TokenizeErrorKind::NoSavedState
                | TokenizeErrorKind::RecordingAlreadyEnabled
                | TokenizeErrorKind::RecordingNotEnabled
        )
    }
}

/// A fatal tokenizer error at a byte offset and 1-based line.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Error)]
#[error("{kind} (line {line}, offset {pos})")]
pub struct TokenizeError {
    pub kind: TokenizeErrorKind,
    pub pos: u32,
    pub line: u32,
}

impl TokenizeError {
    pub fn new(kind: TokenizeErrorKind, pos: u32, line: u32) -> Self {
        TokenizeError { kind, pos, line }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self.kind {
            TokenizeErrorKind::UnterminatedString => ErrorCode::E0001,
            TokenizeErrorKind::UnterminatedCharConst => ErrorCode::E0002,
            TokenizeErrorKind::UnterminatedQuote => ErrorCode::E0003,
            TokenizeErrorKind::UnterminatedComment => ErrorCode::E0004,
            TokenizeErrorKind::IdentifierTooLong => ErrorCode::E0005,
            TokenizeErrorKind::NumberTooLong => ErrorCode::E0006,
            TokenizeErrorKind::StringTooLong => ErrorCode::E0007,
            TokenizeErrorKind::UnmatchedDirective => ErrorCode::E0201,
            TokenizeErrorKind::StateAlreadySaved
            | TokenizeErrorKind::NoSavedState
            | TokenizeErrorKind::RecordingAlreadyEnabled
            | TokenizeErrorKind::RecordingNotEnabled => ErrorCode::E9001,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.error_code())
            .with_message(self.kind.to_string())
            .at(Span::point(self.pos), self.line)
    }
}
