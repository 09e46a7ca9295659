//! Token reader for reflection headers.
//!
//! [`TokenReader`] turns a borrowed header buffer into classified
//! [`Token`]s one at a time. On top of plain tokenization it:
//!
//! - hands `#` directives to an attached [`TokenPreprocessor`] and skips the
//!   blocks it excludes, reporting reflection macros hidden inside them
//! - collects `//` and `/* */` comments and commits them when the token that
//!   follows is consumed
//! - supports one saved position for backtracking and records consumed
//!   tokens for replay
//!
//! Fatal problems stop the reader with a [`TokenizeError`]; policy
//! violations inside excluded blocks go to the
//! [`MessageSink`](refl_diagnostic::MessageSink) and scanning continues.

mod error;
mod illegal;
pub mod preprocessor;
mod raw_string;
mod reader;

pub use error::{TokenizeError, TokenizeErrorKind};
pub use illegal::{IllegalContentDetector, ILLEGAL_REFLECTION_MACROS};
pub use preprocessor::{
    ConditionalPreprocessor, DirectiveOutcome, PreprocessorConfig, TokenPreprocessor,
};
pub use raw_string::RawStringOptions;
pub use reader::TokenReader;
pub use refl_ir::{Span, Token, TokenKind, MAX_NAME_LENGTH, MAX_STRING_LENGTH};
