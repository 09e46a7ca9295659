//! Error codes for all toolchain diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E0001`) with the first
//! digit indicating the phase that raised it.

use std::fmt;

/// Error codes for all toolchain diagnostics.
///
/// Format: E#### where the leading digits indicate the phase:
/// - E00xx: Tokenizer errors (fatal for the file)
/// - E01xx: Excluded-block content violations (non-fatal)
/// - E02xx: Preprocessor directive errors
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Tokenizer Errors (E00xx)
    /// Unterminated string constant
    E0001,
    /// Unterminated character constant
    E0002,
    /// Unterminated quoted section of a raw string
    E0003,
    /// End of input inside a block comment
    E0004,
    /// Identifier exceeds the maximum name length
    E0005,
    /// Numeric constant exceeds the maximum name length
    E0006,
    /// String exceeds the maximum string length
    E0007,

    // Excluded-block violations (E01xx)
    /// Reflection macro inside an excluded preprocessor block
    E0101,
    /// Serialization override inside an excluded preprocessor block
    E0102,

    // Preprocessor Errors (E02xx)
    /// `#else`, `#elif` or `#endif` without a matching `#if`
    E0201,

    // Internal Errors (E9xxx)
    /// Token reader state misuse (save/restore/recording)
    E9001,
    /// Source file could not be read
    E9002,
}

impl ErrorCode {
    /// Get the string representation of this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            ErrorCode::E0007 => "E0007",
            ErrorCode::E0101 => "E0101",
            ErrorCode::E0102 => "E0102",
            ErrorCode::E0201 => "E0201",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Short description used by `--explain` style listings.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "unterminated string constant",
            ErrorCode::E0002 => "unterminated character constant",
            ErrorCode::E0003 => "unterminated quoted string",
            ErrorCode::E0004 => "end of input inside a comment",
            ErrorCode::E0005 => "identifier too long",
            ErrorCode::E0006 => "number too long",
            ErrorCode::E0007 => "string too long",
            ErrorCode::E0101 => "reflection macro inside an excluded preprocessor block",
            ErrorCode::E0102 => "serialization function inside an excluded preprocessor block",
            ErrorCode::E0201 => "unmatched preprocessor directive",
            ErrorCode::E9001 => "token reader state misuse",
            ErrorCode::E9002 => "source file could not be read",
        }
    }

    /// Check if this is a tokenizer error (E00xx range).
    pub fn is_tokenizer_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E0001
                | ErrorCode::E0002
                | ErrorCode::E0003
                | ErrorCode::E0004
                | ErrorCode::E0005
                | ErrorCode::E0006
                | ErrorCode::E0007
        )
    }

    /// Check if this is an excluded-block content violation (E01xx range).
    pub fn is_excluded_content_error(&self) -> bool {
        matches!(self, ErrorCode::E0101 | ErrorCode::E0102)
    }

    /// Check if this is an internal error (E9xxx range).
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001 | ErrorCode::E9002)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
