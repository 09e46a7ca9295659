//! Detection of reflection content inside excluded preprocessor blocks.
//!
//! The code generator never sees excluded blocks, so reflection macros or
//! engine serialization overrides hidden there would silently change the
//! generated code depending on the build configuration. The reader feeds
//! every token of an excluded, checked block through an
//! [`IllegalContentDetector`].

use refl_diagnostic::{Diagnostic, ErrorCode};
use refl_ir::Token;

/// Reflection macros that must never appear inside an excluded block.
pub const ILLEGAL_REFLECTION_MACROS: [&str; 7] = [
    "UPROPERTY",
    "UCLASS",
    "USTRUCT",
    "UENUM",
    "UINTERFACE",
    "UDELEGATE",
    "UFUNCTION",
];

/// Progress through `void Serialize ( FArchive`-style sequences.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
enum SerializeState {
    #[default]
    Idle,
    /// Seen `void`.
    Void,
    /// Seen `void Serialize`.
    Serialize,
    /// Seen `void Serialize (`.
    OpenParen,
    /// Seen `void Serialize ( FStructuredArchive`.
    StructuredArchive,
    /// Seen `void Serialize ( FStructuredArchive ::`.
    Scope,
}

/// Forward-only state machine over the tokens of one excluded block.
#[derive(Clone, Debug, Default)]
pub struct IllegalContentDetector {
    state: SerializeState,
}

impl IllegalContentDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance over one token, returning a finding if it completes one.
    ///
    /// A token that breaks a partial sequence is re-tested from the idle
    /// state, so `void void Serialize (FArchive` is still found.
    pub fn check(&mut self, token: &Token<'_>) -> Option<Diagnostic> {
        let text = token.text;
        let next = match self.state {
            SerializeState::Idle => return self.check_idle(token),
            SerializeState::Void if text == "Serialize" => SerializeState::Serialize,
            SerializeState::Serialize if text == "(" => SerializeState::OpenParen,
            SerializeState::OpenParen if text == "FArchive" || text == "FStructuredArchiveRecord" => {
                self.state = SerializeState::Idle;
                return Some(hidden_serialize(token));
            }
            SerializeState::OpenParen if text == "FStructuredArchive" => {
                SerializeState::StructuredArchive
            }
            SerializeState::StructuredArchive if text == "::" => SerializeState::Scope,
            SerializeState::Scope if text == "FRecord" => {
                self.state = SerializeState::Idle;
                return Some(hidden_serialize(token));
            }
            _ => {
                self.state = SerializeState::Idle;
                return self.check_idle(token);
            }
        };
        self.state = next;
        None
    }

    fn check_idle(&mut self, token: &Token<'_>) -> Option<Diagnostic> {
        if ILLEGAL_REFLECTION_MACROS.contains(&token.text) {
            return Some(
                Diagnostic::error(ErrorCode::E0101)
                    .with_message(format!(
                        "'{}' must not be inside preprocessor blocks, except for WITH_EDITORONLY_DATA",
                        token.text
                    ))
                    .at(token.span, token.start_line),
            );
        }
        if token.text == "void" {
            self.state = SerializeState::Void;
        }
        None
    }
}

fn hidden_serialize(token: &Token<'_>) -> Diagnostic {
    Diagnostic::error(ErrorCode::E0102)
        .with_message(
            "Engine serialization functions must not be inside preprocessor blocks, except for WITH_EDITORONLY_DATA",
        )
        .at(token.span, token.start_line)
}
