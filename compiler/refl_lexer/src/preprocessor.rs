//! The preprocessor collaborator.
//!
//! When the reader meets a `#` that starts a line it hands control to the
//! attached [`TokenPreprocessor`]. The collaborator reads the rest of the
//! directive from the same reader (usually with
//! [`TokenReader::get_line`](crate::TokenReader::get_line)) and tells the
//! reader whether the code that follows is included.

mod conditional;

pub use conditional::{ConditionalPreprocessor, PreprocessorConfig};
use refl_ir::Token;

use crate::{TokenReader, TokenizeError};

/// The collaborator's verdict on one directive.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct DirectiveOutcome {
    /// The code after the directive is compiled.
    pub include: bool,
    /// Drop comments collected before the directive.
    pub clear_comments: bool,
    /// Run the illegal-content detector over the excluded block.
    pub check_illegal_content: bool,
}

impl DirectiveOutcome {
    /// Included code, comments kept.
    pub const fn include() -> Self {
        DirectiveOutcome {
            include: true,
            clear_comments: false,
            check_illegal_content: false,
        }
    }

    /// Excluded code.
    pub const fn exclude(check_illegal_content: bool) -> Self {
        DirectiveOutcome {
            include: false,
            clear_comments: false,
            check_illegal_content,
        }
    }

    #[must_use]
    pub const fn clearing_comments(mut self) -> Self {
        self.clear_comments = true;
        self
    }
}

/// Directive handler attached to a [`TokenReader`].
///
/// The reader detaches the collaborator for the duration of each call, so a
/// collaborator that reads from `reader` never re-enters directive handling.
pub trait TokenPreprocessor {
    /// Handle one directive.
    ///
    /// `directive` is the `#` token; the reader is positioned just after it.
    /// `is_opening` is `true` when the directive was met in included code and
    /// `false` while the reader is skipping an excluded block, in which case
    /// `include == true` ends the skip.
    fn parse_directive(
        &mut self,
        reader: &mut TokenReader<'_>,
        directive: &Token<'_>,
        is_opening: bool,
    ) -> Result<DirectiveOutcome, TokenizeError>;

    /// Snapshot internal state alongside [`TokenReader::save_state`].
    fn save_state(&mut self) {}

    /// Roll back to the snapshot taken by [`save_state`](Self::save_state).
    fn restore_state(&mut self) {}
}
