//! Directive delegation and skipping of excluded blocks.

use refl_ir::{Token, TokenKind};
use tracing::{debug, warn};

use super::TokenReader;
use crate::{IllegalContentDetector, TokenPreprocessor, TokenizeError};

impl<'src> TokenReader<'src> {
    /// Hand a line-leading `#` to the preprocessor and skip what it excludes.
    ///
    /// Returns whether pending comments should be dropped. The preprocessor
    /// is detached for the duration of the call.
    pub(super) fn handle_directive(
        &mut self,
        directive: &Token<'src>,
    ) -> Result<bool, TokenizeError> {
        let Some(mut preprocessor) = self.preprocessor.take() else {
            return Ok(false);
        };
        self.preprocessor_pending_comments =
            self.comments.len().saturating_sub(self.committed_comments);
        let result = self.run_directive(preprocessor.as_mut(), directive);
        self.preprocessor_pending_comments = 0;
        self.preprocessor = Some(preprocessor);
        result
    }

    fn run_directive(
        &mut self,
        preprocessor: &mut (dyn TokenPreprocessor + 'src),
        directive: &Token<'src>,
    ) -> Result<bool, TokenizeError> {
        let outcome = preprocessor.parse_directive(self, directive, true)?;
        debug!(
            line = directive.start_line,
            include = outcome.include,
            clear_comments = outcome.clear_comments,
            "preprocessor directive"
        );
        if !outcome.include {
            self.comments_disable_count += 1;
            let skipped =
                self.skip_excluded_block(preprocessor, directive, outcome.check_illegal_content);
            self.comments_disable_count -= 1;
            self.clear_pending_comments();
            skipped?;
        }
        Ok(outcome.clear_comments)
    }

    /// Scan and discard tokens until a directive re-includes code or the
    /// input ends.
    fn skip_excluded_block(
        &mut self,
        preprocessor: &mut (dyn TokenPreprocessor + 'src),
        directive: &Token<'src>,
        mut check_illegal_content: bool,
    ) -> Result<(), TokenizeError> {
        debug!(line = directive.start_line, check_illegal_content, "skipping excluded block");
        let mut detector = IllegalContentDetector::new();
        let mut skipped = 0usize;
        loop {
            let mut got_inline_comment = false;
            let token = self.scan_raw_token(&mut got_inline_comment, false)?;
            if token.kind == TokenKind::EndOfFile {
                warn!(
                    line = directive.start_line,
                    "excluded block runs to the end of input"
                );
                break;
            }
            if token.is_symbol("#") && self.is_first_token_in_line(&token) {
                let outcome = preprocessor.parse_directive(self, &token, false)?;
                if outcome.include {
                    debug!(line = token.start_line, skipped, "excluded block ends");
                    break;
                }
                check_illegal_content = outcome.check_illegal_content;
            } else {
                skipped += 1;
                if check_illegal_content {
                    if let Some(diagnostic) = detector.check(&token) {
                        self.sink.report(diagnostic);
                    }
                }
            }
        }
        Ok(())
    }
}
