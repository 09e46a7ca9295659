//! Conditional-compilation preprocessor.
//!
//! Tracks `#if`/`#ifdef`/`#ifndef`/`#elif`/`#else`/`#endif` on a frame stack
//! and evaluates simple conditions against a symbol table:
//!
//! - `0`, `1` (any integer literal)
//! - `NAME`, `defined(NAME)`, `defined NAME`
//! - `!`, `&&`, `||` and parentheses over the above
//!
//! Names the table knows nothing about evaluate to "unknown", and an unknown
//! condition includes its block: the header parser must see every
//! declaration that is not provably compiled out.

use refl_ir::{Token, TokenKind};
use refl_lexer_core::classify::{is_ident_continue, is_ident_start};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::debug;

use super::{DirectiveOutcome, TokenPreprocessor};
use crate::{TokenReader, TokenizeError, TokenizeErrorKind};

/// Symbol configuration for [`ConditionalPreprocessor`].
#[derive(Clone, Debug)]
pub struct PreprocessorConfig {
    /// Names known to be defined (evaluate true).
    pub defined: FxHashSet<String>,
    /// Names known to be undefined (evaluate false).
    pub undefined: FxHashSet<String>,
    /// Excluded blocks whose condition names one of these are not checked
    /// for illegal content.
    pub illegal_content_exempt: FxHashSet<String>,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        let mut illegal_content_exempt = FxHashSet::default();
        illegal_content_exempt.insert("WITH_EDITORONLY_DATA".to_string());
        PreprocessorConfig {
            defined: FxHashSet::default(),
            undefined: FxHashSet::default(),
            illegal_content_exempt,
        }
    }
}

impl PreprocessorConfig {
    #[must_use]
    pub fn define(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.undefined.remove(&name);
        self.defined.insert(name);
        self
    }

    #[must_use]
    pub fn undefine(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.defined.remove(&name);
        self.undefined.insert(name);
        self
    }

    /// `Some(true)` defined, `Some(false)` undefined, `None` unknown.
    fn lookup(&self, name: &str) -> Option<bool> {
        if self.defined.contains(name) {
            Some(true)
        } else if self.undefined.contains(name) {
            Some(false)
        } else {
            None
        }
    }
}

/// One `#if` ... `#endif` region.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
struct ConditionalFrame {
    /// Some branch of this region has been included.
    taken: bool,
    /// The branch being skipped is checked for illegal content.
    check_illegal: bool,
}

#[derive(Clone, Debug)]
struct ConditionalState {
    frames: SmallVec<[ConditionalFrame; 8]>,
    skip_depth: u32,
    config: PreprocessorConfig,
}

/// Reference [`TokenPreprocessor`] for conditional compilation.
#[derive(Clone, Debug)]
pub struct ConditionalPreprocessor {
    state: ConditionalState,
    saved: Option<ConditionalState>,
}

impl Default for ConditionalPreprocessor {
    fn default() -> Self {
        Self::new(PreprocessorConfig::default())
    }
}

impl ConditionalPreprocessor {
    pub fn new(config: PreprocessorConfig) -> Self {
        ConditionalPreprocessor {
            state: ConditionalState {
                frames: SmallVec::new(),
                skip_depth: 0,
                config,
            },
            saved: None,
        }
    }

    pub fn config(&self) -> &PreprocessorConfig {
        &self.state.config
    }

    /// Number of open `#if` regions.
    pub fn depth(&self) -> usize {
        self.state.frames.len()
    }

    /// Evaluate a condition; unknown results include.
    pub fn evaluate(&self, condition: &str) -> bool {
        eval_or(condition.trim(), &self.state.config).unwrap_or(true)
    }

    fn is_exempt(&self, condition: &str) -> bool {
        identifiers(condition).any(|name| self.state.config.illegal_content_exempt.contains(name))
    }

    fn opening(
        &mut self,
        name: &str,
        argument: &str,
        directive: &Token<'_>,
    ) -> Result<DirectiveOutcome, TokenizeError> {
        let outcome = match name {
            "if" | "ifdef" | "ifndef" => {
                let include = self.evaluate_conditional(name, argument);
                let check_illegal = !self.is_exempt(argument);
                self.state.frames.push(ConditionalFrame {
                    taken: include,
                    check_illegal,
                });
                if include {
                    DirectiveOutcome::include()
                } else {
                    DirectiveOutcome::exclude(check_illegal)
                }
            }
            // Reached from an included branch: the rest of the region is out.
            "elif" | "else" => {
                let check_illegal = name == "else" || !self.is_exempt(argument);
                let frame = self.top_frame(directive)?;
                frame.taken = true;
                frame.check_illegal = check_illegal;
                DirectiveOutcome::exclude(check_illegal)
            }
            "endif" => {
                self.pop_frame(directive)?;
                DirectiveOutcome::include()
            }
            "define" => {
                if let Some(symbol) = identifiers(argument).next() {
                    self.state.config.undefined.remove(symbol);
                    self.state.config.defined.insert(symbol.to_string());
                }
                DirectiveOutcome::include().clearing_comments()
            }
            "undef" => {
                if let Some(symbol) = identifiers(argument).next() {
                    self.state.config.defined.remove(symbol);
                    self.state.config.undefined.insert(symbol.to_string());
                }
                DirectiveOutcome::include().clearing_comments()
            }
            _ => DirectiveOutcome::include().clearing_comments(),
        };
        Ok(outcome)
    }

    fn skipping(
        &mut self,
        name: &str,
        argument: &str,
        directive: &Token<'_>,
    ) -> Result<DirectiveOutcome, TokenizeError> {
        let nested = self.state.skip_depth > 0;
        let outcome = match name {
            "if" | "ifdef" | "ifndef" => {
                self.state.skip_depth += 1;
                None
            }
            "endif" if nested => {
                self.state.skip_depth -= 1;
                None
            }
            "endif" => {
                self.pop_frame(directive)?;
                Some(DirectiveOutcome::include())
            }
            "elif" if !nested => {
                let include = !self.top_frame(directive)?.taken && self.evaluate(argument);
                let check_illegal = !self.is_exempt(argument);
                let frame = self.top_frame(directive)?;
                if include {
                    frame.taken = true;
                    Some(DirectiveOutcome::include())
                } else {
                    frame.check_illegal = check_illegal;
                    None
                }
            }
            "else" if !nested => {
                let frame = self.top_frame(directive)?;
                if frame.taken {
                    None
                } else {
                    frame.taken = true;
                    Some(DirectiveOutcome::include())
                }
            }
            _ => None,
        };
        match outcome {
            Some(outcome) => Ok(outcome),
            None => {
                let check_illegal = self
                    .state
                    .frames
                    .last()
                    .is_some_and(|frame| frame.check_illegal);
                Ok(DirectiveOutcome::exclude(check_illegal))
            }
        }
    }

    fn evaluate_conditional(&self, name: &str, argument: &str) -> bool {
        match name {
            "ifdef" | "ifndef" => {
                let defined = identifiers(argument)
                    .next()
                    .and_then(|symbol| self.state.config.lookup(symbol));
                match (name, defined) {
                    (_, None) => true,
                    ("ifdef", Some(defined)) => defined,
                    (_, Some(defined)) => !defined,
                }
            }
            _ => self.evaluate(argument),
        }
    }

    fn top_frame(
        &mut self,
        directive: &Token<'_>,
    ) -> Result<&mut ConditionalFrame, TokenizeError> {
        self.state.frames.last_mut().ok_or_else(|| unmatched(directive))
    }

    fn pop_frame(&mut self, directive: &Token<'_>) -> Result<ConditionalFrame, TokenizeError> {
        self.state.frames.pop().ok_or_else(|| unmatched(directive))
    }
}

impl TokenPreprocessor for ConditionalPreprocessor {
    fn parse_directive(
        &mut self,
        reader: &mut TokenReader<'_>,
        directive: &Token<'_>,
        is_opening: bool,
    ) -> Result<DirectiveOutcome, TokenizeError> {
        let text = read_directive_text(reader);
        let text = text.trim();
        let name_len = text
            .char_indices()
            .find(|&(_, c)| !is_ident_continue(c))
            .map_or(text.len(), |(index, _)| index);
        let (name, argument) = text.split_at(name_len);
        let argument = argument.trim();

        let outcome = if is_opening {
            self.opening(name, argument, directive)?
        } else {
            self.skipping(name, argument, directive)?
        };
        debug!(
            line = directive.start_line,
            directive = name,
            argument,
            is_opening,
            include = outcome.include,
            depth = self.state.frames.len(),
            "conditional directive"
        );
        Ok(outcome)
    }

    fn save_state(&mut self) {
        self.saved = Some(self.state.clone());
    }

    fn restore_state(&mut self) {
        if let Some(state) = self.saved.take() {
            self.state = state;
        }
    }
}

fn unmatched(directive: &Token<'_>) -> TokenizeError {
    TokenizeError::new(
        TokenizeErrorKind::UnmatchedDirective,
        directive.start_pos(),
        directive.start_line,
    )
}

/// Read the directive after `#`: joins `\` continuations, strips comments and
/// keeps reading while a `/*` is still open.
fn read_directive_text(reader: &mut TokenReader<'_>) -> String {
    let mut raw = String::new();
    loop {
        let line = reader.get_line();
        if line.kind == TokenKind::EndOfFile {
            break;
        }
        raw.push_str(line.text);
        if raw.ends_with('\\') {
            raw.pop();
            raw.push(' ');
            continue;
        }
        let (_, open_comment) = strip_comments(&raw);
        if !open_comment {
            break;
        }
        raw.push('\n');
    }
    strip_comments(&raw).0
}

/// Remove `//` and `/* */` comments outside string literals.
///
/// Returns the stripped text and whether a block comment is left open.
fn strip_comments(text: &str) -> (String, bool) {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match (c, chars.peek()) {
            ('/', Some('/')) => break,
            ('/', Some('*')) => {
                chars.next();
                let mut closed = false;
                while let Some(inner) = chars.next() {
                    if inner == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return (out, true);
                }
                out.push(' ');
            }
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    (out, false)
}

/// Identifier-shaped words in a condition.
fn identifiers(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !is_ident_continue(c))
        .filter(|word| word.chars().next().is_some_and(is_ident_start))
}

/// Split at top-level (unparenthesized) occurrences of `op`.
fn split_top_level<'a>(text: &'a str, op: &str) -> SmallVec<[&'a str; 4]> {
    let mut parts = SmallVec::new();
    let mut depth = 0i32;
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'(' => depth += 1,
            b')' => depth -= 1,
            _ if depth == 0 && bytes[index..].starts_with(op.as_bytes()) => {
                parts.push(&text[start..index]);
                index += op.len();
                start = index;
                continue;
            }
            _ => {}
        }
        index += 1;
    }
    parts.push(&text[start..]);
    parts
}

/// Three-valued `||`: true if any side is true, false if all are false.
fn eval_or(text: &str, config: &PreprocessorConfig) -> Option<bool> {
    let mut result = Some(false);
    for part in split_top_level(text, "||") {
        match eval_and(part.trim(), config) {
            Some(true) => return Some(true),
            Some(false) => {}
            None => result = None,
        }
    }
    result
}

/// Three-valued `&&`: false if any side is false, true if all are true.
fn eval_and(text: &str, config: &PreprocessorConfig) -> Option<bool> {
    let mut result = Some(true);
    for part in split_top_level(text, "&&") {
        match eval_unary(part.trim(), config) {
            Some(false) => return Some(false),
            Some(true) => {}
            None => result = None,
        }
    }
    result
}

fn eval_unary(text: &str, config: &PreprocessorConfig) -> Option<bool> {
    if let Some(rest) = text.strip_prefix('!') {
        return eval_unary(rest.trim_start(), config).map(|value| !value);
    }
    if let Some(inner) = text.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        return eval_or(inner.trim(), config);
    }
    if let Some(rest) = text.strip_prefix("defined") {
        // `definedFOO` is an ordinary identifier.
        if !rest.starts_with(is_ident_continue) {
            let name = rest
                .trim()
                .trim_start_matches('(')
                .trim_end_matches(')')
                .trim();
            return config.lookup(name);
        }
    }
    eval_name(text, config)
}

/// An integer literal or a single identifier.
fn eval_name(text: &str, config: &PreprocessorConfig) -> Option<bool> {
    if text.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        let digits = text.trim_end_matches(|c: char| matches!(c, 'u' | 'U' | 'l' | 'L'));
        return digits.parse::<u64>().ok().map(|value| value != 0);
    }
    if text.chars().next().is_some_and(is_ident_start) && text.chars().all(is_ident_continue) {
        return config.lookup(text);
    }
    None
}
