//! `reflc lex`: tokenize headers and report what the reader finds.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use refl_diagnostic::{Diagnostic, DiagnosticLog, ErrorCode, LoggedDiagnostic, SourceSink};
use refl_ir::{Span, TokenKind};
use refl_lexer::{ConditionalPreprocessor, PreprocessorConfig, TokenReader};
use tracing::{debug, info_span};

use crate::LexConfig;

/// Outcome of tokenizing one file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    /// Tokens read before the end of input or a fatal error.
    pub token_count: usize,
    /// Stopped on a fatal tokenizer error.
    pub failed: bool,
    /// One line per token, filled when token output is requested.
    pub dump: String,
}

/// Reports for every file plus the merged diagnostics.
#[derive(Debug)]
pub struct LexSummary {
    /// In command-line order.
    pub files: Vec<FileReport>,
    /// Sorted by file, line and offset.
    pub diagnostics: Vec<LoggedDiagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
}

impl LexSummary {
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

/// Tokenize every file in `config` in parallel, one reader per file.
pub fn lex_files(config: &LexConfig) -> LexSummary {
    let log = Arc::new(DiagnosticLog::new());
    let preprocessor = config.preprocessor_config();

    let files: Vec<FileReport> = config
        .files
        .par_iter()
        .map(|path| lex_file(path, config.show_tokens, &preprocessor, &log))
        .collect();

    let error_count = log.error_count();
    let warning_count = log.warning_count();
    LexSummary {
        files,
        diagnostics: log.drain_sorted(),
        error_count,
        warning_count,
    }
}

fn lex_file(
    path: &Path,
    show_tokens: bool,
    preprocessor: &PreprocessorConfig,
    log: &Arc<DiagnosticLog>,
) -> FileReport {
    let name = path.display().to_string();
    match std::fs::read_to_string(path) {
        Ok(source) => {
            let mut report = lex_source(&name, &source, show_tokens, preprocessor, log);
            report.path = path.to_path_buf();
            report
        }
        Err(err) => {
            log.push(
                Some(name.into()),
                Diagnostic::error(ErrorCode::E9002)
                    .with_message(format!("could not read file: {err}"))
                    .at(Span::DUMMY, 0),
            );
            FileReport {
                path: path.to_path_buf(),
                failed: true,
                ..FileReport::default()
            }
        }
    }
}

/// Tokenize one in-memory header, reporting into `log` under `name`.
pub fn lex_source(
    name: &str,
    source: &str,
    show_tokens: bool,
    preprocessor: &PreprocessorConfig,
    log: &Arc<DiagnosticLog>,
) -> FileReport {
    let _span = info_span!("lex", file = name).entered();
    let sink = SourceSink::new(name, Arc::clone(log));
    let mut reader = TokenReader::new(source, Arc::new(sink));
    reader.set_preprocessor(Box::new(ConditionalPreprocessor::new(preprocessor.clone())));

    let mut report = FileReport {
        path: PathBuf::from(name),
        ..FileReport::default()
    };
    loop {
        match reader.get_token() {
            Ok(token) if token.kind == TokenKind::EndOfFile => break,
            Ok(token) => {
                report.token_count += 1;
                if show_tokens {
                    let _ = writeln!(report.dump, "{name}:{token}");
                }
            }
            Err(err) => {
                log.push(Some(name.into()), err.to_diagnostic());
                report.failed = true;
                break;
            }
        }
    }
    debug!(tokens = report.token_count, failed = report.failed, "lexed file");
    report
}
