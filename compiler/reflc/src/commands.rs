//! Command handlers for the `reflc` CLI.

mod lex;

pub use lex::{lex_files, lex_source, FileReport, LexSummary};
