//! Diagnostic reporting for the reflection header toolchain.
//!
//! Two kinds of problems flow through here:
//! - fatal tokenizer errors, converted to a [`Diagnostic`] by the caller once
//!   scanning of a file has stopped;
//! - non-fatal policy violations, reported to a [`MessageSink`] while
//!   scanning continues.
//!
//! Every diagnostic carries the byte offset and 1-based line it refers to.
//! The [`DiagnosticLog`] sink is safe to share between readers running on
//! different threads.

mod diagnostic;
pub mod emitter;
mod error_code;
mod log;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use log::{DiagnosticLog, LoggedDiagnostic, MessageSink, SourceSink};
