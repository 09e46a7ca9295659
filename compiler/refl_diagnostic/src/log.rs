//! Message sinks.
//!
//! Readers report non-fatal diagnostics through [`MessageSink`] and keep
//! scanning. Many readers (one per file, usually on different threads) may
//! report into the same [`DiagnosticLog`], so sinks take `&self` and must be
//! `Send + Sync`.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Diagnostic, Severity};

/// Receiver for diagnostics raised while scanning continues.
pub trait MessageSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

impl<T: MessageSink + ?Sized> MessageSink for Arc<T> {
    fn report(&self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// A diagnostic together with the source it was reported against.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoggedDiagnostic {
    /// Source name (usually a file path); `None` when reported directly.
    pub source: Option<Arc<str>>,
    pub diagnostic: Diagnostic,
}

/// Append-only, thread-safe diagnostic log.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    entries: Mutex<Vec<LoggedDiagnostic>>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic for `source`.
    pub fn push(&self, source: Option<Arc<str>>, diagnostic: Diagnostic) {
        self.entries.lock().push(LoggedDiagnostic { source, diagnostic });
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.count_severity(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count_severity(Severity::Warning)
    }

    fn count_severity(&self, severity: Severity) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.diagnostic.severity == severity)
            .count()
    }

    /// Copy of everything logged so far, in report order.
    pub fn snapshot(&self) -> Vec<LoggedDiagnostic> {
        self.entries.lock().clone()
    }

    /// Take every entry, ordered by source, then line, then offset.
    ///
    /// Report order across threads is nondeterministic; sorting makes the
    /// output stable. The sort is stable, so same-location entries keep
    /// their report order.
    pub fn drain_sorted(&self) -> Vec<LoggedDiagnostic> {
        let mut entries = std::mem::take(&mut *self.entries.lock());
        entries.sort_by(|a, b| {
            a.source
                .cmp(&b.source)
                .then(a.diagnostic.line.cmp(&b.diagnostic.line))
                .then(a.diagnostic.span.start.cmp(&b.diagnostic.span.start))
        });
        entries
    }
}

impl MessageSink for DiagnosticLog {
    fn report(&self, diagnostic: Diagnostic) {
        self.push(None, diagnostic);
    }
}

/// Sink that tags everything it receives with a source name before
/// forwarding to a shared [`DiagnosticLog`].
#[derive(Clone, Debug)]
pub struct SourceSink {
    source: Arc<str>,
    log: Arc<DiagnosticLog>,
}

impl SourceSink {
    pub fn new(source: impl Into<Arc<str>>, log: Arc<DiagnosticLog>) -> Self {
        SourceSink {
            source: source.into(),
            log,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl MessageSink for SourceSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.log.push(Some(Arc::clone(&self.source)), diagnostic);
    }
}
