//! engine::sink
//!
//! Error sink seam for absorbed failures.
//!
//! # Design
//!
//! Issue detection is best-effort: a collaborator failure degrades the
//! result to an empty set instead of propagating. The failure still has
//! to go somewhere, so the engine reports it to an [`ErrorSink`].
//! [`StderrSink`] is the default; [`RecordingSink`] captures reports for
//! assertions in tests.

use std::sync::{Arc, Mutex};

use crate::ui::output;

/// Receives failures the engine absorbs instead of propagating.
pub trait ErrorSink: Send + Sync {
    /// Report one absorbed failure with its operation context.
    fn report(&self, context: &str, error: &dyn std::fmt::Display);
}

/// Sink that writes reports to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl ErrorSink for StderrSink {
    fn report(&self, context: &str, error: &dyn std::fmt::Display) {
        output::error(format_args!("{context}: {error}"));
    }
}

/// Sink that records reports in memory.
///
/// Clones share the record; useful for asserting that an absorbed
/// failure was reported.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    reports: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every report received so far, in order.
    pub fn reports(&self) -> Vec<String> {
        self.reports.lock().unwrap().clone()
    }
}

impl ErrorSink for RecordingSink {
    fn report(&self, context: &str, error: &dyn std::fmt::Display) {
        self.reports
            .lock()
            .unwrap()
            .push(format!("{context}: {error}"));
    }
}
