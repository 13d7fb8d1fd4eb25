//! change
//!
//! Change-applier seam: edit creation and execution.
//!
//! # Architecture
//!
//! The engine never edits text. A [`ChangeRequest`] names a source
//! version, a span, and replacement text; a [`ChangeApplier`] turns the
//! request into an executable [`Change`] and, when applying it, mints the
//! after-side [`SourceIdentity`] and the [`Commit`] recording the
//! transition. An applier may *decline* a change (stale span, no-op edit)
//! by returning `Ok(None)` — declining is not an error and has no side
//! effects.
//!
//! [`removal_request`] builds deletion requests from removable issues so
//! commands can fix what the detectors flagged.
//!
//! # Limitations
//!
//! Parameter removal widens the deleted range textually to the enclosing
//! `(`/`,` delimiter; parameter types whose generics contain commas widen
//! short. Surface tooling, surface rules.

pub mod splice;

pub use splice::SpliceApplier;

use thiserror::Error;

use crate::core::commit::Commit;
use crate::core::issue::{Issue, IssueKind};
use crate::core::source::SourceIdentity;
use crate::core::types::Span;

/// Errors from change creation and application.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChangeError {
    /// The requested span does not fit the named source version.
    #[error("change span {span} does not fit source '{name}'")]
    SpanOutOfBounds {
        /// The offending span.
        span: Span,
        /// Name of the source the request targeted.
        name: String,
    },

    /// The request carried an empty summary.
    #[error("change request requires a summary")]
    MissingSummary,
}

/// A concrete edit request against one source version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRequest {
    source: SourceIdentity,
    span: Span,
    replacement: String,
    summary: String,
}

impl ChangeRequest {
    /// Request replacing `span` of `source` with `replacement`.
    pub fn new(
        source: SourceIdentity,
        span: Span,
        replacement: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            source,
            span,
            replacement: replacement.into(),
            summary: summary.into(),
        }
    }

    /// The targeted source version.
    pub fn source(&self) -> &SourceIdentity {
        &self.source
    }

    /// The byte range to replace.
    pub fn span(&self) -> Span {
        self.span
    }

    /// The replacement text (empty for deletions).
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Human-readable summary for the resulting commit.
    pub fn summary(&self) -> &str {
        &self.summary
    }
}

/// An executable edit, validated against its source version.
///
/// Produced by [`ChangeApplier::create_change`]; opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    source: SourceIdentity,
    span: Span,
    replacement: String,
    summary: String,
}

impl Change {
    pub(crate) fn from_request(request: &ChangeRequest) -> Self {
        Self {
            source: request.source.clone(),
            span: request.span,
            replacement: request.replacement.clone(),
            summary: request.summary.clone(),
        }
    }

    /// The source version this change applies to.
    pub fn source(&self) -> &SourceIdentity {
        &self.source
    }

    /// The byte range to replace.
    pub fn span(&self) -> Span {
        self.span
    }

    /// The replacement text.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Summary for the resulting commit.
    pub fn summary(&self) -> &str {
        &self.summary
    }
}

/// Creates executable edits and applies them, minting commits.
///
/// Opaque, potentially slow collaborator from the engine's perspective.
pub trait ChangeApplier: Send + Sync {
    /// Validate a request into an executable change.
    fn create_change(&self, request: &ChangeRequest) -> Result<Change, ChangeError>;

    /// Execute a change.
    ///
    /// Returns `Ok(None)` when the change is declined (stale or no-op);
    /// declining has no side effects.
    fn apply(&self, change: &Change) -> Result<Option<Commit>, ChangeError>;
}

/// Build a deletion request for a removable issue.
///
/// Returns `None` for kinds without a safe removal fix (magic numbers)
/// and for issues whose span no longer fits the source.
pub fn removal_request(issue: &Issue, source: &SourceIdentity) -> Option<ChangeRequest> {
    if !issue.kind().is_removable() {
        return None;
    }
    let content = source.content();
    if !issue.span().fits(content) {
        return None;
    }

    let span = match issue.kind() {
        IssueKind::UnusedParameter => widen_parameter(content, issue.span()),
        _ => widen_trailing_whitespace(content, issue.span()),
    };

    Some(ChangeRequest::new(
        source.clone(),
        span,
        "",
        format!("fix: {}", issue.message()),
    ))
}

/// Extend a declaration span over trailing spaces and one newline, so
/// deletions do not leave blank lines behind.
fn widen_trailing_whitespace(content: &str, span: Span) -> Span {
    let bytes = content.as_bytes();
    let mut end = span.end();
    while end < bytes.len() && (bytes[end] == b' ' || bytes[end] == b'\t') {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'\n' {
        end += 1;
    }
    Span::new(span.start(), end).expect("widening only grows the span")
}

/// Extend a parameter-name span over its type tokens and the adjacent
/// comma, yielding a range whose deletion keeps the list well-formed.
fn widen_parameter(content: &str, span: Span) -> Span {
    let bytes = content.as_bytes();

    // Walk back to the delimiter opening this parameter slot.
    let mut start = span.start();
    while start > 0 && bytes[start - 1] != b'(' && bytes[start - 1] != b',' {
        start -= 1;
    }

    if start > 0 && bytes[start - 1] == b',' {
        // Interior parameter: consume the separating comma before it.
        start -= 1;
        Span::new(start, span.end()).expect("widening only grows the span")
    } else {
        // First parameter: consume the trailing comma instead, if any.
        let mut end = span.end();
        let mut probe = end;
        while probe < bytes.len() && bytes[probe].is_ascii_whitespace() {
            probe += 1;
        }
        if probe < bytes.len() && bytes[probe] == b',' {
            end = probe + 1;
            // And the whitespace that followed the comma.
            while end < bytes.len() && bytes[end] == b' ' {
                end += 1;
            }
        }
        Span::new(start, end).expect("widening only grows the span")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Span;
    use uuid::Uuid;

    fn source(content: &str) -> SourceIdentity {
        SourceIdentity::new("Test.java", content, Uuid::new_v4())
    }

    fn issue_at(kind: IssueKind, content: &str, needle: &str) -> Issue {
        let start = content.find(needle).unwrap();
        Issue::new(
            kind,
            format!("{kind} '{needle}'"),
            Span::new(start, start + needle.len()).unwrap(),
            needle,
        )
    }

    #[test]
    fn magic_number_has_no_removal() {
        let content = "class A { int x = 9; }";
        let s = source(content);
        let issue = issue_at(IssueKind::MagicNumber, content, "9");
        assert!(removal_request(&issue, &s).is_none());
    }

    #[test]
    fn import_removal_consumes_line() {
        let content = "import java.util.List;\nclass A {}";
        let s = source(content);
        let issue = issue_at(IssueKind::UnusedImport, content, "import java.util.List;");
        let request = removal_request(&issue, &s).unwrap();
        assert_eq!(request.span().slice(content), Some("import java.util.List;\n"));
        assert_eq!(request.replacement(), "");
    }

    #[test]
    fn interior_parameter_removal_takes_leading_comma() {
        let content = "class A { void f(int a, int b) { int x = a; } }";
        let s = source(content);
        let b_start = content.find(", int b").unwrap() + ", int ".len();
        let issue = Issue::new(
            IssueKind::UnusedParameter,
            "parameter 'b' of 'f' is never read",
            Span::new(b_start, b_start + 1).unwrap(),
            "f:b",
        );
        let request = removal_request(&issue, &s).unwrap();
        assert_eq!(request.span().slice(content), Some(", int b"));
    }

    #[test]
    fn first_parameter_removal_takes_trailing_comma() {
        let content = "class A { void f(int a, int b) { int x = b; } }";
        let s = source(content);
        let a_start = content.find("int a").unwrap() + "int ".len();
        let issue = Issue::new(
            IssueKind::UnusedParameter,
            "parameter 'a' of 'f' is never read",
            Span::new(a_start, a_start + 1).unwrap(),
            "f:a",
        );
        let request = removal_request(&issue, &s).unwrap();
        assert_eq!(request.span().slice(content), Some("int a, "));
    }

    #[test]
    fn sole_parameter_removal_leaves_empty_list() {
        let content = "class A { void f(int a) { } }";
        let s = source(content);
        let a_start = content.find("int a").unwrap() + "int ".len();
        let issue = Issue::new(
            IssueKind::UnusedParameter,
            "parameter 'a' of 'f' is never read",
            Span::new(a_start, a_start + 1).unwrap(),
            "f:a",
        );
        let request = removal_request(&issue, &s).unwrap();
        assert_eq!(request.span().slice(content), Some("int a"));
    }

    #[test]
    fn stale_issue_span_yields_none() {
        let s = source("class A {}");
        let issue = Issue::new(
            IssueKind::UnusedImport,
            "import 'gone' is never used",
            Span::new(0, 500).unwrap(),
            "gone",
        );
        assert!(removal_request(&issue, &s).is_none());
    }
}
