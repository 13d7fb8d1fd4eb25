//! change::splice
//!
//! Text-splicing change applier.
//!
//! # Design
//!
//! [`SpliceApplier`] is the shipped [`ChangeApplier`]: it replaces the
//! requested byte range, mints the after-side version, and builds a
//! commit with the next key from the session's [`CommitSequence`]. A
//! change whose span no longer fits its source, or whose replacement
//! matches the existing text, is declined rather than failed.
//!
//! # Example
//!
//! ```
//! use burnish::change::{ChangeApplier, ChangeRequest, SpliceApplier};
//! use burnish::core::commit::CommitSequence;
//! use burnish::core::source::SourceIdentity;
//! use burnish::core::types::Span;
//! use uuid::Uuid;
//!
//! let applier = SpliceApplier::new(CommitSequence::new());
//! let source = SourceIdentity::new("A.java", "int x = 9;", Uuid::new_v4());
//! let request = ChangeRequest::new(
//!     source.clone(),
//!     Span::new(8, 9).unwrap(),
//!     "LIMIT",
//!     "name the limit",
//! );
//!
//! let change = applier.create_change(&request).unwrap();
//! let commit = applier.apply(&change).unwrap().expect("accepted");
//! assert_eq!(commit.after().content(), "int x = LIMIT;");
//! assert_eq!(commit.before(), &source);
//! ```

use super::{Change, ChangeApplier, ChangeError, ChangeRequest};
use crate::core::commit::{Commit, CommitSequence};

/// Change applier that splices replacement text into source content.
#[derive(Debug, Clone)]
pub struct SpliceApplier {
    sequence: CommitSequence,
}

impl SpliceApplier {
    /// Create an applier minting commits from the given sequence.
    pub fn new(sequence: CommitSequence) -> Self {
        Self { sequence }
    }
}

impl ChangeApplier for SpliceApplier {
    fn create_change(&self, request: &ChangeRequest) -> Result<Change, ChangeError> {
        if request.summary().is_empty() {
            return Err(ChangeError::MissingSummary);
        }
        if !request.span().fits(request.source().content()) {
            return Err(ChangeError::SpanOutOfBounds {
                span: request.span(),
                name: request.source().name().to_string(),
            });
        }
        Ok(Change::from_request(request))
    }

    fn apply(&self, change: &Change) -> Result<Option<Commit>, ChangeError> {
        let content = change.source().content();

        // Stale change (source moved on since creation): decline.
        let Some(existing) = change.span().slice(content) else {
            return Ok(None);
        };
        // No-op edit: decline.
        if existing == change.replacement() {
            return Ok(None);
        }

        let mut edited = String::with_capacity(
            content.len() - change.span().len() + change.replacement().len(),
        );
        edited.push_str(&content[..change.span().start()]);
        edited.push_str(change.replacement());
        edited.push_str(&content[change.span().end()..]);

        let after = change.source().with_content(edited);
        Ok(Some(Commit::new(
            change.source().clone(),
            after,
            change.summary(),
            self.sequence.next(),
        )))
    }
}
