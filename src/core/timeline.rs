//! core::timeline
//!
//! Mapping from lineage roots to their commit logs.
//!
//! # Architecture
//!
//! A [`Timeline`] owns one [`CommitLog`] per lineage, keyed by the root
//! version's signature. An entry exists once a root has been recorded;
//! through the engine that happens exactly when the first commit for a
//! new root is checkpointed, so a populated timeline maps each root to
//! the chain of commits derived from it.
//!
//! # Invariants
//!
//! - At most one log per root signature
//! - `append` requires the commit's lineage to be resolvable; failure is a
//!   bookkeeping bug surfaced as [`TimelineError::RootNotRecorded`], not a
//!   user error
//! - History replacement swaps the log wholesale under the original root
//!   key, never piecewise
//!
//! # Example
//!
//! ```
//! use burnish::core::commit::{Commit, CommitSequence};
//! use burnish::core::source::SourceIdentity;
//! use burnish::core::timeline::Timeline;
//! use uuid::Uuid;
//!
//! let seq = CommitSequence::new();
//! let s0 = SourceIdentity::new("A.java", "v0", Uuid::new_v4());
//! let s1 = s0.with_content("v1");
//!
//! let mut timeline = Timeline::new();
//! timeline.record_root(s0.signature().clone());
//! timeline.append(Commit::new(s0.clone(), s1, "edit", seq.next())).unwrap();
//! assert_eq!(timeline.history_for(&s0).len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::commit::Commit;
use super::log::CommitLog;
use super::source::SourceIdentity;
use super::types::Signature;

/// Errors from timeline bookkeeping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimelineError {
    /// A commit was appended whose lineage root was never recorded.
    ///
    /// Unreachable through the engine's public API; indicates a
    /// bookkeeping bug rather than user error.
    #[error("lineage root not recorded for commit {0}")]
    RootNotRecorded(String),
}

/// Maps each lineage root's signature to its commit log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeline {
    lineages: HashMap<Signature, CommitLog>,
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotently ensure a log exists for a newly observed root.
    pub fn record_root(&mut self, root: Signature) {
        self.lineages.entry(root).or_default();
    }

    /// Whether a log is recorded under this root signature.
    pub fn has_root(&self, root: &Signature) -> bool {
        self.lineages.contains_key(root)
    }

    /// Resolve the lineage a source belongs to.
    ///
    /// A source belongs to the lineage whose root key equals its
    /// signature, or whose log contains a commit touching it on either
    /// side. Returns `None` for sources no lineage knows.
    pub fn resolve_root(&self, source: &SourceIdentity) -> Option<&Signature> {
        for (root, log) in &self.lineages {
            if root == source.signature() {
                return Some(root);
            }
            if log
                .iter()
                .any(|c| c.before() == source || c.after() == source)
            {
                return Some(root);
            }
        }
        None
    }

    /// Append a commit to its lineage's log.
    ///
    /// The lineage is resolved from the commit's before side. Returns the
    /// underlying [`CommitLog::add`] result: `false` if the commit's
    /// signature was already present.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::RootNotRecorded`] if no lineage claims the
    /// commit's before side.
    pub fn append(&mut self, commit: Commit) -> Result<bool, TimelineError> {
        let root = self
            .resolve_root(commit.before())
            .cloned()
            .ok_or_else(|| TimelineError::RootNotRecorded(commit.signature().short(8).into()))?;
        let log = self
            .lineages
            .get_mut(&root)
            .expect("resolved root must have a log");
        Ok(log.add(commit))
    }

    /// The commit history of the lineage `source` belongs to.
    ///
    /// Never fails: sources no lineage knows yield a synthesized empty
    /// log.
    pub fn history_for(&self, source: &SourceIdentity) -> CommitLog {
        match self.resolve_root(source) {
            Some(root) => self.lineages[root].clone(),
            None => CommitLog::new(),
        }
    }

    /// Borrow the log recorded under a root signature.
    pub fn log_for_root(&self, root: &Signature) -> Option<&CommitLog> {
        self.lineages.get(root)
    }

    /// Mutably borrow the log recorded under a root signature.
    pub fn log_for_root_mut(&mut self, root: &Signature) -> Option<&mut CommitLog> {
        self.lineages.get_mut(root)
    }

    /// Replace a lineage's log wholesale.
    ///
    /// A single-step swap under the caller-held lock; concurrent readers
    /// never observe a partially rewritten log.
    pub fn replace(&mut self, root: Signature, log: CommitLog) {
        self.lineages.insert(root, log);
    }

    /// Iterate recorded root signatures.
    pub fn roots(&self) -> impl Iterator<Item = &Signature> {
        self.lineages.keys()
    }

    /// Number of recorded lineages.
    pub fn len(&self) -> usize {
        self.lineages.len()
    }

    /// Whether no lineage is recorded.
    pub fn is_empty(&self) -> bool {
        self.lineages.is_empty()
    }
}
