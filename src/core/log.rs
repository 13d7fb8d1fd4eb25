//! core::log
//!
//! Ordered, duplicate-free commit collections with range slicing.
//!
//! # Architecture
//!
//! A [`CommitLog`] holds the commits of one lineage. Commits are kept in a
//! `BTreeMap` keyed by their explicit sequence number, with a secondary
//! signature index for O(1) membership checks. Ordering never relies on
//! comparison semantics of the commit value itself.
//!
//! # Invariants
//!
//! - Commits are strictly increasing by sequence key
//! - No two stored commits share a signature; re-adding is a reported no-op
//! - Slices seed their `from` commit unconditionally (see [`CommitLog::slice`])
//!
//! # Example
//!
//! ```
//! use burnish::core::commit::{Commit, CommitSequence};
//! use burnish::core::log::CommitLog;
//! use burnish::core::source::SourceIdentity;
//! use uuid::Uuid;
//!
//! let seq = CommitSequence::new();
//! let s0 = SourceIdentity::new("A.java", "v0", Uuid::new_v4());
//! let s1 = s0.with_content("v1");
//!
//! let mut log = CommitLog::new();
//! let commit = Commit::new(s0, s1, "edit", seq.next());
//! assert!(log.add(commit.clone()));
//! assert!(!log.add(commit)); // duplicate signature: no-op
//! assert_eq!(log.len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use super::commit::{Commit, RemoteStatus};
use super::types::Signature;

/// Errors from commit log operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LogError {
    /// The log holds no commits, so there is no first/last to return.
    #[error("commit log is empty")]
    Empty,

    /// Two commits with the same signature were offered during
    /// deserialization.
    #[error("duplicate commit signature: {0}")]
    Duplicate(String),
}

/// An ordered set of commits belonging to one lineage.
///
/// May be empty. Insertion preserves total order by sequence key;
/// duplicate signatures are rejected without mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Commit>", into = "Vec<Commit>")]
pub struct CommitLog {
    by_sequence: BTreeMap<u64, Commit>,
    index: HashMap<Signature, u64>,
}

impl CommitLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a commit, preserving order.
    ///
    /// Returns `false` without mutation if a commit with the same
    /// signature is already stored, `true` otherwise.
    pub fn add(&mut self, commit: Commit) -> bool {
        if self.index.contains_key(commit.signature()) {
            return false;
        }
        self.index
            .insert(commit.signature().clone(), commit.sequence());
        self.by_sequence.insert(commit.sequence(), commit);
        true
    }

    /// Whether a commit with this signature is stored.
    pub fn contains(&self, commit: &Commit) -> bool {
        self.contains_signature(commit.signature())
    }

    /// Whether any stored commit carries this signature.
    pub fn contains_signature(&self, signature: &Signature) -> bool {
        self.index.contains_key(signature)
    }

    /// Remove a commit by signature.
    ///
    /// Returns `true` if it was present.
    pub fn remove(&mut self, commit: &Commit) -> bool {
        match self.index.remove(commit.signature()) {
            Some(sequence) => {
                self.by_sequence.remove(&sequence);
                true
            }
            None => false,
        }
    }

    /// Remove all commits.
    pub fn clear(&mut self) {
        self.by_sequence.clear();
        self.index.clear();
    }

    /// Number of stored commits.
    pub fn len(&self) -> usize {
        self.by_sequence.len()
    }

    /// Whether the log holds no commits.
    pub fn is_empty(&self) -> bool {
        self.by_sequence.is_empty()
    }

    /// The earliest commit by sequence key.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Empty`] on an empty log.
    pub fn first(&self) -> Result<&Commit, LogError> {
        self.by_sequence
            .values()
            .next()
            .ok_or(LogError::Empty)
    }

    /// The latest commit by sequence key.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Empty`] on an empty log.
    pub fn last(&self) -> Result<&Commit, LogError> {
        self.by_sequence
            .values()
            .next_back()
            .ok_or(LogError::Empty)
    }

    /// Iterate stored commits in ascending sequence order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Commit> {
        self.by_sequence.values()
    }

    /// Extract a sub-log between two commits.
    ///
    /// The result always contains `from`, seeded unconditionally as the
    /// synthetic root of the slice regardless of `from_inclusive`; the
    /// flag only governs whether the range scan re-includes it, which
    /// coalesces in a duplicate-free log. Stored commits strictly between
    /// `from` and `to` are always included, and `to` per `to_inclusive`.
    /// If `from` equals `to`, the result is the single-element log
    /// containing `from`.
    ///
    /// # Example
    ///
    /// ```
    /// use burnish::core::commit::{Commit, CommitSequence};
    /// use burnish::core::log::CommitLog;
    /// use burnish::core::source::SourceIdentity;
    /// use uuid::Uuid;
    ///
    /// let seq = CommitSequence::new();
    /// let s0 = SourceIdentity::new("A.java", "v0", Uuid::new_v4());
    /// let s1 = s0.with_content("v1");
    /// let s2 = s1.with_content("v2");
    /// let s3 = s2.with_content("v3");
    ///
    /// let mut log = CommitLog::new();
    /// let c1 = Commit::new(s0, s1.clone(), "c1", seq.next());
    /// let c2 = Commit::new(s1, s2.clone(), "c2", seq.next());
    /// let c3 = Commit::new(s2, s3, "c3", seq.next());
    /// log.add(c1.clone());
    /// log.add(c2.clone());
    /// log.add(c3.clone());
    ///
    /// // `from` is present even with from_inclusive = false
    /// let tail = log.slice(&c2, false, &c3, true);
    /// assert_eq!(tail.len(), 2);
    /// assert!(tail.contains(&c2));
    /// assert!(tail.contains(&c3));
    /// ```
    pub fn slice(
        &self,
        from: &Commit,
        from_inclusive: bool,
        to: &Commit,
        to_inclusive: bool,
    ) -> CommitLog {
        let mut result = CommitLog::new();
        // The lower bound is always seeded: it becomes the synthetic root
        // of the slice even when the scan below excludes it.
        result.add(from.clone());

        for commit in self.by_sequence.values() {
            let seq = commit.sequence();
            let above_lower = if from_inclusive {
                seq >= from.sequence()
            } else {
                seq > from.sequence()
            };
            let below_upper = if to_inclusive {
                seq <= to.sequence()
            } else {
                seq < to.sequence()
            };
            if above_lower && below_upper {
                result.add(commit.clone());
            }
        }

        result
    }

    /// Everything from the log's current first commit through `upto`,
    /// inclusive.
    ///
    /// The first commit is always present per the seeding rule of
    /// [`slice`](Self::slice).
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Empty`] on an empty log; callers needing a safe
    /// variant should catch it and substitute an empty log.
    pub fn slice_upto(&self, upto: &Commit) -> Result<CommitLog, LogError> {
        let first = self.first()?;
        Ok(self.slice(first, false, upto, true))
    }

    /// Collapse the lineage to its head checkpoint.
    ///
    /// Degenerates to the single-element log containing only the first
    /// commit.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Empty`] on an empty log.
    pub fn slice_head(&self) -> Result<CommitLog, LogError> {
        let first = self.first()?;
        Ok(self.slice(first, false, first, true))
    }

    /// Everything from `from` (seeded) through the current tip.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Empty`] on an empty log.
    pub fn slice_from(&self, from: &Commit) -> Result<CommitLog, LogError> {
        let last = self.last()?;
        Ok(self.slice(from, false, last, true))
    }

    /// Update the remote status of a stored commit in place.
    ///
    /// Returns `true` if a commit with this signature was present. The
    /// rebuilt commit keeps its signature and sequence, so ordering and
    /// membership invariants are unaffected.
    pub fn mark_remote(&mut self, signature: &Signature, status: RemoteStatus) -> bool {
        let Some(sequence) = self.index.get(signature).copied() else {
            return false;
        };
        if let Some(commit) = self.by_sequence.get(&sequence) {
            let updated = commit.with_remote(status);
            self.by_sequence.insert(sequence, updated);
        }
        true
    }
}

impl From<CommitLog> for Vec<Commit> {
    fn from(log: CommitLog) -> Self {
        log.by_sequence.into_values().collect()
    }
}

impl TryFrom<Vec<Commit>> for CommitLog {
    type Error = LogError;

    fn try_from(commits: Vec<Commit>) -> Result<Self, Self::Error> {
        let mut log = CommitLog::new();
        for commit in commits {
            let signature = commit.signature().clone();
            if !log.add(commit) {
                return Err(LogError::Duplicate(signature.short(8).to_string()));
            }
        }
        Ok(log)
    }
}
