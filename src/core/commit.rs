//! core::commit
//!
//! Immutable transition records between source versions.
//!
//! # Design
//!
//! A [`Commit`] records one accepted edit: the version it started from, the
//! version it produced, a human-readable summary, and bookkeeping fields.
//! Equality is by signature; the total order over commits is the explicit
//! monotonic [`CommitSequence`] ordering key assigned at creation time, not
//! comparison semantics baked into the value type.
//!
//! # Example
//!
//! ```
//! use burnish::core::commit::{Commit, CommitSequence, RemoteStatus};
//! use burnish::core::source::SourceIdentity;
//! use uuid::Uuid;
//!
//! let seq = CommitSequence::new();
//! let before = SourceIdentity::new("A.java", "class A {}", Uuid::new_v4());
//! let after = before.with_content("class A { int x; }");
//!
//! let commit = Commit::new(before, after, "add field x", seq.next());
//! assert!(commit.is_applied());
//! assert_eq!(commit.remote(), RemoteStatus::Unpublished);
//! ```

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::source::SourceIdentity;
use super::types::{Signature, TypeError, UtcTimestamp};

/// Remote publication status of a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteStatus {
    /// The commit exists only locally.
    Unpublished,
    /// The remote has confirmed delivery of this commit.
    Published,
}

impl std::fmt::Display for RemoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteStatus::Unpublished => write!(f, "unpublished"),
            RemoteStatus::Published => write!(f, "published"),
        }
    }
}

/// Shared monotonic counter handing out commit ordering keys.
///
/// Every commit minted through one sequence gets a strictly increasing
/// key, which is the sole basis of commit ordering in a [`CommitLog`].
/// Clones share the counter.
///
/// [`CommitLog`]: super::log::CommitLog
///
/// # Example
///
/// ```
/// use burnish::core::commit::CommitSequence;
///
/// let seq = CommitSequence::new();
/// let a = seq.next();
/// let b = seq.next();
/// assert!(b > a);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommitSequence(Arc<AtomicU64>);

impl CommitSequence {
    /// Create a fresh sequence starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a sequence at a persisted value.
    ///
    /// The next key handed out will be `next_value`.
    pub fn starting_at(next_value: u64) -> Self {
        Self(Arc::new(AtomicU64::new(next_value)))
    }

    /// Allocate the next ordering key.
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }

    /// The key the next call to [`next`](Self::next) would return.
    pub fn peek(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// An immutable record of one accepted transition between two versions.
///
/// The signature is derived from the before/after signatures, the summary,
/// and the sequence key. Remote status and the applied flag ride along
/// without participating in identity, so status updates preserve equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CommitRecord", into = "CommitRecord")]
pub struct Commit {
    signature: Signature,
    before: SourceIdentity,
    after: SourceIdentity,
    summary: String,
    applied: bool,
    sequence: u64,
    remote: RemoteStatus,
    created_at: UtcTimestamp,
}

impl Commit {
    /// Create an applied commit.
    ///
    /// `sequence` must come from the session's [`CommitSequence`]; it is
    /// the commit's position in total order.
    pub fn new(
        before: SourceIdentity,
        after: SourceIdentity,
        summary: impl Into<String>,
        sequence: u64,
    ) -> Self {
        let summary = summary.into();
        let signature = Self::derive_signature(&before, &after, &summary, sequence);
        Self {
            signature,
            before,
            after,
            summary,
            applied: true,
            sequence,
            remote: RemoteStatus::Unpublished,
            created_at: UtcTimestamp::now(),
        }
    }

    fn derive_signature(
        before: &SourceIdentity,
        after: &SourceIdentity,
        summary: &str,
        sequence: u64,
    ) -> Signature {
        let sequence_bytes = sequence.to_be_bytes();
        Signature::compute([
            before.signature().as_str().as_bytes(),
            after.signature().as_str().as_bytes(),
            summary.as_bytes(),
            sequence_bytes.as_slice(),
        ])
    }

    /// The commit's signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The version this commit transitioned from.
    pub fn before(&self) -> &SourceIdentity {
        &self.before
    }

    /// The version this commit produced.
    pub fn after(&self) -> &SourceIdentity {
        &self.after
    }

    /// Human-readable summary of the edit.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Whether the edit behind this commit was accepted and applied.
    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// The explicit ordering key.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Remote publication status.
    pub fn remote(&self) -> RemoteStatus {
        self.remote
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> &UtcTimestamp {
        &self.created_at
    }

    /// Produce an updated copy with a new remote status.
    ///
    /// Status is not part of the signature, so the copy compares equal to
    /// the original.
    pub fn with_remote(&self, remote: RemoteStatus) -> Self {
        let mut updated = self.clone();
        updated.remote = remote;
        updated
    }
}

impl PartialEq for Commit {
    fn eq(&self, other: &Self) -> bool {
        self.signature == other.signature
    }
}

impl Eq for Commit {}

impl std::hash::Hash for Commit {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.signature.hash(state);
    }
}

impl PartialOrd for Commit {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Commit {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sequence.cmp(&other.sequence)
    }
}

impl std::fmt::Display for Commit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} ({} -> {})",
            self.signature.short(8),
            self.summary,
            self.before.signature().short(8),
            self.after.signature().short(8),
        )
    }
}

/// Serde shadow for [`Commit`].
///
/// Deserialization recomputes the signature and rejects mismatches.
#[derive(Debug, Serialize, Deserialize)]
struct CommitRecord {
    signature: Signature,
    before: SourceIdentity,
    after: SourceIdentity,
    summary: String,
    applied: bool,
    sequence: u64,
    remote: RemoteStatus,
    created_at: UtcTimestamp,
}

impl From<Commit> for CommitRecord {
    fn from(commit: Commit) -> Self {
        Self {
            signature: commit.signature,
            before: commit.before,
            after: commit.after,
            summary: commit.summary,
            applied: commit.applied,
            sequence: commit.sequence,
            remote: commit.remote,
            created_at: commit.created_at,
        }
    }
}

impl TryFrom<CommitRecord> for Commit {
    type Error = TypeError;

    fn try_from(record: CommitRecord) -> Result<Self, Self::Error> {
        let expected = Commit::derive_signature(
            &record.before,
            &record.after,
            &record.summary,
            record.sequence,
        );
        if expected != record.signature {
            return Err(TypeError::InvalidSignature(format!(
                "stored commit signature {} does not match fields (expected {})",
                record.signature.short(8),
                expected.short(8)
            )));
        }
        Ok(Self {
            signature: record.signature,
            before: record.before,
            after: record.after,
            summary: record.summary,
            applied: record.applied,
            sequence: record.sequence,
            remote: record.remote,
            created_at: record.created_at,
        })
    }
}
