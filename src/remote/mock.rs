//! remote::mock
//!
//! Mock remote implementation for deterministic testing.
//!
//! # Design
//!
//! The mock remote provides a deterministic implementation of the
//! [`RemoteRepository`] trait for use in tests. It stores commits in
//! memory, answers re-pushes idempotently, and allows configuring
//! failure scenarios per operation or per commit signature.
//!
//! # Example
//!
//! ```
//! use burnish::core::commit::{Commit, CommitSequence};
//! use burnish::core::commit::RemoteStatus;
//! use burnish::core::source::SourceIdentity;
//! use burnish::remote::{MockRemote, RemoteRepository};
//! use uuid::Uuid;
//!
//! # tokio_test::block_on(async {
//! let remote = MockRemote::new();
//! let seq = CommitSequence::new();
//! let s0 = SourceIdentity::new("A.java", "v0", Uuid::new_v4());
//! let s1 = s0.with_content("v1");
//! let commit = Commit::new(s0, s1, "edit", seq.next());
//!
//! let delivered = remote.push(&commit).await.unwrap();
//! assert_eq!(delivered.remote(), RemoteStatus::Published);
//! assert_eq!(remote.pushed_commits().len(), 1);
//!
//! // Re-push is recognized, not stored twice
//! remote.push(&commit).await.unwrap();
//! assert_eq!(remote.pushed_commits().len(), 1);
//! # });
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{RemoteError, RemoteRepository};
use crate::core::commit::{Commit, RemoteStatus};
use crate::core::source::SourceIdentity;
use crate::core::types::Signature;

/// Mock remote for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share
/// state.
#[derive(Debug, Clone, Default)]
pub struct MockRemote {
    inner: Arc<Mutex<MockRemoteInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockRemoteInner {
    /// Stored commits by signature.
    commits: HashMap<Signature, Commit>,
    /// Delivery order of first-time pushes.
    order: Vec<Signature>,
    /// Configured failure, if any.
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail every push with the given error.
    Push(RemoteError),
    /// Fail only the push of the commit with this signature.
    PushSignature(Signature, RemoteError),
    /// Fail every pull with the given error.
    Pull(RemoteError),
}

/// A recorded remote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    /// A push was attempted for this commit signature.
    Push(Signature),
    /// A pull was attempted for this lineage root.
    Pull(Signature),
}

impl MockRemote {
    /// Create an empty mock remote.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure a failure scenario.
    pub fn fail_on(&self, fail: FailOn) {
        self.inner.lock().unwrap().fail_on = Some(fail);
    }

    /// Clear any configured failure.
    pub fn clear_failure(&self) {
        self.inner.lock().unwrap().fail_on = None;
    }

    /// Commits delivered so far, in first-delivery order.
    pub fn pushed_commits(&self) -> Vec<Commit> {
        let inner = self.inner.lock().unwrap();
        inner
            .order
            .iter()
            .map(|sig| inner.commits[sig].clone())
            .collect()
    }

    /// Every operation attempted against this remote, in order.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }
}

#[async_trait]
impl RemoteRepository for MockRemote {
    async fn push(&self, commit: &Commit) -> Result<Commit, RemoteError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .operations
            .push(MockOperation::Push(commit.signature().clone()));

        match &inner.fail_on {
            Some(FailOn::Push(error)) => return Err(error.clone()),
            Some(FailOn::PushSignature(signature, error)) if signature == commit.signature() => {
                return Err(error.clone());
            }
            _ => {}
        }

        let delivered = commit.with_remote(RemoteStatus::Published);
        if !inner.commits.contains_key(commit.signature()) {
            inner.order.push(commit.signature().clone());
            inner
                .commits
                .insert(commit.signature().clone(), delivered.clone());
        }
        Ok(delivered)
    }

    async fn pull(&self, lineage: &Signature) -> Result<Vec<SourceIdentity>, RemoteError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockOperation::Pull(lineage.clone()));

        if let Some(FailOn::Pull(error)) = &inner.fail_on {
            return Err(error.clone());
        }

        let mut stored: Vec<&Commit> = inner.commits.values().collect();
        stored.sort_by_key(|c| c.sequence());

        let Some(root) = stored
            .iter()
            .find(|c| c.before().signature() == lineage)
            .map(|c| c.before().clone())
        else {
            return Err(RemoteError::UnknownLineage(lineage.short(8).to_string()));
        };

        // Walk the chain from the root, following before -> after.
        let mut sources = vec![root];
        let mut cursor = lineage.clone();
        loop {
            let next = stored
                .iter()
                .find(|c| c.before().signature() == &cursor)
                .map(|c| c.after().clone());
            match next {
                Some(after) => {
                    cursor = after.signature().clone();
                    sources.push(after);
                }
                None => break,
            }
        }
        Ok(sources)
    }
}
