//! engine::publisher
//!
//! Ordered draining of a lineage's commits against a remote.
//!
//! # Design
//!
//! A [`CommitPublisher`] is bound to one lineage's log and one remote.
//! Publishing iterates commits in ascending sequence order and never
//! skips or reorders; already-delivered commits are offered again and
//! the remote answers idempotently (recognized by signature). The
//! publisher returns exactly the commits the remote confirmed, for the
//! caller to prune locally. A mid-drain rejection is a hard failure —
//! no automatic retry — carrying the confirmed prefix.
//!
//! # Example
//!
//! ```
//! use burnish::core::commit::{Commit, CommitSequence};
//! use burnish::core::log::CommitLog;
//! use burnish::core::source::SourceIdentity;
//! use burnish::engine::CommitPublisher;
//! use burnish::remote::MockRemote;
//! use std::sync::Arc;
//! use uuid::Uuid;
//!
//! # tokio_test::block_on(async {
//! let seq = CommitSequence::new();
//! let s0 = SourceIdentity::new("A.java", "v0", Uuid::new_v4());
//! let s1 = s0.with_content("v1");
//! let mut log = CommitLog::new();
//! log.add(Commit::new(s0, s1, "edit", seq.next()));
//!
//! let publisher = CommitPublisher::new(log, Arc::new(MockRemote::new()));
//! let delivered = publisher.publish().await.unwrap();
//! assert_eq!(delivered.len(), 1);
//! # });
//! ```

use std::sync::Arc;
use thiserror::Error;

use crate::core::commit::Commit;
use crate::core::log::CommitLog;
use crate::remote::{RemoteError, RemoteRepository};

/// Errors from publishing.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The engine has no remote repository configured.
    #[error("no remote repository is configured")]
    NotConfigured,

    /// The remote rejected a push mid-drain.
    ///
    /// `delivered` holds the commits confirmed before the failure, in
    /// order; the caller may prune those locally.
    #[error("publish failed after {} confirmed commits", delivered.len())]
    Rejected {
        /// Commits confirmed before the failure.
        delivered: Vec<Commit>,
        /// The remote's error.
        #[source]
        cause: RemoteError,
    },
}

/// Drains one lineage's commits against a remote, in order.
pub struct CommitPublisher {
    log: CommitLog,
    remote: Arc<dyn RemoteRepository>,
}

impl CommitPublisher {
    /// Bind a publisher to a lineage log and a remote.
    pub fn new(log: CommitLog, remote: Arc<dyn RemoteRepository>) -> Self {
        Self { log, remote }
    }

    /// The commits this publisher will offer, in order.
    pub fn commits(&self) -> &CommitLog {
        &self.log
    }

    /// Push every commit in ascending sequence order.
    ///
    /// Returns exactly the commits the remote confirmed (with updated
    /// remote status).
    ///
    /// # Errors
    ///
    /// [`PublishError::Rejected`] on the first remote failure; commits
    /// confirmed before it are carried in the error. Nothing is retried.
    pub async fn publish(&self) -> Result<Vec<Commit>, PublishError> {
        let mut delivered = Vec::with_capacity(self.log.len());
        for commit in self.log.iter() {
            match self.remote.push(commit).await {
                Ok(confirmed) => delivered.push(confirmed),
                Err(cause) => return Err(PublishError::Rejected { delivered, cause }),
            }
        }
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commit::{CommitSequence, RemoteStatus};
    use crate::core::source::SourceIdentity;
    use crate::remote::{FailOn, MockOperation, MockRemote};
    use uuid::Uuid;

    fn lineage(n: usize) -> (CommitLog, Vec<Commit>) {
        let seq = CommitSequence::new();
        let mut log = CommitLog::new();
        let mut commits = Vec::new();
        let mut current = SourceIdentity::new("A.java", "v0", Uuid::new_v4());
        for i in 0..n {
            let next = current.with_content(format!("v{}", i + 1));
            let commit = Commit::new(current, next.clone(), format!("c{}", i + 1), seq.next());
            log.add(commit.clone());
            commits.push(commit);
            current = next;
        }
        (log, commits)
    }

    #[test]
    fn publishes_in_ascending_order() {
        tokio_test::block_on(async {
            let (log, commits) = lineage(3);
            let remote = MockRemote::new();
            let publisher = CommitPublisher::new(log, Arc::new(remote.clone()));

            let delivered = publisher.publish().await.unwrap();
            assert_eq!(delivered.len(), 3);
            assert!(delivered.iter().all(|c| c.remote() == RemoteStatus::Published));

            let expected: Vec<MockOperation> = commits
                .iter()
                .map(|c| MockOperation::Push(c.signature().clone()))
                .collect();
            assert_eq!(remote.operations(), expected);
        });
    }

    #[test]
    fn rejection_carries_confirmed_prefix() {
        tokio_test::block_on(async {
            let (log, commits) = lineage(3);
            let remote = MockRemote::new();
            remote.fail_on(FailOn::PushSignature(
                commits[1].signature().clone(),
                RemoteError::Rejected {
                    signature: commits[1].signature().short(8).to_string(),
                    message: "rejected".to_string(),
                },
            ));

            let publisher = CommitPublisher::new(log, Arc::new(remote.clone()));
            let error = publisher.publish().await.unwrap_err();
            match error {
                PublishError::Rejected { delivered, .. } => {
                    assert_eq!(delivered.len(), 1);
                    assert_eq!(delivered[0], commits[0]);
                }
                other => panic!("unexpected error: {other}"),
            }
            // The failed commit was offered exactly once; nothing after
            // it was attempted.
            assert_eq!(remote.operations().len(), 2);
        });
    }

    #[test]
    fn empty_log_publishes_nothing() {
        tokio_test::block_on(async {
            let publisher =
                CommitPublisher::new(CommitLog::new(), Arc::new(MockRemote::new()));
            assert!(publisher.publish().await.unwrap().is_empty());
        });
    }

    #[test]
    fn republish_is_safe() {
        tokio_test::block_on(async {
            let (log, _) = lineage(2);
            let remote = MockRemote::new();
            let publisher = CommitPublisher::new(log, Arc::new(remote.clone()));

            publisher.publish().await.unwrap();
            let second = publisher.publish().await.unwrap();
            assert_eq!(second.len(), 2);
            // Remote stored each commit once.
            assert_eq!(remote.pushed_commits().len(), 2);
        });
    }
}
