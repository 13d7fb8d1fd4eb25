//! remote
//!
//! Abstraction for remote publishing targets.
//!
//! # Design
//!
//! The `RemoteRepository` trait is async because remote operations are,
//! from the engine's perspective, opaque and potentially slow I/O. The
//! engine imposes no timeout or retry policy on them.
//!
//! Contract highlights:
//! - `push` returns the commit with updated remote status; re-pushing an
//!   already-delivered commit must be recognized (by signature) and
//!   answered idempotently, never stored twice
//! - `pull` returns a lineage's source versions in commit order
//!
//! Two implementations ship: [`FileRemote`] persists commits as JSON
//! files under a directory, and [`MockRemote`] is an in-memory test
//! double with failure injection.

pub mod file_store;
pub mod mock;

pub use file_store::FileRemote;
pub use mock::{FailOn, MockOperation, MockRemote};

use async_trait::async_trait;
use thiserror::Error;

use crate::core::commit::Commit;
use crate::core::source::SourceIdentity;
use crate::core::types::Signature;

/// Errors from remote operations.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The remote refused a pushed commit.
    #[error("remote rejected commit {signature}: {message}")]
    Rejected {
        /// Abbreviated signature of the rejected commit.
        signature: String,
        /// Reason given by the remote.
        message: String,
    },

    /// The remote's backing storage failed.
    #[error("remote storage error: {0}")]
    Storage(String),

    /// No lineage with this root is known to the remote.
    #[error("lineage not found on remote: {0}")]
    UnknownLineage(String),
}

/// A remote repository accepting commits and serving lineages.
#[async_trait]
pub trait RemoteRepository: Send + Sync {
    /// Deliver one commit.
    ///
    /// Returns the commit with updated remote status. Re-push of a known
    /// signature is idempotent.
    async fn push(&self, commit: &Commit) -> Result<Commit, RemoteError>;

    /// Fetch a lineage's source versions, in commit order starting at
    /// the root.
    async fn pull(&self, lineage: &Signature) -> Result<Vec<SourceIdentity>, RemoteError>;
}
