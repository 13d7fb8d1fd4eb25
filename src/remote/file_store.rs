//! remote::file_store
//!
//! Directory-backed remote repository.
//!
//! # Design
//!
//! Commits are stored as JSON files named by signature under a
//! configured directory. Re-push of a known signature is recognized by
//! the existing file and answered with updated status instead of being
//! written again, which makes publishing safely re-runnable. `pull`
//! reconstructs a lineage by walking the before/after chain from the
//! requested root.
//!
//! This is the reference remote; it involves no network transport.
//!
//! # Example
//!
//! ```no_run
//! use burnish::remote::{FileRemote, RemoteRepository};
//! use std::path::Path;
//!
//! let remote = FileRemote::new(Path::new("/srv/burnish-remote"));
//! # let _ = remote;
//! ```

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};

use super::{RemoteError, RemoteRepository};
use crate::core::commit::{Commit, RemoteStatus};
use crate::core::source::SourceIdentity;
use crate::core::types::Signature;

/// Remote repository persisting commits as JSON files in a directory.
#[derive(Debug, Clone)]
pub struct FileRemote {
    root: PathBuf,
}

impl FileRemote {
    /// Create a remote rooted at `root`. The directory is created on
    /// first push.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// The backing directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn commit_path(&self, signature: &Signature) -> PathBuf {
        self.root.join(format!("{}.json", signature.as_str()))
    }

    fn load_all(&self) -> Result<Vec<Commit>, RemoteError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RemoteError::Storage(e.to_string())),
        };

        let mut commits = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RemoteError::Storage(e.to_string()))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let raw =
                fs::read_to_string(&path).map_err(|e| RemoteError::Storage(e.to_string()))?;
            let commit: Commit = serde_json::from_str(&raw)
                .map_err(|e| RemoteError::Storage(format!("{}: {e}", path.display())))?;
            commits.push(commit);
        }
        commits.sort_by_key(Commit::sequence);
        Ok(commits)
    }
}

#[async_trait]
impl RemoteRepository for FileRemote {
    async fn push(&self, commit: &Commit) -> Result<Commit, RemoteError> {
        let delivered = commit.with_remote(RemoteStatus::Published);
        let path = self.commit_path(commit.signature());

        // Known signature: idempotent, nothing re-transmitted.
        if path.exists() {
            return Ok(delivered);
        }

        fs::create_dir_all(&self.root).map_err(|e| RemoteError::Storage(e.to_string()))?;
        let json = serde_json::to_string_pretty(&delivered)
            .map_err(|e| RemoteError::Storage(e.to_string()))?;
        fs::write(&path, json).map_err(|e| RemoteError::Storage(e.to_string()))?;
        Ok(delivered)
    }

    async fn pull(&self, lineage: &Signature) -> Result<Vec<SourceIdentity>, RemoteError> {
        let commits = self.load_all()?;

        let Some(root) = commits
            .iter()
            .find(|c| c.before().signature() == lineage)
            .map(|c| c.before().clone())
        else {
            return Err(RemoteError::UnknownLineage(lineage.short(8).to_string()));
        };

        let mut sources = vec![root];
        let mut cursor = lineage.clone();
        loop {
            let next = commits
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
