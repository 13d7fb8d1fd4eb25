//! core::session
//!
//! Session persistence for the CLI.
//!
//! # Architecture
//!
//! The engine is in-memory; the CLI stitches invocations together by
//! serializing the engine state, the caller-held cursor, and the commit
//! sequence counter to `.burnish/session.json`. Records carry a format
//! version and are rejected on mismatch rather than migrated silently.
//!
//! Signatures embedded in the session are re-derived and verified during
//! deserialization (see [`SourceIdentity`]), so a hand-edited session file
//! fails to load instead of corrupting lineage identity.
//!
//! # Example
//!
//! ```no_run
//! use burnish::core::session::{Session, SessionStore};
//! use std::path::Path;
//!
//! let store = SessionStore::for_dir(Path::new("."));
//! let mut session = store.load_or_default().unwrap();
//! session.next_sequence += 1;
//! store.save(&session).unwrap();
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::registry::IssueRegistry;
use super::source::SourceIdentity;
use super::timeline::Timeline;

/// Current session format version.
pub const SESSION_VERSION: u32 = 1;

/// Directory holding session and project config files.
pub const SESSION_DIR: &str = ".burnish";

/// Session file name within [`SESSION_DIR`].
pub const SESSION_FILE: &str = "session.json";

/// Errors from session storage.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read session file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse session file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write session file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize session: {0}")]
    SerializeError(String),

    #[error("unsupported session format version {found} (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },
}

/// Everything the CLI carries between invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Format version; rejected on mismatch.
    pub version: u32,
    /// Lineages keyed by root signature.
    pub timeline: Timeline,
    /// Issues per live source version.
    pub registry: IssueRegistry,
    /// The caller-held "current version" reference.
    pub cursor: Option<SourceIdentity>,
    /// Next commit ordering key to hand out.
    pub next_sequence: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            version: SESSION_VERSION,
            timeline: Timeline::new(),
            registry: IssueRegistry::new(),
            cursor: None,
            next_sequence: 0,
        }
    }
}

/// JSON-backed session store rooted at a working directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store for the session file under `dir/.burnish/session.json`.
    pub fn for_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(SESSION_DIR).join(SESSION_FILE),
        }
    }

    /// The session file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the session, or a fresh default if no file exists yet.
    ///
    /// # Errors
    ///
    /// Fails on unreadable files, malformed JSON, signature mismatches,
    /// or an unsupported format version. A missing file is not an error.
    pub fn load_or_default(&self) -> Result<Session, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Session::default());
            }
            Err(source) => {
                return Err(SessionError::ReadError {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let session: Session =
            serde_json::from_str(&raw).map_err(|e| SessionError::ParseError {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        if session.version != SESSION_VERSION {
            return Err(SessionError::VersionMismatch {
                found: session.version,
                expected: SESSION_VERSION,
            });
        }

        Ok(session)
    }

    /// Persist the session, creating the session directory if needed.
    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SessionError::WriteError {
                path: self.path.clone(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(session)
            .map_err(|e| SessionError::SerializeError(e.to_string()))?;
        fs::write(&self.path, json).map_err(|source| SessionError::WriteError {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commit::{Commit, CommitSequence};
    use uuid::Uuid;

    #[test]
    fn missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::for_dir(dir.path());
        let session = store.load_or_default().unwrap();
        assert!(session.timeline.is_empty());
        assert!(session.cursor.is_none());
        assert_eq!(session.next_sequence, 0);
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::for_dir(dir.path());

        let seq = CommitSequence::new();
        let s0 = SourceIdentity::new("A.java", "v0", Uuid::new_v4());
        let s1 = s0.with_content("v1");

        let mut session = Session::default();
        session.timeline.record_root(s0.signature().clone());
        session
            .timeline
            .append(Commit::new(s0.clone(), s1.clone(), "edit", seq.next()))
            .unwrap();
        session.cursor = Some(s1.clone());
        session.next_sequence = seq.peek();
        store.save(&session).unwrap();

        let loaded = store.load_or_default().unwrap();
        assert_eq!(loaded.cursor.as_ref(), Some(&s1));
        assert_eq!(loaded.next_sequence, 1);
        assert_eq!(loaded.timeline.history_for(&s0).len(), 1);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::for_dir(dir.path());
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        let result = store.load_or_default();
        assert!(matches!(result, Err(SessionError::ParseError { .. })));
    }

    #[test]
    fn future_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::for_dir(dir.path());
        let mut session = Session::default();
        session.version = SESSION_VERSION + 1;
        store.save(&session).unwrap();

        let result = store.load_or_default();
        assert!(matches!(
            result,
            Err(SessionError::VersionMismatch { .. })
        ));
    }
}
