//! core
//!
//! Domain types and bookkeeping collections.
//!
//! # Modules
//!
//! - [`types`] - Validated value types (signatures, spans, timestamps)
//! - [`source`] - Immutable, content-addressed source versions
//! - [`commit`] - Immutable transition records and the ordering sequence
//! - [`log`] - Ordered, duplicate-free commit collections with slicing
//! - [`timeline`] - Lineage-root to commit-log mapping
//! - [`registry`] - Issues per live source version
//! - [`issue`] - Detected issues and their stable identifiers
//! - [`session`] - CLI session persistence
//! - [`config`] - TOML configuration loading

pub mod commit;
pub mod config;
pub mod issue;
pub mod log;
pub mod registry;
pub mod session;
pub mod source;
pub mod timeline;
pub mod types;

pub use commit::{Commit, CommitSequence, RemoteStatus};
pub use issue::{Issue, IssueId, IssueKind};
pub use log::{CommitLog, LogError};
pub use registry::IssueRegistry;
pub use source::SourceIdentity;
pub use timeline::{Timeline, TimelineError};
pub use types::{Position, Signature, Span, TypeError, UtcTimestamp};
