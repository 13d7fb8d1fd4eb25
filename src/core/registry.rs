//! core::registry
//!
//! Live registry of detected issues per source version.
//!
//! # Architecture
//!
//! The registry maps each currently live [`SourceIdentity`] to the issues
//! last detected for it. Refreshing replaces the entry wholesale (never
//! merges), so repeated detection on the same immutable version cannot
//! accumulate duplicates. Entries are evicted when a version is abandoned
//! by backward navigation or superseded by a history rewrite; forward
//! navigation leaves entries untouched.
//!
//! # Example
//!
//! ```
//! use burnish::core::issue::{Issue, IssueKind};
//! use burnish::core::registry::IssueRegistry;
//! use burnish::core::source::SourceIdentity;
//! use burnish::core::types::Span;
//! use uuid::Uuid;
//!
//! let source = SourceIdentity::new("A.java", "class A {}", Uuid::new_v4());
//! let issue = Issue::new(IssueKind::UnusedType, "type 'A' unused", Span::new(6, 7).unwrap(), "A:6");
//!
//! let mut registry = IssueRegistry::new();
//! registry.refresh(source.clone(), vec![issue]);
//! assert!(registry.has_issues(&source));
//!
//! registry.evict(&source);
//! assert!(registry.issues_for(&source).is_empty());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::issue::Issue;
use super::source::SourceIdentity;

/// Maps live source versions to their currently known issues.
///
/// At most one entry per identity. Read accessors never fail on unknown
/// keys; they return empty results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<RegistryEntry>", into = "Vec<RegistryEntry>")]
pub struct IssueRegistry {
    entries: HashMap<SourceIdentity, Vec<Issue>>,
}

impl IssueRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace (never merge) the entry for `source`.
    pub fn refresh(&mut self, source: SourceIdentity, issues: Vec<Issue>) {
        self.entries.insert(source, issues);
    }

    /// Remove the entry for `source`.
    ///
    /// Returns `true` if an entry was present; absent entries are a no-op.
    pub fn evict(&mut self, source: &SourceIdentity) -> bool {
        self.entries.remove(source).is_some()
    }

    /// The issues last recorded for `source`, empty if unknown.
    pub fn issues_for(&self, source: &SourceIdentity) -> &[Issue] {
        self.entries.get(source).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `source` has at least one recorded issue.
    pub fn has_issues(&self, source: &SourceIdentity) -> bool {
        !self.issues_for(source).is_empty()
    }

    /// Iterate every tracked source version.
    pub fn tracked_sources(&self) -> impl Iterator<Item = &SourceIdentity> {
        self.entries.keys()
    }

    /// Number of tracked source versions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no version is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serde shadow: the registry serializes as a flat entry list.
#[derive(Debug, Serialize, Deserialize)]
struct RegistryEntry {
    source: SourceIdentity,
    issues: Vec<Issue>,
}

impl From<IssueRegistry> for Vec<RegistryEntry> {
    fn from(registry: IssueRegistry) -> Self {
        registry
            .entries
            .into_iter()
            .map(|(source, issues)| RegistryEntry { source, issues })
            .collect()
    }
}

impl From<Vec<RegistryEntry>> for IssueRegistry {
    fn from(entries: Vec<RegistryEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.source, entry.issues))
                .collect(),
        }
    }
}
