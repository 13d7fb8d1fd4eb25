//! core::issue
//!
//! Detected issues and their stable identifiers.
//!
//! # Architecture
//!
//! Issues are produced by the detector set and stored verbatim in the
//! [`IssueRegistry`](super::registry::IssueRegistry). Each issue carries a
//! stable, deterministic [`IssueId`] computed from its kind and key
//! evidence, so the same underlying problem keeps the same id across
//! detection runs and can be referenced from commands.
//!
//! # Example
//!
//! ```
//! use burnish::core::issue::{Issue, IssueId, IssueKind};
//! use burnish::core::types::Span;
//!
//! let issue = Issue::new(
//!     IssueKind::MagicNumber,
//!     "magic number 42",
//!     Span::new(10, 12).unwrap(),
//!     "42:10",
//! );
//! assert!(issue.id().as_str().starts_with("magic-number:"));
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::types::Span;

/// The closed set of issue kinds the detector set can produce.
///
/// One detector exists per kind; the set is fixed, never extended by
/// name-based dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// A numeric literal embedded directly in code.
    MagicNumber,
    /// An import that is never referenced.
    UnusedImport,
    /// A method that is never called.
    UnusedMethod,
    /// A parameter that is never read in its method body.
    UnusedParameter,
    /// A declared type that is never referenced.
    UnusedType,
}

impl IssueKind {
    /// All kinds, in detection order.
    pub const ALL: [IssueKind; 5] = [
        IssueKind::MagicNumber,
        IssueKind::UnusedImport,
        IssueKind::UnusedMethod,
        IssueKind::UnusedParameter,
        IssueKind::UnusedType,
    ];

    /// The kebab-case slug used in issue ids and CLI arguments.
    pub fn slug(&self) -> &'static str {
        match self {
            IssueKind::MagicNumber => "magic-number",
            IssueKind::UnusedImport => "unused-import",
            IssueKind::UnusedMethod => "unused-method",
            IssueKind::UnusedParameter => "unused-parameter",
            IssueKind::UnusedType => "unused-type",
        }
    }

    /// Whether issues of this kind have a safe removal fix.
    ///
    /// Magic numbers are report-only: replacing them needs a caller-chosen
    /// name, not a deletion.
    pub fn is_removable(&self) -> bool {
        !matches!(self, IssueKind::MagicNumber)
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// Error from parsing an issue kind slug.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown issue kind: {0}")]
pub struct UnknownKind(pub String);

impl std::str::FromStr for IssueKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "magic-number" => Ok(IssueKind::MagicNumber),
            "unused-import" => Ok(IssueKind::UnusedImport),
            "unused-method" => Ok(IssueKind::UnusedMethod),
            "unused-parameter" => Ok(IssueKind::UnusedParameter),
            "unused-type" => Ok(IssueKind::UnusedType),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// A stable, deterministic issue identifier.
///
/// Issue ids are computed from the kind slug and key evidence, making them
/// stable across detection runs for the same underlying problem.
///
/// # Example
///
/// ```
/// use burnish::core::issue::{IssueId, IssueKind};
///
/// let id = IssueId::new(IssueKind::UnusedImport, "java.util.List");
/// assert!(id.as_str().starts_with("unused-import:"));
/// assert_eq!(id, IssueId::new(IssueKind::UnusedImport, "java.util.List"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssueId(String);

impl IssueId {
    /// Create an issue id from a kind and key evidence.
    ///
    /// The id is formatted as `slug:hash(key)` where hash is a truncated
    /// SHA-256 of the key.
    pub fn new(kind: IssueKind, key: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let hash = hasher.finalize();
        let short_hash = hex::encode(&hash[..4]); // 8 hex chars
        Self(format!("{}:{}", kind.slug(), short_hash))
    }

    /// Get the string representation of the id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IssueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A detected, potentially fixable property of one source version.
///
/// Issues are stored and returned verbatim by the registry; the engine
/// never inspects them beyond their identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    id: IssueId,
    kind: IssueKind,
    message: String,
    span: Span,
}

impl Issue {
    /// Create an issue.
    ///
    /// `key` is the evidence string fed into the stable id; it should
    /// pin the issue to its declaration (name plus offset).
    pub fn new(kind: IssueKind, message: impl Into<String>, span: Span, key: &str) -> Self {
        Self {
            id: IssueId::new(kind, key),
            kind,
            message: message.into(),
            span,
        }
    }

    /// The stable identifier.
    pub fn id(&self) -> &IssueId {
        &self.id
    }

    /// The issue kind.
    pub fn kind(&self) -> IssueKind {
        self.kind
    }

    /// Human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The span of the offending declaration or literal.
    pub fn span(&self) -> Span {
        self.span
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_roundtrips_through_from_str() {
        for kind in IssueKind::ALL {
            let parsed: IssueKind = kind.slug().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn unknown_slug_rejected() {
        let result: Result<IssueKind, _> = "bogus-kind".parse();
        assert_eq!(result, Err(UnknownKind("bogus-kind".to_string())));
    }

    #[test]
    fn ids_are_stable() {
        let a = IssueId::new(IssueKind::MagicNumber, "42:17");
        let b = IssueId::new(IssueKind::MagicNumber, "42:17");
        assert_eq!(a, b);
    }

    #[test]
    fn ids_differ_by_key() {
        let a = IssueId::new(IssueKind::MagicNumber, "42:17");
        let b = IssueId::new(IssueKind::MagicNumber, "42:30");
        assert_ne!(a, b);
    }

    #[test]
    fn ids_differ_by_kind() {
        let a = IssueId::new(IssueKind::UnusedImport, "List");
        let b = IssueId::new(IssueKind::UnusedType, "List");
        assert_ne!(a, b);
    }

    #[test]
    fn magic_number_is_not_removable() {
        assert!(!IssueKind::MagicNumber.is_removable());
        assert!(IssueKind::UnusedImport.is_removable());
        assert!(IssueKind::UnusedMethod.is_removable());
        assert!(IssueKind::UnusedParameter.is_removable());
        assert!(IssueKind::UnusedType.is_removable());
    }

    #[test]
    fn serde_roundtrip() {
        let issue = Issue::new(
            IssueKind::UnusedMethod,
            "method 'helper' is never called",
            Span::new(5, 40).unwrap(),
            "helper:5",
        );
        let json = serde_json::to_string(&issue).unwrap();
        let parsed: Issue = serde_json::from_str(&json).unwrap();
        assert_eq!(issue, parsed);
    }
}
