//! core::source
//!
//! Immutable, content-addressed source versions.
//!
//! # Design
//!
//! A [`SourceIdentity`] is a value: name, full textual content, an
//! externally-assigned id, and a signature derived deterministically from
//! content and id. Equality and hashing are by signature only. An edit
//! never mutates an existing identity; it mints a new one.
//!
//! Serde round-trips recompute the signature and reject records whose
//! stored signature does not match the content, so a tampered session file
//! fails to load instead of smuggling in a mismatched identity.
//!
//! # Example
//!
//! ```
//! use burnish::core::source::SourceIdentity;
//! use uuid::Uuid;
//!
//! let v0 = SourceIdentity::new("Name.java", "class Name {}", Uuid::new_v4());
//! let v1 = v0.with_content("class Name { int x; }");
//!
//! // Same artifact, different versions
//! assert_eq!(v0.id(), v1.id());
//! assert_ne!(v0, v1);
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{Signature, TypeError};

/// An immutable, content-addressed version of a source artifact.
///
/// The signature is derived from the externally-assigned id plus the full
/// content, so two versions of the same artifact with identical content are
/// the same identity, and any content change produces a new one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SourceRecord", into = "SourceRecord")]
pub struct SourceIdentity {
    name: String,
    content: String,
    id: Uuid,
    signature: Signature,
}

impl SourceIdentity {
    /// Create a new source identity.
    ///
    /// The signature is computed from the id and content; there is no way
    /// to construct an identity whose signature disagrees with them.
    pub fn new(name: impl Into<String>, content: impl Into<String>, id: Uuid) -> Self {
        let name = name.into();
        let content = content.into();
        let signature = Self::derive_signature(&id, &content);
        Self {
            name,
            content,
            id,
            signature,
        }
    }

    /// Mint the successor version carrying new content.
    ///
    /// Name and id are preserved; the signature changes with the content.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self::new(self.name.clone(), content, self.id)
    }

    fn derive_signature(id: &Uuid, content: &str) -> Signature {
        Signature::compute([id.as_bytes().as_slice(), content.as_bytes()])
    }

    /// The artifact's display name (typically its path).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full textual content of this version.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The externally-assigned artifact id, stable across versions.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The version's signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

// Identity is the signature; name and content ride along.
impl PartialEq for SourceIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.signature == other.signature
    }
}

impl Eq for SourceIdentity {}

impl std::hash::Hash for SourceIdentity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.signature.hash(state);
    }
}

impl std::fmt::Display for SourceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.signature.short(8))
    }
}

/// Serde shadow for [`SourceIdentity`].
///
/// Deserialization recomputes the signature and rejects mismatches.
#[derive(Debug, Serialize, Deserialize)]
struct SourceRecord {
    name: String,
    content: String,
    id: Uuid,
    signature: Signature,
}

impl From<SourceIdentity> for SourceRecord {
    fn from(source: SourceIdentity) -> Self {
        Self {
            name: source.name,
            content: source.content,
            id: source.id,
            signature: source.signature,
        }
    }
}

impl TryFrom<SourceRecord> for SourceIdentity {
    type Error = TypeError;

    fn try_from(record: SourceRecord) -> Result<Self, Self::Error> {
        let expected = Self::derive_signature(&record.id, &record.content);
        if expected != record.signature {
            return Err(TypeError::InvalidSignature(format!(
                "stored signature {} does not match content (expected {})",
                record.signature.short(8),
                expected.short(8)
            )));
        }
        Ok(Self {
            name: record.name,
            content: record.content,
            id: record.id,
            signature: record.signature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(content: &str) -> SourceIdentity {
        SourceIdentity::new("Test.java", content, Uuid::new_v4())
    }

    #[test]
    fn signature_is_deterministic() {
        let id = Uuid::new_v4();
        let a = SourceIdentity::new("A.java", "class A {}", id);
        let b = SourceIdentity::new("B.java", "class A {}", id);
        // Name does not participate in identity
        assert_eq!(a, b);
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn content_changes_identity() {
        let v0 = source("class A {}");
        let v1 = v0.with_content("class A { int x; }");
        assert_ne!(v0, v1);
        assert_eq!(v0.id(), v1.id());
        assert_eq!(v0.name(), v1.name());
    }

    #[test]
    fn distinct_ids_distinct_identities() {
        let a = SourceIdentity::new("A.java", "same", Uuid::new_v4());
        let b = SourceIdentity::new("A.java", "same", Uuid::new_v4());
        assert_ne!(a, b);
    }

    #[test]
    fn with_content_same_text_is_same_identity() {
        let v0 = source("class A {}");
        let again = v0.with_content("class A {}");
        assert_eq!(v0, again);
    }

    #[test]
    fn hash_follows_signature() {
        use std::collections::HashSet;

        let v0 = source("one");
        let copy = v0.clone();
        let mut set = HashSet::new();
        set.insert(v0);
        assert!(set.contains(&copy));
    }

    #[test]
    fn serde_roundtrip() {
        let v0 = source("class A { void f() {} }");
        let json = serde_json::to_string(&v0).unwrap();
        let parsed: SourceIdentity = serde_json::from_str(&json).unwrap();
        assert_eq!(v0, parsed);
        assert_eq!(v0.content(), parsed.content());
    }

    #[test]
    fn serde_rejects_tampered_content() {
        let v0 = source("original");
        let json = serde_json::to_string(&v0).unwrap();
        let tampered = json.replace("original", "modified");
        let result: Result<SourceIdentity, _> = serde_json::from_str(&tampered);
        assert!(result.is_err());
    }
}
