//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Signature`] - Content-derived SHA-256 identity of a source or commit
//! - [`Span`] - Half-open byte range into source text
//! - [`Position`] - Line/column coordinates resolved from a span
//! - [`UtcTimestamp`] - RFC3339 timestamp
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use burnish::core::types::{Signature, Span};
//!
//! // Signatures are derived, never hand-assembled
//! let sig = Signature::compute(["content", "id"]);
//! assert_eq!(sig.as_str().len(), 64);
//!
//! // Or validated from an existing hex digest
//! assert!(Signature::new(sig.as_str()).is_ok());
//! assert!(Signature::new("not-a-digest").is_err());
//!
//! let span = Span::new(4, 9).unwrap();
//! assert_eq!(span.len(), 5);
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid span: {0}")]
    InvalidSpan(String),
}

/// A content-derived identity digest.
///
/// Signatures are 64 lowercase hex characters (SHA-256). They identify
/// source versions and commits; equality of signatures is equality of the
/// values they identify.
///
/// # Example
///
/// ```
/// use burnish::core::types::Signature;
///
/// let sig = Signature::compute(["hello"]);
/// assert_eq!(sig, Signature::compute(["hello"]));
/// assert_ne!(sig, Signature::compute(["world"]));
///
/// // Abbreviated form for display
/// assert_eq!(sig.short(8).len(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Signature(String);

impl Signature {
    /// Create a validated signature from an existing hex digest.
    ///
    /// The digest is normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidSignature` if the string is not 64 hex
    /// characters.
    pub fn new(digest: impl Into<String>) -> Result<Self, TypeError> {
        let digest = digest.into().to_ascii_lowercase();
        Self::validate(&digest)?;
        Ok(Self(digest))
    }

    /// Compute a signature over a sequence of byte chunks.
    ///
    /// Chunks are NUL-separated before hashing so that distinct chunkings
    /// of the same bytes produce distinct digests.
    pub fn compute<I>(chunks: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut hasher = Sha256::new();
        for chunk in chunks {
            hasher.update(chunk.as_ref());
            hasher.update(b"\0");
        }
        Self(hex::encode(hasher.finalize()))
    }

    /// Get an abbreviated form of the signature.
    ///
    /// Returns the first `len` characters. If `len` exceeds the digest
    /// length, returns the full digest.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    /// Validate a hex digest.
    fn validate(digest: &str) -> Result<(), TypeError> {
        if digest.len() != 64 {
            return Err(TypeError::InvalidSignature(format!(
                "expected 64 hex characters, got {}",
                digest.len()
            )));
        }
        if !digest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidSignature(
                "signature must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// Get the signature as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Signature {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Signature> for String {
    fn from(sig: Signature) -> Self {
        sig.0
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A half-open byte range `[start, end)` into source text.
///
/// # Example
///
/// ```
/// use burnish::core::types::Span;
///
/// let span = Span::new(2, 6).unwrap();
/// assert_eq!(span.slice("0123456789"), Some("2345"));
///
/// // Inverted ranges are rejected at construction
/// assert!(Span::new(6, 2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a validated span.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidSpan` if `end < start`.
    pub fn new(start: usize, end: usize) -> Result<Self, TypeError> {
        if end < start {
            return Err(TypeError::InvalidSpan(format!(
                "end {end} precedes start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Start offset (inclusive).
    pub fn start(&self) -> usize {
        self.start
    }

    /// End offset (exclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether this span lies entirely within `text`.
    pub fn fits(&self, text: &str) -> bool {
        self.end <= text.len() && text.is_char_boundary(self.start) && text.is_char_boundary(self.end)
    }

    /// Whether `other` lies entirely within this span.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The covered slice of `text`, or `None` if the span does not fit.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        if self.fits(text) {
            Some(&text[self.start..self.end])
        } else {
            None
        }
    }

    /// Resolve the span's start offset to line/column coordinates.
    ///
    /// Lines and columns are 1-based. Offsets past the end of `text`
    /// resolve to the final position.
    pub fn position(&self, text: &str) -> Position {
        let mut line = 1;
        let mut column = 1;
        for (idx, ch) in text.char_indices() {
            if idx >= self.start {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Position { line, column }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// 1-based line/column coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number, starting at 1.
    pub column: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A UTC timestamp in RFC3339 format.
///
/// # Example
///
/// ```
/// use burnish::core::types::UtcTimestamp;
///
/// let now = UtcTimestamp::now();
/// println!("Current time: {}", now);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtcTimestamp(chrono::DateTime<chrono::Utc>);

impl UtcTimestamp {
    /// Create a timestamp for the current moment.
    pub fn now() -> Self {
        Self(chrono::Utc::now())
    }

    /// Create a timestamp from a chrono DateTime.
    pub fn from_datetime(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self(dt)
    }

    /// Get the underlying datetime.
    pub fn as_datetime(&self) -> &chrono::DateTime<chrono::Utc> {
        &self.0
    }
}

impl std::fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod signature {
        use super::*;

        #[test]
        fn compute_is_deterministic() {
            let a = Signature::compute(["alpha", "beta"]);
            let b = Signature::compute(["alpha", "beta"]);
            assert_eq!(a, b);
        }

        #[test]
        fn chunking_is_significant() {
            let joined = Signature::compute(["alphabeta"]);
            let split = Signature::compute(["alpha", "beta"]);
            assert_ne!(joined, split);
        }

        #[test]
        fn valid_digest_accepted() {
            let sig = Signature::compute(["x"]);
            assert!(Signature::new(sig.as_str()).is_ok());
        }

        #[test]
        fn normalizes_to_lowercase() {
            let sig = Signature::compute(["x"]);
            let upper = sig.as_str().to_ascii_uppercase();
            assert_eq!(Signature::new(upper).unwrap(), sig);
        }

        #[test]
        fn wrong_length_rejected() {
            assert!(Signature::new("").is_err());
            assert!(Signature::new("abc123").is_err());
        }

        #[test]
        fn non_hex_rejected() {
            let bad = "z".repeat(64);
            assert!(Signature::new(bad).is_err());
        }

        #[test]
        fn short_form() {
            let sig = Signature::compute(["x"]);
            assert_eq!(sig.short(8), &sig.as_str()[..8]);
            assert_eq!(sig.short(100), sig.as_str());
        }

        #[test]
        fn serde_roundtrip() {
            let sig = Signature::compute(["roundtrip"]);
            let json = serde_json::to_string(&sig).unwrap();
            let parsed: Signature = serde_json::from_str(&json).unwrap();
            assert_eq!(sig, parsed);
        }

        #[test]
        fn serde_rejects_garbage() {
            let result: Result<Signature, _> = serde_json::from_str("\"nope\"");
            assert!(result.is_err());
        }
    }

    mod span {
        use super::*;

        #[test]
        fn valid_span() {
            let span = Span::new(2, 6).unwrap();
            assert_eq!(span.start(), 2);
            assert_eq!(span.end(), 6);
            assert_eq!(span.len(), 4);
            assert!(!span.is_empty());
        }

        #[test]
        fn empty_span() {
            let span = Span::new(3, 3).unwrap();
            assert!(span.is_empty());
            assert_eq!(span.len(), 0);
        }

        #[test]
        fn inverted_rejected() {
            assert!(Span::new(6, 2).is_err());
        }

        #[test]
        fn slice_within_bounds() {
            let span = Span::new(2, 6).unwrap();
            assert_eq!(span.slice("0123456789"), Some("2345"));
        }

        #[test]
        fn slice_out_of_bounds() {
            let span = Span::new(2, 60).unwrap();
            assert_eq!(span.slice("0123456789"), None);
        }

        #[test]
        fn contains_nested() {
            let outer = Span::new(0, 10).unwrap();
            let inner = Span::new(3, 7).unwrap();
            assert!(outer.contains(&inner));
            assert!(!inner.contains(&outer));
        }

        #[test]
        fn position_resolves_lines() {
            let text = "ab\ncd\nef";
            assert_eq!(
                Span::new(0, 1).unwrap().position(text),
                Position { line: 1, column: 1 }
            );
            assert_eq!(
                Span::new(4, 5).unwrap().position(text),
                Position { line: 2, column: 2 }
            );
            assert_eq!(
                Span::new(6, 7).unwrap().position(text),
                Position { line: 3, column: 1 }
            );
        }
    }

    mod utc_timestamp {
        use super::*;

        #[test]
        fn now_works() {
            let ts = UtcTimestamp::now();
            assert!(ts.to_string().contains('T'));
        }

        #[test]
        fn serde_roundtrip() {
            let ts = UtcTimestamp::now();
            let json = serde_json::to_string(&ts).unwrap();
            let parsed: UtcTimestamp = serde_json::from_str(&json).unwrap();
            assert_eq!(ts, parsed);
        }
    }
}
