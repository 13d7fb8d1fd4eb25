//! analyze
//!
//! Source analyzer seam and the issue detector set.
//!
//! # Architecture
//!
//! The engine never parses source text itself. It talks to a
//! [`SourceAnalyzer`], which turns a [`SourceIdentity`] into a
//! [`ParsedUnit`] — a flat, borrowable view of declarations and uses —
//! and resolves (kind, name) pairs back to spans. The detector set in
//! [`detectors`] consumes parsed units and produces issues.
//!
//! The shipped analyzer, [`SurfaceAnalyzer`], is a character-level
//! scanner for Java-like sources; anything with richer semantics can be
//! swapped in behind the trait without touching the engine.

pub mod detectors;
pub mod scanner;

pub use detectors::{DetectorKind, DetectorSet};
pub use scanner::SurfaceAnalyzer;

use thiserror::Error;

use crate::core::source::SourceIdentity;
use crate::core::types::{Signature, Span};

/// Errors from source analysis.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyzeError {
    /// A delimiter was opened but never closed.
    #[error("unbalanced '{open}' at offset {at}")]
    Unbalanced {
        /// The unmatched opening delimiter.
        open: char,
        /// Byte offset of the opening delimiter.
        at: usize,
    },
}

/// An import declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// Imported simple name (last path segment; `*` for wildcards).
    pub name: String,
    /// Full dotted path as written.
    pub path: String,
    /// The whole statement, keyword through semicolon.
    pub span: Span,
}

/// A type declaration (class, interface, enum, record).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    /// Declared name.
    pub name: String,
    /// The name token.
    pub name_span: Span,
    /// Keyword through closing body brace.
    pub span: Span,
}

/// A parameter declaration within a method signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    /// Parameter name.
    pub name: String,
    /// The name token.
    pub span: Span,
}

/// A method (or constructor) declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    /// Declared name.
    pub name: String,
    /// The name token.
    pub name_span: Span,
    /// Signature start through closing body brace.
    pub span: Span,
    /// Opening body brace through closing body brace.
    pub body: Span,
    /// Declared parameters, in order.
    pub params: Vec<ParamDecl>,
    /// Whether the declaration carries the `private` modifier.
    ///
    /// Unused-method detection only flags private methods; everything
    /// else is potentially external API.
    pub is_private: bool,
}

/// A numeric literal occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericLiteral {
    /// Literal text as written.
    pub text: String,
    /// The literal token.
    pub span: Span,
}

/// One identifier occurrence (declarations included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentUse {
    /// Identifier text.
    pub name: String,
    /// The identifier token.
    pub span: Span,
}

/// A flat, analyzable view of one source version.
///
/// Produced by a [`SourceAnalyzer`]; consumed by the detector set and by
/// declaration lookup.
#[derive(Debug, Clone)]
pub struct ParsedUnit {
    source: Signature,
    imports: Vec<ImportDecl>,
    types: Vec<TypeDecl>,
    methods: Vec<MethodDecl>,
    literals: Vec<NumericLiteral>,
    identifiers: Vec<IdentUse>,
}

impl ParsedUnit {
    /// Assemble a unit. Intended for analyzer implementations.
    pub fn new(
        source: Signature,
        imports: Vec<ImportDecl>,
        types: Vec<TypeDecl>,
        methods: Vec<MethodDecl>,
        literals: Vec<NumericLiteral>,
        identifiers: Vec<IdentUse>,
    ) -> Self {
        Self {
            source,
            imports,
            types,
            methods,
            literals,
            identifiers,
        }
    }

    /// Signature of the version this unit was parsed from.
    pub fn source(&self) -> &Signature {
        &self.source
    }

    /// Import declarations, in order of appearance.
    pub fn imports(&self) -> &[ImportDecl] {
        &self.imports
    }

    /// Type declarations.
    pub fn types(&self) -> &[TypeDecl] {
        &self.types
    }

    /// Method declarations.
    pub fn methods(&self) -> &[MethodDecl] {
        &self.methods
    }

    /// Numeric literals.
    pub fn literals(&self) -> &[NumericLiteral] {
        &self.literals
    }

    /// Every identifier occurrence.
    pub fn identifiers(&self) -> &[IdentUse] {
        &self.identifiers
    }

    /// Uses of `name` outside `decl` (the declaring region).
    ///
    /// This is the shared "is it referenced anywhere else" primitive the
    /// unused-* detectors build on.
    pub fn uses_outside(&self, name: &str, decl: &Span) -> usize {
        self.identifiers
            .iter()
            .filter(|ident| ident.name == name && !decl.contains(&ident.span))
            .count()
    }
}

/// Kinds of declaration the analyzer can locate by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    /// An import statement.
    Import,
    /// A type declaration.
    Type,
    /// A method declaration.
    Method,
    /// A method parameter.
    Parameter,
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclKind::Import => write!(f, "import"),
            DeclKind::Type => write!(f, "type"),
            DeclKind::Method => write!(f, "method"),
            DeclKind::Parameter => write!(f, "parameter"),
        }
    }
}

/// Error from parsing a declaration kind argument.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown declaration kind: {0}")]
pub struct UnknownDeclKind(pub String);

impl std::str::FromStr for DeclKind {
    type Err = UnknownDeclKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "import" => Ok(DeclKind::Import),
            "type" | "class" => Ok(DeclKind::Type),
            "method" => Ok(DeclKind::Method),
            "parameter" | "param" => Ok(DeclKind::Parameter),
            other => Err(UnknownDeclKind(other.to_string())),
        }
    }
}

/// Turns source text into an analyzable structure and resolves names to
/// locations.
///
/// Implementations are opaque, potentially slow collaborators from the
/// engine's perspective; the engine imposes no timeout on them.
pub trait SourceAnalyzer: Send + Sync {
    /// Parse one source version.
    fn parse(&self, source: &SourceIdentity) -> Result<ParsedUnit, AnalyzeError>;

    /// Resolve a named declaration to its name-token span.
    fn locate(&self, unit: &ParsedUnit, kind: DeclKind, name: &str) -> Option<Span>;
}
