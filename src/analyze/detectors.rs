//! analyze::detectors
//!
//! The closed issue detector set.
//!
//! # Architecture
//!
//! One detector exists per [`IssueKind`], modeled as a closed enum —
//! the runner iterates a configured set and unions results, never
//! dispatching dynamically by name. Detectors are pure functions of a
//! [`ParsedUnit`]; failures belong to the analyzer that produced the
//! unit, not to the rules.
//!
//! # Rules
//!
//! - `magic-number`: every numeric literal in code
//! - `unused-import`: non-wildcard import never referenced
//! - `unused-method`: private, non-constructor method never called from
//!   outside its own declaration
//! - `unused-parameter`: parameter never read in its method body
//! - `unused-type`: nested type never referenced from outside itself
//!   (top-level types are potentially external API and are left alone)
//!
//! # Example
//!
//! ```
//! use burnish::analyze::{DetectorSet, SourceAnalyzer, SurfaceAnalyzer};
//! use burnish::core::source::SourceIdentity;
//! use uuid::Uuid;
//!
//! let analyzer = SurfaceAnalyzer::new();
//! let source = SourceIdentity::new(
//!     "Name.java",
//!     "class Name { void boom(String m){ if(m.length()>1){} } }",
//!     Uuid::new_v4(),
//! );
//! let unit = analyzer.parse(&source).unwrap();
//! let issues = DetectorSet::all().run(&unit);
//! assert_eq!(issues.len(), 1); // the magic number `1`
//! ```

use super::ParsedUnit;
use crate::core::issue::{Issue, IssueKind};

/// One detector, tagged by the issue kind it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorKind {
    /// Flags numeric literals.
    MagicNumber,
    /// Flags unreferenced imports.
    UnusedImport,
    /// Flags uncalled private methods.
    UnusedMethod,
    /// Flags unread parameters.
    UnusedParameter,
    /// Flags unreferenced nested types.
    UnusedType,
}

impl DetectorKind {
    /// The full detector set, in detection order.
    pub const ALL: [DetectorKind; 5] = [
        DetectorKind::MagicNumber,
        DetectorKind::UnusedImport,
        DetectorKind::UnusedMethod,
        DetectorKind::UnusedParameter,
        DetectorKind::UnusedType,
    ];

    /// The issue kind this detector produces.
    pub fn issue_kind(&self) -> IssueKind {
        match self {
            DetectorKind::MagicNumber => IssueKind::MagicNumber,
            DetectorKind::UnusedImport => IssueKind::UnusedImport,
            DetectorKind::UnusedMethod => IssueKind::UnusedMethod,
            DetectorKind::UnusedParameter => IssueKind::UnusedParameter,
            DetectorKind::UnusedType => IssueKind::UnusedType,
        }
    }

    /// The detector producing a given issue kind.
    pub fn for_issue_kind(kind: IssueKind) -> DetectorKind {
        match kind {
            IssueKind::MagicNumber => DetectorKind::MagicNumber,
            IssueKind::UnusedImport => DetectorKind::UnusedImport,
            IssueKind::UnusedMethod => DetectorKind::UnusedMethod,
            IssueKind::UnusedParameter => DetectorKind::UnusedParameter,
            IssueKind::UnusedType => DetectorKind::UnusedType,
        }
    }

    /// Run this detector over a parsed unit.
    pub fn detect(&self, unit: &ParsedUnit) -> Vec<Issue> {
        match self {
            DetectorKind::MagicNumber => detect_magic_numbers(unit),
            DetectorKind::UnusedImport => detect_unused_imports(unit),
            DetectorKind::UnusedMethod => detect_unused_methods(unit),
            DetectorKind::UnusedParameter => detect_unused_parameters(unit),
            DetectorKind::UnusedType => detect_unused_types(unit),
        }
    }
}

/// A configured subset of detectors.
///
/// The runner unions results across its members and orders them by
/// position so issue numbering is stable for display.
#[derive(Debug, Clone)]
pub struct DetectorSet {
    kinds: Vec<DetectorKind>,
}

impl DetectorSet {
    /// All five detectors.
    pub fn all() -> Self {
        Self {
            kinds: DetectorKind::ALL.to_vec(),
        }
    }

    /// A specific subset, in the given order.
    pub fn of(kinds: impl IntoIterator<Item = DetectorKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// The configured detectors.
    pub fn kinds(&self) -> &[DetectorKind] {
        &self.kinds
    }

    /// Run every configured detector and union the results.
    pub fn run(&self, unit: &ParsedUnit) -> Vec<Issue> {
        let mut issues: Vec<Issue> = self
            .kinds
            .iter()
            .flat_map(|kind| kind.detect(unit))
            .collect();
        issues.sort_by_key(|issue| (issue.span().start(), issue.kind().slug()));
        issues
    }
}

impl Default for DetectorSet {
    fn default() -> Self {
        Self::all()
    }
}

fn detect_magic_numbers(unit: &ParsedUnit) -> Vec<Issue> {
    unit.literals()
        .iter()
        .map(|literal| {
            Issue::new(
                IssueKind::MagicNumber,
                format!("magic number '{}'", literal.text),
                literal.span,
                &format!("{}:{}", literal.text, literal.span.start()),
            )
        })
        .collect()
}

fn detect_unused_imports(unit: &ParsedUnit) -> Vec<Issue> {
    unit.imports()
        .iter()
        .filter(|import| import.name != "*")
        .filter(|import| unit.uses_outside(&import.name, &import.span) == 0)
        .map(|import| {
            Issue::new(
                IssueKind::UnusedImport,
                format!("import '{}' is never used", import.path),
                import.span,
                &import.path,
            )
        })
        .collect()
}

fn detect_unused_methods(unit: &ParsedUnit) -> Vec<Issue> {
    unit.methods()
        .iter()
        .filter(|method| method.is_private)
        // Constructors are invoked through their type name
        .filter(|method| !unit.types().iter().any(|t| t.name == method.name))
        .filter(|method| unit.uses_outside(&method.name, &method.span) == 0)
        .map(|method| {
            Issue::new(
                IssueKind::UnusedMethod,
                format!("private method '{}' is never called", method.name),
                method.span,
                &format!("{}:{}", method.name, method.name_span.start()),
            )
        })
        .collect()
}

fn detect_unused_parameters(unit: &ParsedUnit) -> Vec<Issue> {
    let mut issues = Vec::new();
    for method in unit.methods() {
        for param in &method.params {
            let read = unit
                .identifiers()
                .iter()
                .any(|ident| ident.name == param.name && method.body.contains(&ident.span));
            if !read {
                issues.push(Issue::new(
                    IssueKind::UnusedParameter,
                    format!(
                        "parameter '{}' of '{}' is never read",
                        param.name, method.name
                    ),
                    param.span,
                    &format!("{}:{}:{}", method.name, param.name, param.span.start()),
                ));
            }
        }
    }
    issues
}

fn detect_unused_types(unit: &ParsedUnit) -> Vec<Issue> {
    unit.types()
        .iter()
        .filter(|decl| {
            unit.types()
                .iter()
                .any(|outer| outer.name != decl.name && outer.span.contains(&decl.span))
        })
        .filter(|decl| unit.uses_outside(&decl.name, &decl.span) == 0)
        .map(|decl| {
            Issue::new(
                IssueKind::UnusedType,
                format!("nested type '{}' is never used", decl.name),
                decl.span,
                &format!("{}:{}", decl.name, decl.name_span.start()),
            )
        })
        .collect()
}
