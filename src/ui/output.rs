//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag. Info
//! lines go to stdout; errors and warnings go to stderr. Issue lists are
//! rendered numbered so `rm <kind> [ids]` can reference entries by
//! position.

use std::fmt::Display;

use crate::core::commit::Commit;
use crate::core::issue::Issue;
use crate::core::source::SourceIdentity;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Render a numbered issue list.
///
/// Positions are 1-based; they are the ids `rm` accepts.
pub fn format_issues(issues: &[Issue], content: &str) -> String {
    issues
        .iter()
        .enumerate()
        .map(|(idx, issue)| {
            let position = issue.span().position(content);
            format!("{:>3}. {} at {}", idx + 1, issue, position)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one commit history line.
pub fn format_commit(commit: &Commit) -> String {
    format!(
        "{} {} [{}] {}",
        commit.signature().short(8),
        commit.created_at(),
        commit.remote(),
        commit.summary(),
    )
}

/// Render the cursor header shown by `show` and `inspect`.
pub fn format_source_header(source: &SourceIdentity) -> String {
    format!("{} @ {}", source.name(), source.signature().short(12))
}
