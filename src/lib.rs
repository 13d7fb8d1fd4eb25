//! Burnish - A Rust-native CLI for navigable source refactoring
//!
//! Burnish tracks the evolving lineage of a source artifact as a sequence of
//! accepted edits, lets a caller navigate forward and backward through that
//! lineage, re-roots the lineage at an arbitrary interior point, and keeps a
//! live registry of detected issues for every version it has checkpointed.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Orchestrates apply / checkpoint / navigation / rewrite
//! - [`core`] - Domain types, commit log, timeline, issue registry, session
//! - [`analyze`] - Source analyzer seam and the issue detector set
//! - [`change`] - Change applier seam (edit creation and execution)
//! - [`remote`] - Abstraction for remote publishing targets
//! - [`ui`] - User interaction utilities
//!
//! # Correctness Invariants
//!
//! Burnish maintains the following invariants:
//!
//! 1. Source versions and commits are immutable and content-addressed
//! 2. A commit log never holds two commits with the same signature
//! 3. History rewrites swap a lineage's log wholesale, never piecewise
//! 4. Issue detection failures degrade to an empty result, never corruption

pub mod analyze;
pub mod change;
pub mod cli;
pub mod core;
pub mod engine;
pub mod remote;
pub mod ui;
