//! ui
//!
//! User interaction utilities.
//!
//! # Responsibilities
//!
//! - Output formatting with verbosity levels
//! - Rendering of issue lists and commit history
//!
//! The UI layer never touches engine state.

pub mod output;

pub use output::Verbosity;
