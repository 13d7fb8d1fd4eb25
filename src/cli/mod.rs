//! cli
//!
//! Command-line interface layer for Burnish.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Does NOT manipulate lineage state directly
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! handlers that drive the [`crate::engine`]. Session state is loaded
//! before and persisted after each command; all lineage mutations flow
//! through the engine.

pub mod args;
pub mod commands;

pub use args::{Cli, Command};

use anyhow::Result;
use std::path::PathBuf;

use crate::ui::Verbosity;

/// Execution context for commands.
///
/// Global settings derived from CLI flags.
#[derive(Debug, Clone)]
pub struct Context {
    /// Working directory the session lives under.
    pub cwd: PathBuf,
    /// Output verbosity.
    pub verbosity: Verbosity,
}

impl Context {
    /// Resolve a possibly relative path against the working directory.
    pub fn resolve(&self, path: &std::path::Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let cwd = match cli.cwd.clone() {
        Some(cwd) => cwd,
        None => std::env::current_dir()?,
    };
    let ctx = Context {
        cwd,
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
    };

    commands::dispatch(cli.command, &ctx)
}
