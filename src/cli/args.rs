//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Burnish - A Rust-native CLI for navigable source refactoring
#[derive(Parser, Debug)]
#[command(name = "bn")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if burnish was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Detect issues in a file and apply all safe removal fixes
    #[command(
        long_about = "Detect issues in a file and apply all safe removal fixes.\n\n\
            The file becomes the session cursor. Unused imports, methods, \
            parameters, and types are removed one commit at a time; magic \
            numbers are reported but left for you to name. The optimized \
            content is written back to the file."
    )]
    Optimize {
        /// Source file to optimize
        file: PathBuf,
    },

    /// Show the commit history of the current lineage
    Log,

    /// Re-root history at the current version, discarding what preceded it
    #[command(
        long_about = "Re-root history at the current version.\n\n\
            Everything before the current version is discarded; everything \
            from it to the tip is kept. Issues for the current version are \
            re-detected."
    )]
    Reset,

    /// List detected issues for the current version
    Inspect {
        /// Import this file as the session cursor first
        file: Option<PathBuf>,
    },

    /// Print the current version's source
    Show,

    /// Push the current lineage's commits to the configured remote
    Publish,

    /// Remove declarations flagged by one issue kind
    #[command(
        long_about = "Remove declarations flagged by one issue kind.\n\n\
            KIND is one of: unused-import, unused-method, unused-parameter, \
            unused-type. With no ids, every issue of the kind is fixed; \
            otherwise only the listed positions from `bn inspect`."
    )]
    Rm {
        /// Issue kind to fix
        kind: String,
        /// 1-based issue positions from `bn inspect` (all when omitted)
        ids: Vec<usize>,
    },

    /// Locate a declaration in the current version
    Whereis {
        /// Declaration kind: import, type, method, or parameter
        kind: String,
        /// Declared name to look up
        name: String,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        shell: Shell,
    },
}
