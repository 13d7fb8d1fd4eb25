//! cli::commands::log_cmd
//!
//! Show the commit history of the current lineage.

use anyhow::Result;

use super::Workspace;
use crate::cli::Context;
use crate::ui::output;

/// Run the log command. Commits print oldest first.
pub fn log(ctx: &Context) -> Result<()> {
    let workspace = Workspace::open(ctx)?;
    let cursor = workspace.cursor()?;
    let engine = workspace.engine();

    let history = engine.commit_history(&cursor);
    if history.is_empty() {
        output::print("no commits yet", ctx.verbosity);
        return Ok(());
    }
    for commit in history.iter() {
        output::print(output::format_commit(commit), ctx.verbosity);
    }
    Ok(())
}
