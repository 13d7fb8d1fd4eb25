//! cli::commands::reset
//!
//! Re-root history at the current version.

use anyhow::Result;

use super::Workspace;
use crate::cli::Context;
use crate::ui::output;

/// Run the reset command.
///
/// Everything before the cursor version is discarded; everything from
/// it to the tip is kept. The cursor's issues are re-detected.
pub fn reset(ctx: &Context) -> Result<()> {
    let mut workspace = Workspace::open(ctx)?;
    let cursor = workspace.cursor()?;
    let engine = workspace.engine();

    engine.rewrite_history(&cursor)?;
    workspace.persist(&engine)?;

    let history = engine.commit_history(&cursor);
    output::print(
        format!(
            "history re-rooted at {} ({} commit(s) kept)",
            cursor.signature().short(8),
            history.len()
        ),
        ctx.verbosity,
    );
    Ok(())
}
