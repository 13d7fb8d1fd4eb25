//! cli::commands::show
//!
//! Print the current version's source.

use anyhow::Result;

use super::Workspace;
use crate::cli::Context;
use crate::ui::output;

/// Run the show command.
pub fn show(ctx: &Context) -> Result<()> {
    let workspace = Workspace::open(ctx)?;
    let cursor = workspace.cursor()?;

    output::print(output::format_source_header(&cursor), ctx.verbosity);
    // Rendered source goes to stdout regardless of quiet mode.
    println!("{}", cursor.content());
    Ok(())
}
