//! cli::commands::inspect
//!
//! List detected issues for the current version.

use anyhow::Result;
use std::path::Path;

use super::Workspace;
use crate::cli::Context;
use crate::ui::output;

/// Run the inspect command.
///
/// With a file argument the file is imported as the session cursor
/// first. Issues are detected fresh and printed as a numbered list; the
/// numbers are what `bn rm <kind> [ids]` accepts.
pub fn inspect(ctx: &Context, file: Option<&Path>) -> Result<()> {
    let mut workspace = Workspace::open(ctx)?;
    let source = match file {
        Some(path) => workspace.import(ctx, path)?,
        None => workspace.cursor()?,
    };

    let engine = workspace.engine();
    let issues = engine.detect_issues(&source);
    workspace.persist(&engine)?;

    output::print(output::format_source_header(&source), ctx.verbosity);
    if issues.is_empty() {
        output::print("no issues detected", ctx.verbosity);
    } else {
        output::print(
            output::format_issues(&issues, source.content()),
            ctx.verbosity,
        );
    }
    Ok(())
}
