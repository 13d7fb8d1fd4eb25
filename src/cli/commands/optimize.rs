//! cli::commands::optimize
//!
//! Detect issues in a file and apply all safe removal fixes.

use anyhow::Result;
use std::fs;
use std::path::Path;

use super::Workspace;
use crate::change::removal_request;
use crate::cli::Context;
use crate::ui::output;

/// Run the optimize command.
///
/// The file becomes the session cursor. Removal fixes are applied one
/// commit at a time, re-detecting between edits because spans shift;
/// magic numbers are reported but left in place. The optimized content
/// is written back to the file.
pub fn optimize(ctx: &Context, file: &Path) -> Result<()> {
    let mut workspace = Workspace::open(ctx)?;
    let imported = workspace.import(ctx, file)?;
    let engine = workspace.engine();

    let mut current = imported;
    let mut applied = 0usize;
    loop {
        let issues = engine.detect_issues(&current);
        let Some(request) = issues
            .iter()
            .find_map(|issue| removal_request(issue, &current))
        else {
            break;
        };

        let change = engine.create_change(&request)?;
        match engine.apply(&change)? {
            Some(commit) => {
                output::debug(format!("applied: {}", commit.summary()), ctx.verbosity);
                applied += 1;
                current = commit.after().clone();
            }
            None => break,
        }
    }

    if applied > 0 {
        fs::write(ctx.resolve(file), current.content())?;
    }
    workspace.session.cursor = Some(current.clone());
    workspace.persist(&engine)?;

    let remaining = engine.issues(&current);
    output::print(
        format!(
            "{}: applied {applied} fix(es), {} issue(s) remaining",
            file.display(),
            remaining.len()
        ),
        ctx.verbosity,
    );
    if !remaining.is_empty() {
        output::print(
            output::format_issues(&remaining, current.content()),
            ctx.verbosity,
        );
    }
    Ok(())
}
