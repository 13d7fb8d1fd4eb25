//! cli::commands::rm
//!
//! Remove declarations flagged by one issue kind.

use anyhow::{bail, Result};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use super::Workspace;
use crate::change::removal_request;
use crate::cli::Context;
use crate::core::issue::IssueKind;
use crate::ui::output;

/// Run the rm command.
///
/// With no ids, every issue of the kind is fixed; otherwise only the
/// listed 1-based positions from `bn inspect`. Issues are re-detected
/// between edits (spans shift), so remaining targets are re-identified
/// by message, which is stable across shifts.
pub fn rm(ctx: &Context, kind: &str, ids: &[usize]) -> Result<()> {
    let kind: IssueKind = match kind.parse() {
        Ok(kind) => kind,
        Err(error) => bail!("{error}"),
    };
    if !kind.is_removable() {
        bail!("issues of kind '{kind}' have no safe removal fix");
    }

    let mut workspace = Workspace::open(ctx)?;
    let cursor = workspace.cursor()?;
    let engine = workspace.engine();

    let issues = engine.detect_issues(&cursor);
    let mut targets: HashSet<String> = HashSet::new();
    if ids.is_empty() {
        targets.extend(
            issues
                .iter()
                .filter(|i| i.kind() == kind)
                .map(|i| i.message().to_string()),
        );
    } else {
        for &id in ids {
            let Some(issue) = id.checked_sub(1).and_then(|idx| issues.get(idx)) else {
                bail!("no issue numbered {id}; run 'bn inspect' for the current list");
            };
            if issue.kind() != kind {
                bail!("issue {id} is '{}', not '{kind}'", issue.kind());
            }
            targets.insert(issue.message().to_string());
        }
    }
    if targets.is_empty() {
        output::print(format!("no '{kind}' issues to fix"), ctx.verbosity);
        return Ok(());
    }

    let mut current = cursor;
    let mut applied = 0usize;
    while !targets.is_empty() {
        let issues = engine.detect_issues(&current);
        let Some(request) = issues
            .iter()
            .filter(|i| targets.contains(i.message()))
            .find_map(|i| removal_request(i, &current).map(|r| (i.message().to_string(), r)))
        else {
            break;
        };
        let (message, request) = request;

        let change = engine.create_change(&request)?;
        match engine.apply(&change)? {
            Some(commit) => {
                targets.remove(&message);
                applied += 1;
                current = commit.after().clone();
            }
            None => break,
        }
    }

    if applied > 0 {
        let path = ctx.resolve(&PathBuf::from(current.name()));
        fs::write(&path, current.content())?;
    }
    workspace.session.cursor = Some(current.clone());
    workspace.persist(&engine)?;

    output::print(
        format!("removed {applied} '{kind}' declaration(s)"),
        ctx.verbosity,
    );
    Ok(())
}
