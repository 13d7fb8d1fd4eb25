//! cli::commands::whereis
//!
//! Locate a declaration in the current version.

use anyhow::{bail, Result};

use super::Workspace;
use crate::analyze::{DeclKind, SourceAnalyzer, SurfaceAnalyzer};
use crate::cli::Context;
use crate::ui::output;

/// Run the whereis command.
pub fn whereis(ctx: &Context, kind: &str, name: &str) -> Result<()> {
    let kind: DeclKind = match kind.parse() {
        Ok(kind) => kind,
        Err(error) => bail!("{error}"),
    };

    let workspace = Workspace::open(ctx)?;
    let cursor = workspace.cursor()?;

    let analyzer = SurfaceAnalyzer::new();
    let unit = analyzer.parse(&cursor)?;
    let Some(span) = analyzer.locate(&unit, kind, name) else {
        bail!("{kind} '{name}' not found in {}", cursor.name());
    };

    output::print(
        format!(
            "{kind} '{name}' at {}:{}",
            cursor.name(),
            span.position(cursor.content())
        ),
        ctx.verbosity,
    );
    Ok(())
}
