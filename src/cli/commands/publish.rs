//! cli::commands::publish
//!
//! Push the current lineage's commits to the configured remote.

use anyhow::Result;

use super::Workspace;
use crate::cli::Context;
use crate::engine::PublishError;
use crate::ui::output;

/// Run the publish command.
///
/// This is a synchronous wrapper that uses tokio to run the async
/// implementation.
pub fn publish(ctx: &Context) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(publish_async(ctx))
}

async fn publish_async(ctx: &Context) -> Result<()> {
    let mut workspace = Workspace::open(ctx)?;
    let cursor = workspace.cursor()?;
    let engine = workspace.engine();

    let publisher = engine.publisher(&cursor)?;
    let total = publisher.commits().len();

    match publisher.publish().await {
        Ok(delivered) => {
            engine.mark_published(&cursor, &delivered);
            workspace.persist(&engine)?;
            output::print(
                format!("published {} of {total} commit(s)", delivered.len()),
                ctx.verbosity,
            );
            Ok(())
        }
        Err(PublishError::Rejected { delivered, cause }) => {
            // Record what the remote confirmed before failing hard.
            engine.mark_published(&cursor, &delivered);
            workspace.persist(&engine)?;
            output::warn(
                format!("{} of {total} commit(s) confirmed before failure", delivered.len()),
                ctx.verbosity,
            );
            Err(cause.into())
        }
        Err(error) => Err(error.into()),
    }
}
