//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens the workspace (session + config) under the context directory
//! 2. Drives the engine
//! 3. Persists the session and formats output
//!
//! Handlers never manipulate the timeline or registry directly.
//!
//! # Async Commands
//!
//! `publish` is async because it drives the remote seam. Its handler is
//! a synchronous wrapper that builds a tokio runtime and blocks on the
//! async implementation.

mod inspect;
mod log_cmd;
mod optimize;
mod publish;
mod reset;
mod rm;
mod show;
mod whereis;

// Re-export command functions for testing and direct invocation
pub use inspect::inspect;
pub use log_cmd::log;
pub use optimize::optimize;
pub use publish::publish;
pub use reset::reset;
pub use rm::rm;
pub use show::show;
pub use whereis::whereis;

use anyhow::{bail, Context as _, Result};
use clap::CommandFactory;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use super::args::{Cli, Command};
use super::Context;
use crate::analyze::{DetectorSet, SurfaceAnalyzer};
use crate::change::SpliceApplier;
use crate::core::commit::CommitSequence;
use crate::core::config::Config;
use crate::core::session::{Session, SessionStore};
use crate::core::source::SourceIdentity;
use crate::engine::{EngineState, LineageEngine};
use crate::remote::FileRemote;

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Optimize { file } => optimize(ctx, &file),
        Command::Log => log(ctx),
        Command::Reset => reset(ctx),
        Command::Inspect { file } => inspect(ctx, file.as_deref()),
        Command::Show => show(ctx),
        Command::Publish => publish(ctx),
        Command::Rm { kind, ids } => rm(ctx, &kind, &ids),
        Command::Whereis { kind, name } => whereis(ctx, &kind, &name),
        Command::Completion { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "bn", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Loaded session plus configuration, shared by all handlers.
pub(crate) struct Workspace {
    store: SessionStore,
    config: Config,
    /// The session being mutated; persisted by [`persist`](Self::persist).
    pub session: Session,
    /// Commit ordering keys, resumed from the session.
    pub sequence: CommitSequence,
}

impl Workspace {
    /// Open the workspace under the context's working directory.
    pub fn open(ctx: &Context) -> Result<Self> {
        let store = SessionStore::for_dir(&ctx.cwd);
        let session = store.load_or_default()?;
        let config = Config::load(&ctx.cwd)?;
        let sequence = CommitSequence::starting_at(session.next_sequence);
        Ok(Self {
            store,
            config,
            session,
            sequence,
        })
    }

    /// Build an engine over the session state with the standard
    /// collaborators (and the configured remote, if any).
    pub fn engine(&self) -> LineageEngine {
        let mut engine = LineageEngine::new(
            Arc::new(SurfaceAnalyzer::new()),
            DetectorSet::all(),
            Arc::new(SpliceApplier::new(self.sequence.clone())),
        )
        .with_state(EngineState {
            timeline: self.session.timeline.clone(),
            registry: self.session.registry.clone(),
        });

        if let Some(remote) = self.config.remote() {
            engine = engine.with_remote(Arc::new(FileRemote::new(&remote.path)));
        }
        engine
    }

    /// The session cursor, or a guiding error when no file was imported
    /// yet.
    pub fn cursor(&self) -> Result<SourceIdentity> {
        match &self.session.cursor {
            Some(cursor) => Ok(cursor.clone()),
            None => bail!("no active session; run 'bn inspect <file>' or 'bn optimize <file>' first"),
        }
    }

    /// Import a file as the session cursor.
    ///
    /// The file is read relative to the context directory; the name kept
    /// on the identity is the path as typed. Re-importing the cursor's
    /// own artifact keeps its id: unchanged content resolves to the same
    /// identity, changed content mints the successor version.
    pub fn import(&mut self, ctx: &Context, path: &Path) -> Result<SourceIdentity> {
        let content = fs::read_to_string(ctx.resolve(path))
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        let name = path.display().to_string();

        let source = match &self.session.cursor {
            Some(cursor) if cursor.name() == name => cursor.with_content(content),
            _ => SourceIdentity::new(name, content, Uuid::new_v4()),
        };
        self.session.cursor = Some(source.clone());
        Ok(source)
    }

    /// Write the engine state and sequence position back to disk.
    pub fn persist(&mut self, engine: &LineageEngine) -> Result<()> {
        let state = engine.snapshot();
        self.session.timeline = state.timeline;
        self.session.registry = state.registry;
        self.session.next_sequence = self.sequence.peek();
        self.store.save(&self.session)?;
        Ok(())
    }
}
