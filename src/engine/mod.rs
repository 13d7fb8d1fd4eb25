//! engine
//!
//! Orchestrates the lineage lifecycle: apply -> checkpoint -> detect,
//! navigation, and history rewriting.
//!
//! # Architecture
//!
//! [`LineageEngine`] composes the timeline and issue registry behind one
//! coarse lock and delegates everything it does not own to collaborator
//! seams: edit creation/execution to a [`ChangeApplier`], parsing to a
//! [`SourceAnalyzer`], rule evaluation to a [`DetectorSet`], and
//! publishing to a [`RemoteRepository`]. The engine itself never parses,
//! never edits text, and never talks to the network.
//!
//! # Invariants
//!
//! - Compound read-then-write operations (`checkpoint`,
//!   `rewrite_history`) execute under the state lock
//! - History rewrites install the new log in one swap under the original
//!   root key; readers never observe a half-rewritten lineage
//! - Detection failures are reported to the [`ErrorSink`] and degrade to
//!   an empty set; they never propagate
//! - Backward navigation evicts the abandoned version's issues and never
//!   recomputes the entered version's
//!
//! # Example
//!
//! ```
//! use burnish::analyze::{DetectorSet, SurfaceAnalyzer};
//! use burnish::change::SpliceApplier;
//! use burnish::core::commit::CommitSequence;
//! use burnish::core::source::SourceIdentity;
//! use burnish::engine::LineageEngine;
//! use std::sync::Arc;
//! use uuid::Uuid;
//!
//! let engine = LineageEngine::new(
//!     Arc::new(SurfaceAnalyzer::new()),
//!     DetectorSet::all(),
//!     Arc::new(SpliceApplier::new(CommitSequence::new())),
//! );
//!
//! let source = SourceIdentity::new(
//!     "Name.java",
//!     "class Name { void boom(String m){ if(m.length()>1){} } }",
//!     Uuid::new_v4(),
//! );
//! let issues = engine.detect_issues(&source);
//! assert_eq!(issues.len(), 1);
//! ```

pub mod publisher;
pub mod sink;

pub use publisher::{CommitPublisher, PublishError};
pub use sink::{ErrorSink, RecordingSink, StderrSink};

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::analyze::{DetectorSet, SourceAnalyzer};
use crate::change::{Change, ChangeApplier, ChangeError, ChangeRequest};
use crate::core::commit::{Commit, RemoteStatus};
use crate::core::issue::Issue;
use crate::core::log::{CommitLog, LogError};
use crate::core::registry::IssueRegistry;
use crate::core::source::SourceIdentity;
use crate::core::timeline::{Timeline, TimelineError};
use crate::core::types::Signature;
use crate::remote::RemoteRepository;

/// Errors from engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The source is not part of any recorded lineage (or not part of
    /// the lineage it claimed).
    #[error("source {0} is not part of any recorded lineage")]
    NotInLineage(String),

    /// Lineage bookkeeping failed; indicates a bug, not user error.
    #[error(transparent)]
    Timeline(#[from] TimelineError),

    /// A commit log operation failed.
    #[error(transparent)]
    Log(#[from] LogError),

    /// The change applier rejected a request.
    #[error(transparent)]
    Change(#[from] ChangeError),
}

/// The mutable bookkeeping the engine guards.
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    /// Lineages keyed by root signature.
    pub timeline: Timeline,
    /// Issues per live source version.
    pub registry: IssueRegistry,
}

/// The lineage orchestrator.
///
/// Owns the timeline and issue registry inside an explicit value with
/// clear construction and teardown; never a global singleton. Methods
/// take `&self`; internal state is guarded by one coarse lock, which is
/// sufficient at the workloads this engine targets.
pub struct LineageEngine {
    state: Mutex<EngineState>,
    analyzer: Arc<dyn SourceAnalyzer>,
    detectors: DetectorSet,
    applier: Arc<dyn ChangeApplier>,
    remote: Option<Arc<dyn RemoteRepository>>,
    sink: Arc<dyn ErrorSink>,
}

impl LineageEngine {
    /// Create an engine with empty state and a stderr error sink.
    pub fn new(
        analyzer: Arc<dyn SourceAnalyzer>,
        detectors: DetectorSet,
        applier: Arc<dyn ChangeApplier>,
    ) -> Self {
        Self {
            state: Mutex::new(EngineState::default()),
            analyzer,
            detectors,
            applier,
            remote: None,
            sink: Arc::new(StderrSink),
        }
    }

    /// Restore previously persisted state.
    pub fn with_state(mut self, state: EngineState) -> Self {
        self.state = Mutex::new(state);
        self
    }

    /// Configure the remote repository used by publishers.
    pub fn with_remote(mut self, remote: Arc<dyn RemoteRepository>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Replace the error sink.
    pub fn with_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Clone out the current state for persistence.
    pub fn snapshot(&self) -> EngineState {
        self.state.lock().unwrap().clone()
    }

    /// Create an executable change. Pure delegation to the applier.
    pub fn create_change(&self, request: &ChangeRequest) -> Result<Change, EngineError> {
        Ok(self.applier.create_change(request)?)
    }

    /// Execute a change and checkpoint the resulting commit.
    ///
    /// Returns `Ok(None)` without side effects when the applier declines
    /// the change. On acceptance the commit is checkpointed and issues
    /// are detected for its after side.
    pub fn apply(&self, change: &Change) -> Result<Option<Commit>, EngineError> {
        let Some(commit) = self.applier.apply(change)? else {
            return Ok(None);
        };
        self.checkpoint(commit.clone())?;
        self.detect_issues(commit.after());
        Ok(Some(commit))
    }

    /// Durably record a commit into its lineage.
    ///
    /// Records the before side as a new root if no lineage claims it,
    /// appends the commit, and returns the after side. Registry entries
    /// are untouched: committing moves the lineage forward, and forward
    /// movement never evicts (the before side's issues stay exactly as
    /// last detected, ready for backward navigation). Does not run issue
    /// detection; callers wanting fresh issues call
    /// [`detect_issues`](Self::detect_issues) explicitly.
    pub fn checkpoint(&self, commit: Commit) -> Result<SourceIdentity, EngineError> {
        let before = commit.before().clone();
        let after = commit.after().clone();

        let mut state = self.state.lock().unwrap();
        if state.timeline.resolve_root(&before).is_none() {
            state.timeline.record_root(before.signature().clone());
        }
        state.timeline.append(commit)?;
        Ok(after)
    }

    /// Run the configured detector set over one source version.
    ///
    /// On success the registry entry for `source` is replaced (repeated
    /// calls never accumulate) and the issues are returned. On
    /// collaborator failure the error is reported to the sink, the
    /// registry is left untouched, and an empty set is returned —
    /// detection never propagates an error.
    pub fn detect_issues(&self, source: &SourceIdentity) -> Vec<Issue> {
        let unit = match self.analyzer.parse(source) {
            Ok(unit) => unit,
            Err(error) => {
                self.sink
                    .report(&format!("issue detection for '{}'", source.name()), &error);
                return Vec::new();
            }
        };
        let issues = self.detectors.run(&unit);

        let mut state = self.state.lock().unwrap();
        state.registry.refresh(source.clone(), issues.clone());
        issues
    }

    /// Step forward through the lineage.
    ///
    /// Returns the after side of the commit departing from `current`,
    /// or `current` unchanged when it is already the tip. Forward
    /// navigation touches no registry entries.
    pub fn next(&self, current: &SourceIdentity) -> SourceIdentity {
        let state = self.state.lock().unwrap();
        state
            .timeline
            .history_for(current)
            .iter()
            .find(|c| c.before() == current)
            .map(|c| c.after().clone())
            .unwrap_or_else(|| current.clone())
    }

    /// Step backward through the lineage.
    ///
    /// Returns the before side of the commit arriving at `current`,
    /// evicting the registry entry for `current` (it is being
    /// abandoned), or `current` unchanged when it is the root. The
    /// entered version's entry is left exactly as previously computed —
    /// backward navigation never recomputes.
    pub fn previous(&self, current: &SourceIdentity) -> SourceIdentity {
        let mut state = self.state.lock().unwrap();
        let arriving = state
            .timeline
            .history_for(current)
            .iter()
            .find(|c| c.after() == current)
            .map(|c| c.before().clone());
        match arriving {
            Some(before) => {
                state.registry.evict(current);
                before
            }
            None => current.clone(),
        }
    }

    /// Re-root the lineage at `source`.
    ///
    /// Three cases, checked in order:
    ///
    /// 1. `source` is the lineage's root: the log collapses to its head
    ///    checkpoint.
    /// 2. `source` is the current tip: strict no-op.
    /// 3. `source` is interior: the log is replaced by the slice from
    ///    its arriving commit through the tip, installed under the
    ///    original root key.
    ///
    /// Cases 1 and 3 evict registry entries for versions dropped from
    /// the log and re-run detection for `source`.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotInLineage`] when no lineage knows `source`, or
    /// when it sits in none of the three positions of the lineage that
    /// claimed it.
    pub fn rewrite_history(&self, source: &SourceIdentity) -> Result<SourceIdentity, EngineError> {
        let rewritten = {
            let mut state = self.state.lock().unwrap();
            let root = state
                .timeline
                .resolve_root(source)
                .cloned()
                .ok_or_else(|| EngineError::NotInLineage(source.signature().short(8).into()))?;
            let log = state
                .timeline
                .log_for_root(&root)
                .cloned()
                .unwrap_or_default();

            let first = log.first()?.clone();
            let last = log.last()?.clone();

            if first.before() == source {
                let collapsed = log.slice_head()?;
                evict_dropped(&mut state.registry, &log, &collapsed, source);
                state.timeline.replace(root, collapsed);
                true
            } else if last.after() == source {
                false
            } else {
                let arriving = log
                    .iter()
                    .find(|c| c.after() == source)
                    .cloned()
                    .ok_or_else(|| {
                        EngineError::NotInLineage(source.signature().short(8).into())
                    })?;
                let tail = log.slice_from(&arriving)?;
                evict_dropped(&mut state.registry, &log, &tail, source);
                state.timeline.replace(root, tail);
                true
            }
        };

        // Detection runs outside the lock; the collaborator may be slow.
        if rewritten {
            self.detect_issues(source);
        }
        Ok(source.clone())
    }

    /// The commit history of `source`'s lineage; empty if unknown.
    pub fn commit_history(&self, source: &SourceIdentity) -> CommitLog {
        self.state.lock().unwrap().timeline.history_for(source)
    }

    /// The issues last recorded for `source`; empty if unknown.
    pub fn issues(&self, source: &SourceIdentity) -> Vec<Issue> {
        self.state
            .lock()
            .unwrap()
            .registry
            .issues_for(source)
            .to_vec()
    }

    /// Whether `source` has recorded issues.
    pub fn has_issues(&self, source: &SourceIdentity) -> bool {
        self.state.lock().unwrap().registry.has_issues(source)
    }

    /// Every source version currently tracked by the registry.
    pub fn sources(&self) -> Vec<SourceIdentity> {
        self.state
            .lock()
            .unwrap()
            .registry
            .tracked_sources()
            .cloned()
            .collect()
    }

    /// Build a publisher bound to `source`'s lineage log and the
    /// configured remote.
    ///
    /// # Errors
    ///
    /// [`PublishError::NotConfigured`] when no remote is configured.
    pub fn publisher(&self, source: &SourceIdentity) -> Result<CommitPublisher, PublishError> {
        let remote = self.remote.clone().ok_or(PublishError::NotConfigured)?;
        let log = self.state.lock().unwrap().timeline.history_for(source);
        Ok(CommitPublisher::new(log, remote))
    }

    /// Record remote confirmation for delivered commits.
    ///
    /// Marks each delivered commit published in `source`'s lineage log;
    /// returns how many were found and updated.
    pub fn mark_published(&self, source: &SourceIdentity, delivered: &[Commit]) -> usize {
        let mut state = self.state.lock().unwrap();
        let Some(root) = state.timeline.resolve_root(source).cloned() else {
            return 0;
        };
        let Some(log) = state.timeline.log_for_root_mut(&root) else {
            return 0;
        };
        delivered
            .iter()
            .filter(|c| log.mark_remote(c.signature(), RemoteStatus::Published))
            .count()
    }
}

/// Evict registry entries for versions present in `old` but absent from
/// `new`, keeping the rewrite target itself (it is re-detected next).
fn evict_dropped(
    registry: &mut IssueRegistry,
    old: &CommitLog,
    new: &CommitLog,
    keep: &SourceIdentity,
) {
    let live: HashSet<&Signature> = new
        .iter()
        .flat_map(|c| [c.before().signature(), c.after().signature()])
        .collect();

    for commit in old.iter() {
        for side in [commit.before(), commit.after()] {
            if side != keep && !live.contains(side.signature()) {
                registry.evict(side);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::SurfaceAnalyzer;
    use crate::change::SpliceApplier;
    use crate::core::commit::CommitSequence;
    use uuid::Uuid;

    fn engine() -> LineageEngine {
        LineageEngine::new(
            Arc::new(SurfaceAnalyzer::new()),
            DetectorSet::all(),
            Arc::new(SpliceApplier::new(CommitSequence::new())),
        )
    }

    /// Checkpoint a hand-built chain of `n` commits; returns versions
    /// v0..=vn. Every version past the root contains one magic number.
    fn checkpoint_chain(engine: &LineageEngine, n: usize) -> Vec<SourceIdentity> {
        let seq = CommitSequence::new();
        let mut sources = vec![SourceIdentity::new("A.java", "class A { }", Uuid::new_v4())];
        for i in 0..n {
            let next = sources[i].with_content(format!("class A {{ int x = {}; }}", i));
            let commit = Commit::new(sources[i].clone(), next.clone(), format!("c{}", i + 1), seq.next());
            engine.checkpoint(commit).unwrap();
            sources.push(next);
        }
        sources
    }

    #[test]
    fn checkpoint_records_root_once_and_evicts_before() {
        let engine = engine();
        let sources = checkpoint_chain(&engine, 3);
        // One lineage; three commits.
        assert_eq!(engine.commit_history(&sources[0]).len(), 3);
        assert_eq!(engine.snapshot().timeline.len(), 1);
    }

    #[test]
    fn checkpoint_leaves_before_issues_in_place() {
        let engine = engine();
        let s0 = SourceIdentity::new("A.java", "class A { int x = 9; }", Uuid::new_v4());
        let detected = engine.detect_issues(&s0);
        assert_eq!(detected.len(), 1);

        let s1 = s0.with_content("class A { int x = LIMIT; }");
        engine
            .checkpoint(Commit::new(s0.clone(), s1, "fix", 0))
            .unwrap();
        // Committing is forward movement; the before side keeps its
        // last-detected issues.
        assert_eq!(engine.issues(&s0), detected);
    }

    #[test]
    fn next_walks_forward_and_stops_at_tip() {
        let engine = engine();
        let sources = checkpoint_chain(&engine, 2);
        assert_eq!(engine.next(&sources[0]), sources[1]);
        assert_eq!(engine.next(&sources[1]), sources[2]);
        // Tip is a no-op, not an error.
        assert_eq!(engine.next(&sources[2]), sources[2]);
    }

    #[test]
    fn previous_walks_backward_and_stops_at_root() {
        let engine = engine();
        let sources = checkpoint_chain(&engine, 2);
        assert_eq!(engine.previous(&sources[2]), sources[1]);
        assert_eq!(engine.previous(&sources[1]), sources[0]);
        assert_eq!(engine.previous(&sources[0]), sources[0]);
    }

    #[test]
    fn previous_evicts_abandoned_version_only() {
        let engine = engine();
        let sources = checkpoint_chain(&engine, 1);
        engine.detect_issues(&sources[0]);
        engine.detect_issues(&sources[1]);

        engine.previous(&sources[1]);
        let state = engine.snapshot();
        // Abandoned tip evicted; entered version untouched.
        assert!(!state.registry.tracked_sources().any(|s| s == &sources[1]));
        assert!(state.registry.tracked_sources().any(|s| s == &sources[0]));
    }

    #[test]
    fn detection_failure_reports_and_degrades_to_empty() {
        let sink = RecordingSink::new();
        let engine = LineageEngine::new(
            Arc::new(SurfaceAnalyzer::new()),
            DetectorSet::all(),
            Arc::new(SpliceApplier::new(CommitSequence::new())),
        )
        .with_sink(Arc::new(sink.clone()));

        let broken = SourceIdentity::new("Broken.java", "class A {", Uuid::new_v4());
        let issues = engine.detect_issues(&broken);
        assert!(issues.is_empty());
        assert_eq!(sink.reports().len(), 1);
        assert!(sink.reports()[0].contains("Broken.java"));
        // The registry was not refreshed with an empty entry.
        assert_eq!(engine.sources().len(), 0);
    }

    #[test]
    fn detect_is_idempotent_replacement() {
        let engine = engine();
        let s0 = SourceIdentity::new("A.java", "class A { int x = 9; }", Uuid::new_v4());
        let first = engine.detect_issues(&s0);
        let second = engine.detect_issues(&s0);
        assert_eq!(first.len(), second.len());
        assert_eq!(engine.issues(&s0).len(), first.len());
        assert_eq!(engine.sources().len(), 1);
    }

    #[test]
    fn rewrite_at_root_collapses_to_head() {
        let engine = engine();
        let sources = checkpoint_chain(&engine, 3);
        engine.rewrite_history(&sources[0]).unwrap();
        let log = engine.commit_history(&sources[0]);
        assert_eq!(log.len(), 1);
        assert_eq!(log.first().unwrap().before(), &sources[0]);
    }

    #[test]
    fn rewrite_at_tip_is_noop() {
        let engine = engine();
        let sources = checkpoint_chain(&engine, 3);
        let result = engine.rewrite_history(&sources[3]).unwrap();
        assert_eq!(result, sources[3]);
        assert_eq!(engine.commit_history(&sources[0]).len(), 3);
    }

    #[test]
    fn rewrite_interior_keeps_tail_under_original_root() {
        let engine = engine();
        let sources = checkpoint_chain(&engine, 3);
        engine.rewrite_history(&sources[2]).unwrap();

        let log = engine.commit_history(&sources[2]);
        assert_eq!(log.len(), 2);
        assert_eq!(log.last().unwrap().after(), &sources[3]);
        // Original root key still owns the lineage.
        let state = engine.snapshot();
        assert!(state.timeline.has_root(sources[0].signature()));
    }

    #[test]
    fn rewrite_evicts_dropped_versions() {
        let engine = engine();
        let sources = checkpoint_chain(&engine, 3);
        for source in &sources {
            engine.detect_issues(source);
        }

        engine.rewrite_history(&sources[2]).unwrap();
        let state = engine.snapshot();
        // v0 fell out of the log entirely.
        assert!(!state.registry.tracked_sources().any(|s| s == &sources[0]));
        // v1 survives as the seed commit's before side.
        assert!(state.registry.tracked_sources().any(|s| s == &sources[1]));
        // The rewrite target was re-detected.
        assert!(!state.registry.issues_for(&sources[2]).is_empty());
    }

    #[test]
    fn rewrite_of_unknown_source_fails() {
        let engine = engine();
        checkpoint_chain(&engine, 2);
        let stranger = SourceIdentity::new("B.java", "class B { }", Uuid::new_v4());
        assert!(matches!(
            engine.rewrite_history(&stranger),
            Err(EngineError::NotInLineage(_))
        ));
    }

    #[test]
    fn apply_checkpoints_and_detects() {
        let engine = engine();
        let s0 = SourceIdentity::new("A.java", "class A { int x = 9; }", Uuid::new_v4());
        let issues = engine.detect_issues(&s0);
        assert_eq!(issues.len(), 1);

        let request = ChangeRequest::new(
            s0.clone(),
            issues[0].span(),
            "LIMIT",
            "name the magic number",
        );
        let change = engine.create_change(&request).unwrap();
        let commit = engine.apply(&change).unwrap().expect("accepted");

        assert_eq!(commit.before(), &s0);
        assert_eq!(engine.next(&s0), *commit.after());
        // After side was detected on apply: LIMIT is an identifier, no
        // issues.
        assert!(!engine.has_issues(commit.after()));
        // Before side's entry rides along untouched.
        assert_eq!(engine.issues(&s0).len(), 1);
    }

    #[test]
    fn declined_change_has_no_side_effects() {
        let engine = engine();
        let s0 = SourceIdentity::new("A.java", "same", Uuid::new_v4());
        let request = ChangeRequest::new(
            s0.clone(),
            crate::core::types::Span::new(0, 4).unwrap(),
            "same",
            "no-op",
        );
        let change = engine.create_change(&request).unwrap();
        assert!(engine.apply(&change).unwrap().is_none());
        assert!(engine.commit_history(&s0).is_empty());
    }

    #[test]
    fn publisher_requires_remote() {
        let engine = engine();
        let s0 = SourceIdentity::new("A.java", "class A { }", Uuid::new_v4());
        assert!(matches!(
            engine.publisher(&s0),
            Err(PublishError::NotConfigured)
        ));
    }
}
