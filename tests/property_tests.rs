//! Property-based tests for core domain types.
//!
//! These tests use proptest to verify invariants hold across randomly
//! generated inputs.

use proptest::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use burnish::analyze::{DetectorSet, SurfaceAnalyzer};
use burnish::change::SpliceApplier;
use burnish::core::commit::{Commit, CommitSequence};
use burnish::core::log::CommitLog;
use burnish::core::source::SourceIdentity;
use burnish::core::types::Signature;
use burnish::engine::LineageEngine;

/// Build a linear chain of `n` commits over versions v0..=vn.
fn chain(n: usize) -> Vec<Commit> {
    let seq = CommitSequence::new();
    let mut current = SourceIdentity::new("A.java", "class A { }", Uuid::new_v4());
    let mut commits = Vec::new();
    for i in 0..n {
        let next = current.with_content(format!("class A {{ int x = {i}; }}"));
        commits.push(Commit::new(
            current,
            next.clone(),
            format!("c{}", i + 1),
            seq.next(),
        ));
        current = next;
    }
    commits
}

/// Strategy producing a chain length and a shuffled insertion order.
fn shuffled_chain() -> impl Strategy<Value = (usize, Vec<usize>)> {
    (2..8usize).prop_flat_map(|n| {
        let order: Vec<usize> = (0..n).collect();
        (Just(n), Just(order).prop_shuffle())
    })
}

proptest! {
    /// Iteration ascends by sequence key no matter the insertion order.
    #[test]
    fn log_iteration_is_sorted((n, order) in shuffled_chain()) {
        let commits = chain(n);
        let mut log = CommitLog::new();
        for idx in order {
            prop_assert!(log.add(commits[idx].clone()));
        }

        let sequences: Vec<u64> = log.iter().map(Commit::sequence).collect();
        let mut sorted = sequences.clone();
        sorted.sort_unstable();
        prop_assert_eq!(&sequences, &sorted);
        prop_assert_eq!(sequences.len(), n);
    }

    /// Re-adding every commit is a reported no-op: size never changes.
    #[test]
    fn log_never_stores_duplicate_signatures(n in 1..8usize) {
        let commits = chain(n);
        let mut log = CommitLog::new();
        for commit in &commits {
            prop_assert!(log.add(commit.clone()));
        }
        for commit in &commits {
            prop_assert!(!log.add(commit.clone()));
        }
        prop_assert_eq!(log.len(), n);
    }

    /// A slice from i to j (upper inclusive) holds exactly j - i + 1
    /// commits and always contains its lower bound, even when the flag
    /// excludes it from the range scan.
    #[test]
    fn slice_seeds_lower_bound_and_counts((n, i, j) in (2..8usize)
        .prop_flat_map(|n| (Just(n), 0..n))
        .prop_flat_map(|(n, i)| (Just(n), Just(i), i..n)))
    {
        let commits = chain(n);
        let mut log = CommitLog::new();
        for commit in &commits {
            log.add(commit.clone());
        }

        let slice = log.slice(&commits[i], false, &commits[j], true);
        prop_assert_eq!(slice.len(), j - i + 1);
        prop_assert!(slice.contains(&commits[i]));
        prop_assert!(slice.contains(&commits[j]));
    }

    /// Signatures are deterministic and content-sensitive.
    #[test]
    fn signature_compute_is_deterministic(chunks in prop::collection::vec("[a-z0-9]{0,12}", 1..5)) {
        let views: Vec<&[u8]> = chunks.iter().map(|c| c.as_bytes()).collect();
        let a = Signature::compute(&views);
        let b = Signature::compute(&views);
        prop_assert_eq!(a, b);
    }

    /// Signatures survive serde round trips.
    #[test]
    fn signature_serde_roundtrip(seed in "[a-z]{1,16}") {
        let sig = Signature::compute([seed.as_bytes()]);
        let json = serde_json::to_string(&sig).unwrap();
        let parsed: Signature = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(sig, parsed);
    }

    /// Source identities survive serde round trips with verified
    /// signatures, for arbitrary content.
    #[test]
    fn source_identity_serde_roundtrip(content in "\\PC{0,64}") {
        let source = SourceIdentity::new("Any.java", content, Uuid::new_v4());
        let json = serde_json::to_string(&source).unwrap();
        let parsed: SourceIdentity = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(&source, &parsed);
        prop_assert_eq!(source.content(), parsed.content());
    }

    /// Rewriting history at position k leaves the documented log shape:
    /// collapse at the root, no-op at the tip, tail-plus-seed in between.
    #[test]
    fn rewrite_shape_matches_position((n, k) in (1..6usize).prop_flat_map(|n| (Just(n), 0..=n))) {
        let engine = LineageEngine::new(
            Arc::new(SurfaceAnalyzer::new()),
            DetectorSet::all(),
            Arc::new(SpliceApplier::new(CommitSequence::new())),
        );

        let commits = chain(n);
        let mut sources = vec![commits[0].before().clone()];
        for commit in &commits {
            sources.push(commit.after().clone());
            engine.checkpoint(commit.clone()).unwrap();
        }

        engine.rewrite_history(&sources[k]).unwrap();
        let len = engine.commit_history(&sources[k]).len();
        if k == 0 {
            prop_assert_eq!(len, 1);
        } else if k == n {
            prop_assert_eq!(len, n);
        } else {
            prop_assert_eq!(len, n - k + 1);
        }
    }

    /// Navigation round trips: previous undoes next away from the tip,
    /// next undoes previous away from the root.
    #[test]
    fn navigation_round_trips(n in 1..6usize, pick in 0..6usize) {
        let engine = LineageEngine::new(
            Arc::new(SurfaceAnalyzer::new()),
            DetectorSet::all(),
            Arc::new(SpliceApplier::new(CommitSequence::new())),
        );

        let commits = chain(n);
        let mut sources = vec![commits[0].before().clone()];
        for commit in &commits {
            sources.push(commit.after().clone());
            engine.checkpoint(commit.clone()).unwrap();
        }

        let k = pick % (n + 1);
        if k < n {
            prop_assert_eq!(engine.previous(&engine.next(&sources[k])), sources[k].clone());
        }
        if k > 0 {
            prop_assert_eq!(engine.next(&engine.previous(&sources[k])), sources[k].clone());
        }
    }
}
