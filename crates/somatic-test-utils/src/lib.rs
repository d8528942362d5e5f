//! Test utilities for Somatic development.
//!
//! Provides the standard body topologies used across the workspace's
//! tests ([`fixtures`]) and terse constructors for reflex results.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{chain, star, triangle, Star};

use somatic_core::RegionId;
use somatic_reflex::{ReflexAction, ReflexKind, ReflexResult};

/// A triggered result carrying `kind` on `target` at `intensity`, with
/// zero deltas.
pub fn fired(kind: ReflexKind, target: RegionId, intensity: f64) -> ReflexResult {
    ReflexResult::fired(ReflexAction::new(kind, target, intensity), 0.0, 0.0)
}

/// A triggered result with the given deltas and no action.
pub fn deltas_only(load_delta: f64, stability_delta: f64) -> ReflexResult {
    ReflexResult::fired_without_action(load_delta, stability_delta)
}

/// `n` triggered results each relieving `load_delta`.
pub fn relief_burst(n: usize, load_delta: f64) -> Vec<ReflexResult> {
    (0..n).map(|_| deltas_only(load_delta, 0.0)).collect()
}
