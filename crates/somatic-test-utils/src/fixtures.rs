//! Reusable coupling topologies.
//!
//! - [`star`]: `core` coupled to `left_limb`, `right_limb` and `head`.
//! - [`triangle`]: three mutually coupled regions (the smallest cycle).
//! - [`chain`]: regions coupled in a line.

use somatic_core::{LocalState, RegionId};
use somatic_graph::{CoupledRegion, CouplingGraph};

/// Handles of the regions in a [`star`] graph.
#[derive(Clone, Copy, Debug)]
pub struct Star {
    pub core: RegionId,
    pub left_limb: RegionId,
    pub right_limb: RegionId,
    pub head: RegionId,
}

impl Star {
    /// The three leaves, in insertion order.
    pub fn limbs(&self) -> [RegionId; 3] {
        [self.left_limb, self.right_limb, self.head]
    }
}

/// Star topology with fresh regions.
pub fn star() -> (CouplingGraph, Star) {
    let mut graph = CouplingGraph::new();
    let mut add = |name: &str| {
        graph
            .add_region(CoupledRegion::new(name))
            .unwrap_or_else(|e| panic!("star fixture: {e}"))
    };
    let handles = Star {
        core: add("core"),
        left_limb: add("left_limb"),
        right_limb: add("right_limb"),
        head: add("head"),
    };
    for limb in handles.limbs() {
        graph
            .connect_ids(handles.core, limb)
            .unwrap_or_else(|e| panic!("star fixture: {e}"));
    }
    (graph, handles)
}

/// Three mutually coupled regions `a`, `b`, `c`, each starting at `load`.
pub fn triangle(load: f64) -> (CouplingGraph, [RegionId; 3]) {
    let mut graph = CouplingGraph::new();
    let ids = ["a", "b", "c"].map(|name| {
        graph
            .add_region(CoupledRegion::with_state(
                name,
                LocalState::new(load, 0.0, 1.0),
            ))
            .unwrap_or_else(|e| panic!("triangle fixture: {e}"))
    });
    for (x, y) in [(0, 1), (1, 2), (2, 0)] {
        graph
            .connect_ids(ids[x], ids[y])
            .unwrap_or_else(|e| panic!("triangle fixture: {e}"));
    }
    (graph, ids)
}

/// Regions with the given initial states coupled in a line, named
/// `r0`, `r1`, ... in order.
pub fn chain(states: &[LocalState]) -> (CouplingGraph, Vec<RegionId>) {
    let mut graph = CouplingGraph::new();
    let ids: Vec<RegionId> = states
        .iter()
        .enumerate()
        .map(|(i, state)| {
            graph
                .add_region(CoupledRegion::with_state(format!("r{i}"), *state))
                .unwrap_or_else(|e| panic!("chain fixture: {e}"))
        })
        .collect();
    for pair in ids.windows(2) {
        graph
            .connect_ids(pair[0], pair[1])
            .unwrap_or_else(|e| panic!("chain fixture: {e}"));
    }
    (graph, ids)
}
