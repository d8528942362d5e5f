//! Coupling-graph invariant checks.
//!
//! Shared by the unit and property tests in this crate. Each helper
//! panics with a descriptive message when its invariant is violated.

use crate::graph::CouplingGraph;
use indexmap::IndexSet;

/// Assert that `b ∈ N(a)` implies `a ∈ N(b)`.
pub fn assert_edges_symmetric(graph: &CouplingGraph) {
    for (id, region) in graph.iter() {
        for nb in graph.neighbor_ids(id) {
            assert!(
                graph.are_connected(nb, id),
                "edge symmetry violated: {nb} in N({}) but not the reverse",
                region.name()
            );
        }
    }
}

/// Assert that every neighbor handle addresses a registered region.
pub fn assert_edges_reference_known_regions(graph: &CouplingGraph) {
    for (id, _) in graph.iter() {
        for nb in graph.neighbor_ids(id) {
            assert!(
                graph.contains_id(nb),
                "N({id}) references unregistered handle {nb}"
            );
        }
    }
}

/// Assert that no region is its own neighbor.
pub fn assert_no_self_loops(graph: &CouplingGraph) {
    for (id, region) in graph.iter() {
        assert!(
            !graph.are_connected(id, id),
            "region '{}' is coupled to itself",
            region.name()
        );
    }
}

/// Assert that names and handles map to each other one-to-one.
pub fn assert_name_index_consistent(graph: &CouplingGraph) {
    let mut seen = IndexSet::new();
    for (id, region) in graph.iter() {
        assert!(seen.insert(region.name()), "duplicate name '{}'", region.name());
        assert_eq!(
            graph.id_of(region.name()).ok(),
            Some(id),
            "name index for '{}' does not point back to {id}",
            region.name()
        );
    }
    assert_eq!(seen.len(), graph.len());
}

/// Run every compliance check on a graph.
pub fn run_full_compliance(graph: &CouplingGraph) {
    assert_edges_symmetric(graph);
    assert_edges_reference_known_regions(graph);
    assert_no_self_loops(graph);
    assert_name_index_consistent(graph);
}
