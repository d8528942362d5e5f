//! Region arena and coupling topology for Somatic.
//!
//! [`CouplingGraph`] is the sole owner of every [`CoupledRegion`]. Regions
//! live in one arena addressed by [`RegionId`](somatic_core::RegionId)
//! handles, and adjacency is stored as handle sets, so traversal and
//! mutation never hold live references into the topology.
//!
//! # Invariants
//!
//! - Region names are unique and immutable.
//! - Edges are undirected: `b ∈ N(a)` iff `a ∈ N(b)`.
//! - Every handle in the adjacency refers to a registered region.
//! - Region iteration follows insertion order.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod graph;
pub mod region;

#[cfg(test)]
pub(crate) mod compliance;

pub use graph::{CouplingGraph, Neighbors, RegionSnapshot};
pub use region::CoupledRegion;
