//! Load propagation across a coupling graph.
//!
//! [`CouplingPropagator`] pushes the unresolved load of an overloaded or
//! unstable region outward to its neighbors, depth first, until every
//! reached region resolves locally or the reachable subgraph is
//! exhausted. Each top-level call owns its visited set, so a region is
//! entered at most once per call and traversal always terminates in
//! `O(V + E)`.
//!
//! The propagator is stateless apart from its [`PropagationConfig`]; all
//! region state lives in the [`CouplingGraph`](somatic_graph::CouplingGraph)
//! passed to each call.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod propagator;
pub mod report;

pub use config::{PropagationConfig, PropagationConfigError, SweepPolicy};
pub use propagator::{CouplingPropagator, Signal};
pub use report::{Delivery, PropagationReport, SweepReport};
