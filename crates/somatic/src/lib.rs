//! Somatic: a structural coupling graph with load propagation and reflex
//! coupling.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Somatic sub-crates. For most users, adding `somatic` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use somatic::prelude::*;
//!
//! let config = BodyConfig {
//!     regions: ["core", "left_limb", "right_limb", "head"]
//!         .into_iter()
//!         .map(RegionDef::new)
//!         .collect(),
//!     connections: vec![
//!         ("core".into(), "left_limb".into()),
//!         ("core".into(), "right_limb".into()),
//!         ("core".into(), "head".into()),
//!     ],
//!     ..Default::default()
//! };
//! let mut body = Body::new(config).unwrap();
//! let core = body.graph().id_of("core").unwrap();
//! let head = body.graph().id_of("head").unwrap();
//!
//! let reflex = ReflexResult::fired(ReflexAction::new(ReflexKind::Withdraw, head, 0.6), -0.2, 0.1);
//! let report = body.step(&[RegionCommand::ApplyLoad { region: core, delta: 0.95 }], [reflex]);
//!
//! assert_eq!(report.tick_id, TickId(1));
//! assert_eq!(report.sweep.visit_count(), 4);
//! assert_eq!(report.applied_to, Some(head));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `somatic-core` | Handles, `LocalState`, thresholds, `GraphError` |
//! | [`graph`] | `somatic-graph` | `CoupledRegion` and the `CouplingGraph` |
//! | [`propagator`] | `somatic-propagator` | Load propagation and sweep reports |
//! | [`reflex`] | `somatic-reflex` | Reflex results, coupling engine, buffer |
//! | [`engine`] | `somatic-engine` | The per-tick `Body` driver |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Handles, per-region state, and graph errors (`somatic-core`).
pub use somatic_core as types;

/// The coupling topology (`somatic-graph`).
///
/// [`graph::CouplingGraph`] owns every [`graph::CoupledRegion`] and its
/// undirected couplings.
pub use somatic_graph as graph;

/// Load propagation (`somatic-propagator`).
///
/// [`propagator::CouplingPropagator`] pushes unresolved load through the
/// graph and reports every delivery it made.
pub use somatic_propagator as propagator;

/// Reflex aggregation (`somatic-reflex`).
///
/// [`reflex::ReflexCouplingEngine`] merges one tick of
/// [`reflex::ReflexResult`]s into a single outcome.
pub use somatic_reflex as reflex;

/// The tick driver (`somatic-engine`).
pub use somatic_engine as engine;

/// Common imports for typical Somatic usage.
///
/// ```rust
/// use somatic::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use somatic_core::{GraphError, LocalState, RegionId, TickId};

    // Graph
    pub use somatic_graph::{CoupledRegion, CouplingGraph};

    // Propagation
    pub use somatic_propagator::{
        CouplingPropagator, PropagationConfig, PropagationReport, SweepPolicy, SweepReport,
    };

    // Reflexes
    pub use somatic_reflex::{
        CoupledReflexOutcome, ReflexAction, ReflexBuffer, ReflexCouplingEngine, ReflexKind,
        ReflexResult,
    };

    // Engine
    pub use somatic_engine::{Body, BodyConfig, ConfigError, RegionCommand, RegionDef, TickReport};
}
