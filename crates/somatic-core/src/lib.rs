//! Core types for the Somatic coupling engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the region and tick handles, the per-region [`LocalState`] physics,
//! the resolution thresholds, and the topology error type shared by
//! every other crate in the workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod state;

pub use error::GraphError;
pub use id::{RegionId, TickId};
pub use state::{
    LocalState, EXHAUSTION_THRESHOLD, OVERLOAD_THRESHOLD, UNSTABLE_THRESHOLD,
};
