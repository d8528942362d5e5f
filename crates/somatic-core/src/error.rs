//! Error types for coupling-graph construction and lookup.
//!
//! The coupling engine clamps every numeric input instead of rejecting
//! it, so the only genuine fault is a topology that references a region
//! the graph does not own.

use crate::id::RegionId;
use std::error::Error;
use std::fmt;

/// Errors raised while building or addressing a coupling graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// A connection or lookup named a region that was never added.
    UnknownRegion {
        /// The unregistered name.
        name: String,
    },
    /// A region with this name is already registered.
    DuplicateRegion {
        /// The duplicated name.
        name: String,
    },
    /// A region was connected to itself.
    SelfLoop {
        /// The region on both ends of the edge.
        name: String,
    },
    /// A handle is past the end of this graph's region arena.
    ///
    /// Handles are positional, so only out-of-range handles are caught.
    StaleHandle {
        /// The offending handle.
        id: RegionId,
    },
    /// The arena already holds `u32::MAX + 1` regions.
    CapacityExceeded {
        /// The region that could not be registered.
        name: String,
    },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRegion { name } => write!(f, "unknown region '{name}'"),
            Self::DuplicateRegion { name } => write!(f, "region '{name}' already registered"),
            Self::SelfLoop { name } => write!(f, "region '{name}' cannot be coupled to itself"),
            Self::StaleHandle { id } => {
                write!(f, "region handle {id} is out of range for this graph")
            }
            Self::CapacityExceeded { name } => {
                write!(f, "cannot register '{name}': region handle space exhausted")
            }
        }
    }
}

impl Error for GraphError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_region() {
        let err = GraphError::UnknownRegion {
            name: "left_limb".into(),
        };
        assert_eq!(err.to_string(), "unknown region 'left_limb'");

        let err = GraphError::StaleHandle { id: RegionId(12) };
        assert_eq!(err.to_string(), "region handle 12 is out of range for this graph");
    }
}
