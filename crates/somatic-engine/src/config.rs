//! Body configuration, validation, and error types.
//!
//! [`BodyConfig`] is the builder input for a [`Body`](crate::Body). The
//! topology is fixed here, once, at construction: every connection must
//! name a declared region.

use std::error::Error;
use std::fmt;

use somatic_core::{GraphError, LocalState};
use somatic_graph::{CoupledRegion, CouplingGraph};
use somatic_propagator::{PropagationConfig, PropagationConfigError};
use somatic_reflex::{CouplingLimits, CouplingLimitsError};

// ── RegionDef ──────────────────────────────────────────────────────

/// A region to register, with its starting state.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionDef {
    /// Unique region name.
    pub name: String,
    /// State at tick 0 and after [`reset`](crate::Body::reset).
    pub initial: LocalState,
}

impl RegionDef {
    /// A region starting from the default state.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_state(name, LocalState::default())
    }

    /// A region starting from `initial`.
    pub fn with_state(name: impl Into<String>, initial: LocalState) -> Self {
        Self {
            name: name.into(),
            initial,
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`BodyConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// No regions declared.
    NoRegions,
    /// `recovery_rate` is NaN, infinite, or outside `[0, 1]`.
    InvalidRecoveryRate {
        /// The invalid value.
        value: f64,
    },
    /// Propagation tuning is invalid.
    Propagation(PropagationConfigError),
    /// Reflex coupling limits are invalid.
    Limits(CouplingLimitsError),
    /// The topology references an unknown or duplicate region.
    Graph(GraphError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRegions => write!(f, "no regions declared"),
            Self::InvalidRecoveryRate { value } => {
                write!(f, "recovery_rate must be in [0, 1], got {value}")
            }
            Self::Propagation(e) => write!(f, "propagation: {e}"),
            Self::Limits(e) => write!(f, "coupling limits: {e}"),
            Self::Graph(e) => write!(f, "topology: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Propagation(e) => Some(e),
            Self::Limits(e) => Some(e),
            Self::Graph(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PropagationConfigError> for ConfigError {
    fn from(e: PropagationConfigError) -> Self {
        Self::Propagation(e)
    }
}

impl From<CouplingLimitsError> for ConfigError {
    fn from(e: CouplingLimitsError) -> Self {
        Self::Limits(e)
    }
}

impl From<GraphError> for ConfigError {
    fn from(e: GraphError) -> Self {
        Self::Graph(e)
    }
}

// ── BodyConfig ─────────────────────────────────────────────────────

/// Complete configuration for constructing a [`Body`](crate::Body).
#[derive(Clone, Debug, PartialEq)]
pub struct BodyConfig {
    /// Regions in registration order. Handles follow this order.
    pub regions: Vec<RegionDef>,
    /// Undirected couplings between region names.
    pub connections: Vec<(String, String)>,
    /// Passive recovery applied to every region each tick. Default: 0.02.
    pub recovery_rate: f64,
    /// Propagation tuning.
    pub propagation: PropagationConfig,
    /// Reflex coupling limits.
    pub limits: CouplingLimits,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            regions: Vec::new(),
            connections: Vec::new(),
            recovery_rate: 0.02,
            propagation: PropagationConfig::default(),
            limits: CouplingLimits::default(),
        }
    }
}

impl BodyConfig {
    /// Check every structural invariant, including the topology.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check_scalars()?;
        self.build_graph().map(|_| ())
    }

    /// Build the coupling graph this config describes.
    pub fn build_graph(&self) -> Result<CouplingGraph, ConfigError> {
        if self.regions.is_empty() {
            return Err(ConfigError::NoRegions);
        }
        let mut graph = CouplingGraph::new();
        for def in &self.regions {
            graph.add_region(CoupledRegion::with_state(def.name.clone(), def.initial))?;
        }
        for (a, b) in &self.connections {
            graph.connect(a, b)?;
        }
        Ok(graph)
    }

    /// Check the numeric parameters only; [`build_graph`](Self::build_graph)
    /// checks the topology.
    pub(crate) fn check_scalars(&self) -> Result<(), ConfigError> {
        if !self.recovery_rate.is_finite() || !(0.0..=1.0).contains(&self.recovery_rate) {
            return Err(ConfigError::InvalidRecoveryRate {
                value: self.recovery_rate,
            });
        }
        self.propagation.validate()?;
        self.limits.validate()?;
        Ok(())
    }
}
