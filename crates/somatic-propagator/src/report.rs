//! Records of what a propagation call touched.

use somatic_core::RegionId;

/// One signal delivered from a region to a neighbor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Delivery {
    /// The region pushing load.
    pub from: RegionId,
    /// The neighbor absorbing it.
    pub to: RegionId,
    /// Load the neighbor absorbed through `apply_load`.
    pub increment: f64,
}

/// Outcome of one [`propagate_from`](crate::CouplingPropagator::propagate_from) call.
#[derive(Clone, Debug, PartialEq)]
pub struct PropagationReport {
    /// The region the call started from.
    pub source: RegionId,
    /// Regions entered, in visit order. Each appears at most once.
    pub visited: Vec<RegionId>,
    /// Every delivery, in the order it was applied.
    pub deliveries: Vec<Delivery>,
    /// Total load shed by the regions that pushed.
    pub shed: f64,
}

impl PropagationReport {
    pub(crate) fn new(source: RegionId) -> Self {
        Self {
            source,
            visited: Vec::new(),
            deliveries: Vec::new(),
            shed: 0.0,
        }
    }

    /// `true` when the source resolved locally and nothing was entered.
    pub fn is_noop(&self) -> bool {
        self.visited.is_empty()
    }

    /// Number of regions entered.
    pub fn visit_count(&self) -> usize {
        self.visited.len()
    }

    /// Whether `region` was entered.
    pub fn entered(&self, region: RegionId) -> bool {
        self.visited.contains(&region)
    }

    /// Deliveries absorbed by `region`.
    pub fn deliveries_to(&self, region: RegionId) -> impl Iterator<Item = &Delivery> {
        self.deliveries.iter().filter(move |d| d.to == region)
    }
}

/// Outcome of one [`propagate_all`](crate::CouplingPropagator::propagate_all) sweep.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SweepReport {
    /// One report per source that actually propagated, in sweep order.
    pub sources: Vec<PropagationReport>,
    /// Sources that had resolved, or were settled, by the time their turn came.
    pub skipped: Vec<RegionId>,
}

impl SweepReport {
    /// Total regions entered across all sources, counting re-entries.
    pub fn visit_count(&self) -> usize {
        self.sources.iter().map(PropagationReport::visit_count).sum()
    }

    /// Total deliveries across all sources.
    pub fn delivery_count(&self) -> usize {
        self.sources.iter().map(|r| r.deliveries.len()).sum()
    }

    /// Deliveries absorbed by `region` across all sources.
    pub fn deliveries_to(&self, region: RegionId) -> usize {
        self.sources
            .iter()
            .map(|r| r.deliveries_to(region).count())
            .sum()
    }
}
