//! The [`CouplingPropagator`] and its depth-first traversal.

use indexmap::IndexSet;
use somatic_core::{GraphError, LocalState, RegionId};
use somatic_graph::{CouplingGraph, Neighbors};
use tracing::{debug, trace};

use crate::config::{PropagationConfig, PropagationConfigError, SweepPolicy};
use crate::report::{Delivery, PropagationReport, SweepReport};

/// What an unresolved region pushes to its neighbors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Signal {
    /// Load above the comfort level.
    pub unresolved_load: f64,
    /// `1 − stability` of the pushing region.
    pub pain: f64,
}

/// Per-call traversal state.
struct Trail<'s> {
    visited: IndexSet<RegionId>,
    /// Regions closed off by earlier sources in a settled sweep.
    settled: &'s IndexSet<RegionId>,
    report: PropagationReport,
}

/// A region that is pushing load, and how far through its targets it is.
struct Frame {
    region: RegionId,
    targets: Neighbors,
    cursor: usize,
    increment: f64,
}

/// Pushes unresolved load outward through a [`CouplingGraph`].
///
/// # Contract
///
/// - A source that can resolve locally is left untouched.
/// - Within one call every region is entered at most once.
/// - Neighbors are walked in edge insertion order and sweep sources in
///   region insertion order, so results are reproducible.
///
/// # Examples
///
/// ```
/// use somatic_core::LocalState;
/// use somatic_graph::{CoupledRegion, CouplingGraph};
/// use somatic_propagator::CouplingPropagator;
///
/// let mut graph = CouplingGraph::new();
/// let core = graph
///     .add_region(CoupledRegion::with_state("core", LocalState::new(0.9, 0.0, 1.0)))
///     .unwrap();
/// graph.add_region(CoupledRegion::new("head")).unwrap();
/// graph.connect("core", "head").unwrap();
///
/// let report = CouplingPropagator::default().propagate_from(&mut graph, core);
/// assert_eq!(report.visit_count(), 2);
/// assert!(graph.get("head").unwrap().state().load() > 0.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CouplingPropagator {
    config: PropagationConfig,
}

impl CouplingPropagator {
    /// Create a propagator, validating `config`.
    pub fn new(config: PropagationConfig) -> Result<Self, PropagationConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &PropagationConfig {
        &self.config
    }

    /// The signal a region in `state` would push.
    pub fn signal(&self, state: &LocalState) -> Signal {
        Signal {
            unresolved_load: (state.load() - self.config.comfort_load).max(0.0),
            pain: state.pain(),
        }
    }

    /// Load one neighbor absorbs from `signal`.
    pub fn increment(&self, signal: &Signal) -> f64 {
        let raw = self.config.load_transfer * signal.unresolved_load
            + self.config.pain_transfer * signal.pain;
        raw.clamp(0.0, self.config.max_increment)
    }

    /// Propagate from `source` until every reached region resolves or
    /// the reachable subgraph is exhausted.
    ///
    /// Returns an empty report, with no state changed, when `source` can
    /// resolve locally or is not a handle of `graph`.
    pub fn propagate_from(&self, graph: &mut CouplingGraph, source: RegionId) -> PropagationReport {
        let settled = IndexSet::new();
        self.run(graph, source, &settled)
    }

    /// [`propagate_from`](Self::propagate_from) addressed by name.
    pub fn propagate_from_name(
        &self,
        graph: &mut CouplingGraph,
        name: &str,
    ) -> Result<PropagationReport, GraphError> {
        let source = graph.id_of(name)?;
        Ok(self.propagate_from(graph, source))
    }

    /// Propagate from every region that cannot resolve locally, in
    /// insertion order.
    ///
    /// The source list is taken once at the start of the sweep; a source
    /// that resolved because of an earlier source is skipped. How regions
    /// reached by earlier sources are treated depends on
    /// [`SweepPolicy`].
    pub fn propagate_all(&self, graph: &mut CouplingGraph) -> SweepReport {
        let mut sweep = SweepReport::default();
        let mut settled = IndexSet::new();
        let sources = graph.unresolved_regions();
        debug!(sources = sources.len(), policy = ?self.config.sweep_policy, "propagation sweep");

        for source in sources {
            if settled.contains(&source) {
                sweep.skipped.push(source);
                continue;
            }
            let report = self.run(graph, source, &settled);
            if report.is_noop() {
                sweep.skipped.push(source);
                continue;
            }
            if self.config.sweep_policy == SweepPolicy::Settled {
                settled.extend(report.visited.iter().copied());
            }
            sweep.sources.push(report);
        }
        sweep
    }

    fn run(
        &self,
        graph: &mut CouplingGraph,
        source: RegionId,
        settled: &IndexSet<RegionId>,
    ) -> PropagationReport {
        let mut trail = Trail {
            visited: IndexSet::new(),
            settled,
            report: PropagationReport::new(source),
        };
        match graph.region(source) {
            Some(region) if !region.can_resolve_locally() => {}
            Some(_) => return trail.report,
            None => {
                debug!(region = %source, "propagation source not in graph");
                return trail.report;
            }
        }
        self.visit(graph, source, &mut trail);
        trail.report.visited = trail.visited.into_iter().collect();
        trail.report
    }

    /// Depth-first walk from `start` on an explicit frame stack, so depth
    /// is bounded by memory rather than the thread stack.
    ///
    /// Each frame serves its targets in order: deliver to one neighbor,
    /// enter it (pushing its frame if it pushes on), and only then move to
    /// the next neighbor.
    fn visit(&self, graph: &mut CouplingGraph, start: RegionId, trail: &mut Trail<'_>) {
        let mut stack: Vec<Frame> = Vec::new();
        stack.extend(self.enter(graph, start, trail));

        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };
            if frame.cursor == frame.targets.len() {
                stack.pop();
                continue;
            }
            let nb = frame.targets[frame.cursor];
            frame.cursor += 1;
            let (from, increment) = (frame.region, frame.increment);

            let Some(neighbor) = graph.region_mut(nb) else {
                continue;
            };
            neighbor.apply_load(increment);
            trace!(from = %from, to = %nb, increment, "delivered");
            trail.report.deliveries.push(Delivery {
                from,
                to: nb,
                increment,
            });
            stack.extend(self.enter(graph, nb, trail));
        }
    }

    /// Mark `id` visited and, if it cannot resolve, shed its excess and
    /// return the frame of neighbors it pushes to.
    fn enter(
        &self,
        graph: &mut CouplingGraph,
        id: RegionId,
        trail: &mut Trail<'_>,
    ) -> Option<Frame> {
        if !trail.visited.insert(id) {
            return None;
        }
        let region = graph.region(id)?;
        if region.attempt_resolution() {
            trace!(region = region.name(), "resolved on entry");
            return None;
        }

        let signal = self.signal(region.state());
        let increment = self.increment(&signal);
        let targets: Neighbors = graph
            .neighbor_ids(id)
            .into_iter()
            .filter(|nb| !trail.settled.contains(nb))
            .collect();
        debug!(
            region = region.name(),
            unresolved = signal.unresolved_load,
            pain = signal.pain,
            increment,
            targets = targets.len(),
            "pushing unresolved load"
        );
        if targets.is_empty() {
            return None;
        }

        let shed = self.config.shed_ratio * signal.unresolved_load;
        if shed > 0.0 {
            if let Some(region) = graph.region_mut(id) {
                region.relieve_load(shed);
            }
            trail.report.shed += shed;
        }
        Some(Frame {
            region: id,
            targets,
            cursor: 0,
            increment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use somatic_graph::CoupledRegion;

    fn pair(load: f64) -> (CouplingGraph, RegionId, RegionId) {
        let mut g = CouplingGraph::new();
        let a = g
            .add_region(CoupledRegion::with_state("a", LocalState::new(load, 0.0, 1.0)))
            .unwrap();
        let b = g.add_region(CoupledRegion::new("b")).unwrap();
        g.connect_ids(a, b).unwrap();
        (g, a, b)
    }

    #[test]
    fn signal_measures_excess_over_comfort() {
        let p = CouplingPropagator::default();
        let s = p.signal(&LocalState::new(0.9, 0.0, 1.0));
        assert!((s.unresolved_load - 0.4).abs() < 1e-12);
        assert!((s.pain - 0.9).abs() < 1e-12);
        assert!((p.increment(&s) - 0.29).abs() < 1e-12);

        let calm = p.signal(&LocalState::new(0.2, 0.0, 1.0));
        assert_eq!(calm.unresolved_load, 0.0);
    }

    #[test]
    fn increment_is_capped() {
        let p = CouplingPropagator::default();
        let s = Signal {
            unresolved_load: 0.5,
            pain: 1.0,
        };
        assert_eq!(p.increment(&s), 0.3);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = PropagationConfig {
            shed_ratio: -0.5,
            ..Default::default()
        };
        assert!(CouplingPropagator::new(config).is_err());
    }

    #[test]
    fn resolvable_source_changes_nothing() {
        let (mut g, a, _) = pair(0.3);
        let before = g.snapshot();
        let report = CouplingPropagator::default().propagate_from(&mut g, a);
        assert!(report.is_noop());
        assert!(report.deliveries.is_empty());
        assert_eq!(g.snapshot(), before);
    }

    #[test]
    fn stale_source_is_noop() {
        let (mut g, _, _) = pair(0.9);
        let before = g.snapshot();
        let report = CouplingPropagator::default().propagate_from(&mut g, RegionId(17));
        assert!(report.is_noop());
        assert_eq!(g.snapshot(), before);
    }

    #[test]
    fn shed_lands_before_back_delivery() {
        let (mut g, a, b) = pair(0.9);
        *g.region_mut(b).unwrap().state_mut() = LocalState::new(0.9, 0.0, 1.0);
        let report = CouplingPropagator::default().propagate_from(&mut g, a);
        assert_eq!(report.visited, vec![a, b]);
        assert_eq!(report.deliveries.len(), 2);
        // a: 0.9 shed to 0.5, then 0.3 back from b. Shedding after the
        // back-delivery would clamp at 1.0 first and leave 0.6.
        assert!((g.region(a).unwrap().state().load() - 0.8).abs() < 1e-12);
        assert!((g.region(b).unwrap().state().load() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn source_sheds_and_neighbor_absorbs() {
        let (mut g, a, b) = pair(0.9);
        let report = CouplingPropagator::default().propagate_from(&mut g, a);
        assert_eq!(report.visited, vec![a, b]);
        assert_eq!(report.deliveries.len(), 1);
        assert!((report.shed - 0.4).abs() < 1e-12);
        assert!((g.region(a).unwrap().state().load() - 0.5).abs() < 1e-12);
        assert!((g.region(b).unwrap().state().load() - 0.29).abs() < 1e-12);
    }

    #[test]
    fn no_shedding_when_disabled() {
        let (mut g, a, _) = pair(0.9);
        let p = CouplingPropagator::new(PropagationConfig {
            shed_ratio: 0.0,
            ..Default::default()
        })
        .unwrap();
        let report = p.propagate_from(&mut g, a);
        assert_eq!(report.shed, 0.0);
        assert!((g.region(a).unwrap().state().load() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn isolated_source_keeps_its_load() {
        let mut g = CouplingGraph::new();
        let a = g
            .add_region(CoupledRegion::with_state("a", LocalState::new(0.95, 0.0, 1.0)))
            .unwrap();
        let report = CouplingPropagator::default().propagate_from(&mut g, a);
        assert_eq!(report.visited, vec![a]);
        assert!(report.deliveries.is_empty());
        assert_eq!(report.shed, 0.0);
        assert!((g.region(a).unwrap().state().load() - 0.95).abs() < 1e-12);
    }

    #[test]
    fn propagate_from_name_reports_unknown_region() {
        let (mut g, _, _) = pair(0.9);
        let err = CouplingPropagator::default()
            .propagate_from_name(&mut g, "tail")
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::UnknownRegion {
                name: "tail".into()
            }
        );
        let report = CouplingPropagator::default()
            .propagate_from_name(&mut g, "a")
            .unwrap();
        assert_eq!(report.visit_count(), 2);
    }
}
