//! The synchronous one-tick body driver.
//!
//! [`Body`] owns the coupling graph exclusively. Every method runs to
//! completion on the calling thread; callers serialize access through
//! `&mut self`.

use std::time::Instant;

use indexmap::IndexMap;
use somatic_core::{GraphError, LocalState, RegionId, TickId};
use somatic_graph::{CouplingGraph, RegionSnapshot};
use somatic_propagator::{CouplingPropagator, SweepReport};
use somatic_reflex::{CoupledReflexOutcome, ReflexBuffer, ReflexCouplingEngine, ReflexResult};
use tracing::{debug, warn};

use crate::command::{CommandReceipt, RegionCommand};
use crate::config::{BodyConfig, ConfigError};
use crate::metrics::StepMetrics;

// ── TickReport ──────────────────────────────────────────────────────

/// Everything one [`Body::step`] call produced.
#[derive(Clone, Debug)]
pub struct TickReport {
    /// The tick just completed.
    pub tick_id: TickId,
    /// One receipt per submitted command, in submission order.
    pub receipts: Vec<CommandReceipt>,
    /// What the propagation sweep touched.
    pub sweep: SweepReport,
    /// The coupled reflex outcome of this tick.
    pub outcome: CoupledReflexOutcome,
    /// Region the outcome was applied to, if any.
    pub applied_to: Option<RegionId>,
    /// Timings and counters for this tick.
    pub metrics: StepMetrics,
}

// ── Body ────────────────────────────────────────────────────────────

/// A coupling graph plus the machinery to advance it one tick at a time.
///
/// Each [`step`](Self::step) runs, in order:
///
/// 1. the submitted [`RegionCommand`]s;
/// 2. passive recovery at the configured rate on every region;
/// 3. a propagation sweep over every region that cannot resolve locally;
/// 4. coupling of the tick's fired reflexes;
/// 5. application of the coupled outcome to the dominant action's target:
///    `apply_load(net_load_delta)` then `shift_fatigue(net_stability_delta)`.
///
/// # Examples
///
/// ```
/// use somatic_engine::{Body, BodyConfig, RegionCommand, RegionDef};
///
/// let config = BodyConfig {
///     regions: vec![RegionDef::new("core"), RegionDef::new("head")],
///     connections: vec![("core".into(), "head".into())],
///     ..Default::default()
/// };
/// let mut body = Body::new(config).unwrap();
/// let core = body.graph().id_of("core").unwrap();
///
/// let report = body.step(&[RegionCommand::ApplyLoad { region: core, delta: 0.95 }], []);
/// assert_eq!(report.tick_id.0, 1);
/// assert_eq!(report.sweep.sources.len(), 1);
/// ```
pub struct Body {
    graph: CouplingGraph,
    initial: Vec<LocalState>,
    propagator: CouplingPropagator,
    buffer: ReflexBuffer,
    recovery_rate: f64,
    current_tick: TickId,
    last_metrics: StepMetrics,
}

impl Body {
    /// Validate `config` and build a body at tick 0.
    pub fn new(config: BodyConfig) -> Result<Self, ConfigError> {
        config.check_scalars()?;
        let graph = config.build_graph()?;
        let initial = config.regions.iter().map(|def| def.initial).collect();
        let propagator = CouplingPropagator::new(config.propagation)?;
        let engine = ReflexCouplingEngine::new(config.limits)?;
        Ok(Self {
            graph,
            initial,
            propagator,
            buffer: ReflexBuffer::with_engine(engine),
            recovery_rate: config.recovery_rate,
            current_tick: TickId(0),
            last_metrics: StepMetrics::default(),
        })
    }

    /// Advance one tick.
    ///
    /// Commands addressing a handle past this body's last region are
    /// rejected with [`GraphError::StaleHandle`] and the rest of the tick
    /// proceeds. Handles are positional: an in-range handle taken from
    /// another body addresses the region in the same slot here.
    pub fn step(
        &mut self,
        commands: &[RegionCommand],
        reflexes: impl IntoIterator<Item = ReflexResult>,
    ) -> TickReport {
        let tick_start = Instant::now();
        let tick_id = self.current_tick.next();
        let mut metrics = StepMetrics {
            conflict_events: self.last_metrics.conflict_events,
            ..Default::default()
        };

        let cmd_start = Instant::now();
        let receipts: Vec<CommandReceipt> = commands
            .iter()
            .enumerate()
            .map(|(index, command)| self.apply_command(tick_id, index, command))
            .collect();
        metrics.rejected_commands = receipts.iter().filter(|r| !r.accepted).count();
        if self.recovery_rate > 0.0 {
            for (_, region) in self.graph.iter_mut() {
                region.recover(self.recovery_rate);
            }
        }
        metrics.command_processing_us = cmd_start.elapsed().as_micros() as u64;

        let prop_start = Instant::now();
        metrics.unresolved_before = self.graph.unresolved_regions().len();
        let sweep = self.propagator.propagate_all(&mut self.graph);
        metrics.unresolved_after = self.graph.unresolved_regions().len();
        metrics.regions_visited = sweep.visit_count();
        metrics.deliveries = sweep.delivery_count();
        metrics.propagation_us = prop_start.elapsed().as_micros() as u64;

        let coupling_start = Instant::now();
        self.buffer.extend(reflexes);
        metrics.reflexes_coupled = self.buffer.len();
        let outcome = self.buffer.resolve();
        if outcome.unresolved_conflict {
            metrics.conflict_events += 1;
        }
        let applied_to = self.apply_outcome(&outcome);
        metrics.coupling_us = coupling_start.elapsed().as_micros() as u64;

        metrics.total_us = tick_start.elapsed().as_micros() as u64;
        debug!(
            tick = %tick_id,
            unresolved_before = metrics.unresolved_before,
            unresolved_after = metrics.unresolved_after,
            visited = metrics.regions_visited,
            reflexes = metrics.reflexes_coupled,
            conflict = outcome.unresolved_conflict,
            "tick complete"
        );

        self.current_tick = tick_id;
        self.last_metrics = metrics.clone();
        TickReport {
            tick_id,
            receipts,
            sweep,
            outcome,
            applied_to,
            metrics,
        }
    }

    /// Restore every region to its configured initial state and rewind
    /// to tick 0. The topology is unchanged.
    pub fn reset(&mut self) {
        for ((_, region), initial) in self.graph.iter_mut().zip(&self.initial) {
            *region.state_mut() = *initial;
        }
        self.current_tick = TickId(0);
        self.last_metrics = StepMetrics::default();
    }

    /// `{load, pain, stability}` per region, in registration order.
    pub fn snapshot(&self) -> IndexMap<String, RegionSnapshot> {
        self.graph.snapshot()
    }

    /// The coupling graph.
    pub fn graph(&self) -> &CouplingGraph {
        &self.graph
    }

    /// The last completed tick (0 before the first step).
    pub fn current_tick(&self) -> TickId {
        self.current_tick
    }

    /// Metrics from the most recent tick.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    fn apply_command(
        &mut self,
        tick_id: TickId,
        index: usize,
        command: &RegionCommand,
    ) -> CommandReceipt {
        let id = command.region();
        let Some(region) = self.graph.region_mut(id) else {
            warn!(region = %id, command_index = index, "command addresses unknown region");
            return CommandReceipt {
                accepted: false,
                applied_tick_id: None,
                reason: Some(GraphError::StaleHandle { id }),
                command_index: index,
            };
        };
        match *command {
            RegionCommand::ApplyLoad { delta, .. } => region.apply_load(delta),
            RegionCommand::RelieveLoad { delta, .. } => region.relieve_load(delta),
            RegionCommand::Damage { severity, .. } => region.apply_damage(severity),
            RegionCommand::Recover { rate, .. } => region.recover(rate),
        }
        CommandReceipt {
            accepted: true,
            applied_tick_id: Some(tick_id),
            reason: None,
            command_index: index,
        }
    }

    fn apply_outcome(&mut self, outcome: &CoupledReflexOutcome) -> Option<RegionId> {
        let action = outcome.dominant_action?;
        let Some(region) = self.graph.region_mut(action.target_region) else {
            warn!(
                region = %action.target_region,
                kind = %action.kind,
                "dominant reflex targets unknown region"
            );
            return None;
        };
        region.apply_load(outcome.net_load_delta);
        region.shift_fatigue(outcome.net_stability_delta);
        Some(action.target_region)
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Body")
            .field("current_tick", &self.current_tick)
            .field("regions", &self.graph.len())
            .field("edges", &self.graph.edge_count())
            .finish()
    }
}
