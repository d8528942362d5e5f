//! Per-tick metrics for the body driver.
//!
//! [`StepMetrics`] captures phase timings and traversal counts for a
//! single tick, plus a few cumulative counters carried across ticks.

/// Timing and traversal metrics collected during a single tick.
///
/// Durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// Wall-clock time for the entire tick.
    pub total_us: u64,
    /// Time spent applying commands and passive recovery.
    pub command_processing_us: u64,
    /// Time spent in the propagation sweep.
    pub propagation_us: u64,
    /// Time spent coupling reflexes and applying the outcome.
    pub coupling_us: u64,
    /// Regions that could not resolve locally before propagation.
    pub unresolved_before: usize,
    /// Regions that could not resolve locally after propagation.
    pub unresolved_after: usize,
    /// Regions entered by the sweep, counting re-entries.
    pub regions_visited: usize,
    /// Deliveries made by the sweep.
    pub deliveries: usize,
    /// Fired reflexes coupled this tick.
    pub reflexes_coupled: usize,
    /// Commands rejected this tick.
    pub rejected_commands: usize,
    /// Cumulative number of ticks whose coupled outcome carried a conflict.
    pub conflict_events: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.command_processing_us, 0);
        assert_eq!(m.propagation_us, 0);
        assert_eq!(m.coupling_us, 0);
        assert_eq!(m.unresolved_before, 0);
        assert_eq!(m.unresolved_after, 0);
        assert_eq!(m.regions_visited, 0);
        assert_eq!(m.deliveries, 0);
        assert_eq!(m.reflexes_coupled, 0);
        assert_eq!(m.rejected_commands, 0);
        assert_eq!(m.conflict_events, 0);
    }
}
