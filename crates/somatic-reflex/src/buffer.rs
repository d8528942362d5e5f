//! Single-tick collector for fired reflexes.

use crate::action::ReflexResult;
use crate::coupling::{CoupledReflexOutcome, ReflexCouplingEngine};

/// Collects one tick's fired [`ReflexResult`]s.
///
/// Only triggered results are kept. [`resolve`](Self::resolve) couples
/// whatever was collected and always leaves the buffer empty, so nothing
/// carries over into the next tick.
///
/// # Examples
///
/// ```
/// use somatic_reflex::{ReflexBuffer, ReflexResult};
///
/// let mut buffer = ReflexBuffer::new();
/// buffer.push(ReflexResult::idle());
/// buffer.push(ReflexResult::fired_without_action(-0.2, 0.1));
/// assert_eq!(buffer.len(), 1);
///
/// let outcome = buffer.resolve();
/// assert!(outcome.triggered);
/// assert!(buffer.is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ReflexBuffer {
    results: Vec<ReflexResult>,
    engine: ReflexCouplingEngine,
}

impl ReflexBuffer {
    /// An empty buffer using the default coupling limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty buffer resolving through `engine`.
    pub fn with_engine(engine: ReflexCouplingEngine) -> Self {
        Self {
            results: Vec::new(),
            engine,
        }
    }

    /// Append `result` if it fired; untriggered results are dropped.
    pub fn push(&mut self, result: ReflexResult) {
        if result.triggered {
            self.results.push(result);
        }
    }

    /// Buffered results, in arrival order.
    pub fn pending(&self) -> &[ReflexResult] {
        &self.results
    }

    /// Number of buffered results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Couple the buffered results and clear the buffer.
    pub fn resolve(&mut self) -> CoupledReflexOutcome {
        let results = std::mem::take(&mut self.results);
        self.engine.couple(&results)
    }
}

impl Extend<ReflexResult> for ReflexBuffer {
    fn extend<I: IntoIterator<Item = ReflexResult>>(&mut self, iter: I) {
        for result in iter {
            self.push(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ReflexAction, ReflexKind};
    use somatic_core::RegionId;

    #[test]
    fn untriggered_results_are_dropped() {
        let mut buffer = ReflexBuffer::new();
        buffer.push(ReflexResult::idle());
        assert!(buffer.is_empty());
    }

    #[test]
    fn resolve_on_empty_buffer_is_quiet() {
        let mut buffer = ReflexBuffer::new();
        let outcome = buffer.resolve();
        assert_eq!(outcome, CoupledReflexOutcome::default());
        assert!(buffer.is_empty());
    }

    #[test]
    fn resolve_clears_between_ticks() {
        let mut buffer = ReflexBuffer::new();
        buffer.extend([
            ReflexResult::fired(ReflexAction::new(ReflexKind::Flex, RegionId(1), 0.9), -0.3, 0.2),
            ReflexResult::fired(ReflexAction::new(ReflexKind::Extend, RegionId(2), 0.3), -0.1, 0.1),
        ]);
        assert_eq!(buffer.pending().len(), 2);

        let first = buffer.resolve();
        assert!(first.triggered);
        assert!(first.unresolved_conflict);
        assert!(buffer.is_empty());

        let second = buffer.resolve();
        assert!(!second.triggered);
        assert_eq!(second.net_load_delta, 0.0);
    }

    #[test]
    fn arrival_order_is_kept() {
        let mut buffer = ReflexBuffer::new();
        buffer.push(ReflexResult::fired(
            ReflexAction::new(ReflexKind::Rotate, RegionId(3), 0.5),
            0.0,
            0.0,
        ));
        buffer.push(ReflexResult::fired(
            ReflexAction::new(ReflexKind::Stabilize, RegionId(3), 0.5),
            0.0,
            0.0,
        ));
        let outcome = buffer.resolve();
        assert_eq!(outcome.dominant_action.unwrap().kind, ReflexKind::Rotate);
    }
}
