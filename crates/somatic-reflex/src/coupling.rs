//! Merging one tick's reflex results into a single outcome.

use indexmap::IndexSet;
use somatic_core::RegionId;
use std::error::Error;
use std::fmt;
use tracing::debug;

use crate::action::{ReflexAction, ReflexResult};

/// Floor on the summed load delta of one tick.
pub const MAX_LOAD_REDUCTION: f64 = -0.6;

/// Ceiling on the summed stability delta of one tick.
pub const MAX_STABILITY_GAIN: f64 = 0.4;

/// Bounds applied to summed reflex deltas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CouplingLimits {
    /// Floor on the net load delta; must be `<= 0`. Default: −0.6.
    pub max_load_reduction: f64,
    /// Ceiling on the net stability delta; must be `>= 0`. Default: 0.4.
    pub max_stability_gain: f64,
}

impl Default for CouplingLimits {
    fn default() -> Self {
        Self {
            max_load_reduction: MAX_LOAD_REDUCTION,
            max_stability_gain: MAX_STABILITY_GAIN,
        }
    }
}

impl CouplingLimits {
    /// Check sign and finiteness of both limits.
    pub fn validate(&self) -> Result<(), CouplingLimitsError> {
        if !self.max_load_reduction.is_finite() || self.max_load_reduction > 0.0 {
            return Err(CouplingLimitsError::LoadReduction {
                value: self.max_load_reduction,
            });
        }
        if !self.max_stability_gain.is_finite() || self.max_stability_gain < 0.0 {
            return Err(CouplingLimitsError::StabilityGain {
                value: self.max_stability_gain,
            });
        }
        Ok(())
    }
}

/// A [`CouplingLimits`] value with the wrong sign or not finite.
#[derive(Clone, Debug, PartialEq)]
pub enum CouplingLimitsError {
    /// `max_load_reduction` is positive or not finite.
    LoadReduction {
        /// The rejected value.
        value: f64,
    },
    /// `max_stability_gain` is negative or not finite.
    StabilityGain {
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for CouplingLimitsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadReduction { value } => {
                write!(f, "max_load_reduction must be finite and <= 0, got {value}")
            }
            Self::StabilityGain { value } => {
                write!(f, "max_stability_gain must be finite and >= 0, got {value}")
            }
        }
    }
}

impl Error for CouplingLimitsError {}

/// The single merged reflex response of one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CoupledReflexOutcome {
    /// Whether any result fired.
    pub triggered: bool,
    /// Highest-intensity action among the fired results.
    pub dominant_action: Option<ReflexAction>,
    /// Summed load delta, floored at the load-reduction limit.
    pub net_load_delta: f64,
    /// Summed stability delta, capped at the stability-gain limit.
    pub net_stability_delta: f64,
    /// Fired actions disagree on both target region and kind.
    pub unresolved_conflict: bool,
    /// Number of fired results merged.
    pub contributors: usize,
}

/// Merges fired [`ReflexResult`]s into one [`CoupledReflexOutcome`].
///
/// # Examples
///
/// ```
/// use somatic_core::RegionId;
/// use somatic_reflex::{ReflexAction, ReflexCouplingEngine, ReflexKind, ReflexResult};
///
/// let left = RegionId(1);
/// let right = RegionId(2);
/// let outcome = ReflexCouplingEngine::default().couple(&[
///     ReflexResult::fired(ReflexAction::new(ReflexKind::Flex, left, 0.9), -0.2, 0.1),
///     ReflexResult::fired(ReflexAction::new(ReflexKind::Extend, right, 0.3), -0.1, 0.05),
/// ]);
///
/// let dominant = outcome.dominant_action.unwrap();
/// assert_eq!(dominant.kind, ReflexKind::Flex);
/// assert_eq!(dominant.target_region, left);
/// assert!(outcome.unresolved_conflict);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ReflexCouplingEngine {
    limits: CouplingLimits,
}

impl ReflexCouplingEngine {
    /// Create an engine with validated limits.
    pub fn new(limits: CouplingLimits) -> Result<Self, CouplingLimitsError> {
        limits.validate()?;
        Ok(Self { limits })
    }

    /// The active limits.
    pub fn limits(&self) -> &CouplingLimits {
        &self.limits
    }

    /// Merge `results`, given in arrival order.
    ///
    /// Untriggered results are ignored. NaN deltas contribute zero.
    pub fn couple(&self, results: &[ReflexResult]) -> CoupledReflexOutcome {
        let fired = || results.iter().filter(|r| r.triggered);

        let contributors = fired().count();
        if contributors == 0 {
            return CoupledReflexOutcome::default();
        }

        let load_sum: f64 = fired().map(|r| finite_or_zero(r.load_delta)).sum();
        let stability_sum: f64 = fired().map(|r| finite_or_zero(r.stability_delta)).sum();

        let actions: Vec<&ReflexAction> = fired().filter_map(|r| r.action.as_ref()).collect();

        // First strictly greater intensity wins, so ties keep arrival order.
        let mut dominant: Option<&ReflexAction> = None;
        for &action in &actions {
            if dominant.is_none_or(|d| action.intensity > d.intensity) {
                dominant = Some(action);
            }
        }

        let unresolved_conflict = conflicting(&actions);
        if unresolved_conflict {
            debug!(
                actions = actions.len(),
                dominant = ?dominant.map(|a| a.kind),
                "reflex conflict across regions and kinds"
            );
        }

        CoupledReflexOutcome {
            triggered: true,
            dominant_action: dominant.copied(),
            net_load_delta: load_sum.max(self.limits.max_load_reduction),
            net_stability_delta: stability_sum.min(self.limits.max_stability_gain),
            unresolved_conflict,
            contributors,
        }
    }
}

/// More than one distinct target and more than one distinct kind.
fn conflicting(actions: &[&ReflexAction]) -> bool {
    let targets: IndexSet<RegionId> = actions.iter().map(|a| a.target_region).collect();
    // One bit per kind; the enum is closed so every kind has a bit.
    let kinds = actions
        .iter()
        .fold(0u8, |mask, a| mask | (1u8 << (a.kind as u8)));
    targets.len() > 1 && kinds.count_ones() > 1
}

fn finite_or_zero(delta: f64) -> f64 {
    if delta.is_nan() {
        0.0
    } else {
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ReflexKind;
    use proptest::prelude::*;

    fn action(kind: ReflexKind, target: u32, intensity: f64) -> ReflexResult {
        ReflexResult::fired(ReflexAction::new(kind, RegionId(target), intensity), 0.0, 0.0)
    }

    #[test]
    fn empty_input_is_quiet() {
        let outcome = ReflexCouplingEngine::default().couple(&[]);
        assert!(!outcome.triggered);
        assert!(outcome.dominant_action.is_none());
        assert_eq!(outcome.net_load_delta, 0.0);
        assert_eq!(outcome.net_stability_delta, 0.0);
        assert!(!outcome.unresolved_conflict);
        assert_eq!(outcome.contributors, 0);
    }

    #[test]
    fn untriggered_only_is_quiet() {
        let idle = ReflexResult {
            triggered: false,
            action: Some(ReflexAction::new(ReflexKind::Flex, RegionId(0), 1.0)),
            load_delta: -0.5,
            stability_delta: 0.3,
        };
        let outcome = ReflexCouplingEngine::default().couple(&[idle, ReflexResult::idle()]);
        assert_eq!(outcome, CoupledReflexOutcome::default());
    }

    #[test]
    fn untriggered_results_do_not_contribute() {
        let idle = ReflexResult {
            triggered: false,
            action: Some(ReflexAction::new(ReflexKind::Rotate, RegionId(5), 1.0)),
            load_delta: -0.5,
            stability_delta: 0.3,
        };
        let fired = ReflexResult::fired(
            ReflexAction::new(ReflexKind::Flex, RegionId(1), 0.2),
            -0.1,
            0.05,
        );
        let outcome = ReflexCouplingEngine::default().couple(&[idle, fired]);
        assert_eq!(outcome.contributors, 1);
        assert_eq!(outcome.dominant_action.unwrap().kind, ReflexKind::Flex);
        assert!((outcome.net_load_delta + 0.1).abs() < 1e-12);
        assert!(!outcome.unresolved_conflict);
    }

    #[test]
    fn load_relief_floored() {
        let burst = vec![ReflexResult::fired_without_action(-0.1, 0.0); 10];
        let outcome = ReflexCouplingEngine::default().couple(&burst);
        assert_eq!(outcome.net_load_delta, -0.6);
        assert_eq!(outcome.contributors, 10);
        assert!(outcome.dominant_action.is_none());
    }

    #[test]
    fn load_increase_is_not_capped() {
        let outcome = ReflexCouplingEngine::default().couple(&[
            ReflexResult::fired_without_action(0.7, 0.0),
            ReflexResult::fired_without_action(0.6, 0.0),
        ]);
        assert!((outcome.net_load_delta - 1.3).abs() < 1e-12);
    }

    #[test]
    fn stability_gain_capped() {
        let outcome = ReflexCouplingEngine::default().couple(&[
            ReflexResult::fired_without_action(0.0, 0.3),
            ReflexResult::fired_without_action(0.0, 0.3),
        ]);
        assert_eq!(outcome.net_stability_delta, 0.4);
    }

    #[test]
    fn stability_loss_is_not_floored() {
        let outcome = ReflexCouplingEngine::default().couple(&[
            ReflexResult::fired_without_action(0.0, -0.7),
            ReflexResult::fired_without_action(0.0, -0.5),
        ]);
        assert!((outcome.net_stability_delta + 1.2).abs() < 1e-12);
    }

    #[test]
    fn highest_intensity_dominates() {
        let outcome = ReflexCouplingEngine::default().couple(&[
            action(ReflexKind::Extend, 2, 0.3),
            action(ReflexKind::Flex, 1, 0.9),
            action(ReflexKind::Rotate, 3, 0.5),
        ]);
        let dominant = outcome.dominant_action.unwrap();
        assert_eq!(dominant.kind, ReflexKind::Flex);
        assert_eq!(dominant.target_region, RegionId(1));
    }

    #[test]
    fn intensity_tie_goes_to_first_arrival() {
        let outcome = ReflexCouplingEngine::default().couple(&[
            action(ReflexKind::Withdraw, 4, 0.6),
            action(ReflexKind::Stabilize, 4, 0.6),
        ]);
        assert_eq!(outcome.dominant_action.unwrap().kind, ReflexKind::Withdraw);
    }

    #[test]
    fn different_regions_and_kinds_conflict() {
        let outcome = ReflexCouplingEngine::default().couple(&[
            action(ReflexKind::Flex, 1, 0.9),
            action(ReflexKind::Extend, 2, 0.3),
        ]);
        assert!(outcome.unresolved_conflict);
    }

    #[test]
    fn same_kind_on_different_regions_is_not_conflict() {
        let outcome = ReflexCouplingEngine::default().couple(&[
            action(ReflexKind::Withdraw, 1, 0.9),
            action(ReflexKind::Withdraw, 2, 0.3),
        ]);
        assert!(!outcome.unresolved_conflict);
    }

    #[test]
    fn different_kinds_on_same_region_is_not_conflict() {
        let outcome = ReflexCouplingEngine::default().couple(&[
            action(ReflexKind::Flex, 1, 0.9),
            action(ReflexKind::Extend, 1, 0.3),
        ]);
        assert!(!outcome.unresolved_conflict);
    }

    #[test]
    fn conflict_needs_disagreement_on_both_axes_across_the_set() {
        // Targets {1, 2} and kinds {flex, extend}, though no single pair
        // differs on both.
        let outcome = ReflexCouplingEngine::default().couple(&[
            action(ReflexKind::Flex, 1, 0.9),
            action(ReflexKind::Extend, 1, 0.5),
            action(ReflexKind::Flex, 2, 0.4),
        ]);
        assert!(outcome.unresolved_conflict);
    }

    #[test]
    fn actionless_results_do_not_conflict() {
        let outcome = ReflexCouplingEngine::default().couple(&[
            ReflexResult::fired_without_action(-0.1, 0.1),
            action(ReflexKind::Flex, 1, 0.2),
        ]);
        assert!(!outcome.unresolved_conflict);
        assert_eq!(outcome.contributors, 2);
    }

    #[test]
    fn nan_deltas_contribute_zero() {
        let outcome = ReflexCouplingEngine::default().couple(&[
            ReflexResult::fired_without_action(f64::NAN, f64::NAN),
            ReflexResult::fired_without_action(-0.2, 0.1),
        ]);
        assert!((outcome.net_load_delta + 0.2).abs() < 1e-12);
        assert!((outcome.net_stability_delta - 0.1).abs() < 1e-12);
    }

    #[test]
    fn custom_limits_apply() {
        let engine = ReflexCouplingEngine::new(CouplingLimits {
            max_load_reduction: -0.2,
            max_stability_gain: 0.1,
        })
        .unwrap();
        let outcome = engine.couple(&[ReflexResult::fired_without_action(-0.5, 0.5)]);
        assert_eq!(outcome.net_load_delta, -0.2);
        assert_eq!(outcome.net_stability_delta, 0.1);
    }

    #[test]
    fn limits_with_wrong_sign_rejected() {
        let err = ReflexCouplingEngine::new(CouplingLimits {
            max_load_reduction: 0.3,
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, CouplingLimitsError::LoadReduction { value: 0.3 });

        let err = CouplingLimits {
            max_stability_gain: f64::INFINITY,
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, CouplingLimitsError::StabilityGain { .. }));
    }

    fn arb_kind() -> impl Strategy<Value = ReflexKind> {
        prop_oneof![
            Just(ReflexKind::Flex),
            Just(ReflexKind::Extend),
            Just(ReflexKind::Rotate),
            Just(ReflexKind::Withdraw),
            Just(ReflexKind::Stabilize),
        ]
    }

    fn arb_result() -> impl Strategy<Value = ReflexResult> {
        (
            any::<bool>(),
            proptest::option::of((arb_kind(), 0u32..6, 0.0f64..1.0)),
            -1.0f64..1.0,
            -1.0f64..1.0,
        )
            .prop_map(|(triggered, action, load_delta, stability_delta)| ReflexResult {
                triggered,
                action: action.map(|(k, t, i)| ReflexAction::new(k, RegionId(t), i)),
                load_delta,
                stability_delta,
            })
    }

    proptest! {
        #[test]
        fn outcome_respects_limits(results in proptest::collection::vec(arb_result(), 0..24)) {
            let outcome = ReflexCouplingEngine::default().couple(&results);
            prop_assert!(outcome.net_load_delta >= MAX_LOAD_REDUCTION);
            prop_assert!(outcome.net_stability_delta <= MAX_STABILITY_GAIN);
            prop_assert_eq!(outcome.triggered, results.iter().any(|r| r.triggered));
            prop_assert_eq!(outcome.contributors, results.iter().filter(|r| r.triggered).count());
        }

        #[test]
        fn dominant_has_maximal_intensity(results in proptest::collection::vec(arb_result(), 0..24)) {
            let outcome = ReflexCouplingEngine::default().couple(&results);
            let best = results
                .iter()
                .filter(|r| r.triggered)
                .filter_map(|r| r.action)
                .map(|a| a.intensity)
                .fold(None, |acc: Option<f64>, i| Some(acc.map_or(i, |m| m.max(i))));
            prop_assert_eq!(outcome.dominant_action.map(|a| a.intensity), best);
        }
    }
}
