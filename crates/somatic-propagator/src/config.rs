//! Propagation tuning and its validation.

use std::error::Error;
use std::fmt;

/// How [`propagate_all`](crate::CouplingPropagator::propagate_all) treats
/// regions already reached by an earlier source in the same sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SweepPolicy {
    /// Every source gets a fresh visited set. A region relieved by an
    /// earlier source may be loaded again, and entered again, by a later
    /// one within the same sweep (layered escalation).
    #[default]
    Independent,
    /// Regions visited by any earlier source are settled for the rest of
    /// the sweep: later sources neither deliver to nor enter them, and
    /// they are skipped as sources.
    Settled,
}

/// Tuning for the signal a region pushes to its neighbors.
///
/// For a region `R` that cannot resolve locally:
///
/// ```text
/// unresolved = max(0, R.load − comfort_load)
/// increment  = clamp(load_transfer · unresolved + pain_transfer · R.pain, 0, max_increment)
/// ```
///
/// When `R` has at least one eligible neighbor it first sheds
/// `shed_ratio · unresolved`; each neighbor then absorbs `increment`
/// through `apply_load`.
#[derive(Clone, Debug, PartialEq)]
pub struct PropagationConfig {
    /// Load a region keeps before the excess counts as unresolved. Default: 0.5.
    pub comfort_load: f64,
    /// Share of unresolved load carried in the signal. Default: 0.5.
    pub load_transfer: f64,
    /// Share of pain carried in the signal. Default: 0.1.
    pub pain_transfer: f64,
    /// Upper bound on the load any single delivery adds. Default: 0.3.
    pub max_increment: f64,
    /// Share of unresolved load a region sheds once it has pushed to at
    /// least one neighbor. `0.0` disables shedding. Default: 1.0.
    pub shed_ratio: f64,
    /// Cross-source behaviour within one sweep. Default: [`SweepPolicy::Independent`].
    pub sweep_policy: SweepPolicy,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            comfort_load: 0.5,
            load_transfer: 0.5,
            pain_transfer: 0.1,
            max_increment: 0.3,
            shed_ratio: 1.0,
            sweep_policy: SweepPolicy::Independent,
        }
    }
}

impl PropagationConfig {
    /// Check that every parameter is finite and in range.
    pub fn validate(&self) -> Result<(), PropagationConfigError> {
        let unit = |name: &'static str, value: f64| {
            if value.is_finite() && (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(PropagationConfigError::OutOfRange {
                    parameter: name,
                    value,
                    expected: "[0, 1]",
                })
            }
        };
        let non_negative = |name: &'static str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(PropagationConfigError::OutOfRange {
                    parameter: name,
                    value,
                    expected: "finite and >= 0",
                })
            }
        };
        unit("comfort_load", self.comfort_load)?;
        non_negative("load_transfer", self.load_transfer)?;
        non_negative("pain_transfer", self.pain_transfer)?;
        unit("max_increment", self.max_increment)?;
        unit("shed_ratio", self.shed_ratio)?;
        Ok(())
    }
}

/// A [`PropagationConfig`] parameter outside its valid range.
#[derive(Clone, Debug, PartialEq)]
pub enum PropagationConfigError {
    /// The named parameter is NaN, infinite, or out of range.
    OutOfRange {
        /// Field name in [`PropagationConfig`].
        parameter: &'static str,
        /// The rejected value.
        value: f64,
        /// Human-readable valid range.
        expected: &'static str,
    },
}

impl fmt::Display for PropagationConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange {
                parameter,
                value,
                expected,
            } => write!(f, "{parameter} must be {expected}, got {value}"),
        }
    }
}

impl Error for PropagationConfigError {}
