//! Per-region load/stability physics.
//!
//! [`LocalState`] holds four normalised quantities. `load`, `fatigue`
//! and `integrity` are mutated through the operations below; `stability`
//! is derived from them after every mutation and can never be written
//! directly:
//!
//! ```text
//! stability = integrity · (1 − load) · (1 − fatigue)
//! ```
//!
//! Inputs are never rejected. Every result is clamped into `[0, 1]`, and
//! NaN deltas are treated as zero so the invariant holds for any input.

/// Load at or above which a region is overloaded.
pub const OVERLOAD_THRESHOLD: f64 = 0.85;

/// Stability at or below which a region is unstable.
pub const UNSTABLE_THRESHOLD: f64 = 0.35;

/// Fatigue at or above which a region is exhausted.
pub const EXHAUSTION_THRESHOLD: f64 = 0.8;

/// Fraction of a positive load delta that accrues as fatigue.
const FATIGUE_PER_LOAD: f64 = 0.5;

fn unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

fn finite_or_zero(delta: f64) -> f64 {
    if delta.is_nan() {
        0.0
    } else {
        delta
    }
}

/// Load, stability, fatigue and integrity of a single region.
///
/// All four fields are in `[0, 1]` after any sequence of operations.
///
/// # Examples
///
/// ```
/// use somatic_core::LocalState;
///
/// let mut state = LocalState::default();
/// state.apply_load(0.4);
/// assert!((state.load() - 0.4).abs() < 1e-12);
/// assert!((state.fatigue() - 0.2).abs() < 1e-12);
/// // 1.0 · 0.6 · 0.8
/// assert!((state.stability() - 0.48).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalState {
    load: f64,
    stability: f64,
    fatigue: f64,
    integrity: f64,
}

impl Default for LocalState {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

impl LocalState {
    /// Build a state from explicit values, clamping each into `[0, 1]`.
    pub fn new(load: f64, fatigue: f64, integrity: f64) -> Self {
        let mut state = Self {
            load: unit(finite_or_zero(load)),
            stability: 0.0,
            fatigue: unit(finite_or_zero(fatigue)),
            integrity: unit(finite_or_zero(integrity)),
        };
        state.recompute();
        state
    }

    /// Current load.
    pub fn load(&self) -> f64 {
        self.load
    }

    /// Derived stability.
    pub fn stability(&self) -> f64 {
        self.stability
    }

    /// Accumulated fatigue.
    pub fn fatigue(&self) -> f64 {
        self.fatigue
    }

    /// Structural integrity.
    pub fn integrity(&self) -> f64 {
        self.integrity
    }

    /// Pain signal, `1 − stability`.
    pub fn pain(&self) -> f64 {
        1.0 - self.stability
    }

    /// Add `delta` to load. A positive delta also accrues half of itself
    /// as fatigue.
    pub fn apply_load(&mut self, delta: f64) {
        let delta = finite_or_zero(delta);
        self.load = unit(self.load + delta);
        if delta > 0.0 {
            self.fatigue = unit(self.fatigue + delta * FATIGUE_PER_LOAD);
        }
        self.recompute();
    }

    /// Remove `|delta|` from load.
    pub fn relieve_load(&mut self, delta: f64) {
        let delta = finite_or_zero(delta).abs();
        self.load = unit(self.load - delta);
        self.recompute();
    }

    /// Remove `|severity|` from integrity.
    pub fn apply_damage(&mut self, severity: f64) {
        let severity = finite_or_zero(severity).abs();
        self.integrity = unit(self.integrity - severity);
        self.recompute();
    }

    /// Remove `rate` from both fatigue and load.
    pub fn recover(&mut self, rate: f64) {
        let rate = finite_or_zero(rate);
        self.fatigue = unit(self.fatigue - rate);
        self.load = unit(self.load - rate);
        self.recompute();
    }

    /// Remove `delta` from fatigue; a negative delta adds fatigue.
    ///
    /// This is how an externally computed stability delta is realised:
    /// stability stays derived, and shedding fatigue raises it.
    pub fn shift_fatigue(&mut self, delta: f64) {
        let delta = finite_or_zero(delta);
        self.fatigue = unit(self.fatigue - delta);
        self.recompute();
    }

    /// `load ≥ 0.85`.
    pub fn overloaded(&self) -> bool {
        self.load >= OVERLOAD_THRESHOLD
    }

    /// `stability ≤ 0.35`.
    pub fn unstable(&self) -> bool {
        self.stability <= UNSTABLE_THRESHOLD
    }

    /// `fatigue ≥ 0.8`.
    pub fn exhausted(&self) -> bool {
        self.fatigue >= EXHAUSTION_THRESHOLD
    }

    fn recompute(&mut self) {
        self.stability = unit(self.integrity * (1.0 - self.load) * (1.0 - self.fatigue));
    }
}
