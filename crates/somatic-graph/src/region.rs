//! A named region wrapping one [`LocalState`].

use somatic_core::LocalState;

/// A named node of the coupling graph with its own load physics.
///
/// All numeric operations delegate to the owned [`LocalState`]. The
/// region carries no propagation logic; it only answers whether it can
/// absorb its current load on its own.
#[derive(Clone, Debug, PartialEq)]
pub struct CoupledRegion {
    name: String,
    state: LocalState,
}

impl CoupledRegion {
    /// A fresh region with default state.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_state(name, LocalState::default())
    }

    /// A region starting from an explicit state.
    pub fn with_state(name: impl Into<String>, state: LocalState) -> Self {
        Self {
            name: name.into(),
            state,
        }
    }

    /// Unique region name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current physics state.
    pub fn state(&self) -> &LocalState {
        &self.state
    }

    /// Mutable physics state.
    pub fn state_mut(&mut self) -> &mut LocalState {
        &mut self.state
    }

    /// See [`LocalState::apply_load`].
    pub fn apply_load(&mut self, delta: f64) {
        self.state.apply_load(delta);
    }

    /// See [`LocalState::relieve_load`].
    pub fn relieve_load(&mut self, delta: f64) {
        self.state.relieve_load(delta);
    }

    /// See [`LocalState::apply_damage`].
    pub fn apply_damage(&mut self, severity: f64) {
        self.state.apply_damage(severity);
    }

    /// See [`LocalState::recover`].
    pub fn recover(&mut self, rate: f64) {
        self.state.recover(rate);
    }

    /// See [`LocalState::shift_fatigue`].
    pub fn shift_fatigue(&mut self, delta: f64) {
        self.state.shift_fatigue(delta);
    }

    /// `false` when the region is overloaded or unstable.
    pub fn can_resolve_locally(&self) -> bool {
        !(self.state.overloaded() || self.state.unstable())
    }

    /// Re-evaluate local resolution against the current state.
    ///
    /// Called on entry to a region during propagation, after any relief
    /// that reached it earlier in the tick. Returns `true` when the
    /// region absorbs its load and propagation should stop here.
    pub fn attempt_resolution(&self) -> bool {
        self.can_resolve_locally()
    }
}
