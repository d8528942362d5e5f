//! Reflex proposals produced by upstream evaluators.

use somatic_core::RegionId;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// The closed set of reflex actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ReflexKind {
    /// Contract toward the body.
    Flex = 0,
    /// Straighten away from the body.
    Extend = 1,
    /// Turn about the region's axis.
    Rotate = 2,
    /// Pull away from a stimulus.
    Withdraw = 3,
    /// Brace in place.
    Stabilize = 4,
}

impl ReflexKind {
    /// Every kind, in declaration order.
    pub const ALL: [ReflexKind; 5] = [
        ReflexKind::Flex,
        ReflexKind::Extend,
        ReflexKind::Rotate,
        ReflexKind::Withdraw,
        ReflexKind::Stabilize,
    ];

    /// Lower-case action name.
    pub fn as_str(self) -> &'static str {
        match self {
            ReflexKind::Flex => "flex",
            ReflexKind::Extend => "extend",
            ReflexKind::Rotate => "rotate",
            ReflexKind::Withdraw => "withdraw",
            ReflexKind::Stabilize => "stabilize",
        }
    }
}

impl fmt::Display for ReflexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReflexKind {
    type Err = ParseReflexKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReflexKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseReflexKindError {
                name: s.to_string(),
            })
    }
}

/// An action name outside the closed [`ReflexKind`] set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseReflexKindError {
    /// The rejected name.
    pub name: String,
}

impl fmt::Display for ParseReflexKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown reflex action '{}'", self.name)
    }
}

impl Error for ParseReflexKindError {}

/// A proposed reflex on one region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReflexAction {
    /// Which reflex.
    pub kind: ReflexKind,
    /// The region it acts on.
    pub target_region: RegionId,
    /// Strength in `[0, 1]`.
    pub intensity: f64,
}

impl ReflexAction {
    /// Build an action, clamping `intensity` into `[0, 1]` (NaN becomes 0).
    pub fn new(kind: ReflexKind, target_region: RegionId, intensity: f64) -> Self {
        let intensity = if intensity.is_nan() {
            0.0
        } else {
            intensity.clamp(0.0, 1.0)
        };
        Self {
            kind,
            target_region,
            intensity,
        }
    }
}

/// One region's reflex proposal for a single tick.
///
/// The deltas are unbounded; bounds are applied when results are coupled.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ReflexResult {
    /// Whether the reflex fired. Untriggered results are ignored downstream.
    pub triggered: bool,
    /// The proposed action, if any.
    pub action: Option<ReflexAction>,
    /// Proposed load change, typically negative.
    pub load_delta: f64,
    /// Proposed stability change, typically positive.
    pub stability_delta: f64,
}

impl ReflexResult {
    /// A result that did not fire.
    pub fn idle() -> Self {
        Self::default()
    }

    /// A fired reflex carrying `action`.
    pub fn fired(action: ReflexAction, load_delta: f64, stability_delta: f64) -> Self {
        Self {
            triggered: true,
            action: Some(action),
            load_delta,
            stability_delta,
        }
    }

    /// A fired reflex that only proposes deltas.
    pub fn fired_without_action(load_delta: f64, stability_delta: f64) -> Self {
        Self {
            triggered: true,
            action: None,
            load_delta,
            stability_delta,
        }
    }
}
