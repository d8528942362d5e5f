//! Per-tick load commands and their receipts.

use somatic_core::{GraphError, RegionId, TickId};

/// A passive load or recovery operation on one region, applied at the
/// start of a tick before propagation.
///
/// # Examples
///
/// ```
/// use somatic_core::RegionId;
/// use somatic_engine::RegionCommand;
///
/// let cmd = RegionCommand::ApplyLoad { region: RegionId(0), delta: 0.3 };
/// assert_eq!(cmd.region(), RegionId(0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RegionCommand {
    /// [`LocalState::apply_load`](somatic_core::LocalState::apply_load).
    ApplyLoad {
        /// Target region.
        region: RegionId,
        /// Load change.
        delta: f64,
    },
    /// [`LocalState::relieve_load`](somatic_core::LocalState::relieve_load).
    RelieveLoad {
        /// Target region.
        region: RegionId,
        /// Load removed (magnitude).
        delta: f64,
    },
    /// [`LocalState::apply_damage`](somatic_core::LocalState::apply_damage).
    Damage {
        /// Target region.
        region: RegionId,
        /// Integrity removed (magnitude).
        severity: f64,
    },
    /// [`LocalState::recover`](somatic_core::LocalState::recover).
    Recover {
        /// Target region.
        region: RegionId,
        /// Fatigue and load removed.
        rate: f64,
    },
}

impl RegionCommand {
    /// The region this command addresses.
    pub fn region(&self) -> RegionId {
        match *self {
            Self::ApplyLoad { region, .. }
            | Self::RelieveLoad { region, .. }
            | Self::Damage { region, .. }
            | Self::Recover { region, .. } => region,
        }
    }
}

/// Receipt for one command of a submitted batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandReceipt {
    /// Whether the command was applied.
    pub accepted: bool,
    /// The tick it was applied in.
    pub applied_tick_id: Option<TickId>,
    /// Why it was rejected.
    pub reason: Option<GraphError>,
    /// Index of the command within its batch.
    pub command_index: usize,
}
