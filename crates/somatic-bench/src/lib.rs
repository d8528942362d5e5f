//! Benchmark profiles and utilities for the Somatic coupling engine.
//!
//! Provides pre-built [`BodyConfig`] profiles for benchmarking:
//!
//! - [`ring_profile`]: `n` regions coupled in a cycle
//! - [`lattice_profile`]: `side × side` grid with 4-neighbour coupling
//! - [`overload_commands`]: deterministic overload pattern for a body
//! - [`reflex_wave`]: deterministic burst of fired reflexes

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use somatic_core::RegionId;
use somatic_engine::{BodyConfig, RegionCommand, RegionDef};
use somatic_reflex::{ReflexAction, ReflexKind, ReflexResult};

/// `n` regions `r0..r{n-1}` coupled in a ring.
///
/// A ring of fewer than three regions degenerates to a line.
pub fn ring_profile(n: usize) -> BodyConfig {
    let regions: Vec<RegionDef> = (0..n).map(|i| RegionDef::new(format!("r{i}"))).collect();
    let mut connections: Vec<(String, String)> = (1..n)
        .map(|i| (format!("r{}", i - 1), format!("r{i}")))
        .collect();
    if n >= 3 {
        connections.push((format!("r{}", n - 1), "r0".to_string()));
    }
    BodyConfig {
        regions,
        connections,
        ..Default::default()
    }
}

/// `side × side` grid named `x{col}y{row}`, each cell coupled to its
/// right and lower neighbour.
pub fn lattice_profile(side: usize) -> BodyConfig {
    let name = |col: usize, row: usize| format!("x{col}y{row}");
    let mut regions = Vec::with_capacity(side * side);
    let mut connections = Vec::new();
    for row in 0..side {
        for col in 0..side {
            regions.push(RegionDef::new(name(col, row)));
            if col + 1 < side {
                connections.push((name(col, row), name(col + 1, row)));
            }
            if row + 1 < side {
                connections.push((name(col, row), name(col, row + 1)));
            }
        }
    }
    BodyConfig {
        regions,
        connections,
        ..Default::default()
    }
}

/// Overload every `stride`-th region of a body with `region_count`
/// regions. `stride` of zero is treated as one.
pub fn overload_commands(region_count: usize, stride: usize) -> Vec<RegionCommand> {
    (0..region_count)
        .step_by(stride.max(1))
        .map(|i| RegionCommand::ApplyLoad {
            region: RegionId(i as u32),
            delta: 0.95,
        })
        .collect()
}

/// `n` fired reflexes cycling through every kind and spread across
/// `region_count` regions, with intensities and deltas derived from the
/// index.
pub fn reflex_wave(n: usize, region_count: usize) -> Vec<ReflexResult> {
    let regions = region_count.max(1);
    (0..n)
        .map(|i| {
            let kind = ReflexKind::ALL[i % ReflexKind::ALL.len()];
            let target = RegionId((i.wrapping_mul(7) % regions) as u32);
            let intensity = ((i * 37) % 100) as f64 / 100.0;
            ReflexResult::fired(
                ReflexAction::new(kind, target, intensity),
                -0.05,
                0.02,
            )
        })
        .collect()
}
