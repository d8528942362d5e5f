//! Reflex buffering and coupling for Somatic.
//!
//! Upstream evaluators produce at most one [`ReflexResult`] per region per
//! tick. [`ReflexBuffer`] collects the triggered ones and hands them to
//! [`ReflexCouplingEngine`], which merges them into a single bounded
//! [`CoupledReflexOutcome`]:
//!
//! - summed load relief is floored at [`MAX_LOAD_REDUCTION`];
//! - summed stability gain is capped at [`MAX_STABILITY_GAIN`];
//! - the highest-intensity action wins, ties going to the earliest arrival;
//! - a conflict is flagged only when actions disagree on both target
//!   region and action kind.
//!
//! Nothing here mutates region state; applying the outcome is the
//! caller's job.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod action;
pub mod buffer;
pub mod coupling;

pub use action::{ParseReflexKindError, ReflexAction, ReflexKind, ReflexResult};
pub use buffer::ReflexBuffer;
pub use coupling::{
    CoupledReflexOutcome, CouplingLimits, CouplingLimitsError, ReflexCouplingEngine,
    MAX_LOAD_REDUCTION, MAX_STABILITY_GAIN,
};
